use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use parlatwin_core::domain::parlamentario::{ParlamentarioResumen, PerfilParlamentario};
use parlatwin_core::domain::proyecto::{
    ProyectoAutor, ResumenComisiones, ResumenProyectos, INICIATIVA_MENSAJE, INICIATIVA_MOCION,
};
use parlatwin_core::domain::trayectoria::{
    ComisionRegistro, MandatoRegistro, MilitanciaRegistro, ROL_PRESIDENTE,
};
use parlatwin_core::domain::votacion::{
    AnalisisPartidario, EstadisticasVotacion, VotacionRegistro,
};

use super::{ParlamentarioStore, RepositoryError};

/// Everything the in-memory store knows about one legislator. Listings are
/// taken as given (callers seed them newest-first, like the SQL store
/// orders them); summary aggregates are derived on read.
#[derive(Clone, Debug)]
pub struct ParlamentarioSeed {
    pub perfil: PerfilParlamentario,
    pub mandatos: Vec<MandatoRegistro>,
    pub militancias: Vec<MilitanciaRegistro>,
    pub comisiones: Vec<ComisionRegistro>,
    pub proyectos: Vec<ProyectoAutor>,
    pub estadisticas: EstadisticasVotacion,
    pub votaciones: Vec<VotacionRegistro>,
    pub analisis: Option<AnalisisPartidario>,
}

impl ParlamentarioSeed {
    pub fn nuevo(perfil: PerfilParlamentario) -> Self {
        Self {
            perfil,
            mandatos: Vec::new(),
            militancias: Vec::new(),
            comisiones: Vec::new(),
            proyectos: Vec::new(),
            estadisticas: EstadisticasVotacion::default(),
            votaciones: Vec::new(),
            analisis: None,
        }
    }
}

/// Test double for `ParlamentarioStore`, mirroring the SQL store's
/// zero-coercion and ordering contract without a database.
#[derive(Default)]
pub struct InMemoryParlamentarioStore {
    registros: RwLock<HashMap<i64, ParlamentarioSeed>>,
}

impl InMemoryParlamentarioStore {
    pub async fn insertar(&self, seed: ParlamentarioSeed) {
        let mut registros = self.registros.write().await;
        registros.insert(seed.perfil.mp_uid, seed);
    }
}

#[async_trait]
impl ParlamentarioStore for InMemoryParlamentarioStore {
    async fn perfil(&self, mp_uid: i64) -> Result<Option<PerfilParlamentario>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).map(|seed| seed.perfil.clone()))
    }

    async fn mandatos(&self, mp_uid: i64) -> Result<Vec<MandatoRegistro>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).map(|seed| seed.mandatos.clone()).unwrap_or_default())
    }

    async fn militancias(&self, mp_uid: i64) -> Result<Vec<MilitanciaRegistro>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).map(|seed| seed.militancias.clone()).unwrap_or_default())
    }

    async fn comisiones(&self, mp_uid: i64) -> Result<Vec<ComisionRegistro>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).map(|seed| seed.comisiones.clone()).unwrap_or_default())
    }

    async fn proyectos_autor(&self, mp_uid: i64) -> Result<Vec<ProyectoAutor>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).map(|seed| seed.proyectos.clone()).unwrap_or_default())
    }

    async fn resumen_proyectos(&self, mp_uid: i64) -> Result<ResumenProyectos, RepositoryError> {
        let registros = self.registros.read().await;
        let proyectos =
            registros.get(&mp_uid).map(|seed| seed.proyectos.as_slice()).unwrap_or_default();

        Ok(ResumenProyectos {
            total_proyectos: proyectos.len() as i64,
            proyectos_ley: proyectos.iter().filter(|proyecto| proyecto.es_ley()).count() as i64,
            en_tramitacion: proyectos
                .iter()
                .filter(|proyecto| proyecto.en_tramitacion())
                .count() as i64,
            mociones: proyectos
                .iter()
                .filter(|proyecto| proyecto.iniciativa.as_deref() == Some(INICIATIVA_MOCION))
                .count() as i64,
            mensajes: proyectos
                .iter()
                .filter(|proyecto| proyecto.iniciativa.as_deref() == Some(INICIATIVA_MENSAJE))
                .count() as i64,
        })
    }

    async fn resumen_comisiones(
        &self,
        mp_uid: i64,
    ) -> Result<ResumenComisiones, RepositoryError> {
        let registros = self.registros.read().await;
        let comisiones =
            registros.get(&mp_uid).map(|seed| seed.comisiones.as_slice()).unwrap_or_default();

        let distintas: HashSet<&str> = comisiones
            .iter()
            .map(|comision| comision.nombre_comision.as_str())
            .collect();

        Ok(ResumenComisiones {
            total_comisiones: distintas.len() as i64,
            presidencias: comisiones
                .iter()
                .filter(|comision| comision.rol == ROL_PRESIDENTE)
                .count() as i64,
            comisiones_activas: comisiones
                .iter()
                .filter(|comision| comision.fecha_fin.is_none())
                .count() as i64,
        })
    }

    async fn estadisticas_votacion(
        &self,
        mp_uid: i64,
    ) -> Result<EstadisticasVotacion, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).map(|seed| seed.estadisticas.clone()).unwrap_or_default())
    }

    async fn votaciones_recientes(
        &self,
        mp_uid: i64,
        limite: u32,
    ) -> Result<Vec<VotacionRegistro>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros
            .get(&mp_uid)
            .map(|seed| seed.votaciones.iter().take(limite as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn analisis_partidario(
        &self,
        mp_uid: i64,
    ) -> Result<Option<AnalisisPartidario>, RepositoryError> {
        let registros = self.registros.read().await;
        Ok(registros.get(&mp_uid).and_then(|seed| seed.analisis.clone()))
    }

    async fn listar_parlamentarios(&self) -> Result<Vec<ParlamentarioResumen>, RepositoryError> {
        let registros = self.registros.read().await;
        let mut listado: Vec<ParlamentarioResumen> = registros
            .values()
            .map(|seed| ParlamentarioResumen {
                mp_uid: seed.perfil.mp_uid,
                nombre_completo: seed.perfil.nombre_completo.clone(),
            })
            .collect();
        listado.sort_by(|a, b| {
            a.nombre_completo.cmp(&b.nombre_completo).then(a.mp_uid.cmp(&b.mp_uid))
        });
        Ok(listado)
    }
}
