//! Context aggregation: one legislator id in, one complete document out.
//!
//! The builder orchestrates the store's read queries and applies every
//! derived-field rule against the injected generation timestamp. `build`
//! stamps the current time; `build_at` is the deterministic entry point.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use parlatwin_core::context::{
    ActividadLegislativa, ComisionContexto, ContextoMetadata, ContextoParlamentario,
    MandatoContexto, MilitanciaContexto, PerfilBiografico, Trayectoria, VotacionContexto,
};
use parlatwin_core::domain::proyecto::ResumenActividad;
use parlatwin_core::errors::ContextError;
use parlatwin_db::repositories::{ParlamentarioStore, RepositoryError};

/// Source tag recorded in the document metadata.
pub const FUENTE: &str = "parlamento.db";

pub const LIMITE_VOTACIONES_DEFAULT: u32 = 20;

pub struct ContextBuilder<S> {
    store: S,
    limite_votaciones: u32,
}

impl<S: ParlamentarioStore> ContextBuilder<S> {
    pub fn new(store: S) -> Self {
        Self { store, limite_votaciones: LIMITE_VOTACIONES_DEFAULT }
    }

    pub fn with_recent_votes_limit(mut self, limite: u32) -> Self {
        self.limite_votaciones = limite.max(1);
        self
    }

    pub async fn build(&self, mp_uid: i64) -> Result<ContextoParlamentario, ContextError> {
        self.build_at(mp_uid, Utc::now()).await
    }

    pub async fn build_at(
        &self,
        mp_uid: i64,
        generado_en: DateTime<Utc>,
    ) -> Result<ContextoParlamentario, ContextError> {
        let hoy = generado_en.date_naive();

        let perfil = self
            .store
            .perfil(mp_uid)
            .await
            .map_err(store_error)?
            .ok_or(ContextError::NotFound { mp_uid, timestamp: generado_en })?;
        debug!(mp_uid, nombre = %perfil.nombre_completo, "perfil básico cargado");

        let mandatos = self.store.mandatos(mp_uid).await.map_err(store_error)?;
        let militancias = self.store.militancias(mp_uid).await.map_err(store_error)?;
        let comisiones = self.store.comisiones(mp_uid).await.map_err(store_error)?;
        let proyectos_autor = self.store.proyectos_autor(mp_uid).await.map_err(store_error)?;
        let resumen_proyectos =
            self.store.resumen_proyectos(mp_uid).await.map_err(store_error)?;
        let resumen_comisiones =
            self.store.resumen_comisiones(mp_uid).await.map_err(store_error)?;
        let estadisticas_votacion =
            self.store.estadisticas_votacion(mp_uid).await.map_err(store_error)?;
        let votaciones_recientes = self
            .store
            .votaciones_recientes(mp_uid, self.limite_votaciones)
            .await
            .map_err(store_error)?;
        let analisis_partidario =
            self.store.analisis_partidario(mp_uid).await.map_err(store_error)?;

        info!(
            mp_uid,
            mandatos = mandatos.len(),
            proyectos = proyectos_autor.len(),
            votaciones = estadisticas_votacion.total_votaciones,
            "contexto parlamentario agregado"
        );

        Ok(ContextoParlamentario {
            metadata: ContextoMetadata { mp_uid, generado_en, fuente: FUENTE.to_string() },
            perfil_biografico: PerfilBiografico::derivar(perfil, hoy),
            trayectoria: Trayectoria {
                mandatos: mandatos
                    .into_iter()
                    .map(|mandato| MandatoContexto::derivar(mandato, hoy))
                    .collect(),
                militancia_partidaria: militancias
                    .into_iter()
                    .map(|militancia| MilitanciaContexto::derivar(militancia, hoy))
                    .collect(),
                comisiones: comisiones
                    .into_iter()
                    .map(|comision| ComisionContexto::derivar(comision, hoy))
                    .collect(),
            },
            actividad_legislativa: ActividadLegislativa {
                resumen: ResumenActividad {
                    proyectos: resumen_proyectos,
                    comisiones: resumen_comisiones,
                },
                proyectos_autor,
                estadisticas_votacion,
                votaciones_recientes: votaciones_recientes
                    .into_iter()
                    .map(VotacionContexto::derivar)
                    .collect(),
                analisis_partidario,
            },
        })
    }
}

fn store_error(error: RepositoryError) -> ContextError {
    ContextError::Store(error.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use parlatwin_core::domain::parlamentario::PerfilParlamentario;
    use parlatwin_core::domain::trayectoria::{EstadoMandato, MandatoRegistro};
    use parlatwin_core::domain::votacion::{EstadisticasVotacion, Voto, VotacionRegistro};
    use parlatwin_core::serializer::render_prompt;
    use parlatwin_db::repositories::{InMemoryParlamentarioStore, ParlamentarioSeed};

    use super::ContextBuilder;

    fn perfil_ana() -> PerfilParlamentario {
        PerfilParlamentario {
            mp_uid: 1,
            nombre_completo: "Ana Pérez".to_string(),
            genero: Some("Femenino".to_string()),
            fecha_nacimiento: Some(
                parlatwin_core::chrono::NaiveDate::parse_from_str("1980-06-15", "%Y-%m-%d")
                    .expect("fecha"),
            ),
            lugar_nacimiento: Some("Valparaíso".to_string()),
            profesion: Some("Abogada".to_string()),
            diputado_id: None,
            bcn_uri: None,
            url_foto: None,
            twitter_handle: None,
            sitio_web_personal: None,
        }
    }

    async fn store_con_ana() -> InMemoryParlamentarioStore {
        let store = InMemoryParlamentarioStore::default();
        let mut seed = ParlamentarioSeed::nuevo(perfil_ana());
        seed.mandatos.push(MandatoRegistro {
            mandato_id: 1,
            cargo: "Diputada".to_string(),
            distrito: Some("5".to_string()),
            fecha_inicio: parlatwin_core::chrono::NaiveDate::parse_from_str(
                "2022-03-11", "%Y-%m-%d",
            )
            .expect("fecha"),
            fecha_fin: None,
        });
        seed.estadisticas = EstadisticasVotacion {
            total_votaciones: 2,
            votos_a_favor: 1,
            votos_en_contra: 0,
            abstenciones: 1,
            pareos: 0,
        };
        seed.votaciones.push(VotacionRegistro {
            sesion_votacion_id: 2,
            bill_id: None,
            fecha: parlatwin_core::chrono::NaiveDate::parse_from_str("2024-03-02", "%Y-%m-%d")
                .expect("fecha"),
            tema: Some("Reforma tributaria".to_string()),
            resultado_general: Some("Aprobado".to_string()),
            quorum_aplicado: None,
            titulo_proyecto: None,
            voto: Voto::Abstencion,
        });
        store.insertar(seed).await;
        store
    }

    #[tokio::test]
    async fn parlamentario_inexistente_es_not_found_tipado() {
        let builder = ContextBuilder::new(store_con_ana().await);
        let error = builder.build(99).await.expect_err("no existe");

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "No se encontró parlamentario con mp_uid=99");
    }

    #[tokio::test]
    async fn el_documento_deriva_estados_y_edad() {
        let builder = ContextBuilder::new(store_con_ana().await);
        let generado_en = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let documento = builder.build_at(1, generado_en).await.expect("documento");

        assert_eq!(documento.perfil_biografico.edad, Some(44));
        assert_eq!(
            documento.trayectoria.mandatos[0].estado_mandato,
            EstadoMandato::Activo
        );
        assert_eq!(
            documento.actividad_legislativa.votaciones_recientes[0]
                .alineacion_voto
                .as_str(),
            "No aplicable"
        );
        assert!(documento.actividad_legislativa.analisis_partidario.is_none());
    }

    #[tokio::test]
    async fn misma_marca_de_tiempo_produce_bytes_identicos() {
        let builder = ContextBuilder::new(store_con_ana().await);
        let generado_en = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

        let primero = builder.build_at(1, generado_en).await.expect("primer documento");
        let segundo = builder.build_at(1, generado_en).await.expect("segundo documento");

        assert_eq!(primero, segundo);
        assert_eq!(render_prompt(&Ok(primero)), render_prompt(&Ok(segundo)));
    }

    #[tokio::test]
    async fn el_limite_de_votaciones_se_respeta() {
        let store = InMemoryParlamentarioStore::default();
        let mut seed = ParlamentarioSeed::nuevo(perfil_ana());
        for id in (1..=30).rev() {
            seed.votaciones.push(VotacionRegistro {
                sesion_votacion_id: id,
                bill_id: None,
                fecha: parlatwin_core::chrono::NaiveDate::parse_from_str(
                    "2024-03-01", "%Y-%m-%d",
                )
                .expect("fecha"),
                tema: None,
                resultado_general: None,
                quorum_aplicado: None,
                titulo_proyecto: None,
                voto: Voto::AFavor,
            });
        }
        store.insertar(seed).await;

        let builder = ContextBuilder::new(store).with_recent_votes_limit(5);
        let documento = builder.build(1).await.expect("documento");
        assert_eq!(documento.actividad_legislativa.votaciones_recientes.len(), 5);
    }
}
