//! The aggregated context document: one legislator, fully described.
//!
//! Raw store rows (`domain::*Registro`) are turned into document entries
//! here, with every derived field (age, interval state labels, mandate
//! duration, majority alignment) computed against an injected `hoy` date so
//! the same store state always yields the same document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::parlamentario::{edad_en, PerfilParlamentario};
use crate::domain::proyecto::{ProyectoAutor, ResumenActividad};
use crate::domain::trayectoria::{
    ComisionRegistro, EstadoMandato, EstadoMembresia, EstadoMilitancia, MandatoRegistro,
    MilitanciaRegistro,
};
use crate::domain::votacion::{
    AlineacionVoto, AnalisisPartidario, EstadisticasVotacion, VotacionRegistro,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextoMetadata {
    pub mp_uid: i64,
    pub generado_en: DateTime<Utc>,
    pub fuente: String,
}

/// Profile section: the stored row plus the derived age.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerfilBiografico {
    #[serde(flatten)]
    pub perfil: PerfilParlamentario,
    pub edad: Option<i64>,
}

impl PerfilBiografico {
    pub fn derivar(perfil: PerfilParlamentario, hoy: NaiveDate) -> Self {
        let edad = perfil.fecha_nacimiento.map(|nacimiento| edad_en(nacimiento, hoy));
        Self { perfil, edad }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MandatoContexto {
    pub mandato_id: i64,
    pub cargo: String,
    pub distrito: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
    pub estado_mandato: EstadoMandato,
    pub duracion_dias: i64,
}

impl MandatoContexto {
    pub fn derivar(registro: MandatoRegistro, hoy: NaiveDate) -> Self {
        let estado_mandato = EstadoMandato::evaluar(registro.fecha_fin, hoy);
        // Open mandates accrue duration up to `hoy`.
        let fin_efectivo = registro.fecha_fin.unwrap_or(hoy);
        let duracion_dias = (fin_efectivo - registro.fecha_inicio).num_days();
        Self {
            mandato_id: registro.mandato_id,
            cargo: registro.cargo,
            distrito: registro.distrito,
            fecha_inicio: registro.fecha_inicio,
            fecha_fin: registro.fecha_fin,
            estado_mandato,
            duracion_dias,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilitanciaContexto {
    pub militancia_id: i64,
    pub nombre_partido: String,
    pub sigla: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
    pub estado_militancia: EstadoMilitancia,
}

impl MilitanciaContexto {
    pub fn derivar(registro: MilitanciaRegistro, hoy: NaiveDate) -> Self {
        let estado_militancia = EstadoMilitancia::evaluar(registro.fecha_fin, hoy);
        Self {
            militancia_id: registro.militancia_id,
            nombre_partido: registro.nombre_partido,
            sigla: registro.sigla,
            fecha_inicio: registro.fecha_inicio,
            fecha_fin: registro.fecha_fin,
            estado_militancia,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComisionContexto {
    pub nombre_comision: String,
    pub tipo_comision: Option<String>,
    pub rol: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
    pub estado_membresia: EstadoMembresia,
}

impl ComisionContexto {
    pub fn derivar(registro: ComisionRegistro, hoy: NaiveDate) -> Self {
        let estado_membresia = EstadoMembresia::evaluar(registro.fecha_fin, hoy);
        Self {
            nombre_comision: registro.nombre_comision,
            tipo_comision: registro.tipo_comision,
            rol: registro.rol,
            fecha_inicio: registro.fecha_inicio,
            fecha_fin: registro.fecha_fin,
            estado_membresia,
        }
    }
}

/// Individual vote annotated with its majority-alignment label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VotacionContexto {
    #[serde(flatten)]
    pub votacion: VotacionRegistro,
    pub alineacion_voto: AlineacionVoto,
}

impl VotacionContexto {
    pub fn derivar(votacion: VotacionRegistro) -> Self {
        let alineacion_voto =
            AlineacionVoto::derivar(votacion.resultado_general.as_deref(), votacion.voto);
        Self { votacion, alineacion_voto }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trayectoria {
    pub mandatos: Vec<MandatoContexto>,
    pub militancia_partidaria: Vec<MilitanciaContexto>,
    pub comisiones: Vec<ComisionContexto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActividadLegislativa {
    pub resumen: ResumenActividad,
    pub proyectos_autor: Vec<ProyectoAutor>,
    pub estadisticas_votacion: EstadisticasVotacion,
    pub votaciones_recientes: Vec<VotacionContexto>,
    pub analisis_partidario: Option<AnalisisPartidario>,
}

/// The full context document the chat layer and both renderings consume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextoParlamentario {
    pub metadata: ContextoMetadata,
    pub perfil_biografico: PerfilBiografico,
    pub trayectoria: Trayectoria,
    pub actividad_legislativa: ActividadLegislativa,
}

impl ContextoParlamentario {
    /// First membership in Actual state; lists are newest-first, so this is
    /// the most recent active affiliation.
    pub fn partido_actual(&self) -> Option<&MilitanciaContexto> {
        self.trayectoria
            .militancia_partidaria
            .iter()
            .find(|militancia| militancia.estado_militancia == EstadoMilitancia::Actual)
    }

    /// First mandate in Activo state.
    pub fn mandato_activo(&self) -> Option<&MandatoContexto> {
        self.trayectoria
            .mandatos
            .iter()
            .find(|mandato| mandato.estado_mandato == EstadoMandato::Activo)
    }

    pub fn comisiones_activas(&self) -> impl Iterator<Item = &ComisionContexto> {
        self.trayectoria
            .comisiones
            .iter()
            .filter(|comision| comision.estado_membresia == EstadoMembresia::Activo)
    }

    /// Self-describing export for debugging and downstream tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::trayectoria::{EstadoMandato, MandatoRegistro};

    use super::MandatoContexto;

    fn fecha(valor: &str) -> NaiveDate {
        NaiveDate::parse_from_str(valor, "%Y-%m-%d").expect("fecha válida")
    }

    #[test]
    fn mandato_cerrado_deriva_estado_y_duracion() {
        let registro = MandatoRegistro {
            mandato_id: 7,
            cargo: "Diputado".to_string(),
            distrito: Some("9".to_string()),
            fecha_inicio: fecha("2018-03-11"),
            fecha_fin: Some(fecha("2022-03-10")),
        };

        let contexto = MandatoContexto::derivar(registro, fecha("2025-01-01"));
        assert_eq!(contexto.estado_mandato, EstadoMandato::Finalizado);
        assert_eq!(contexto.duracion_dias, 1460);
    }

    #[test]
    fn mandato_abierto_acumula_duracion_hasta_hoy() {
        let registro = MandatoRegistro {
            mandato_id: 8,
            cargo: "Diputada".to_string(),
            distrito: Some("5".to_string()),
            fecha_inicio: fecha("2024-12-02"),
            fecha_fin: None,
        };

        let contexto = MandatoContexto::derivar(registro, fecha("2025-01-01"));
        assert_eq!(contexto.estado_mandato, EstadoMandato::Activo);
        assert_eq!(contexto.duracion_dias, 30);
    }
}
