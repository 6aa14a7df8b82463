use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RESULTADO_APROBADO: &str = "Aprobado";
pub const RESULTADO_RECHAZADO: &str = "Rechazado";

/// Individual vote choice. The store holds the Spanish display values;
/// anything else is a decode error, never a silent default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Voto {
    #[serde(rename = "A Favor")]
    AFavor,
    #[serde(rename = "En Contra")]
    EnContra,
    #[serde(rename = "Abstención")]
    Abstencion,
    #[serde(rename = "Pareo")]
    Pareo,
}

impl Voto {
    pub fn parse(valor: &str) -> Option<Self> {
        match valor {
            "A Favor" => Some(Self::AFavor),
            "En Contra" => Some(Self::EnContra),
            "Abstención" => Some(Self::Abstencion),
            "Pareo" => Some(Self::Pareo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AFavor => "A Favor",
            Self::EnContra => "En Contra",
            Self::Abstencion => "Abstención",
            Self::Pareo => "Pareo",
        }
    }
}

/// Per-choice vote tallies. Absent aggregates coerce to zero; the struct is
/// always fully populated in the context document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstadisticasVotacion {
    pub total_votaciones: i64,
    pub votos_a_favor: i64,
    pub votos_en_contra: i64,
    pub abstenciones: i64,
    pub pareos: i64,
}

/// How an individual vote relates to the session outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlineacionVoto {
    #[serde(rename = "Con mayoría")]
    ConMayoria,
    #[serde(rename = "Contra mayoría")]
    ContraMayoria,
    #[serde(rename = "No aplicable")]
    NoAplicable,
}

impl AlineacionVoto {
    /// Majority alignment: with the majority when the session passed and
    /// the vote was in favour, or the session failed and the vote was
    /// against; not applicable for abstentions and pairings.
    pub fn derivar(resultado_general: Option<&str>, voto: Voto) -> Self {
        match (resultado_general, voto) {
            (Some(RESULTADO_APROBADO), Voto::AFavor) => Self::ConMayoria,
            (Some(RESULTADO_RECHAZADO), Voto::EnContra) => Self::ConMayoria,
            (_, Voto::Abstencion | Voto::Pareo) => Self::NoAplicable,
            _ => Self::ContraMayoria,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConMayoria => "Con mayoría",
            Self::ContraMayoria => "Contra mayoría",
            Self::NoAplicable => "No aplicable",
        }
    }
}

/// Row of `votos_parlamentario` joined with its vote session and, when the
/// session is tied to a bill, the bill title.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VotacionRegistro {
    pub sesion_votacion_id: i64,
    pub bill_id: Option<String>,
    pub fecha: NaiveDate,
    pub tema: Option<String>,
    pub resultado_general: Option<String>,
    pub quorum_aplicado: Option<String>,
    pub titulo_proyecto: Option<String>,
    pub voto: Voto,
}

/// Voting-alignment aggregate against the currently active party, already
/// reduced by the store. `None` at the document level when the legislator
/// has no active party or no shared sessions to compare.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalisisPartidario {
    pub nombre_partido: String,
    pub votaciones_analizadas: i64,
    pub porcentaje_coincidencia: f64,
    pub votos_coincidentes: i64,
    pub total_comparaciones: i64,
}

#[cfg(test)]
mod tests {
    use super::{AlineacionVoto, Voto};

    #[test]
    fn parse_reconoce_los_cuatro_valores() {
        assert_eq!(Voto::parse("A Favor"), Some(Voto::AFavor));
        assert_eq!(Voto::parse("En Contra"), Some(Voto::EnContra));
        assert_eq!(Voto::parse("Abstención"), Some(Voto::Abstencion));
        assert_eq!(Voto::parse("Pareo"), Some(Voto::Pareo));
        assert_eq!(Voto::parse("ausente"), None);
    }

    #[test]
    fn voto_a_favor_en_sesion_aprobada_va_con_la_mayoria() {
        let alineacion = AlineacionVoto::derivar(Some("Aprobado"), Voto::AFavor);
        assert_eq!(alineacion, AlineacionVoto::ConMayoria);
    }

    #[test]
    fn voto_en_contra_en_sesion_rechazada_va_con_la_mayoria() {
        let alineacion = AlineacionVoto::derivar(Some("Rechazado"), Voto::EnContra);
        assert_eq!(alineacion, AlineacionVoto::ConMayoria);
    }

    #[test]
    fn abstencion_y_pareo_no_aplican() {
        assert_eq!(
            AlineacionVoto::derivar(Some("Aprobado"), Voto::Abstencion),
            AlineacionVoto::NoAplicable
        );
        assert_eq!(
            AlineacionVoto::derivar(Some("Rechazado"), Voto::Pareo),
            AlineacionVoto::NoAplicable
        );
    }

    #[test]
    fn voto_opuesto_al_resultado_va_contra_la_mayoria() {
        assert_eq!(
            AlineacionVoto::derivar(Some("Aprobado"), Voto::EnContra),
            AlineacionVoto::ContraMayoria
        );
        assert_eq!(
            AlineacionVoto::derivar(None, Voto::AFavor),
            AlineacionVoto::ContraMayoria
        );
    }
}
