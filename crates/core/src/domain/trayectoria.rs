use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Committee role as stored; `Presidente` is the only value with derived
/// semantics (presidency counts), anything else is plain membership.
pub const ROL_PRESIDENTE: &str = "Presidente";

/// An interval is active while it has no end date or the end date has not
/// passed yet. Shared rule for mandates, party membership and committees.
pub fn intervalo_activo(fecha_fin: Option<NaiveDate>, hoy: NaiveDate) -> bool {
    fecha_fin.map_or(true, |fin| fin >= hoy)
}

/// Mandate state label: `Activo` while the interval is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoMandato {
    Activo,
    Finalizado,
}

impl EstadoMandato {
    pub fn evaluar(fecha_fin: Option<NaiveDate>, hoy: NaiveDate) -> Self {
        if intervalo_activo(fecha_fin, hoy) {
            Self::Activo
        } else {
            Self::Finalizado
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Finalizado => "Finalizado",
        }
    }
}

/// Party-membership state label: `Actual` while the interval is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoMilitancia {
    Actual,
    Anterior,
}

impl EstadoMilitancia {
    pub fn evaluar(fecha_fin: Option<NaiveDate>, hoy: NaiveDate) -> Self {
        if intervalo_activo(fecha_fin, hoy) {
            Self::Actual
        } else {
            Self::Anterior
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actual => "Actual",
            Self::Anterior => "Anterior",
        }
    }
}

/// Committee-membership state label: `Activo` while the interval is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoMembresia {
    Activo,
    Inactivo,
}

impl EstadoMembresia {
    pub fn evaluar(fecha_fin: Option<NaiveDate>, hoy: NaiveDate) -> Self {
        if intervalo_activo(fecha_fin, hoy) {
            Self::Activo
        } else {
            Self::Inactivo
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Inactivo => "Inactivo",
        }
    }
}

/// Row of `parlamentario_mandatos` as the store hands it out. State and
/// duration are derived at aggregation time against an injected `hoy`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MandatoRegistro {
    pub mandato_id: i64,
    pub cargo: String,
    pub distrito: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

/// Row of `militancia_historial` joined with `dim_partidos`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilitanciaRegistro {
    pub militancia_id: i64,
    pub nombre_partido: String,
    pub sigla: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

/// Row of `comision_membresias` joined with `dim_comisiones`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComisionRegistro {
    pub nombre_comision: String,
    pub tipo_comision: Option<String>,
    pub rol: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{EstadoMandato, EstadoMembresia, EstadoMilitancia};

    fn fecha(valor: &str) -> NaiveDate {
        NaiveDate::parse_from_str(valor, "%Y-%m-%d").expect("fecha válida")
    }

    #[test]
    fn militancia_cerrada_en_el_pasado_es_anterior() {
        let hoy = fecha("2025-01-01");
        let estado = EstadoMilitancia::evaluar(Some(fecha("2024-06-01")), hoy);
        assert_eq!(estado, EstadoMilitancia::Anterior);
        assert_eq!(estado.as_str(), "Anterior");
    }

    #[test]
    fn militancia_abierta_es_actual() {
        let hoy = fecha("2025-01-01");
        let estado = EstadoMilitancia::evaluar(None, hoy);
        assert_eq!(estado, EstadoMilitancia::Actual);
        assert_eq!(estado.as_str(), "Actual");
    }

    #[test]
    fn fecha_fin_igual_a_hoy_sigue_activa() {
        let hoy = fecha("2025-01-01");
        assert_eq!(EstadoMandato::evaluar(Some(hoy), hoy), EstadoMandato::Activo);
        assert_eq!(EstadoMembresia::evaluar(Some(hoy), hoy), EstadoMembresia::Activo);
    }

    #[test]
    fn mandato_con_fin_futuro_es_activo() {
        let hoy = fecha("2025-01-01");
        let estado = EstadoMandato::evaluar(Some(fecha("2026-03-11")), hoy);
        assert_eq!(estado, EstadoMandato::Activo);
    }
}
