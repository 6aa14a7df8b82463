use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Biographical row of `dim_parlamentario` as the store hands it out.
///
/// `mp_uid` is the immutable surrogate identifier shared by every data
/// source; all other fields are enrichment and may be absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerfilParlamentario {
    pub mp_uid: i64,
    pub nombre_completo: String,
    pub genero: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub lugar_nacimiento: Option<String>,
    pub profesion: Option<String>,
    pub diputado_id: Option<i64>,
    pub bcn_uri: Option<String>,
    pub url_foto: Option<String>,
    pub twitter_handle: Option<String>,
    pub sitio_web_personal: Option<String>,
}

/// Minimal row for selection listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParlamentarioResumen {
    pub mp_uid: i64,
    pub nombre_completo: String,
}

/// Age in completed years: floor of elapsed days over the mean year length.
pub fn edad_en(fecha_nacimiento: NaiveDate, hoy: NaiveDate) -> i64 {
    let dias = (hoy - fecha_nacimiento).num_days();
    (dias as f64 / 365.25).floor() as i64
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::edad_en;

    fn fecha(valor: &str) -> NaiveDate {
        NaiveDate::parse_from_str(valor, "%Y-%m-%d").expect("fecha válida")
    }

    #[test]
    fn edad_redondea_hacia_abajo() {
        let nacimiento = fecha("1980-06-15");
        assert_eq!(edad_en(nacimiento, fecha("2025-06-14")), 44);
        assert_eq!(edad_en(nacimiento, fecha("2025-06-16")), 45);
    }

    #[test]
    fn edad_un_dia_antes_del_cumpleanos() {
        let nacimiento = fecha("2000-01-02");
        assert_eq!(edad_en(nacimiento, fecha("2025-01-01")), 24);
    }
}
