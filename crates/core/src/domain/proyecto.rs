use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RESULTADO_EN_TRAMITACION: &str = "En tramitación";
pub const INICIATIVA_MOCION: &str = "Moción";
pub const INICIATIVA_MENSAJE: &str = "Mensaje";

/// Bill row of `bills` joined through `bill_authors`, with the co-author
/// count already computed by the store (authors minus one).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProyectoAutor {
    pub bill_id: String,
    pub titulo: String,
    pub resumen: Option<String>,
    pub fecha_ingreso: Option<NaiveDate>,
    pub etapa: Option<String>,
    pub iniciativa: Option<String>,
    pub origen: Option<String>,
    pub urgencia: Option<String>,
    pub resultado_final: Option<String>,
    pub ley_numero: Option<String>,
    pub ley_fecha_publicacion: Option<NaiveDate>,
    pub num_coautores: i64,
}

impl ProyectoAutor {
    /// A bill became law exactly when it carries an enacted-law number.
    pub fn es_ley(&self) -> bool {
        self.ley_numero.is_some()
    }

    pub fn en_tramitacion(&self) -> bool {
        self.resultado_final.as_deref() == Some(RESULTADO_EN_TRAMITACION)
    }
}

/// Authored-bill counts. All fields coerce to zero when nothing matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenProyectos {
    pub total_proyectos: i64,
    pub proyectos_ley: i64,
    pub en_tramitacion: i64,
    pub mociones: i64,
    pub mensajes: i64,
}

/// Committee participation counts. `comisiones_activas` counts open-ended
/// memberships (`fecha_fin IS NULL`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenComisiones {
    pub total_comisiones: i64,
    pub presidencias: i64,
    pub comisiones_activas: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenActividad {
    pub proyectos: ResumenProyectos,
    pub comisiones: ResumenComisiones,
}

#[cfg(test)]
mod tests {
    use super::ProyectoAutor;

    fn proyecto(ley_numero: Option<&str>, resultado: Option<&str>) -> ProyectoAutor {
        ProyectoAutor {
            bill_id: "12345-07".to_string(),
            titulo: "Modifica la ley de pesca".to_string(),
            resumen: None,
            fecha_ingreso: None,
            etapa: None,
            iniciativa: None,
            origen: None,
            urgencia: None,
            resultado_final: resultado.map(str::to_string),
            ley_numero: ley_numero.map(str::to_string),
            ley_fecha_publicacion: None,
            num_coautores: 0,
        }
    }

    #[test]
    fn es_ley_depende_del_numero_de_ley() {
        assert!(proyecto(Some("21.555"), None).es_ley());
        assert!(!proyecto(None, None).es_ley());
    }

    #[test]
    fn en_tramitacion_compara_el_resultado_exacto() {
        assert!(proyecto(None, Some("En tramitación")).en_tramitacion());
        assert!(!proyecto(None, Some("Archivado")).en_tramitacion());
        assert!(!proyecto(None, None).en_tramitacion());
    }
}
