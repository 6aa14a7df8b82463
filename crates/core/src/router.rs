//! Keyword-routed context selection.
//!
//! The retrieval strategy is deliberately lexical: a fixed taxonomy of
//! trigger substrings per section, matched case-insensitively against the
//! query, with the full prompt-form context as fallback. No embeddings, no
//! stemming, no state.

use crate::context::ContextoParlamentario;
use crate::domain::trayectoria::EstadoMembresia;
use crate::serializer::{prompt_contexto, truncar, TITULO_MAX};

const SECCION_PROYECTOS_MAX: usize = 5;
const SECCION_VOTACIONES_MAX: usize = 5;
const NO_DISPONIBLE: &str = "No disponible";

/// Routable sections, declared in the canonical concatenation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeccionContexto {
    Biografia,
    Partido,
    Comisiones,
    Proyectos,
    Votaciones,
}

pub const ORDEN_CANONICO: [SeccionContexto; 5] = [
    SeccionContexto::Biografia,
    SeccionContexto::Partido,
    SeccionContexto::Comisiones,
    SeccionContexto::Proyectos,
    SeccionContexto::Votaciones,
];

impl SeccionContexto {
    /// Trigger substrings, lowercase. A section is relevant when any of
    /// them occurs anywhere in the lowercased query.
    pub fn disparadores(&self) -> &'static [&'static str] {
        match self {
            Self::Biografia => &["edad", "nacimiento", "profesión", "estudios", "vida"],
            Self::Partido => &["partido", "militancia", "afiliación", "bancada"],
            Self::Comisiones => &["comisión", "comisiones", "preside", "presidir"],
            Self::Proyectos => &["proyecto", "ley", "propuesta", "iniciativa", "bill"],
            Self::Votaciones => &[
                "votación",
                "votaciones",
                "votar",
                "voto",
                "votos",
                "votado",
                "votaste",
                "voté",
                "votamos",
            ],
        }
    }

    fn render(&self, contexto: &ContextoParlamentario) -> String {
        match self {
            Self::Biografia => seccion_biografia(contexto),
            Self::Partido => seccion_partido(contexto),
            Self::Comisiones => seccion_comisiones(contexto),
            Self::Proyectos => seccion_proyectos(contexto),
            Self::Votaciones => seccion_votaciones(contexto),
        }
    }
}

/// Sections matched by the query, in canonical order.
pub fn clasificar(consulta: &str) -> Vec<SeccionContexto> {
    let consulta = consulta.to_lowercase();
    ORDEN_CANONICO
        .into_iter()
        .filter(|seccion| {
            seccion.disparadores().iter().any(|disparador| consulta.contains(disparador))
        })
        .collect()
}

/// Query-relevant subset of the document, or the full prompt-form context
/// when nothing matches. Pure function of (query, document).
pub fn seleccionar_contexto(consulta: &str, contexto: &ContextoParlamentario) -> String {
    let secciones = clasificar(consulta);
    if secciones.is_empty() {
        return prompt_contexto(contexto);
    }

    secciones
        .iter()
        .map(|seccion| seccion.render(contexto))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn seccion_biografia(contexto: &ContextoParlamentario) -> String {
    let perfil = &contexto.perfil_biografico;
    let mut lineas = vec!["INFORMACIÓN BIOGRÁFICA:".to_string()];
    lineas.push(format!("- Nombre: {}", perfil.perfil.nombre_completo));
    lineas.push(format!(
        "- Género: {}",
        perfil.perfil.genero.as_deref().unwrap_or(NO_DISPONIBLE)
    ));
    lineas.push(format!(
        "- Fecha de nacimiento: {}",
        perfil
            .perfil
            .fecha_nacimiento
            .map(|fecha| fecha.to_string())
            .unwrap_or_else(|| NO_DISPONIBLE.to_string())
    ));
    lineas.push(format!(
        "- Lugar de nacimiento: {}",
        perfil.perfil.lugar_nacimiento.as_deref().unwrap_or(NO_DISPONIBLE)
    ));
    lineas.push(format!(
        "- Profesión: {}",
        perfil.perfil.profesion.as_deref().unwrap_or(NO_DISPONIBLE)
    ));
    match perfil.edad {
        Some(edad) => lineas.push(format!("- Edad: {edad} años")),
        None => lineas.push(format!("- Edad: {NO_DISPONIBLE}")),
    }
    lineas.join("\n")
}

fn seccion_partido(contexto: &ContextoParlamentario) -> String {
    let mut lineas = vec!["HISTORIAL DE MILITANCIA:".to_string()];
    for militancia in &contexto.trayectoria.militancia_partidaria {
        let fin = militancia
            .fecha_fin
            .map(|fecha| fecha.to_string())
            .unwrap_or_else(|| "Actual".to_string());
        lineas.push(format!(
            "- {} ({} - {})",
            militancia.nombre_partido, militancia.fecha_inicio, fin
        ));
    }

    if let Some(analisis) = &contexto.actividad_legislativa.analisis_partidario {
        lineas.push(String::new());
        lineas.push("COHERENCIA CON PARTIDO ACTUAL:".to_string());
        lineas.push(format!(
            "- Coincidencia en votaciones: {:.1}%",
            analisis.porcentaje_coincidencia
        ));
    }
    lineas.join("\n")
}

fn seccion_comisiones(contexto: &ContextoParlamentario) -> String {
    let mut lineas = vec!["PARTICIPACIÓN EN COMISIONES:".to_string()];
    for comision in &contexto.trayectoria.comisiones {
        let marca = if comision.estado_membresia == EstadoMembresia::Activo {
            " (ACTUAL)"
        } else {
            ""
        };
        lineas.push(format!("- {} - {}{}", comision.nombre_comision, comision.rol, marca));
    }
    lineas.join("\n")
}

fn seccion_proyectos(contexto: &ContextoParlamentario) -> String {
    let resumen = &contexto.actividad_legislativa.resumen.proyectos;
    let mut lineas = vec!["PROYECTOS DE LEY COMO AUTOR:".to_string()];
    lineas.push(format!("Total presentados: {}", resumen.total_proyectos));
    lineas.push(format!("Convertidos en ley: {}", resumen.proyectos_ley));
    lineas.push(format!("En tramitación: {}", resumen.en_tramitacion));

    lineas.push(String::new());
    lineas.push("ÚLTIMOS 5 PROYECTOS:".to_string());
    for proyecto in
        contexto.actividad_legislativa.proyectos_autor.iter().take(SECCION_PROYECTOS_MAX)
    {
        lineas.push(format!(
            "- [{}] {}",
            proyecto.bill_id,
            truncar(&proyecto.titulo, TITULO_MAX)
        ));
        if let Some(ley) = &proyecto.ley_numero {
            lineas.push(format!("  → Convertido en Ley N° {ley}"));
        }
    }
    lineas.join("\n")
}

fn seccion_votaciones(contexto: &ContextoParlamentario) -> String {
    let estadisticas = &contexto.actividad_legislativa.estadisticas_votacion;
    let mut lineas = vec!["ESTADÍSTICAS DE VOTACIÓN:".to_string()];
    lineas.push(format!("- Total de votaciones: {}", estadisticas.total_votaciones));
    if estadisticas.total_votaciones > 0 {
        let total = estadisticas.total_votaciones as f64;
        lineas.push(format!(
            "- A favor: {} ({:.1}%)",
            estadisticas.votos_a_favor,
            100.0 * estadisticas.votos_a_favor as f64 / total
        ));
        lineas.push(format!(
            "- En contra: {} ({:.1}%)",
            estadisticas.votos_en_contra,
            100.0 * estadisticas.votos_en_contra as f64 / total
        ));
        lineas.push(format!("- Abstenciones: {}", estadisticas.abstenciones));
    }

    lineas.push(String::new());
    lineas.push("ÚLTIMAS VOTACIONES:".to_string());
    for reciente in
        contexto.actividad_legislativa.votaciones_recientes.iter().take(SECCION_VOTACIONES_MAX)
    {
        let tema = reciente.votacion.tema.as_deref().unwrap_or("Sin tema");
        lineas.push(format!(
            "- {}: {} → Voté: {}",
            reciente.votacion.fecha,
            truncar(tema, TITULO_MAX),
            reciente.votacion.voto.as_str()
        ));
    }
    lineas.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{clasificar, SeccionContexto};

    #[test]
    fn consulta_sin_disparadores_no_clasifica() {
        assert!(clasificar("¿qué opinas del clima?").is_empty());
    }

    #[test]
    fn consulta_de_votacion_clasifica_votaciones() {
        let secciones = clasificar("¿Cómo votaste la ley de pesca?");
        assert!(secciones.contains(&SeccionContexto::Votaciones));
        assert!(secciones.contains(&SeccionContexto::Proyectos));
        assert!(!secciones.contains(&SeccionContexto::Comisiones));
    }

    #[test]
    fn la_clasificacion_ignora_mayusculas() {
        let secciones = clasificar("HÁBLAME DE TU PARTIDO");
        assert_eq!(secciones, vec![SeccionContexto::Partido]);
    }

    #[test]
    fn varias_secciones_salen_en_orden_canonico() {
        let secciones = clasificar("votos en comisiones sobre el partido");
        assert_eq!(
            secciones,
            vec![
                SeccionContexto::Partido,
                SeccionContexto::Comisiones,
                SeccionContexto::Votaciones
            ]
        );
    }
}
