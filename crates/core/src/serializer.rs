//! Deterministic renderings of the context document.
//!
//! Two fixed-order text forms share one truncation rule: a dense prompt
//! form for the generation collaborator and a sectioned human-readable
//! report. Both are pure functions of the document, so equal documents
//! always produce byte-identical output.

use crate::context::ContextoParlamentario;
use crate::errors::ContextError;

/// Character budget for bill titles and vote subjects, shared by every
/// rendering so fixtures only need one expected string.
pub const TITULO_MAX: usize = 80;
pub const ELIPSIS: &str = "...";

const PROMPT_PROYECTOS: usize = 3;
const REPORTE_PROYECTOS: usize = 5;
const NO_DISPONIBLE: &str = "No disponible";

/// Truncate to `max` characters and append the ellipsis marker when the
/// text exceeds the budget. Operates on chars, not bytes.
pub fn truncar(texto: &str, max: usize) -> String {
    if texto.chars().count() <= max {
        return texto.to_string();
    }
    let mut recortado: String = texto.chars().take(max).collect();
    recortado.push_str(ELIPSIS);
    recortado
}

/// Prompt form, or the error message when aggregation failed.
pub fn render_prompt(resultado: &Result<ContextoParlamentario, ContextError>) -> String {
    match resultado {
        Ok(contexto) => prompt_contexto(contexto),
        Err(error) => error.to_string(),
    }
}

/// Report form, or the error message when aggregation failed.
pub fn render_reporte(resultado: &Result<ContextoParlamentario, ContextError>) -> String {
    match resultado {
        Ok(contexto) => reporte_contexto(contexto),
        Err(error) => error.to_string(),
    }
}

/// Dense, fixed-order context for the LLM prompt.
pub fn prompt_contexto(contexto: &ContextoParlamentario) -> String {
    let mut lineas = Vec::new();
    let perfil = &contexto.perfil_biografico;

    lineas.push(format!("IDENTIDAD: {}", perfil.perfil.nombre_completo));
    lineas.push(format!(
        "GÉNERO: {}",
        perfil.perfil.genero.as_deref().unwrap_or(NO_DISPONIBLE)
    ));
    if let Some(profesion) = &perfil.perfil.profesion {
        lineas.push(format!("PROFESIÓN: {profesion}"));
    }
    if let Some(nacimiento) = perfil.perfil.fecha_nacimiento {
        lineas.push(format!("FECHA DE NACIMIENTO: {nacimiento}"));
    }

    if let Some(militancia) = contexto.partido_actual() {
        lineas.push(format!("PARTIDO ACTUAL: {}", militancia.nombre_partido));
    }
    if let Some(mandato) = contexto.mandato_activo() {
        match &mandato.distrito {
            Some(distrito) => {
                lineas.push(format!("CARGO ACTUAL: {} - Distrito {}", mandato.cargo, distrito));
            }
            None => lineas.push(format!("CARGO ACTUAL: {}", mandato.cargo)),
        }
    }

    lineas.push(String::new());
    lineas.push("COMISIONES ACTUALES:".to_string());
    for comision in contexto.comisiones_activas() {
        lineas.push(format!("- {} ({})", comision.nombre_comision, comision.rol));
    }

    let resumen = &contexto.actividad_legislativa.resumen;
    lineas.push(String::new());
    lineas.push(format!("PROYECTOS DE LEY PRESENTADOS: {}", resumen.proyectos.total_proyectos));
    lineas.push(format!("PROYECTOS CONVERTIDOS EN LEY: {}", resumen.proyectos.proyectos_ley));

    let estadisticas = &contexto.actividad_legislativa.estadisticas_votacion;
    lineas.push(String::new());
    lineas.push(format!("TOTAL DE VOTACIONES: {}", estadisticas.total_votaciones));
    lineas.push(format!("VOTOS A FAVOR: {}", estadisticas.votos_a_favor));
    lineas.push(format!("VOTOS EN CONTRA: {}", estadisticas.votos_en_contra));

    lineas.push(String::new());
    lineas.push("PROYECTOS RECIENTES COMO AUTOR:".to_string());
    for proyecto in contexto.actividad_legislativa.proyectos_autor.iter().take(PROMPT_PROYECTOS) {
        lineas.push(format!(
            "- [{}] {}",
            proyecto.bill_id,
            truncar(&proyecto.titulo, TITULO_MAX)
        ));
    }

    lineas.join("\n")
}

/// Long structured report with full histories.
pub fn reporte_contexto(contexto: &ContextoParlamentario) -> String {
    let separador = "=".repeat(80);
    let subrayado = "-".repeat(40);
    let perfil = &contexto.perfil_biografico;
    let mut lineas = Vec::new();

    lineas.push(separador.clone());
    lineas.push(format!("CONTEXTO PARLAMENTARIO - {}", perfil.perfil.nombre_completo));
    lineas.push(separador.clone());
    lineas.push(format!("Generado: {}", contexto.metadata.generado_en.to_rfc3339()));
    lineas.push(String::new());

    lineas.push("## PERFIL BIOGRÁFICO".to_string());
    lineas.push(subrayado.clone());
    lineas.push(format!("Nombre Completo: {}", perfil.perfil.nombre_completo));
    lineas.push(format!(
        "Género: {}",
        perfil.perfil.genero.as_deref().unwrap_or(NO_DISPONIBLE)
    ));
    if let Some(edad) = perfil.edad {
        lineas.push(format!("Edad: {edad} años"));
    }
    if let Some(nacimiento) = perfil.perfil.fecha_nacimiento {
        lineas.push(format!("Fecha de Nacimiento: {nacimiento}"));
    }
    if let Some(lugar) = &perfil.perfil.lugar_nacimiento {
        lineas.push(format!("Lugar de Nacimiento: {lugar}"));
    }
    if let Some(profesion) = &perfil.perfil.profesion {
        lineas.push(format!("Profesión: {profesion}"));
    }
    if let Some(twitter) = &perfil.perfil.twitter_handle {
        lineas.push(format!("Twitter: @{twitter}"));
    }
    lineas.push(String::new());

    lineas.push("## TRAYECTORIA POLÍTICA".to_string());
    lineas.push(subrayado.clone());
    lineas.push("### Mandatos Parlamentarios:".to_string());
    for mandato in &contexto.trayectoria.mandatos {
        let fin = mandato
            .fecha_fin
            .map(|fecha| fecha.to_string())
            .unwrap_or_else(|| "Actual".to_string());
        let distrito = mandato.distrito.as_deref().unwrap_or("-");
        lineas.push(format!(
            "  • {} - Distrito {} ({} - {}) [{}]",
            mandato.cargo,
            distrito,
            mandato.fecha_inicio,
            fin,
            mandato.estado_mandato.as_str()
        ));
    }
    lineas.push(String::new());

    lineas.push("### Militancia Partidaria:".to_string());
    for militancia in &contexto.trayectoria.militancia_partidaria {
        let fin = militancia
            .fecha_fin
            .map(|fecha| fecha.to_string())
            .unwrap_or_else(|| "Actual".to_string());
        lineas.push(format!(
            "  • {} ({} - {}) [{}]",
            militancia.nombre_partido,
            militancia.fecha_inicio,
            fin,
            militancia.estado_militancia.as_str()
        ));
    }
    lineas.push(String::new());

    // The section header stays even with no memberships.
    lineas.push("### Participación en Comisiones:".to_string());
    for comision in &contexto.trayectoria.comisiones {
        lineas.push(format!(
            "  • {} - {} [{}]",
            comision.nombre_comision,
            comision.rol,
            comision.estado_membresia.as_str()
        ));
    }
    lineas.push(String::new());

    lineas.push("## ACTIVIDAD LEGISLATIVA".to_string());
    lineas.push(subrayado);
    let resumen = &contexto.actividad_legislativa.resumen;
    lineas.push("### Resumen de Actividad:".to_string());
    lineas.push(format!(
        "  • Total de proyectos como autor/coautor: {}",
        resumen.proyectos.total_proyectos
    ));
    lineas.push(format!("  • Proyectos convertidos en ley: {}", resumen.proyectos.proyectos_ley));
    lineas.push(format!("  • Proyectos en tramitación: {}", resumen.proyectos.en_tramitacion));
    lineas.push(format!("  • Comisiones totales: {}", resumen.comisiones.total_comisiones));
    lineas.push(format!("  • Presidencias de comisión: {}", resumen.comisiones.presidencias));
    lineas.push(String::new());

    let estadisticas = &contexto.actividad_legislativa.estadisticas_votacion;
    lineas.push("### Estadísticas de Votación:".to_string());
    lineas.push(format!("  • Total de votaciones: {}", estadisticas.total_votaciones));
    lineas.push(format!("  • Votos a favor: {}", estadisticas.votos_a_favor));
    lineas.push(format!("  • Votos en contra: {}", estadisticas.votos_en_contra));
    lineas.push(format!("  • Abstenciones: {}", estadisticas.abstenciones));
    lineas.push(format!("  • Pareos: {}", estadisticas.pareos));
    lineas.push(String::new());

    if let Some(analisis) = &contexto.actividad_legislativa.analisis_partidario {
        lineas.push("### Coherencia con Partido:".to_string());
        lineas.push(format!("  • Partido: {}", analisis.nombre_partido));
        lineas.push(format!(
            "  • Coincidencia con partido: {:.1}%",
            analisis.porcentaje_coincidencia
        ));
        lineas.push(format!("  • Votaciones analizadas: {}", analisis.votaciones_analizadas));
        lineas.push(String::new());
    }

    lineas.push("### Proyectos de Ley como Autor (más recientes):".to_string());
    for proyecto in contexto.actividad_legislativa.proyectos_autor.iter().take(REPORTE_PROYECTOS) {
        lineas.push(format!(
            "  • [{}] {}",
            proyecto.bill_id,
            truncar(&proyecto.titulo, TITULO_MAX)
        ));
        let fecha = proyecto
            .fecha_ingreso
            .map(|valor| valor.to_string())
            .unwrap_or_else(|| "Sin información".to_string());
        let etapa = proyecto.etapa.as_deref().unwrap_or("Sin información");
        lineas.push(format!("    Fecha: {fecha} | Estado: {etapa}"));
    }
    lineas.push(String::new());

    lineas.push("=".repeat(80));
    lineas.push("FIN DEL CONTEXTO".to_string());
    lineas.push("=".repeat(80));

    lineas.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::errors::ContextError;

    use super::{render_prompt, render_reporte, truncar, ELIPSIS, TITULO_MAX};

    #[test]
    fn truncar_respeta_el_presupuesto_y_marca_el_corte() {
        let largo = "x".repeat(150);
        let recortado = truncar(&largo, TITULO_MAX);
        assert_eq!(recortado.chars().count(), TITULO_MAX + ELIPSIS.chars().count());
        assert!(recortado.ends_with(ELIPSIS));
    }

    #[test]
    fn truncar_no_toca_textos_cortos() {
        assert_eq!(truncar("corto", TITULO_MAX), "corto");
    }

    #[test]
    fn truncar_cuenta_caracteres_no_bytes() {
        let acentuado = "á".repeat(90);
        let recortado = truncar(&acentuado, TITULO_MAX);
        assert_eq!(recortado.chars().count(), TITULO_MAX + ELIPSIS.chars().count());
    }

    #[test]
    fn los_errores_cortocircuitan_ambas_formas() {
        let resultado = Err(ContextError::NotFound { mp_uid: 99, timestamp: Utc::now() });
        assert_eq!(render_prompt(&resultado), "No se encontró parlamentario con mp_uid=99");
        assert_eq!(render_reporte(&resultado), "No se encontró parlamentario con mp_uid=99");
    }
}
