use std::fs;
use std::path::{Path, PathBuf};

use parlatwin_agent::context::ContextBuilder;
use parlatwin_core::config::{AppConfig, LoadOptions};
use parlatwin_core::context::ContextoParlamentario;
use parlatwin_core::errors::ContextError;
use parlatwin_core::serializer::reporte_contexto;
use parlatwin_db::{connect_with_settings, SqlParlamentarioStore};

use crate::commands::{build_runtime, CommandResult};
use crate::ExportFormat;

const EXPORT_DIR_DEFAULT: &str = "data/contexts";

pub fn run(mp_uid: i64, format: ExportFormat, output_dir: Option<PathBuf>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "context",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let documento = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let builder = ContextBuilder::new(SqlParlamentarioStore::new(pool.clone()))
            .with_recent_votes_limit(config.context.recent_votes_limit);
        let documento = builder.build(mp_uid).await;
        pool.close().await;
        Ok::<_, (&str, String, u8)>(documento)
    });

    let documento = match documento {
        Ok(resultado) => resultado,
        Err((class, message, code)) => {
            return CommandResult::failure("context", class, message, code);
        }
    };

    let documento = match documento {
        Ok(documento) => documento,
        Err(error @ ContextError::NotFound { .. }) => {
            return CommandResult::failure("context", "not_found", error.to_string(), 1);
        }
        Err(error) => {
            return CommandResult::failure("context", "store_unavailable", error.to_string(), 4);
        }
    };

    let directorio = output_dir.unwrap_or_else(|| PathBuf::from(EXPORT_DIR_DEFAULT));
    exportar(&documento, format, &directorio)
}

fn exportar(
    documento: &ContextoParlamentario,
    format: ExportFormat,
    directorio: &Path,
) -> CommandResult {
    let json = match documento.to_json() {
        Ok(json) => json,
        Err(error) => {
            return CommandResult::failure("context", "serialization", error.to_string(), 1);
        }
    };

    if format == ExportFormat::Print {
        return CommandResult::raw(json);
    }

    if let Err(error) = fs::create_dir_all(directorio) {
        return CommandResult::failure(
            "context",
            "export_io",
            format!("could not create `{}`: {error}", directorio.display()),
            1,
        );
    }

    let marca = documento.metadata.generado_en.format("%Y%m%d_%H%M%S");
    let base = format!("context_mp_{}_{}", documento.metadata.mp_uid, marca);
    let mut exportados = Vec::new();

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let ruta = directorio.join(format!("{base}.json"));
        if let Err(error) = fs::write(&ruta, &json) {
            return CommandResult::failure(
                "context",
                "export_io",
                format!("could not write `{}`: {error}", ruta.display()),
                1,
            );
        }
        exportados.push(ruta.display().to_string());
    }

    if matches!(format, ExportFormat::Text | ExportFormat::Both) {
        let ruta = directorio.join(format!("{base}.txt"));
        if let Err(error) = fs::write(&ruta, reporte_contexto(documento)) {
            return CommandResult::failure(
                "context",
                "export_io",
                format!("could not write `{}`: {error}", ruta.display()),
                1,
            );
        }
        exportados.push(ruta.display().to_string());
    }

    CommandResult::success("context", format!("exported: {}", exportados.join(", ")))
}

#[cfg(test)]
mod tests {
    use parlatwin_core::chrono::{TimeZone, Utc};
    use parlatwin_core::context::{
        ActividadLegislativa, ContextoMetadata, ContextoParlamentario, PerfilBiografico,
        Trayectoria,
    };
    use parlatwin_core::domain::parlamentario::PerfilParlamentario;
    use parlatwin_core::domain::proyecto::ResumenActividad;
    use parlatwin_core::domain::votacion::EstadisticasVotacion;

    use crate::ExportFormat;

    use super::exportar;

    fn documento_minimo() -> ContextoParlamentario {
        ContextoParlamentario {
            metadata: ContextoMetadata {
                mp_uid: 1,
                generado_en: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
                fuente: "parlamento.db".to_string(),
            },
            perfil_biografico: PerfilBiografico {
                perfil: PerfilParlamentario {
                    mp_uid: 1,
                    nombre_completo: "Ana Pérez".to_string(),
                    genero: Some("Femenino".to_string()),
                    fecha_nacimiento: None,
                    lugar_nacimiento: None,
                    profesion: None,
                    diputado_id: None,
                    bcn_uri: None,
                    url_foto: None,
                    twitter_handle: None,
                    sitio_web_personal: None,
                },
                edad: None,
            },
            trayectoria: Trayectoria {
                mandatos: Vec::new(),
                militancia_partidaria: Vec::new(),
                comisiones: Vec::new(),
            },
            actividad_legislativa: ActividadLegislativa {
                resumen: ResumenActividad::default(),
                proyectos_autor: Vec::new(),
                estadisticas_votacion: EstadisticasVotacion::default(),
                votaciones_recientes: Vec::new(),
                analisis_partidario: None,
            },
        }
    }

    #[test]
    fn print_devuelve_el_json_del_documento() {
        let documento = documento_minimo();
        let resultado =
            exportar(&documento, ExportFormat::Print, std::path::Path::new("unused"));
        assert_eq!(resultado.exit_code, 0);
        assert!(resultado.output.contains("\"nombre_completo\": \"Ana Pérez\""));
    }

    #[test]
    fn both_escribe_json_y_texto() {
        let directorio = std::env::temp_dir().join("parlatwin_export_test");
        let _ = std::fs::remove_dir_all(&directorio);
        let documento = documento_minimo();

        let resultado = exportar(&documento, ExportFormat::Both, &directorio);
        assert_eq!(resultado.exit_code, 0, "output: {}", resultado.output);

        let json = directorio.join("context_mp_1_20250601_120000.json");
        let texto = directorio.join("context_mp_1_20250601_120000.txt");
        assert!(json.exists());
        assert!(texto.exists());

        let reporte = std::fs::read_to_string(texto).expect("leer reporte");
        assert!(reporte.contains("CONTEXTO PARLAMENTARIO - Ana Pérez"));
        let _ = std::fs::remove_dir_all(&directorio);
    }
}
