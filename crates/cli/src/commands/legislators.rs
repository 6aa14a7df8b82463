use parlatwin_core::config::{AppConfig, LoadOptions};
use parlatwin_db::{connect_with_settings, ParlamentarioStore, SqlParlamentarioStore};

use crate::commands::{build_runtime, CommandResult};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "legislators",
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

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let store = SqlParlamentarioStore::new(pool.clone());
        let listado = store
            .listar_parlamentarios()
            .await
            .map_err(|error| ("query", error.to_string(), 4u8))?;
        pool.close().await;
        Ok::<_, (&str, String, u8)>(listado)
    });

    match result {
        Ok(listado) if listado.is_empty() => {
            CommandResult::failure("legislators", "empty_store", "no legislators found; run the ETL or `parlatwin seed`", 1)
        }
        Ok(listado) => {
            let lineas: Vec<String> = listado
                .iter()
                .map(|parlamentario| {
                    format!("{}\t{}", parlamentario.mp_uid, parlamentario.nombre_completo)
                })
                .collect();
            CommandResult::raw(lineas.join("\n"))
        }
        Err((class, message, code)) => {
            CommandResult::failure("legislators", class, message, code)
        }
    }
}
