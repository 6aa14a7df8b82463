use parlatwin_core::config::{AppConfig, LoadOptions};
use parlatwin_db::{connect_with_settings, migrations, DemoDataset};

use crate::commands::{build_runtime, CommandResult};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
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

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let resumen = DemoDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verificacion = DemoDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 5u8))?;

        pool.close().await;

        if !verificacion.ok {
            return Err((
                "seed_verification",
                format!("seed verification failed: {}", verificacion.issues.join("; ")),
                5u8,
            ));
        }

        Ok::<String, (&str, String, u8)>(format!(
            "demo dataset loaded: {} legislators, {} vote sessions, {} votes",
            resumen.parlamentarios, resumen.sesiones, resumen.votos
        ))
    });

    match result {
        Ok(message) => CommandResult::success("seed", message),
        Err((class, message, code)) => CommandResult::failure("seed", class, message, code),
    }
}
