use parlatwin_core::config::{AppConfig, LlmProvider, LoadOptions};
use parlatwin_db::{connect_with_settings, ParlamentarioStore, SqlParlamentarioStore};
use serde::Serialize;

use crate::commands::{build_runtime, CommandResult};

#[derive(Serialize)]
struct DoctorReport {
    status: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

pub fn run() -> CommandResult {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                ok: true,
                detail: format!(
                    "database={} llm_provider={}",
                    config.database.url,
                    match config.llm.provider {
                        LlmProvider::Ollama => "ollama",
                        LlmProvider::Simulado => "simulado",
                    }
                ),
            });
            config
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                ok: false,
                detail: error.to_string(),
            });
            return report(checks);
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => {
                checks.push(DoctorCheck {
                    name: "database".to_string(),
                    ok: true,
                    detail: "connection established".to_string(),
                });

                let store = SqlParlamentarioStore::new(pool.clone());
                match store.listar_parlamentarios().await {
                    Ok(listado) => checks.push(DoctorCheck {
                        name: "legislators".to_string(),
                        ok: !listado.is_empty(),
                        detail: format!("{} legislators available", listado.len()),
                    }),
                    Err(error) => checks.push(DoctorCheck {
                        name: "legislators".to_string(),
                        ok: false,
                        detail: error.to_string(),
                    }),
                }
                pool.close().await;
            }
            Err(error) => {
                checks.push(DoctorCheck {
                    name: "database".to_string(),
                    ok: false,
                    detail: error.to_string(),
                });
            }
        }
    });

    report(checks)
}

fn report(checks: Vec<DoctorCheck>) -> CommandResult {
    let ok = checks.iter().all(|check| check.ok);
    let report = DoctorReport {
        status: if ok { "ok".to_string() } else { "error".to_string() },
        checks,
    };
    let output = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"));

    CommandResult { exit_code: u8::from(!ok), output }
}
