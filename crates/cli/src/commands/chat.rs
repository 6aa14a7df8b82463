use std::io::{self, BufRead, Write};

use parlatwin_agent::context::ContextBuilder;
use parlatwin_agent::conversation::ChatSession;
use parlatwin_agent::llm::{GenerationParams, LlmClient, OllamaClient, SimulatedLlm};
use parlatwin_core::config::{AppConfig, LlmProvider, LoadOptions};
use parlatwin_db::{connect_with_settings, SqlParlamentarioStore};

use crate::commands::{build_runtime, CommandResult};

const COMANDOS_SALIDA: &[&str] = &["salir", "exit", "quit"];

pub fn run(mp_uid: i64, no_rag: bool, temperature: f32) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let llm: Box<dyn LlmClient> = match config.llm.provider {
        LlmProvider::Simulado => Box::new(SimulatedLlm),
        LlmProvider::Ollama => {
            let base_url = config.llm.base_url.clone().unwrap_or_default();
            match OllamaClient::new(base_url, config.llm.model.clone(), config.llm.timeout_secs) {
                Ok(cliente) => Box::new(cliente),
                Err(error) => {
                    return CommandResult::failure(
                        "chat",
                        "llm_client",
                        format!("could not build the ollama client: {error}"),
                        3,
                    );
                }
            }
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return CommandResult::failure("chat", "db_connectivity", error.to_string(), 4);
            }
        };

        let builder = ContextBuilder::new(SqlParlamentarioStore::new(pool.clone()))
            .with_recent_votes_limit(config.context.recent_votes_limit);
        let mut session = ChatSession::cargar(&builder, mp_uid).await;

        let nombre = match session.documento() {
            Ok(documento) => documento.perfil_biografico.perfil.nombre_completo.clone(),
            Err(error) => {
                pool.close().await;
                let class =
                    if error.is_not_found() { "not_found" } else { "store_unavailable" };
                return CommandResult::failure("chat", class, error.to_string(), 1);
            }
        };

        let params = GenerationParams { temperature, ..GenerationParams::default() };
        let modo = if config.llm.provider == LlmProvider::Simulado {
            " [modo simulación]"
        } else {
            ""
        };
        println!("Conversando con {nombre}{modo}. Escribe `salir` para terminar.");

        let stdin = io::stdin();
        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let mut linea = String::new();
            match stdin.lock().read_line(&mut linea) {
                Ok(0) => break,
                Ok(_) => {}
                Err(error) => {
                    pool.close().await;
                    return CommandResult::failure("chat", "stdin", error.to_string(), 1);
                }
            }

            let consulta = linea.trim();
            if consulta.is_empty() {
                continue;
            }
            if COMANDOS_SALIDA.contains(&consulta.to_lowercase().as_str()) {
                break;
            }

            let respuesta = session.responder(llm.as_ref(), consulta, !no_rag, &params).await;
            println!("{nombre}: {respuesta}\n");
        }

        pool.close().await;
        CommandResult::success(
            "chat",
            format!("conversation ended after {} turns", session.historial().len()),
        )
    })
}
