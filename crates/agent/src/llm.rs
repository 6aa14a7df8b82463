use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parlatwin_core::router::{clasificar, SeccionContexto};
use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded to the generation collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.7, top_p: 0.9, max_tokens: 500 }
    }
}

/// Generation collaborator seam. Implementations must be safe to call with
/// arbitrary text and must fail with an error, never hang forever.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_query: &str,
        params: &GenerationParams,
    ) -> Result<String>;
}

/// Non-streaming client for a local Ollama server.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("building ollama http client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_query: &str,
        params: &GenerationParams,
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_query },
            ],
            stream: false,
            options: ChatOptions {
                temperature: params.temperature,
                top_p: params.top_p,
                num_predict: params.max_tokens,
            },
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .context("sending request to ollama")?
            .error_for_status()
            .context("ollama returned an error status")?
            .json::<ChatResponse>()
            .await
            .context("decoding ollama response")?;

        Ok(response.message.content)
    }
}

/// Degraded mode: deterministic canned replies keyed on the same keyword
/// taxonomy the relevance router uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedLlm;

pub fn respuesta_simulada(consulta: &str) -> String {
    let respuesta = match clasificar(consulta).first().copied() {
        Some(SeccionContexto::Votaciones) => {
            "Mi historial de votaciones está en el contexto entregado: ahí se detallan mis \
             votos a favor, en contra y mis abstenciones."
        }
        Some(SeccionContexto::Proyectos) => {
            "Los proyectos de ley que he presentado como autor o coautor, y cuáles se \
             convirtieron en ley, aparecen en el contexto entregado."
        }
        Some(SeccionContexto::Comisiones) => {
            "Mi participación en comisiones parlamentarias, incluidas las que presido, está \
             descrita en el contexto entregado."
        }
        Some(SeccionContexto::Partido) => {
            "Mi militancia partidaria y la coherencia de mis votos con mi partido aparecen \
             en el contexto entregado."
        }
        Some(SeccionContexto::Biografia) => {
            "Los datos de mi biografía, como edad, profesión y lugar de nacimiento, están \
             en el contexto entregado."
        }
        None => {
            "Soy el gemelo digital de un parlamentario en ejercicio. Pregúntame por mis \
             votaciones, proyectos de ley, comisiones o trayectoria política."
        }
    };
    respuesta.to_string()
}

#[async_trait]
impl LlmClient for SimulatedLlm {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_query: &str,
        _params: &GenerationParams,
    ) -> Result<String> {
        Ok(respuesta_simulada(user_query))
    }
}

#[cfg(test)]
mod tests {
    use super::{respuesta_simulada, GenerationParams, LlmClient, SimulatedLlm};

    #[test]
    fn la_respuesta_simulada_es_deterministica() {
        let consulta = "¿Cómo votaste la ley de pesca?";
        assert_eq!(respuesta_simulada(consulta), respuesta_simulada(consulta));
    }

    #[test]
    fn respuestas_por_seccion_de_la_taxonomia() {
        assert!(respuesta_simulada("¿cómo votaste ayer?").contains("votaciones"));
        assert!(respuesta_simulada("¿qué comisiones presides?").contains("comisiones"));
        assert!(respuesta_simulada("háblame de tu partido").contains("militancia"));
        assert!(respuesta_simulada("¿qué edad tienes?").contains("biografía"));
    }

    #[test]
    fn consulta_fuera_de_taxonomia_recibe_presentacion() {
        let respuesta = respuesta_simulada("¿qué opinas del clima?");
        assert!(respuesta.contains("gemelo digital"));
    }

    #[tokio::test]
    async fn el_cliente_simulado_nunca_falla() {
        let llm = SimulatedLlm;
        let respuesta = llm
            .complete("sistema", "¿qué opinas del clima?", &GenerationParams::default())
            .await
            .expect("la simulación no falla");
        assert!(!respuesta.is_empty());
    }
}
