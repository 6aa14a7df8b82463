//! Per-legislator chat session.
//!
//! A session owns its aggregation outcome, the serialized base context and
//! an append-only turn history. Sessions are plain values: the hosting
//! application keys them by legislator, there is no ambient registry.

use chrono::{DateTime, Utc};
use tracing::warn;

use parlatwin_core::context::ContextoParlamentario;
use parlatwin_core::errors::ContextError;
use parlatwin_core::router::seleccionar_contexto;
use parlatwin_core::serializer::{render_prompt, truncar};
use parlatwin_db::repositories::ParlamentarioStore;

use crate::context::ContextBuilder;
use crate::llm::{GenerationParams, LlmClient};

/// Turns kept in the prompt window.
pub const MAX_TURNOS_HISTORIAL: usize = 3;
/// Per-turn budget for assistant text inside the prompt window.
const MAX_CHARS_RESPUESTA_HISTORIAL: usize = 200;

pub const ERROR_CONTEXTO: &str = "Error: No se pudo cargar el contexto del parlamentario.";

#[derive(Clone, Debug, PartialEq)]
pub struct ConversationTurn {
    pub consulta: String,
    pub respuesta: String,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatSession {
    mp_uid: i64,
    documento: Result<ContextoParlamentario, ContextError>,
    contexto_base: String,
    historial: Vec<ConversationTurn>,
}

impl ChatSession {
    /// Aggregate the legislator's context and open a session over it. A
    /// failed aggregation still yields a session; `responder` then returns
    /// the fixed error reply without ever invoking generation.
    pub async fn cargar<S: ParlamentarioStore>(
        builder: &ContextBuilder<S>,
        mp_uid: i64,
    ) -> Self {
        let documento = builder.build(mp_uid).await;
        Self::desde_documento(mp_uid, documento)
    }

    pub fn desde_documento(
        mp_uid: i64,
        documento: Result<ContextoParlamentario, ContextError>,
    ) -> Self {
        let contexto_base = render_prompt(&documento);
        Self { mp_uid, documento, contexto_base, historial: Vec::new() }
    }

    pub fn mp_uid(&self) -> i64 {
        self.mp_uid
    }

    pub fn documento(&self) -> &Result<ContextoParlamentario, ContextError> {
        &self.documento
    }

    pub fn contexto_base(&self) -> &str {
        &self.contexto_base
    }

    pub fn historial(&self) -> &[ConversationTurn] {
        &self.historial
    }

    /// Answer one user query. Generation failures become a labeled reply;
    /// the turn is recorded either way.
    pub async fn responder(
        &mut self,
        llm: &dyn LlmClient,
        consulta: &str,
        usar_rag: bool,
        params: &GenerationParams,
    ) -> String {
        let Ok(documento) = &self.documento else {
            return ERROR_CONTEXTO.to_string();
        };

        let contexto = if usar_rag {
            seleccionar_contexto(consulta, documento)
        } else {
            self.contexto_base.clone()
        };
        let system_prompt = self.system_prompt(documento, &contexto);

        let respuesta = match llm.complete(&system_prompt, consulta, params).await {
            Ok(respuesta) => respuesta,
            Err(error) => {
                warn!(mp_uid = self.mp_uid, %error, "falló el colaborador de generación");
                format!("Error al generar respuesta: {error}")
            }
        };

        self.historial.push(ConversationTurn {
            consulta: consulta.to_string(),
            respuesta: respuesta.clone(),
            timestamp: Utc::now(),
        });

        respuesta
    }

    fn system_prompt(&self, documento: &ContextoParlamentario, contexto: &str) -> String {
        format!(
            "Eres el gemelo digital del parlamentario {nombre}.\n\
             \n\
             INSTRUCCIONES:\n\
             1. Responde SIEMPRE en primera persona, como si fueras el/la parlamentario\n\
             2. Basa tus respuestas ÚNICAMENTE en la información del contexto proporcionado\n\
             3. Si no tienes información sobre algo, dilo honestamente\n\
             4. Mantén un tono profesional pero cercano\n\
             5. Sé específico y menciona datos concretos cuando sea relevante\n\
             6. NO inventes información que no esté en el contexto\n\
             \n\
             CONTEXTO RELEVANTE:\n\
             {contexto}\n\
             \n\
             HISTORIAL DE CONVERSACIÓN:\n\
             {historial}",
            nombre = documento.perfil_biografico.perfil.nombre_completo,
            contexto = contexto,
            historial = self.formato_historial(),
        )
    }

    fn formato_historial(&self) -> String {
        if self.historial.is_empty() {
            return "Sin conversación previa.".to_string();
        }

        let recientes = self
            .historial
            .iter()
            .rev()
            .take(MAX_TURNOS_HISTORIAL)
            .rev();

        let mut lineas = Vec::new();
        for turno in recientes {
            lineas.push(format!("Usuario: {}", turno.consulta));
            lineas.push(format!(
                "Yo: {}",
                truncar(&turno.respuesta, MAX_CHARS_RESPUESTA_HISTORIAL)
            ));
            lineas.push(String::new());
        }
        lineas.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::Utc;

    use parlatwin_core::domain::parlamentario::PerfilParlamentario;
    use parlatwin_core::domain::trayectoria::MandatoRegistro;
    use parlatwin_core::domain::votacion::EstadisticasVotacion;
    use parlatwin_core::errors::ContextError;
    use parlatwin_db::repositories::{InMemoryParlamentarioStore, ParlamentarioSeed};

    use crate::context::ContextBuilder;
    use crate::llm::{GenerationParams, LlmClient};

    use super::{ChatSession, ERROR_CONTEXTO};

    struct EcoLlm;

    #[async_trait]
    impl LlmClient for EcoLlm {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_query: &str,
            _params: &GenerationParams,
        ) -> Result<String> {
            Ok(format!("eco: {user_query}"))
        }
    }

    struct FallaLlm;

    #[async_trait]
    impl LlmClient for FallaLlm {
        async fn complete(&self, _: &str, _: &str, _: &GenerationParams) -> Result<String> {
            Err(anyhow!("modelo no disponible"))
        }
    }

    /// Records every system prompt it receives.
    #[derive(Default)]
    struct CapturaLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for CapturaLlm {
        async fn complete(
            &self,
            system_prompt: &str,
            user_query: &str,
            _params: &GenerationParams,
        ) -> Result<String> {
            self.prompts.lock().expect("lock").push(system_prompt.to_string());
            Ok(format!("visto: {user_query}"))
        }
    }

    fn fecha(valor: &str) -> parlatwin_core::chrono::NaiveDate {
        parlatwin_core::chrono::NaiveDate::parse_from_str(valor, "%Y-%m-%d").expect("fecha")
    }

    async fn session_de_prueba() -> ChatSession {
        let store = InMemoryParlamentarioStore::default();
        let mut seed = ParlamentarioSeed::nuevo(PerfilParlamentario {
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
        });
        seed.mandatos.push(MandatoRegistro {
            mandato_id: 1,
            cargo: "Diputada".to_string(),
            distrito: Some("5".to_string()),
            fecha_inicio: fecha("2022-03-11"),
            fecha_fin: None,
        });
        seed.estadisticas = EstadisticasVotacion {
            total_votaciones: 10,
            votos_a_favor: 7,
            votos_en_contra: 2,
            abstenciones: 1,
            pareos: 0,
        };
        store.insertar(seed).await;

        ChatSession::cargar(&ContextBuilder::new(store), 1).await
    }

    #[tokio::test]
    async fn documento_fallido_responde_error_fijo_sin_generar() {
        let documento = Err(ContextError::NotFound { mp_uid: 9, timestamp: Utc::now() });
        let mut session = ChatSession::desde_documento(9, documento);

        let respuesta = session.responder(&FallaLlm, "hola", true, &Default::default()).await;

        assert_eq!(respuesta, ERROR_CONTEXTO);
        assert!(session.historial().is_empty());
    }

    #[tokio::test]
    async fn la_respuesta_se_registra_en_el_historial() {
        let mut session = session_de_prueba().await;
        let respuesta =
            session.responder(&EcoLlm, "¿quién eres?", true, &Default::default()).await;

        assert_eq!(respuesta, "eco: ¿quién eres?");
        assert_eq!(session.historial().len(), 1);
        assert_eq!(session.historial()[0].consulta, "¿quién eres?");
        assert_eq!(session.historial()[0].respuesta, respuesta);
    }

    #[tokio::test]
    async fn la_falla_de_generacion_se_convierte_en_turno_etiquetado() {
        let mut session = session_de_prueba().await;
        let respuesta =
            session.responder(&FallaLlm, "¿quién eres?", true, &Default::default()).await;

        assert!(respuesta.starts_with("Error al generar respuesta:"));
        assert_eq!(session.historial().len(), 1);
        assert_eq!(session.historial()[0].respuesta, respuesta);

        // La sesión sigue siendo utilizable después de la falla.
        let siguiente =
            session.responder(&EcoLlm, "¿sigues ahí?", true, &Default::default()).await;
        assert_eq!(siguiente, "eco: ¿sigues ahí?");
        assert_eq!(session.historial().len(), 2);
    }

    #[tokio::test]
    async fn la_ventana_de_historial_queda_acotada_a_tres_turnos() {
        let mut session = session_de_prueba().await;
        let captura = CapturaLlm::default();

        for pregunta in ["uno", "dos", "tres", "cuatro", "cinco"] {
            session.responder(&captura, pregunta, false, &Default::default()).await;
        }

        let prompts = captura.prompts.lock().expect("lock");
        let ultimo = prompts.last().expect("hubo llamadas");
        assert!(ultimo.contains("Usuario: dos"));
        assert!(ultimo.contains("Usuario: cuatro"));
        assert!(!ultimo.contains("Usuario: uno"));
        assert_eq!(session.historial().len(), 5);
    }

    #[tokio::test]
    async fn el_ruteo_selecciona_solo_las_secciones_relevantes() {
        let mut session = session_de_prueba().await;
        let captura = CapturaLlm::default();

        session
            .responder(&captura, "¿Cómo votaste la ley de pesca?", true, &Default::default())
            .await;

        let prompts = captura.prompts.lock().expect("lock");
        let prompt = prompts.last().expect("hubo llamada");
        assert!(prompt.contains("ESTADÍSTICAS DE VOTACIÓN"));
        assert!(!prompt.contains("PARTICIPACIÓN EN COMISIONES"));
    }

    #[tokio::test]
    async fn sin_ruteo_se_usa_el_contexto_base_completo() {
        let mut session = session_de_prueba().await;
        let captura = CapturaLlm::default();

        session
            .responder(&captura, "¿Cómo votaste la ley de pesca?", false, &Default::default())
            .await;

        let prompts = captura.prompts.lock().expect("lock");
        let prompt = prompts.last().expect("hubo llamada");
        assert!(prompt.contains("IDENTIDAD: Ana Pérez"));
        assert!(prompt.contains("CARGO ACTUAL: Diputada - Distrito 5"));
    }

    #[tokio::test]
    async fn las_respuestas_largas_se_truncan_en_la_ventana() {
        let mut session = session_de_prueba().await;

        struct LargoLlm;
        #[async_trait]
        impl LlmClient for LargoLlm {
            async fn complete(&self, _: &str, _: &str, _: &GenerationParams) -> Result<String> {
                Ok("x".repeat(300))
            }
        }

        session.responder(&LargoLlm, "primera", true, &Default::default()).await;

        let captura = CapturaLlm::default();
        session.responder(&captura, "segunda", true, &Default::default()).await;

        let prompts = captura.prompts.lock().expect("lock");
        let prompt = prompts.last().expect("hubo llamada");
        let linea_historial =
            prompt.lines().find(|linea| linea.starts_with("Yo: x")).expect("línea de historial");
        assert!(linea_historial.len() < 300);
        assert!(linea_historial.ends_with("..."));
    }
}
