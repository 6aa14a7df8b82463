//! Chat runtime of the parliamentary digital twin.
//!
//! This crate wires the read-only store to the generation collaborator:
//!
//! 1. **Context aggregation** (`context`) - one legislator id in, one
//!    complete typed document out, with every derived field computed
//!    against an injected timestamp.
//! 2. **Conversation sessions** (`conversation`) - per-legislator state
//!    with a bounded prompt window and labeled-failure turns.
//! 3. **Generation seam** (`llm`) - the `LlmClient` trait with a live
//!    Ollama client and a deterministic simulated client keyed on the
//!    relevance-router taxonomy.
//!
//! The LLM is strictly a narrator over the aggregated document. It never
//! sees the store, and every number it can quote was derived
//! deterministically before the prompt was composed.

pub mod context;
pub mod conversation;
pub mod llm;

pub use context::{ContextBuilder, FUENTE, LIMITE_VOTACIONES_DEFAULT};
pub use conversation::{ChatSession, ConversationTurn, ERROR_CONTEXTO, MAX_TURNOS_HISTORIAL};
pub use llm::{GenerationParams, LlmClient, OllamaClient, SimulatedLlm};
