//! Core types and pure logic of the parliamentary digital twin.
//!
//! This crate is I/O-free. It holds:
//! - the typed domain records the store hands out (`domain`)
//! - the aggregated context document with every derived field (`context`)
//! - the deterministic prompt/report renderings (`serializer`)
//! - the keyword-taxonomy relevance router (`router`)
//! - layered configuration and the aggregation error taxonomy
//!
//! Everything date-derived (ages, interval states, mandate durations) is
//! computed against an injected `hoy`, never against a clock read, so the
//! same store state always serializes to the same bytes.

pub mod config;
pub mod context;
pub mod domain;
pub mod errors;
pub mod router;
pub mod serializer;

pub use context::{
    ActividadLegislativa, ComisionContexto, ContextoMetadata, ContextoParlamentario,
    MandatoContexto, MilitanciaContexto, PerfilBiografico, Trayectoria, VotacionContexto,
};
pub use errors::ContextError;
pub use router::{clasificar, seleccionar_contexto, SeccionContexto};
pub use serializer::{prompt_contexto, render_prompt, render_reporte, reporte_contexto};

pub use chrono;
