use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of the aggregation path.
///
/// `NotFound` is an expected outcome and carries when it was observed;
/// `Store` is the fatal store-unavailable case, already reduced to its
/// display message so the error stays `Clone` across crate boundaries.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ContextError {
    #[error("No se encontró parlamentario con mp_uid={mp_uid}")]
    NotFound { mp_uid: i64, timestamp: DateTime<Utc> },
    #[error("almacén de datos no disponible: {0}")]
    Store(String),
}

impl ContextError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
