//! Domain error taxonomy shared by all model operations.
//!
//! Every mutating operation returns `Result<_, DomainError>`; HTTP handlers
//! map each variant onto a status code and the standard response envelope.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation, including re-use of a consumed QR token.
    #[error("{0}")]
    Duplicate(String),

    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Temporal-policy violation: edit window, anomaly grace period, token expiry.
    #[error("{0}")]
    WindowExpired(String),

    /// Caller's role lacks the required capability.
    #[error("{0}")]
    Authorization(String),

    /// Unexpected database failure. Logged server-side, surfaced generically.
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl DomainError {
    /// Stable machine-readable tag for the `error_type` response field.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::Duplicate(_) => "duplicate",
            DomainError::NotFound(_) => "not_found",
            DomainError::WindowExpired(_) => "window_expired",
            DomainError::Authorization(_) => "authorization",
            DomainError::Db(_) => "system",
        }
    }
}
