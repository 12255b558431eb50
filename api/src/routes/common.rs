use axum::{Json, http::StatusCode};
use db::error::DomainError;
use serde::Serialize;

use crate::response::ApiResponse;

/// Maps a `DomainError` onto an HTTP status and the standard envelope.
/// Database errors are logged with full detail and surfaced generically.
pub fn domain_error<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    if let DomainError::Db(e) = &err {
        tracing::error!(error = %e, "Unexpected database error");
    }

    let status = match &err {
        DomainError::Validation(_) | DomainError::WindowExpired(_) => StatusCode::BAD_REQUEST,
        DomainError::Duplicate(_) => StatusCode::CONFLICT,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Authorization(_) => StatusCode::FORBIDDEN,
        DomainError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(ApiResponse::from_domain_error(&err)))
}
