use db::error::DomainError;
use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// Error responses additionally carry a stable `error_type` tag
/// (`validation`, `duplicate`, `not_found`, `window_expired`,
/// `authorization`, `system`) so clients can branch without parsing the
/// human-readable message.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error_type: None,
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            error_type: None,
        }
    }

    /// Error response tagged with the domain error taxonomy. Database
    /// failures are surfaced with a generic message only.
    pub fn from_domain_error(err: &DomainError) -> Self
    where
        T: Default,
    {
        let message = match err {
            DomainError::Db(_) => "Error interno del servidor".to_string(),
            other => other.to_string(),
        };
        Self {
            success: false,
            data: T::default(),
            message,
            error_type: Some(err.kind().to_string()),
        }
    }
}
