use std::borrow::Cow;

use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

/// Structured, machine-readable context attached to an error response
///
/// Key order is preserved on the wire.
pub type Details = Map<String, Value>;

/// Trait for domain errors that can be converted to HTTP responses
///
/// The server layer converts these into actual HTTP responses, keeping
/// domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `ValidationError`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Optional structured details for the response body
    fn details(&self) -> Option<&Details> {
        None
    }
}

/// A deliberately raised failure carrying its own status and kind
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Client input failed validation
    #[error("{message}")]
    Validation { message: String, details: Option<Details> },

    /// A referenced resource does not exist
    #[error("{message}")]
    NotFound { message: String, details: Option<Details> },

    /// Any other intentional failure with an explicit status
    #[error("{message}")]
    Custom {
        status: StatusCode,
        error_type: Cow<'static, str>,
        message: String,
        details: Option<Details>,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            details: None,
        }
    }

    /// Build an error with an arbitrary status
    ///
    /// Statuses outside 4xx/5xx are coerced to 500 so the response is
    /// always an error.
    pub fn custom(status: StatusCode, error_type: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self::Custom {
            status,
            error_type: error_type.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details, replacing any already present
    #[must_use]
    pub fn with_details(mut self, new: Details) -> Self {
        match &mut self {
            Self::Validation { details, .. } | Self::NotFound { details, .. } | Self::Custom { details, .. } => {
                *details = Some(new);
            }
        }
        self
    }
}

impl HttpError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Custom { status, .. } => *status,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Custom { error_type, .. } => &**error_type,
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn details(&self) -> Option<&Details> {
        match self {
            Self::Validation { details, .. } | Self::NotFound { details, .. } | Self::Custom { details, .. } => {
                details.as_ref()
            }
        }
    }
}
