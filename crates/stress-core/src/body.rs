use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::{Details, HttpError};

/// Wire format of every error response
///
/// `details`, `file` and `line` are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            file: None,
            line: None,
        }
    }

    /// Render an intentional error verbatim
    pub fn from_http_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            error: error.error_type().to_owned(),
            message: error.client_message(),
            details: error.details().cloned(),
            file: None,
            line: None,
        }
    }

    /// Serialize as pretty-printed JSON with a four-space indent
    pub fn to_pretty_json(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));

        // Serializing plain strings and JSON maps into a Vec cannot fail
        if self.serialize(&mut serializer).is_err() {
            out.clear();
            out.extend_from_slice(br#"{"error":"Internal Server Error","message":"An unexpected error occurred"}"#);
        }

        out
    }
}
