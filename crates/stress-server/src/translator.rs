//! The single exit point for failed requests
//!
//! [`translate_faults`] wraps every route. It catches panics, picks up the
//! [`FaultReport`] a handler attached to its response, and renders the
//! JSON error contract under the active [`ErrorPolicy`]. Error responses
//! produced elsewhere without a report (framework rejections, bare status
//! codes) are rewritten into the same contract.

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use stress_config::Config;
use stress_core::{AppError, ErrorBody, HttpError};

use crate::fault::{CatchPanic, Fault, FaultReport, Unexpected};

pub const MALFORMED_BODY_ERROR: &str = "Bad Request";
pub const MALFORMED_BODY_MESSAGE: &str = "Invalid JSON in request body";
pub const INTERNAL_ERROR: &str = "Internal Server Error";
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// How much internal detail error responses may reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub production: bool,
}

impl ErrorPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            production: config.is_production(),
        }
    }
}

/// Middleware converting every failure into the JSON error contract
pub async fn translate_faults(policy: ErrorPolicy, request: Request, next: Next) -> Response {
    let response = match CatchPanic::new(next.run(request)).await {
        Ok(response) => response,
        Err(payload) => Fault::from_panic(payload.as_ref()).into_response(),
    };

    finish(response, policy)
}

fn finish(mut response: Response, policy: ErrorPolicy) -> Response {
    if let Some(FaultReport(fault)) = response.extensions_mut().remove::<FaultReport>() {
        log_fault(&fault, policy);
        return replace_body(response, &fault, policy);
    }

    let status = response.status();
    if (status.is_client_error() || status.is_server_error()) && !is_json(&response) {
        let reason = status.canonical_reason().unwrap_or("Error");
        let fault = Fault::App(AppError::custom(status, reason, reason));
        log_fault(&fault, policy);
        return replace_body(response, &fault, policy);
    }

    response
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Decide status and body for a fault
pub fn render(fault: &Fault, production: bool) -> (StatusCode, ErrorBody) {
    match fault {
        Fault::App(error) => (error.status_code(), ErrorBody::from_http_error(error)),
        Fault::MalformedBody(_) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(MALFORMED_BODY_ERROR, MALFORMED_BODY_MESSAGE),
        ),
        Fault::Unexpected(_) if production => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new(INTERNAL_ERROR, GENERIC_MESSAGE),
        ),
        Fault::Unexpected(Unexpected {
            type_name,
            message,
            file,
            line,
            ..
        }) => {
            let mut body = ErrorBody::new(type_name.to_string(), message.clone());
            body.file.clone_from(file);
            body.line = *line;
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    }
}

pub(crate) fn render_response(fault: &Fault, production: bool) -> Response {
    let (status, body) = render(fault, production);

    let mut response = Response::new(Body::from(body.to_pretty_json()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn replace_body(response: Response, fault: &Fault, policy: ErrorPolicy) -> Response {
    let (mut parts, _) = response.into_parts();
    let rendered = render_response(fault, policy.production);

    parts.status = rendered.status();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(parts, rendered.into_body())
}

fn log_fault(fault: &Fault, policy: ErrorPolicy) {
    match fault {
        Fault::App(error) => {
            let status = error.status_code().as_u16();
            if error.status_code().is_server_error() {
                tracing::error!(status, error_type = error.error_type(), "{error}");
            } else {
                tracing::warn!(status, error_type = error.error_type(), "{error}");
            }
        }
        Fault::MalformedBody(reason) => {
            tracing::warn!(status = 400, reason = %reason, "{MALFORMED_BODY_MESSAGE}");
        }
        Fault::Unexpected(detail) if policy.production => {
            tracing::error!(status = 500, "{}", detail.message);
        }
        Fault::Unexpected(detail) => {
            tracing::error!(
                status = 500,
                error_type = %detail.type_name,
                file = detail.file.as_deref().unwrap_or_default(),
                line = detail.line.unwrap_or_default(),
                trace = detail.trace.as_deref().unwrap_or_default(),
                "{}",
                detail.message
            );
        }
    }
}
