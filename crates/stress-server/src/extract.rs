use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use http::StatusCode;
use http::request::Parts;
use serde_json::{Map, Value};
use stress_core::AppError;

use crate::fault::Fault;

/// Untyped JSON request body, handed to the validators as-is
///
/// An empty body reads as an empty object so validators report the
/// missing fields by name. Unparseable JSON is a [`Fault::MalformedBody`].
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Fault;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Map::new())));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| Fault::MalformedBody(e.to_string()))
    }
}

/// Query string lifted into a JSON object of strings
///
/// Repeated keys keep the last value.
#[derive(Debug, Clone, Default)]
pub struct QueryObject(pub Map<String, Value>);

impl<S> FromRequestParts<S> for QueryObject
where
    S: Send + Sync,
{
    type Rejection = Fault;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;

        Ok(Self(
            pairs.into_iter().map(|(key, value)| (key, Value::String(value))).collect(),
        ))
    }
}

fn rejected(status: StatusCode, message: String) -> Fault {
    AppError::custom(status, status.canonical_reason().unwrap_or("Bad Request"), message).into()
}
