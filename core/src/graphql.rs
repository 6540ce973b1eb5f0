//! GraphQL request encoding and response envelope decoding.
//!
//! # Design
//! `build_request` turns a query template plus a typed variable set into an
//! `HttpRequest`; `parse_response` checks the HTTP status, unwraps the
//! `{"data": ..., "errors": [...]}` envelope and decodes `data` into the
//! caller's target type. A non-empty `errors` array is a failure even when
//! `data` is also present.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Body of a GraphQL `POST`.
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: &'a V,
}

/// Variable set for static queries. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables {}

/// One entry of a response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    /// Response path the error is attached to, as field names and indices.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Build the `POST` for `query` with `variables`.
///
/// The token is sent verbatim as the `Authorization` header; no scheme prefix
/// is added.
pub fn build_request<V: Serialize>(
    endpoint: &str,
    token: &str,
    query: &str,
    variables: &V,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(&GraphqlRequest { query, variables })
        .map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        url: endpoint.to_string(),
        headers: vec![
            ("authorization".to_string(), token.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
        ],
        body,
    })
}

/// Decode the `data` member of a GraphQL response into `R`.
pub fn parse_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    check_status(&response)?;

    let envelope: Envelope = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

    let errors = envelope.errors.unwrap_or_default();
    if !errors.is_empty() {
        return Err(ApiError::GraphqlErrors(errors));
    }

    let data = match envelope.data {
        Some(serde_json::Value::Null) | None => {
            return Err(ApiError::DeserializationError(
                "response has no data".to_string(),
            ))
        }
        Some(data) => data,
    };
    serde_json::from_value(data).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
