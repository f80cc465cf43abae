//! Response envelopes and the error normalizer.
//!
//! # Design
//! All parsers take `&HttpResponse`; the body is an owned, buffered `String`
//! so the status check and the success path read the same bytes.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, DEFAULT_ERROR_MESSAGE};
use crate::http::HttpResponse;
use crate::types::{CreateResult, ListResult, Record};

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Option<Vec<Record>>,
    #[serde(default)]
    pagination: Option<PaginationEnvelope>,
}

#[derive(Debug, Deserialize)]
struct PaginationEnvelope {
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    #[serde(default)]
    data: Option<Record>,
}

/// Passes 2xx responses through; normalizes everything else.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let err = normalize_error(response);
    warn!(status = response.status, error = %err, "request failed");
    Err(err)
}

/// Builds the `{message, status_code}` error for a failed response.
///
/// A non-empty string `message` in a JSON body wins; anything else (no body,
/// HTML, malformed JSON, `message` missing or not a string) falls back to
/// `DEFAULT_ERROR_MESSAGE`.
pub fn normalize_error(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| match body.get("message") {
            Some(Value::String(msg)) if !msg.is_empty() => Some(msg.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

    ApiError::Http {
        message,
        status_code: response.status,
    }
}

/// Parses a list envelope: `{data?, pagination?: {total?}}`.
pub fn parse_list(response: &HttpResponse) -> Result<ListResult, ApiError> {
    let envelope: ListEnvelope = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    let data = envelope.data.unwrap_or_default();
    let total = envelope
        .pagination
        .and_then(|p| p.total)
        .unwrap_or(data.len() as u64);

    Ok(ListResult { data, total })
}

/// Parses a create envelope: `{data?}`.
pub fn parse_create(response: &HttpResponse) -> Result<CreateResult, ApiError> {
    let envelope: CreateEnvelope = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    Ok(CreateResult {
        data: envelope.data.unwrap_or_default(),
    })
}
