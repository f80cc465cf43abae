//! Error types for the data-access adapter.
//!
//! # Design
//! Every failed HTTP exchange reaches the caller as `ApiError::Http`, the
//! normalized `{message, status_code}` shape; raw transport details never
//! leak for non-2xx responses. Startup problems (missing base URL, an invalid
//! filter table) are `ConfigError`s and are meant to abort the process.

use thiserror::Error;

/// Generic message used when a failed response carries no usable `message`.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed!";

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by adapter calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status_code})")]
    Http { message: String, status_code: u16 },

    /// A success response body was not a valid envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The exchange never completed (connection refused, DNS, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The provider does not implement this operation.
    #[error("operation `{operation}` is not supported for resource `{resource}`")]
    Unsupported {
        operation: &'static str,
        resource: String,
    },
}

impl ApiError {
    pub fn http(message: impl Into<String>, status_code: u16) -> Self {
        ApiError::Http {
            message: message.into(),
            status_code,
        }
    }

    pub fn unsupported(operation: &'static str, resource: &str) -> Self {
        ApiError::Unsupported {
            operation,
            resource: resource.to_string(),
        }
    }

    /// HTTP status of a normalized error, `None` for every other kind.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Fatal startup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingBaseUrl(String),

    #[error("invalid base URL `{0}`: expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("resource `{0}` is registered more than once")]
    DuplicateResource(String),

    #[error("field `{field}` is mapped more than once for resource `{resource}`")]
    DuplicateField { resource: String, field: String },

    #[error("empty {0} name in filter table")]
    EmptyName(&'static str),

    #[error("field `{field}` of resource `{resource}` targets reserved parameter `{param}`")]
    ReservedParam {
        resource: String,
        field: String,
        param: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_only_for_http_errors() {
        assert_eq!(ApiError::http("Not found", 404).status_code(), Some(404));
        assert_eq!(ApiError::Transport("refused".into()).status_code(), None);
        assert_eq!(ApiError::unsupported("update", "classes").status_code(), None);
    }

    #[test]
    fn display_messages() {
        assert_eq!(ApiError::http("Not found", 404).to_string(), "Not found (HTTP 404)");
        assert_eq!(
            ApiError::unsupported("getOne", "subjects").to_string(),
            "operation `getOne` is not supported for resource `subjects`"
        );
        assert_eq!(
            ConfigError::MissingBaseUrl("BACKEND_BASE_URL".into()).to_string(),
            "missing environment variable: BACKEND_BASE_URL"
        );
    }
}
