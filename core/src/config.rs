//! Startup configuration.
//!
//! The backend base URL is required. It is passed into `DataClient::new`
//! explicitly so tests can point the adapter anywhere.

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "BACKEND_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
}

impl Config {
    /// Validates `base_url` and strips trailing slashes.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl(BASE_URL_VAR.to_string()));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(trimmed.to_string()));
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Reads `BACKEND_BASE_URL` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = lookup(BASE_URL_VAR)
            .ok_or_else(|| ConfigError::MissingBaseUrl(BASE_URL_VAR.to_string()))?;
        Self::new(&value)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::new("http://localhost:8000/api/").unwrap();
        assert_eq!(config.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn missing_variable_is_fatal() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert_eq!(err, ConfigError::MissingBaseUrl("BACKEND_BASE_URL".into()));
    }

    #[test]
    fn blank_variable_is_fatal() {
        let err = Config::from_lookup(|_| Some("   ".into())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl(_)));
    }

    #[test]
    fn scheme_is_required() {
        let err = Config::new("localhost:8000").unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("localhost:8000".into()));
    }

    #[test]
    fn lookup_reads_the_documented_key() {
        let config = Config::from_lookup(|key| {
            (key == "BACKEND_BASE_URL").then(|| "https://school.example".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url(), "https://school.example");
    }
}
