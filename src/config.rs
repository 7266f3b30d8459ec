//! Environment-driven client configuration.

use crate::error::{ApiError, ApiResult};
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081/api";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Credential already held before startup, if any; seeds the vault so
    /// initialization can resolve it.
    pub token: Option<String>,
}

impl ClientConfig {
    /// Read configuration from the environment: `SWEETSHOP_API_URL` selects
    /// the API base address, `SWEETSHOP_TOKEN` optionally seeds the vault.
    pub fn from_env() -> ApiResult<Self> {
        let raw = std::env::var("SWEETSHOP_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw)?;
        let token = std::env::var("SWEETSHOP_TOKEN").ok().filter(|t| !t.is_empty());
        Ok(Self { base_url, token })
    }

    pub fn with_base_url(mut self, raw: &str) -> ApiResult<Self> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

/// Parse and normalize the base address. `Url::join` drops the final path
/// segment unless the base ends with '/', so `.../api` must become `.../api/`
/// for relative request paths to land under it.
pub fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash).map_err(|e| ApiError::validation(format!("invalid base URL '{}': {}", raw, e)))
}
