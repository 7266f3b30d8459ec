//! HTTP transport for the sweets API.
//! A thin pass-through: builds requests against the configured base address,
//! attaches the bearer credential when the vault holds one, and maps
//! failures into [`ApiError`]. No retry, no backoff, no timeout beyond
//! reqwest's defaults; resilience belongs to the caller.

use reqwest::{RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::envelope;
use crate::error::{ApiError, ApiResult};
use crate::identity::CredentialVault;

#[derive(Clone)]
pub struct ApiTransport {
    base: Url,
    client: reqwest::Client,
    vault: CredentialVault,
}

impl ApiTransport {
    /// `base` must end with a trailing slash so relative paths join under
    /// it; `config::parse_base_url` guarantees that.
    pub fn new(base: Url, vault: CredentialVault) -> ApiResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base, client, vault })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        let mut req = self.client.get(self.url(path)?);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.execute(req).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.execute(self.client.post(self.url(path)?).json(body)).await
    }

    /// POST with query parameters and no body, e.g. the restock delta.
    pub async fn post_query(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        let mut req = self.client.post(self.url(path)?);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.execute(req).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.execute(self.client.put(self.url(path)?).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.execute(self.client.delete(self.url(path)?)).await
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::transport(None, None, format!("invalid request path '{}': {}", path, e)))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.vault.current() {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    /// Send the request and interpret the outcome. 2xx bodies parse into
    /// JSON (empty bodies become `Null`); non-2xx bodies are mined for the
    /// envelope's `message` before being turned into a transport error.
    async fn execute(&self, req: RequestBuilder) -> ApiResult<Value> {
        let resp = self.authorize(req).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let server_message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| envelope::server_message(&v));
            debug!(target: "transport", "HTTP {} body={:?}", status.as_u16(), text);
            let raw = format!("HTTP {}", status.as_u16());
            return Err(ApiError::transport(Some(status.as_u16()), server_message, raw));
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            ApiError::transport(Some(status.as_u16()), None, format!("malformed response body: {}", e))
        })
    }
}
