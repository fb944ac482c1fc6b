//! Remote collaborators: the chain API and the index API.
//!
//! Everything network-facing goes through [`RemoteResolver`] so callers can
//! swap in their own transport (retries, timeouts, fixtures).

use crate::error::{Result, WarpError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Transport used for every remote call the client makes.
#[async_trait]
pub trait RemoteResolver: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<Value>;

    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value>;
}

/// `reqwest`-backed resolver.
#[derive(Debug, Clone)]
pub struct HttpRemoteResolver {
    http: Client,
}

impl HttpRemoteResolver {
    pub fn new() -> Result<Self> {
        Ok(Self::with_http_client(
            Client::builder().timeout(Duration::from_secs(30)).build()?,
        ))
    }

    /// Use an existing reqwest client (custom TLS, proxies, middleware).
    pub fn with_http_client(http: Client) -> Self {
        Self { http }
    }

    async fn map_response(response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(WarpError::remote_status(status.as_u16(), message));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl RemoteResolver for HttpRemoteResolver {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        debug!(%url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        Self::map_response(response).await
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value> {
        debug!(%url, "POST");
        let response = self.http.post(url.clone()).json(body).send().await?;
        Self::map_response(response).await
    }
}

/// Join `path` onto `base`, keeping any path `base` already has.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&joined)?)
}

/// `<chain_api>/transactions/<hash>`, with the hash escaped as a single
/// path segment.
pub(crate) fn transaction_url(chain_api_url: &str, hash: &str) -> Result<Url> {
    if matches!(hash, "" | "." | "..") {
        return Err(WarpError::decode(format!("invalid transaction hash: {hash:?}")));
    }
    let mut url = endpoint(chain_api_url, "transactions")?;
    url.path_segments_mut()
        .map_err(|_| WarpError::config(format!("chain API url cannot carry a path: {chain_api_url}")))?
        .push(hash);
    Ok(url)
}

/// Transaction fields the chain API returns for `GET /transactions/<hash>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl TransactionRecord {
    /// The embedded payload. The chain API returns `data` base64 encoded;
    /// anything that does not decode to UTF-8 is used verbatim.
    pub fn payload(&self) -> Result<String> {
        let data = self
            .data
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| WarpError::decode("transaction carries no data"))?;

        match STANDARD.decode(data) {
            Ok(bytes) => Ok(String::from_utf8(bytes).unwrap_or_else(|_| data.to_string())),
            Err(_) => Ok(data.to_string()),
        }
    }
}

/// Fetch a transaction record from the chain API.
pub(crate) async fn fetch_transaction(
    remote: &dyn RemoteResolver,
    chain_api_url: &str,
    hash: &str,
) -> Result<TransactionRecord> {
    let url = transaction_url(chain_api_url, hash)?;
    let value = remote.get_json(&url).await?;
    Ok(serde_json::from_value(value)?)
}
