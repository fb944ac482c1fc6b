#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;
use warps_sdk::{RemoteResolver, Result, WarpConfig, WarpError};

pub const CHAIN_API: &str = "https://api.test";
pub const INDEX_API: &str = "https://index.test/api";

pub const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const BRAND_HASH: &str = "cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

pub fn test_config() -> WarpConfig {
    WarpConfig::mainnet()
        .with_chain_api_url(CHAIN_API)
        .with_index_url(INDEX_API)
}

pub fn sample_warp(name: &str) -> Value {
    json!({
        "protocol": "warp-0.0.2",
        "name": name,
        "title": format!("{name} title"),
        "description": null,
        "actions": [
            {"type": "link", "label": "Open", "url": "https://docs.example"}
        ]
    })
}

/// In-memory chain and index API that records every call it receives.
#[derive(Clone, Default)]
pub struct StubRemote {
    transactions: Arc<RwLock<HashMap<String, Value>>>,
    registry: Arc<RwLock<HashMap<String, Value>>>,
    search: Arc<RwLock<Option<Value>>>,
    registry_down: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl StubRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` as the base64 data of transaction `hash`.
    pub fn with_transaction(self, hash: &str, payload: &Value, sender: &str, timestamp: i64) -> Self {
        self.transactions.write().insert(
            hash.to_string(),
            json!({
                "data": STANDARD.encode(payload.to_string()),
                "sender": sender,
                "timestamp": timestamp,
            }),
        );
        self
    }

    /// Serve `data` for registry lookups of `key` (hash or alias).
    pub fn with_registry(self, key: &str, data: Value) -> Self {
        self.registry.write().insert(key.to_string(), data);
        self
    }

    pub fn with_search(self, response: Value) -> Self {
        *self.search.write() = Some(response);
        self
    }

    pub fn with_registry_down(self) -> Self {
        *self.registry_down.write() = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.calls.read().iter().filter(|c| c.contains(needle)).count()
    }

    fn not_found(url: &Url) -> WarpError {
        WarpError::Remote {
            status: Some(404),
            message: format!("nothing at {url}"),
        }
    }
}

#[async_trait]
impl RemoteResolver for StubRemote {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        self.calls.write().push(format!("GET {url}"));

        let path = url.path();
        if let Some(hash) = path.strip_prefix("/transactions/") {
            return self
                .transactions
                .read()
                .get(hash)
                .cloned()
                .ok_or_else(|| Self::not_found(url));
        }
        if path.ends_with("/search") {
            return self.search.read().clone().ok_or_else(|| Self::not_found(url));
        }
        Err(Self::not_found(url))
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<Value> {
        self.calls.write().push(format!("POST {url} {body}"));

        if *self.registry_down.read() {
            return Err(WarpError::Remote {
                status: Some(503),
                message: "registry unavailable".into(),
            });
        }
        if url.path() != "/vm-values/query" {
            return Err(Self::not_found(url));
        }

        let key = body["args"][0]
            .as_str()
            .and_then(|arg| hex::decode(arg).ok())
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_default();

        let data = self
            .registry
            .read()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| json!({"registryInfo": null, "brand": null}));
        Ok(json!({ "data": data }))
    }
}
