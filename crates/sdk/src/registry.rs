//! Registry lookups, index search and registry transactions.

use crate::builder::format_timestamp;
use crate::cache::{CacheKey, WarpCache};
use crate::client::{endpoint, fetch_transaction, RemoteResolver};
use crate::config::WarpConfig;
use crate::error::Result;
use crate::transaction::UnsignedTransaction;
use crate::validator::WarpValidator;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use warps_types::{Brand, RegistryInfo, WarpMeta, WarpSearchResult};

const FUNC_INFO_BY_HASH: &str = "getInfoByHash";
const FUNC_INFO_BY_ALIAS: &str = "getInfoByAlias";
const FUNC_REGISTER_ALIAS: &str = "registerAlias";

/// Outcome of a registry lookup. `registry_info` is `None` when the registry
/// has no entry for the key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryResult {
    #[serde(default)]
    pub registry_info: Option<RegistryInfo>,
    #[serde(default)]
    pub brand: Option<Brand>,
}

/// Client for the on-chain warp registry and the search index.
pub struct WarpRegistry {
    config: Arc<WarpConfig>,
    remote: Arc<dyn RemoteResolver>,
    cache: Arc<WarpCache>,
    validator: WarpValidator,
}

impl WarpRegistry {
    pub fn new(
        config: Arc<WarpConfig>,
        remote: Arc<dyn RemoteResolver>,
        cache: Arc<WarpCache>,
    ) -> Self {
        Self {
            config,
            remote,
            cache,
            validator: WarpValidator::new(),
        }
    }

    pub async fn resolve_by_hash(&self, hash: &str) -> Result<RegistryResult> {
        self.resolve(FUNC_INFO_BY_HASH, hash).await
    }

    pub async fn resolve_by_alias(&self, alias: &str) -> Result<RegistryResult> {
        self.resolve(FUNC_INFO_BY_ALIAS, alias).await
    }

    async fn resolve(&self, func: &str, key: &str) -> Result<RegistryResult> {
        let cache_key = CacheKey::registry(key);
        if let Some(result) = self.cache.get::<RegistryResult>(&cache_key) {
            return Ok(result);
        }

        let url = endpoint(self.config.chain_api_url(), "vm-values/query")?;
        let body = json!({
            "scAddress": self.config.registry_contract(),
            "funcName": func,
            "args": [hex::encode(key)],
        });
        debug!(func, key, "querying registry");
        let response = self.remote.post_json(&url, &body).await?;

        let mut result = match response.get("data") {
            None | Some(Value::Null) => RegistryResult::default(),
            Some(data) => serde_json::from_value::<RegistryResult>(data.clone())?,
        };

        if result.brand.is_none() {
            let brand_hash = result.registry_info.as_ref().and_then(|info| info.brand.clone());
            if let Some(brand_hash) = brand_hash {
                result.brand = self.fetch_brand(&brand_hash).await;
            }
        }

        if result.registry_info.is_some() && self.config.cache_ttl > 0 {
            self.cache.set(
                cache_key,
                result.clone(),
                Duration::from_secs(self.config.cache_ttl),
            );
        }
        Ok(result)
    }

    /// Load the brand inscribed by transaction `hash`. Any failure yields `None`.
    pub async fn fetch_brand(&self, hash: &str) -> Option<Brand> {
        let cache_key = CacheKey::brand(hash);
        if let Some(brand) = self.cache.get::<Brand>(&cache_key) {
            return Some(brand);
        }

        match self.load_brand(hash).await {
            Ok(brand) => {
                if self.config.cache_ttl > 0 {
                    self.cache.set(
                        cache_key,
                        brand.clone(),
                        Duration::from_secs(self.config.cache_ttl),
                    );
                }
                Some(brand)
            }
            Err(err) => {
                warn!(hash, error = %err, "brand lookup failed");
                None
            }
        }
    }

    async fn load_brand(&self, hash: &str) -> Result<Brand> {
        let record =
            fetch_transaction(self.remote.as_ref(), self.config.chain_api_url(), hash).await?;
        let mut brand: Brand = serde_json::from_str(&record.payload()?)?;
        brand.meta = Some(WarpMeta {
            hash: hash.to_string(),
            creator: record.sender,
            created_at: format_timestamp(record.timestamp)?,
        });
        Ok(brand)
    }

    /// Query the index. Hits keep the order the index returned them in.
    pub async fn search(&self, query: &str) -> Result<WarpSearchResult> {
        let mut url = endpoint(self.config.index_url(), "search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(self.config.index_search_param_name(), query);
            if let Some(api_key) = self.config.index_api_key() {
                pairs.append_pair("apiKey", api_key);
            }
        }

        let response = self.remote.get_json(&url).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Unsigned call registering `alias` for the warp inscribed at `hash`.
    pub fn register_alias(&self, hash: &str, alias: &str) -> Result<UnsignedTransaction> {
        let sender = self.config.require_user_address("WarpRegistry")?;
        Ok(UnsignedTransaction::contract_call(
            sender,
            self.config.registry_contract(),
            FUNC_REGISTER_ALIAS,
            &[hash, alias],
            self.config.env,
        ))
    }

    /// Unsigned inscription of `brand` after checking its required fields.
    pub fn register_brand(&self, brand: &Brand) -> Result<UnsignedTransaction> {
        let sender = self.config.require_user_address("WarpRegistry")?;
        self.validator.validate_brand(brand)?;
        let data = serde_json::to_string(brand)?;
        Ok(UnsignedTransaction::inscription(sender, data, self.config.env))
    }
}
