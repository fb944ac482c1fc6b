//! Client configuration and the per-environment defaults table.

use crate::error::{Result, WarpError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use warps_types::ChainEnv;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Defaults that differ between environments.
#[derive(Debug, Clone, Copy)]
pub struct EnvDefaults {
    pub client_url: &'static str,
    pub chain_api_url: &'static str,
    pub registry_contract: &'static str,
}

/// Immutable lookup table consulted whenever a config field is unset.
#[derive(Debug)]
pub struct DefaultsTable {
    /// First-party hosts whose canonical links use path-style encoding.
    pub super_client_urls: &'static [&'static str],
    pub index_url: &'static str,
    pub index_search_param: &'static str,
    pub warp_schema_url: &'static str,
    pub brand_schema_url: &'static str,
    pub mainnet: EnvDefaults,
    pub testnet: EnvDefaults,
    pub devnet: EnvDefaults,
}

impl DefaultsTable {
    pub fn for_env(&self, env: ChainEnv) -> &EnvDefaults {
        match env {
            ChainEnv::Mainnet => &self.mainnet,
            ChainEnv::Testnet => &self.testnet,
            ChainEnv::Devnet => &self.devnet,
        }
    }

    /// Whether `url` starts with one of the super-client URLs.
    pub fn is_super_client(&self, url: &str) -> bool {
        self.super_client_urls
            .iter()
            .any(|prefix| url.starts_with(prefix))
    }
}

pub static DEFAULTS: DefaultsTable = DefaultsTable {
    super_client_urls: &["https://warp.to", "https://usewarp.to"],
    index_url: "https://index.usewarp.to/api",
    index_search_param: "q",
    warp_schema_url: "https://raw.githubusercontent.com/usewarps/schema/main/warp.schema.json",
    brand_schema_url: "https://raw.githubusercontent.com/usewarps/schema/main/brand.schema.json",
    mainnet: EnvDefaults {
        client_url: "https://usewarp.to/to",
        chain_api_url: "https://api.multiversx.com",
        registry_contract: "erd1qqqqqqqqqqqqqpgqt4g39q9vzm80aujs44wmvwn4kfn6czmtcrpslzjs4e",
    },
    testnet: EnvDefaults {
        client_url: "https://testnet.usewarp.to/to",
        chain_api_url: "https://testnet-api.multiversx.com",
        registry_contract: "erd1qqqqqqqqqqqqqpgqnyj0lmcyft0v8yc5xm5vljz3y7mnkx7tcrps2jgm07",
    },
    devnet: EnvDefaults {
        client_url: "https://devnet.usewarp.to/to",
        chain_api_url: "https://devnet-api.multiversx.com",
        registry_contract: "erd1qqqqqqqqqqqqqpgq34s7nd6sudf3jm5w44qqkpgfdxzplh4tcrps3ffxdl",
    },
};

/// Configuration shared by every component of a client.
///
/// Unset URL and contract fields resolve through [`DEFAULTS`] for the
/// configured environment; use the accessor methods rather than the raw
/// fields when reading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    pub env: ChainEnv,
    pub client_url: Option<String>,
    pub current_url: Option<String>,
    pub user_address: Option<String>,
    pub chain_api_url: Option<String>,
    pub warp_schema_url: Option<String>,
    pub brand_schema_url: Option<String>,
    /// Seconds; zero disables caching.
    pub cache_ttl: u64,
    pub registry_contract: Option<String>,
    pub index_url: Option<String>,
    pub index_api_key: Option<String>,
    pub index_search_param_name: Option<String>,
    /// Values substituted into a warp's `vars` when it is created.
    pub vars: BTreeMap<String, String>,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            env: ChainEnv::Mainnet,
            client_url: None,
            current_url: None,
            user_address: None,
            chain_api_url: None,
            warp_schema_url: None,
            brand_schema_url: None,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            registry_contract: None,
            index_url: None,
            index_api_key: None,
            index_search_param_name: None,
            vars: BTreeMap::new(),
        }
    }
}

impl WarpConfig {
    /// Fully populated configuration for `env`.
    pub fn for_env(env: ChainEnv) -> Self {
        let defaults = DEFAULTS.for_env(env);
        Self {
            env,
            client_url: Some(defaults.client_url.to_string()),
            chain_api_url: Some(defaults.chain_api_url.to_string()),
            warp_schema_url: Some(DEFAULTS.warp_schema_url.to_string()),
            brand_schema_url: Some(DEFAULTS.brand_schema_url.to_string()),
            registry_contract: Some(defaults.registry_contract.to_string()),
            index_url: Some(DEFAULTS.index_url.to_string()),
            index_search_param_name: Some(DEFAULTS.index_search_param.to_string()),
            ..Self::default()
        }
    }

    pub fn mainnet() -> Self {
        Self::for_env(ChainEnv::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::for_env(ChainEnv::Testnet)
    }

    pub fn devnet() -> Self {
        Self::for_env(ChainEnv::Devnet)
    }

    /// Load from an optional config file, then `WARP_*` environment overrides
    /// (e.g. `WARP_ENV=testnet`, `WARP_CACHE_TTL=60`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(WarpError::config(format!(
                    "configuration file {} not found",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("WARP").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn with_user_address(mut self, address: impl Into<String>) -> Self {
        self.user_address = Some(address.into());
        self
    }

    pub fn with_client_url(mut self, url: impl Into<String>) -> Self {
        self.client_url = Some(url.into());
        self
    }

    pub fn with_chain_api_url(mut self, url: impl Into<String>) -> Self {
        self.chain_api_url = Some(url.into());
        self
    }

    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = Some(url.into());
        self
    }

    pub fn with_index_api_key(mut self, key: impl Into<String>) -> Self {
        self.index_api_key = Some(key.into());
        self
    }

    pub fn with_cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl = seconds;
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    fn env_defaults(&self) -> &'static EnvDefaults {
        DEFAULTS.for_env(self.env)
    }

    pub fn client_url(&self) -> &str {
        non_empty(&self.client_url).unwrap_or(self.env_defaults().client_url)
    }

    pub fn chain_api_url(&self) -> &str {
        non_empty(&self.chain_api_url).unwrap_or(self.env_defaults().chain_api_url)
    }

    pub fn registry_contract(&self) -> &str {
        non_empty(&self.registry_contract).unwrap_or(self.env_defaults().registry_contract)
    }

    pub fn index_url(&self) -> &str {
        non_empty(&self.index_url).unwrap_or(DEFAULTS.index_url)
    }

    pub fn index_search_param_name(&self) -> &str {
        non_empty(&self.index_search_param_name).unwrap_or(DEFAULTS.index_search_param)
    }

    pub fn index_api_key(&self) -> Option<&str> {
        non_empty(&self.index_api_key)
    }

    pub fn warp_schema_url(&self) -> &str {
        non_empty(&self.warp_schema_url).unwrap_or(DEFAULTS.warp_schema_url)
    }

    pub fn brand_schema_url(&self) -> &str {
        non_empty(&self.brand_schema_url).unwrap_or(DEFAULTS.brand_schema_url)
    }

    pub fn user_address(&self) -> Option<&str> {
        non_empty(&self.user_address)
    }

    /// The user address, or a config error naming `component`.
    pub(crate) fn require_user_address(&self, component: &str) -> Result<&str> {
        self.user_address()
            .ok_or_else(|| WarpError::config(format!("{component}: user address not set")))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
