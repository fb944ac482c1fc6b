//! Assembling warps from fields, raw payloads and on-chain transactions.

use crate::cache::{CacheKey, WarpCache};
use crate::client::{fetch_transaction, RemoteResolver};
use crate::config::WarpConfig;
use crate::error::{Result, WarpError};
use crate::transaction::UnsignedTransaction;
use crate::validator::WarpValidator;
use chrono::{DateTime, SecondsFormat};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use warps_types::{to_preview_text, ProtocolName, Warp, WarpAction, WarpMeta};

/// Per-call caching policy for warp resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarpCacheConfig {
    /// Seconds; zero reads the cache but never writes to it.
    pub ttl: u64,
}

impl WarpCacheConfig {
    pub fn new(ttl: u64) -> Self {
        Self { ttl }
    }
}

/// Builds warps, either field by field or from encoded payloads.
pub struct WarpBuilder {
    config: Arc<WarpConfig>,
    remote: Arc<dyn RemoteResolver>,
    cache: Arc<WarpCache>,
    validator: WarpValidator,
    pending: Warp,
}

impl WarpBuilder {
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
            pending: Warp {
                protocol: ProtocolName::Warp.latest_identifier(),
                ..Default::default()
            },
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.pending.name = name.into();
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.pending.title = title.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.pending.description = Some(description.into());
        self
    }

    pub fn set_preview(&mut self, preview: impl Into<String>) -> &mut Self {
        self.pending.preview = Some(preview.into());
        self
    }

    pub fn set_actions(&mut self, actions: Vec<WarpAction>) -> &mut Self {
        self.pending.actions = actions;
        self
    }

    pub fn add_action(&mut self, action: WarpAction) -> &mut Self {
        self.pending.actions.push(action);
        self
    }

    /// Validate and return the pending warp. The builder keeps its state, so
    /// it can be adjusted and built again.
    pub fn build(&self) -> Result<Warp> {
        self.validator.validate(&self.pending)?;
        Ok(self.pending.clone())
    }

    /// Decode a warp from its JSON form. Configured variables are applied to
    /// the result unless validation fails first.
    pub fn create_from_raw(&self, encoded: &str, validate: bool) -> Result<Warp> {
        let warp: Warp = serde_json::from_str(encoded)?;
        if validate {
            self.validator.validate(&warp)?;
        }
        Ok(warp.with_vars_applied(&self.config.vars))
    }

    /// Decode a warp from transaction data and stamp its provenance.
    pub fn create_from_transaction(
        &self,
        payload: &str,
        sender: &str,
        timestamp_secs: i64,
        tx_hash: &str,
        validate: bool,
    ) -> Result<Warp> {
        let mut warp = self.create_from_raw(payload, validate)?;
        warp.meta = Some(WarpMeta {
            hash: tx_hash.to_string(),
            creator: sender.to_string(),
            created_at: format_timestamp(timestamp_secs)?,
        });
        Ok(warp)
    }

    /// Resolve the warp inscribed by transaction `hash`.
    ///
    /// With a cache config, a cached warp is returned without touching the
    /// network, and a freshly fetched one is cached when `ttl > 0`.
    pub async fn create_from_transaction_hash(
        &self,
        hash: &str,
        cache_config: Option<WarpCacheConfig>,
    ) -> Result<Warp> {
        let key = CacheKey::warp(hash);
        if cache_config.is_some() {
            if let Some(warp) = self.cache.get::<Warp>(&key) {
                return Ok(warp);
            }
        }

        debug!(hash, "fetching warp transaction");
        let record =
            fetch_transaction(self.remote.as_ref(), self.config.chain_api_url(), hash).await?;
        let payload = record.payload()?;
        let warp =
            self.create_from_transaction(&payload, &record.sender, record.timestamp, hash, false)?;

        if let Some(WarpCacheConfig { ttl }) = cache_config.filter(|c| c.ttl > 0) {
            self.cache.set(key, warp.clone(), Duration::from_secs(ttl));
        }
        Ok(warp)
    }

    /// Wrap the warp's JSON form in an unsigned self-addressed transaction.
    pub fn create_inscription_transaction(&self, warp: &Warp) -> Result<UnsignedTransaction> {
        let sender = self.config.require_user_address("WarpBuilder")?;
        let data = serde_json::to_string(warp)?;
        Ok(UnsignedTransaction::inscription(sender, data, self.config.env))
    }

    pub fn description_preview(description: &str, max_chars: usize) -> String {
        to_preview_text(description, max_chars)
    }
}

pub(crate) fn format_timestamp(secs: i64) -> Result<String> {
    DateTime::from_timestamp(secs, 0)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| WarpError::decode(format!("timestamp out of range: {secs}")))
}
