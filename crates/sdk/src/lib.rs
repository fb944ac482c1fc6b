//! Client toolkit for warps: build, inscribe, resolve and link them.
//!
//! [`WarpSdk`] wires every component over one configuration, one remote
//! resolver and one shared cache. The components can also be constructed on
//! their own.

pub mod builder;
pub mod cache;
pub mod client;
pub mod config;
mod error;
pub mod link;
pub mod registry;
pub mod transaction;
pub mod validator;

pub use crate::builder::{WarpBuilder, WarpCacheConfig};
pub use crate::cache::{CacheKey, WarpCache};
pub use crate::client::{HttpRemoteResolver, RemoteResolver, TransactionRecord};
pub use crate::config::{WarpConfig, DEFAULTS};
pub use crate::error::{Result, ValidationError, WarpError};
pub use crate::link::{DetectionResult, DetectionResultFromHtml, WarpHtmlResult, WarpLink};
pub use crate::registry::{RegistryResult, WarpRegistry};
pub use crate::transaction::UnsignedTransaction;
pub use crate::validator::WarpValidator;
pub use warps_types as types;

use std::sync::Arc;

/// Entry point bundling the link engine, registry and validator.
pub struct WarpSdk {
    config: Arc<WarpConfig>,
    remote: Arc<dyn RemoteResolver>,
    cache: Arc<WarpCache>,
    link: WarpLink,
    registry: WarpRegistry,
    validator: WarpValidator,
}

impl WarpSdk {
    /// Create an SDK talking HTTP to the configured endpoints.
    pub fn new(config: WarpConfig) -> Result<Self> {
        Ok(Self::with_remote(config, Arc::new(HttpRemoteResolver::new()?)))
    }

    /// Create an SDK over a custom remote resolver.
    pub fn with_remote(config: WarpConfig, remote: Arc<dyn RemoteResolver>) -> Self {
        let config = Arc::new(config);
        let cache = Arc::new(WarpCache::new());
        Self {
            link: WarpLink::new(config.clone(), remote.clone(), cache.clone()),
            registry: WarpRegistry::new(config.clone(), remote.clone(), cache.clone()),
            validator: WarpValidator::new(),
            config,
            remote,
            cache,
        }
    }

    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// A fresh builder sharing this SDK's cache and remote resolver.
    pub fn builder(&self) -> WarpBuilder {
        WarpBuilder::new(self.config.clone(), self.remote.clone(), self.cache.clone())
    }

    pub fn link(&self) -> &WarpLink {
        &self.link
    }

    pub fn registry(&self) -> &WarpRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &WarpValidator {
        &self.validator
    }

    pub fn cache(&self) -> &WarpCache {
        &self.cache
    }

    /// Stop the cache sweeper.
    pub async fn shutdown(&self) {
        self.cache.shutdown().await;
    }
}
