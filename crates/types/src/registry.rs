//! Registry records, brands and index search results.

use crate::warp::WarpMeta;
use serde::{Deserialize, Serialize};

/// Verification level assigned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustStatus {
    #[default]
    Unverified,
    Verified,
    Blacklisted,
}

/// Registry entry for an inscribed warp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryInfo {
    pub hash: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub trust: TrustStatus,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub created_at: i64,
    /// Hash of the brand inscription attached to this entry.
    #[serde(default)]
    pub brand: Option<String>,
    /// Hash of the warp superseding this one.
    #[serde(default)]
    pub upgrade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrandUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrandColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

/// Call to action shown alongside a branded warp.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrandCta {
    pub title: String,
    pub description: String,
    pub label: String,
    pub url: String,
}

/// Presentational metadata attachable to registry entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<BrandUrls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<BrandColors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<BrandCta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<WarpMeta>,
}

/// One hit returned by the index search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpSearchHit {
    pub hash: String,
    pub alias: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub preview: String,
    pub status: String,
    pub category: String,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WarpSearchResult {
    #[serde(default)]
    pub hits: Vec<WarpSearchHit>,
}
