//! Canonical warp URLs: building them, finding identifiers in them, and
//! resolving what they point at.

use crate::builder::{WarpBuilder, WarpCacheConfig};
use crate::cache::WarpCache;
use crate::client::RemoteResolver;
use crate::config::{WarpConfig, DEFAULTS};
use crate::error::{Result, WarpError};
use crate::registry::WarpRegistry;
use futures::future::join_all;
use once_cell::sync::Lazy;
use qrcode::render::svg;
use qrcode::QrCode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;
use warps_types::{Brand, Identifier, RegistryInfo, Warp, WarpIdType};

/// Query parameter carrying the identifier in query-style links.
pub const IDENTIFIER_PARAM: &str = "warp";
pub const DEFAULT_QR_SIZE: u32 = 256;

const HTTP_SCHEMES: [&str; 2] = ["http://", "https://"];

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("url pattern compiles"));

/// Outcome of [`WarpLink::detect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    #[serde(rename = "match")]
    pub matched: bool,
    pub url: String,
    pub warp: Option<Warp>,
    pub registry_info: Option<RegistryInfo>,
    pub brand: Option<Brand>,
}

impl DetectionResult {
    fn no_match(url: &str) -> Self {
        Self {
            matched: false,
            url: url.to_string(),
            warp: None,
            registry_info: None,
            brand: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpHtmlResult {
    pub url: String,
    pub warp: Warp,
}

/// Outcome of [`WarpLink::detect_from_html`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionResultFromHtml {
    #[serde(rename = "match")]
    pub matched: bool,
    pub results: Vec<WarpHtmlResult>,
}

pub struct WarpLink {
    config: Arc<WarpConfig>,
    builder: WarpBuilder,
    registry: WarpRegistry,
}

impl WarpLink {
    pub fn new(
        config: Arc<WarpConfig>,
        remote: Arc<dyn RemoteResolver>,
        cache: Arc<WarpCache>,
    ) -> Self {
        Self {
            builder: WarpBuilder::new(config.clone(), remote.clone(), cache.clone()),
            registry: WarpRegistry::new(config.clone(), remote, cache),
            config,
        }
    }

    /// Canonical URL for an identifier.
    ///
    /// Aliases are embedded bare, hashes as `hash:<id>`. Super clients take the
    /// token as a path segment, any other client as the `warp` query parameter.
    pub fn build(&self, id_type: WarpIdType, id: &str) -> String {
        let token = match id_type {
            WarpIdType::Alias => id.to_string(),
            WarpIdType::Hash => Identifier::hash(id).to_prefixed(),
        };
        let encoded = urlencoding::encode(&token);
        let client_url = self.config.client_url();

        if DEFAULTS.is_super_client(client_url) {
            format!("{client_url}/{encoded}")
        } else {
            format!("{client_url}?{IDENTIFIER_PARAM}={encoded}")
        }
    }

    pub fn is_valid(&self, url: &str) -> bool {
        has_http_scheme(url) && self.extract_identifier(url).is_some()
    }

    /// Find the identifier a warp URL points at.
    ///
    /// On super-client hosts the last path segment is tried first; the `warp`
    /// query parameter is the fallback everywhere.
    pub fn extract_identifier(&self, url: &str) -> Option<Identifier> {
        let parsed = Url::parse(url).ok()?;

        let from_path = DEFAULTS
            .is_super_client(&parsed.origin().ascii_serialization())
            .then(|| parsed.path_segments())
            .flatten()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .and_then(|segment| urlencoding::decode(segment).ok())
            .and_then(|token| Identifier::classify(&token));

        from_path.or_else(|| {
            parsed
                .query_pairs()
                .find(|(name, _)| name == IDENTIFIER_PARAM)
                .and_then(|(_, token)| Identifier::classify(&token))
        })
    }

    /// Resolve a URL or bare identifier to its warp and registry metadata.
    ///
    /// A failed warp fetch is an error. For hashes the registry lookup is best
    /// effort; for aliases a missing registry entry is simply no match.
    pub async fn detect(&self, url_or_token: &str) -> Result<DetectionResult> {
        let identifier = if has_http_scheme(url_or_token) {
            self.extract_identifier(url_or_token)
        } else {
            Identifier::classify(url_or_token)
        };
        let Some(identifier) = identifier else {
            return Ok(DetectionResult::no_match(url_or_token));
        };
        debug!(%identifier, "detected warp identifier");

        let cache_config = Some(WarpCacheConfig::new(self.config.cache_ttl));
        let (warp, registry_info, brand) = match identifier.kind {
            WarpIdType::Hash => {
                let warp = self
                    .builder
                    .create_from_transaction_hash(&identifier.value, cache_config)
                    .await?;
                let (info, brand) = match self.registry.resolve_by_hash(&identifier.value).await {
                    Ok(result) => (result.registry_info, result.brand),
                    Err(err) => {
                        warn!(hash = %identifier.value, error = %err, "registry lookup failed");
                        (None, None)
                    }
                };
                (warp, info, brand)
            }
            WarpIdType::Alias => {
                let result = self.registry.resolve_by_alias(&identifier.value).await?;
                let Some(info) = result.registry_info else {
                    return Ok(DetectionResult::no_match(url_or_token));
                };
                let warp = self
                    .builder
                    .create_from_transaction_hash(&info.hash, cache_config)
                    .await?;
                (warp, Some(info), result.brand)
            }
        };

        Ok(DetectionResult {
            matched: true,
            url: url_or_token.to_string(),
            warp: Some(warp),
            registry_info,
            brand,
        })
    }

    /// Detect every warp link embedded in `content`, in first-seen order.
    /// Links that fail to resolve are skipped.
    pub async fn detect_from_html(&self, content: &str) -> DetectionResultFromHtml {
        if content.is_empty() {
            return DetectionResultFromHtml::default();
        }

        let links: Vec<&str> = URL_PATTERN
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(|link| self.is_valid(link))
            .collect();

        let detections = join_all(links.iter().map(|link| self.detect(link))).await;

        let results: Vec<WarpHtmlResult> = links
            .iter()
            .zip(detections)
            .filter_map(|(link, detection)| match detection {
                Ok(DetectionResult {
                    matched: true,
                    url,
                    warp: Some(warp),
                    ..
                }) => Some(WarpHtmlResult { url, warp }),
                Ok(_) => None,
                Err(err) => {
                    warn!(url = %link, error = %err, "skipping unresolvable warp link");
                    None
                }
            })
            .collect();

        DetectionResultFromHtml {
            matched: !results.is_empty(),
            results,
        }
    }

    /// QR code of the canonical URL as an SVG document. `size` 0 means 256px.
    pub fn generate_qr_code(&self, id_type: WarpIdType, id: &str, size: u32) -> Result<String> {
        let size = if size == 0 { DEFAULT_QR_SIZE } else { size };
        let url = self.build(id_type, id);
        let code = QrCode::new(url.as_bytes())
            .map_err(|err| WarpError::config(format!("cannot encode {url} as QR code: {err}")))?;
        Ok(code
            .render::<svg::Color<'_>>()
            .min_dimensions(size, size)
            .build())
    }
}

fn has_http_scheme(input: &str) -> bool {
    HTTP_SCHEMES.iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpRemoteResolver;

    fn link(client_url: &str) -> WarpLink {
        let config = WarpConfig::mainnet().with_client_url(client_url);
        WarpLink::new(
            Arc::new(config),
            Arc::new(HttpRemoteResolver::with_http_client(reqwest::Client::new())),
            Arc::new(WarpCache::new()),
        )
    }

    #[test]
    fn super_clients_get_path_style_links() {
        let link = link("https://usewarp.to/to");
        assert_eq!(
            link.build(WarpIdType::Hash, "abc"),
            "https://usewarp.to/to/hash%3Aabc"
        );
        assert_eq!(
            link.build(WarpIdType::Alias, "my-warp"),
            "https://usewarp.to/to/my-warp"
        );
    }

    #[test]
    fn other_clients_get_query_style_links() {
        let link = link("https://other.example");
        assert_eq!(
            link.build(WarpIdType::Hash, "abc"),
            "https://other.example?warp=hash%3Aabc"
        );
    }

    #[test]
    fn extracts_prefixed_alias_from_path() {
        let link = link("https://usewarp.to/to");
        assert_eq!(
            link.extract_identifier("https://usewarp.to/to/alias%3Amy-warp"),
            Some(Identifier::alias("my-warp"))
        );
    }

    #[test]
    fn extracts_from_query_parameter() {
        let link = link("https://other.example");
        assert_eq!(
            link.extract_identifier("https://other.example?warp=hash%3Aabc"),
            Some(Identifier::hash("abc"))
        );
        assert_eq!(
            link.extract_identifier("https://usewarp.to/to?warp=my-warp"),
            Some(Identifier::alias("my-warp"))
        );
        assert_eq!(link.extract_identifier("https://other.example/my-warp"), None);
    }

    #[test]
    fn built_links_extract_back() {
        let hash = "5d765be5cf1d1ce3b5ff2dd1d6fbf17bd5b4ed3a1b1b6c6cd7a1b2e3f4a5b6c7";
        for client in ["https://usewarp.to/to", "https://other.example"] {
            let link = link(client);
            let url = link.build(WarpIdType::Hash, hash);
            assert_eq!(link.extract_identifier(&url), Some(Identifier::hash(hash)));
        }
    }

    #[test]
    fn validity_requires_http_and_identifier() {
        let link = link("https://usewarp.to/to");
        assert!(link.is_valid("https://usewarp.to/to/hash%3Aabc"));
        assert!(!link.is_valid("ftp://usewarp.to/to/hash%3Aabc"));
        assert!(!link.is_valid("https://example.com/page"));
        assert!(!link.is_valid("not a url"));
    }

    #[test]
    fn only_http_schemes_count_as_urls() {
        assert!(has_http_scheme("https://usewarp.to/to/x"));
        assert!(has_http_scheme("HTTP://usewarp.to/to/x"));
        assert!(!has_http_scheme("httpbin"));
        assert!(!has_http_scheme("https"));
        assert!(!has_http_scheme("http:/x"));
    }

    #[tokio::test]
    async fn bare_tokens_that_do_not_classify_are_no_match() {
        let link = link("https://usewarp.to/to");
        let result = link.detect("a b").await.unwrap();
        assert!(!result.matched);
        assert_eq!(result.url, "a b");
    }

    #[tokio::test]
    async fn empty_html_short_circuits() {
        let link = link("https://usewarp.to/to");
        let result = link.detect_from_html("").await;
        assert!(!result.matched);
        assert!(result.results.is_empty());
    }

    #[test]
    fn qr_codes_render_as_svg() {
        let link = link("https://usewarp.to/to");
        let svg = link.generate_qr_code(WarpIdType::Alias, "my-warp", 0).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("width=\""));
    }

    #[test]
    fn detection_results_use_wire_names() {
        let value = serde_json::to_value(DetectionResult::no_match("x")).unwrap();
        assert_eq!(value["match"], false);
        assert!(value.get("registryInfo").is_some());
    }
}
