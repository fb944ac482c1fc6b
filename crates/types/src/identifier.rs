//! Warp identifiers and the token classifier.
//!
//! A warp is addressed either by the hash of the transaction that inscribed
//! it or by an alias registered for that hash. Tokens may carry an explicit
//! `hash:` / `alias:` prefix; bare tokens are classified by shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between an identifier type and its value (`hash:<value>`).
pub const IDENTIFIER_SEPARATOR: char = ':';

static HASH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-f0-9]{64}$").expect("hash pattern compiles"));
static ALIAS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,}$").expect("alias pattern compiles"));

/// Kind of reference a warp identifier carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarpIdType {
    Hash,
    Alias,
}

impl WarpIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarpIdType::Hash => "hash",
            WarpIdType::Alias => "alias",
        }
    }

    fn prefix(&self) -> String {
        format!("{}{}", self.as_str(), IDENTIFIER_SEPARATOR)
    }
}

impl fmt::Display for WarpIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified reference to a warp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: WarpIdType,
    pub value: String,
}

impl Identifier {
    pub fn hash(value: impl Into<String>) -> Self {
        Self {
            kind: WarpIdType::Hash,
            value: value.into(),
        }
    }

    pub fn alias(value: impl Into<String>) -> Self {
        Self {
            kind: WarpIdType::Alias,
            value: value.into(),
        }
    }

    /// Classify a raw token.
    ///
    /// Explicit prefixes win and are taken as-is. Otherwise a 64 character
    /// lowercase hex string is a hash, and anything matching the alias
    /// alphabet with at least three characters is an alias.
    pub fn classify(token: &str) -> Option<Self> {
        for kind in [WarpIdType::Hash, WarpIdType::Alias] {
            if let Some(value) = token.strip_prefix(kind.prefix().as_str()) {
                return Some(Self {
                    kind,
                    value: value.to_string(),
                });
            }
        }

        if HASH_PATTERN.is_match(token) {
            return Some(Self::hash(token));
        }

        if ALIAS_PATTERN.is_match(token) {
            return Some(Self::alias(token));
        }

        None
    }

    /// The `type:value` form used inside canonical URLs.
    pub fn to_prefixed(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_prefixed())
    }
}

/// Free-function form of [`Identifier::classify`].
pub fn classify(token: &str) -> Option<Identifier> {
    Identifier::classify(token)
}
