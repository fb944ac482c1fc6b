//! Chain environments, protocol identifiers and small text helpers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Protocol version stamped on newly built payloads.
pub const LATEST_PROTOCOL_VERSION: &str = "0.0.2";

/// Blockchain environment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainEnv {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
}

impl ChainEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainEnv::Mainnet => "mainnet",
            ChainEnv::Testnet => "testnet",
            ChainEnv::Devnet => "devnet",
        }
    }

    /// Chain id used when stamping transactions for this environment.
    pub fn chain_id(&self) -> &'static str {
        match self {
            ChainEnv::Mainnet => "1",
            ChainEnv::Testnet => "T",
            ChainEnv::Devnet => "D",
        }
    }
}

impl fmt::Display for ChainEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown chain environment: {0}")]
pub struct UnknownChainEnv(pub String);

impl FromStr for ChainEnv {
    type Err = UnknownChainEnv;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(ChainEnv::Mainnet),
            "testnet" => Ok(ChainEnv::Testnet),
            "devnet" => Ok(ChainEnv::Devnet),
            _ => Err(UnknownChainEnv(s.to_string())),
        }
    }
}

/// Payload families published through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolName {
    Warp,
    Brand,
    Abi,
}

impl ProtocolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolName::Warp => "warp",
            ProtocolName::Brand => "brand",
            ProtocolName::Abi => "abi",
        }
    }

    /// Latest versioned identifier, e.g. `warp-0.0.2`.
    pub fn latest_identifier(&self) -> String {
        format!("{}-{}", self.as_str(), LATEST_PROTOCOL_VERSION)
    }
}

/// Shorten `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn to_preview_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut preview: String = text.chars().take(keep).collect();
    preview.push_str("...");
    preview
}
