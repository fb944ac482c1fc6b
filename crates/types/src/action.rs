//! Warp actions and their inputs.
//!
//! Every action shares an envelope (`type`, `label`, `description`, `inputs`,
//! `next`); the variant-specific fields live in [`ActionKind`], tagged on the
//! wire by `type`. Variant fields decode leniently so that missing values are
//! reported by validation rather than by the decoder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Discriminant of an [`ActionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarpActionType {
    Transfer,
    Contract,
    Query,
    Collect,
    Link,
}

impl WarpActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarpActionType::Transfer => "transfer",
            WarpActionType::Contract => "contract",
            WarpActionType::Query => "query",
            WarpActionType::Collect => "collect",
            WarpActionType::Link => "link",
        }
    }
}

impl fmt::Display for WarpActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step of a warp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpAction {
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<WarpActionInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl WarpAction {
    pub fn new(label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            kind,
            label: label.into(),
            description: None,
            inputs: Vec::new(),
            next: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_input(mut self, input: WarpActionInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn action_type(&self) -> WarpActionType {
        self.kind.action_type()
    }
}

/// Variant payload of an action, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    Transfer(TransferAction),
    Contract(ContractAction),
    Query(QueryAction),
    Collect(CollectAction),
    Link(LinkAction),
}

impl ActionKind {
    pub fn action_type(&self) -> WarpActionType {
        match self {
            ActionKind::Transfer(_) => WarpActionType::Transfer,
            ActionKind::Contract(_) => WarpActionType::Contract,
            ActionKind::Query(_) => WarpActionType::Query,
            ActionKind::Collect(_) => WarpActionType::Collect,
            ActionKind::Link(_) => WarpActionType::Link,
        }
    }
}

/// Token movement attached to a transfer or contract call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transfers: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAction {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub func: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transfers: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryAction {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub func: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<String>,
}

pub const METHOD_GET: &str = "GET";
pub const METHOD_POST: &str = "POST";

/// Where a collect action submits its gathered inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectDestination {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectAction {
    #[serde(default)]
    pub destination: CollectDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkAction {
    #[serde(default)]
    pub url: String,
}

/// Lower or upper bound of an input: a literal number or a `{{VAR}}` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputBound {
    Number(serde_json::Number),
    Placeholder(String),
}

/// A value the user supplies before an action runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpActionInput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<String>,
    #[serde(rename = "type", default)]
    pub input_type: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<InputBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<InputBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

impl WarpActionInput {
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<String>,
        position: InputPosition,
        source: InputSource,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            position: position.to_string(),
            source: source.as_str().to_string(),
            ..Default::default()
        }
    }
}

/// Where an input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Field,
    Query,
}

impl InputSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputSource::Field => "field",
            InputSource::Query => "query",
        }
    }
}

impl FromStr for InputSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field" => Ok(InputSource::Field),
            "query" => Ok(InputSource::Query),
            _ => Err(()),
        }
    }
}

/// Where an input value is placed in the resulting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPosition {
    Receiver,
    Value,
    Transfer,
    /// One-based argument slot.
    Arg(u32),
}

impl fmt::Display for InputPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputPosition::Receiver => f.write_str("receiver"),
            InputPosition::Value => f.write_str("value"),
            InputPosition::Transfer => f.write_str("transfer"),
            InputPosition::Arg(index) => write!(f, "arg:{index}"),
        }
    }
}

impl FromStr for InputPosition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receiver" => return Ok(InputPosition::Receiver),
            "value" => return Ok(InputPosition::Value),
            "transfer" => return Ok(InputPosition::Transfer),
            _ => {}
        }

        let digits = s.strip_prefix("arg:").ok_or(())?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(());
        }
        digits.parse().map(InputPosition::Arg).map_err(|_| ())
    }
}
