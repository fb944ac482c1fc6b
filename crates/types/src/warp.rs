//! The warp payload.

use crate::action::WarpAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provenance of a warp read back from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpMeta {
    pub hash: String,
    pub creator: String,
    /// ISO-8601 timestamp.
    pub created_at: String,
}

/// A named, versioned sequence of actions.
///
/// Scalar fields decode with defaults so an incomplete payload surfaces as a
/// validation failure instead of a decode failure. `description` is always
/// written, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Warp {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, String>,
    #[serde(default)]
    pub actions: Vec<WarpAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<WarpMeta>,
}

impl Warp {
    /// Returns a copy with every recorded variable that also appears in
    /// `overrides` replaced by the override value. `self` is left untouched.
    pub fn with_vars_applied(&self, overrides: &BTreeMap<String, String>) -> Warp {
        let mut warp = self.clone();
        for (key, value) in warp.vars.iter_mut() {
            if let Some(replacement) = overrides.get(key) {
                *value = replacement.clone();
            }
        }
        warp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, LinkAction};
    use serde_json::json;

    fn sample() -> Warp {
        Warp {
            protocol: "warp-0.0.2".into(),
            name: "docs".into(),
            title: "Read the docs".into(),
            actions: vec![WarpAction::new(
                "Open",
                ActionKind::Link(LinkAction {
                    url: "https://docs.example".into(),
                }),
            )],
            ..Default::default()
        }
    }

    #[test]
    fn description_is_always_serialized() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["description"], serde_json::Value::Null);
        assert!(value.get("preview").is_none());
        assert!(value.get("vars").is_none());
        assert!(value.get("meta").is_none());
    }

    #[test]
    fn incomplete_payload_still_decodes() {
        let warp: Warp = serde_json::from_value(json!({"title": "t"})).unwrap();
        assert!(warp.name.is_empty());
        assert!(warp.actions.is_empty());
    }

    #[test]
    fn var_substitution_leaves_original_untouched() {
        let mut warp = sample();
        warp.vars.insert("AMOUNT".into(), "1".into());
        warp.vars.insert("RECEIVER".into(), "erd1default".into());

        let overrides = BTreeMap::from([
            ("AMOUNT".to_string(), "42".to_string()),
            ("UNUSED".to_string(), "x".to_string()),
        ]);
        let applied = warp.with_vars_applied(&overrides);

        assert_eq!(applied.vars["AMOUNT"], "42");
        assert_eq!(applied.vars["RECEIVER"], "erd1default");
        assert!(!applied.vars.contains_key("UNUSED"));
        assert_eq!(warp.vars["AMOUNT"], "1");
    }
}
