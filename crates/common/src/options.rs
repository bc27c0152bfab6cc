//! Rule, tag and behaviour options passed to the scanning engine
//!
//! The serialized form is canonical: fields appear in declaration order,
//! unset fields are omitted and map/set members are ordered, so equal
//! options always produce identical bytes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a `runOnly` list names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOnlyKind {
    Rule,
    Tag,
}

/// Limit which rules are executed, by rule id or by tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOnly {
    #[serde(rename = "type")]
    pub kind: RunOnlyKind,
    pub values: Vec<String>,
}

/// Per-rule overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Finding category.
///
/// Declaration order is the canonical serialization order of `resultTypes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Inapplicable,
    Incomplete,
    Passes,
    Violations,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Inapplicable => "inapplicable",
            ResultType::Incomplete => "incomplete",
            ResultType::Passes => "passes",
            ResultType::Violations => "violations",
        }
    }

    /// Capitalized label used for report headings and section ids
    pub fn label(&self) -> &'static str {
        match self {
            ResultType::Inapplicable => "Inapplicable",
            ResultType::Incomplete => "Incomplete",
            ResultType::Passes => "Passes",
            ResultType::Violations => "Violations",
        }
    }
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResultType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inapplicable" => Ok(ResultType::Inapplicable),
            "incomplete" => Ok(ResultType::Incomplete),
            "passes" | "pass" => Ok(ResultType::Passes),
            "violations" | "violation" => Ok(ResultType::Violations),
            other => Err(crate::Error::InvalidValue(format!(
                "unknown result type '{}'",
                other
            ))),
        }
    }
}

/// Run options consumed by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_only: Option<RunOnly>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<BTreeMap<String, RuleOptions>>,

    /// Limit which result types get full node detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_types: Option<BTreeSet<ResultType>>,

    /// Return xpath selectors for elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_paths: Option<bool>,

    /// Run inside iframes. Absent means yes; only an explicit `false` disables frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframes: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_scroll: Option<bool>,

    /// How long (ms) the engine waits for embedded frames to respond
    #[serde(
        default,
        rename = "frameWaitTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_wait_time_ms: Option<u64>,
}

impl RunOptions {
    /// Whether the engine should be injected into and run inside frames
    pub fn applies_to_frames(&self) -> bool {
        self.iframes != Some(false)
    }

    /// Canonical JSON text
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::Decode(format!("run options: {}", e)))
    }
}
