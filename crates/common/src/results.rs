//! Typed model of the engine's result tree

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::options::{ResultType, RunOptions};
use crate::target::SelectorTarget;
use crate::{Error, Result};

/// Severity reported for a finding, node or check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Minor => write!(f, "minor"),
            Impact::Moderate => write!(f, "moderate"),
            Impact::Serious => write!(f, "serious"),
            Impact::Critical => write!(f, "critical"),
        }
    }
}

/// Another element involved in a check's outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedNode {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub target: Vec<SelectorTarget>,
}

/// One atomic condition evaluated against a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default)]
    pub related_nodes: Vec<RelatedNode>,
}

/// One concrete DOM occurrence of a finding.
///
/// A violation is resolved by satisfying every check in `all` and `none`,
/// or any single check in `any`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingNode {
    #[serde(default)]
    pub target: Vec<SelectorTarget>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<Vec<String>>,
    #[serde(default)]
    pub any: Vec<Check>,
    #[serde(default)]
    pub all: Vec<Check>,
    #[serde(default)]
    pub none: Vec<Check>,
}

impl FindingNode {
    pub fn check_count(&self) -> usize {
        self.any.len() + self.all.len() + self.none.len()
    }
}

/// One reported rule outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub help_url: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<FindingNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEnvironment {
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub window_width: u32,
    #[serde(default)]
    pub window_height: u32,
    #[serde(default)]
    pub orientation_angle: Option<i32>,
    #[serde(default)]
    pub orientation_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestEngine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Output of one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(default)]
    pub violations: Vec<Finding>,
    #[serde(default)]
    pub passes: Vec<Finding>,
    #[serde(default)]
    pub incomplete: Vec<Finding>,
    #[serde(default)]
    pub inapplicable: Vec<Finding>,
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub test_environment: Option<TestEnvironment>,
    #[serde(default)]
    pub test_engine: Option<TestEngine>,
    /// Failure reported by the engine itself; the scan call still succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Options the engine actually ran with, when they fit the structured form.
    ///
    /// This is only an echo; shorthand forms the engine accepts (such as a bare
    /// `runOnly` list) decode to `None` instead of failing the scan.
    #[serde(
        default,
        deserialize_with = "lenient_tool_options",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_options: Option<RunOptions>,
}

fn lenient_tool_options<'de, D>(deserializer: D) -> std::result::Result<Option<RunOptions>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(options) => Ok(Some(options)),
        Err(e) => {
            warn!("Ignoring toolOptions echo that does not fit run options: {}", e);
            Ok(None)
        }
    }
}

impl ScanResult {
    /// Decode an engine response.
    ///
    /// Accepts both the `{error, results}` envelope and the bare result tree.
    /// Missing optional fields decode to empty values; a blank error is no error.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::Decode(format!("response: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(Error::Decode("response is not a JSON object".to_string()));
        };

        let envelope_error = match object.get("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        let body = match object.remove("results") {
            Some(Value::Object(results)) => {
                debug!("Decoding enveloped engine response");
                Value::Object(results)
            }
            Some(Value::Null) | None => {
                // The bare tree carries its own `error` key; drop it so the
                // normalized value below is the only source.
                object.remove("error");
                Value::Object(object)
            }
            Some(_) => return Err(Error::Decode("results is not a JSON object".to_string())),
        };

        let mut result: ScanResult =
            serde_json::from_value(body).map_err(|e| Error::Decode(e.to_string()))?;

        result.error = envelope_error
            .or(result.error.take())
            .filter(|e| !e.trim().is_empty());

        Ok(result)
    }

    /// Read a persisted result document
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(json.trim_start_matches('\u{feff}'))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn findings(&self, kind: ResultType) -> &[Finding] {
        match kind {
            ResultType::Violations => &self.violations,
            ResultType::Passes => &self.passes,
            ResultType::Incomplete => &self.incomplete,
            ResultType::Inapplicable => &self.inapplicable,
        }
    }

    /// Report count for a category: every node counts, and a finding without nodes counts once
    pub fn count(&self, kind: ResultType) -> usize {
        count_findings(self.findings(kind))
    }

    pub fn has_error(&self) -> bool {
        self.error.as_deref().map_or(false, |e| !e.is_empty())
    }

    pub fn test_engine_name(&self) -> Option<&str> {
        self.test_engine.as_ref().map(|e| e.name.as_str())
    }

    pub fn test_engine_version(&self) -> Option<&str> {
        self.test_engine.as_ref().map(|e| e.version.as_str())
    }
}

pub fn count_findings(findings: &[Finding]) -> usize {
    findings.iter().map(|f| f.nodes.len().max(1)).sum()
}
