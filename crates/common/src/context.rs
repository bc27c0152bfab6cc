//! Include/exclude scoping for a scan

use serde::{Deserialize, Serialize};

/// An ordered chain of CSS selectors; each entry after the first is resolved
/// inside the frame or shadow root addressed by the one before it.
pub type SelectorPath = Vec<String>;

/// Include/exclude selector paths. Both lists empty means the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<SelectorPath>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<SelectorPath>,
}

impl RunContext {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// The single selector when the context is exactly one one-segment include path
    pub fn single_selector(&self) -> Option<&str> {
        match (self.include.as_slice(), self.exclude.is_empty()) {
            ([path], true) if path.len() == 1 => Some(path[0].as_str()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::Decode(format!("run context: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_include_and_exclude() {
        let context = RunContext {
            include: vec![vec!["#if1".into(), "#idiv1".into()]],
            exclude: vec![vec!["#ef1".into(), "#ediv1".into()]],
        };

        let json = context.to_json().unwrap();
        assert_eq!(
            json,
            r##"{"include":[["#if1","#idiv1"]],"exclude":[["#ef1","#ediv1"]]}"##
        );
        assert_eq!(RunContext::from_json(&json).unwrap(), context);
    }

    #[test]
    fn test_empty_lists_are_omitted() {
        assert_eq!(RunContext::default().to_json().unwrap(), "{}");

        let context = RunContext {
            include: vec![vec!["#div1".into()]],
            exclude: vec![],
        };
        assert_eq!(context.to_json().unwrap(), r##"{"include":[["#div1"]]}"##);
    }

    #[test]
    fn test_single_selector() {
        let mut context = RunContext {
            include: vec![vec!["#div1".into()]],
            exclude: vec![],
        };
        assert_eq!(context.single_selector(), Some("#div1"));

        context.include[0].push("#inner".into());
        assert_eq!(context.single_selector(), None);

        context.include = vec![vec!["#div1".into()]];
        context.exclude.push(vec!["#div2".into()]);
        assert_eq!(context.single_selector(), None);
    }
}
