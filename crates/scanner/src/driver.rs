//! Browser automation seam
//!
//! The scanner never talks to a browser directly; it drives whatever session
//! implements [`WebDriver`]. Frame switching is stateful on the session, so
//! callers must not issue commands on one session concurrently.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use axescan_common::Result;

/// Key used by W3C WebDriver for element references in script arguments
pub const ELEMENT_REFERENCE_KEY: &str = "element-6066-11e4-a52f-4ce4b4a1b5a9";

/// Opaque reference to an element owned by the automation session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    pub id: String,
}

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The value to pass as a script argument so the page receives the element itself
    pub fn to_script_arg(&self) -> Value {
        let mut reference = Map::new();
        reference.insert(ELEMENT_REFERENCE_KEY.to_string(), Value::String(self.id.clone()));
        Value::Object(reference)
    }
}

/// Element lookup strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    Css(String),
    TagName(String),
}

impl By {
    pub fn css(selector: impl Into<String>) -> Self {
        By::Css(selector.into())
    }

    pub fn tag_name(name: impl Into<String>) -> Self {
        By::TagName(name.into())
    }
}

impl std::fmt::Display for By {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            By::Css(s) => write!(f, "css:{}", s),
            By::TagName(s) => write!(f, "tag:{}", s),
        }
    }
}

/// Capabilities the scanner needs from an automation session.
///
/// Implementations report failures as `Error::Transport`.
#[async_trait]
pub trait WebDriver: Send + Sync {
    /// Find elements in the current browsing context
    async fn find_elements(&self, by: &By) -> Result<Vec<ElementHandle>>;

    async fn switch_to_default_content(&self) -> Result<()>;

    /// Switch into a frame element of the current browsing context
    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<()>;

    /// Run a synchronous script in the current browsing context
    async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// Run a script that completes by invoking the callback appended as its last argument
    async fn execute_async_script(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// PNG screenshot of the top-level viewport
    async fn screenshot(&self) -> Result<Vec<u8>>;
}
