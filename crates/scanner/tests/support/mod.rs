//! Recording `WebDriver` used by the scanner integration tests
//!
//! Models a page as a tree of iframes and tracks the session's current frame
//! path the way a real automation session does.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;

use axescan_common::{Error, Result};
use axescan_scanner::{By, ElementHandle, WebDriver};

/// One iframe and the frames nested inside it
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: String,
    pub children: Vec<Frame>,
}

pub fn frame(id: &str, children: Vec<Frame>) -> Frame {
    Frame {
        id: id.to_string(),
        children,
    }
}

/// A script execution, with the frame path it ran in (empty = top-level document)
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub path: Vec<String>,
    pub script: String,
}

#[derive(Default)]
struct State {
    current: Vec<String>,
    switches: Vec<String>,
    injections: Vec<Injection>,
    async_calls: Vec<(String, Vec<Value>)>,
}

pub struct MockDriver {
    frames: Vec<Frame>,
    response: Value,
    screenshot: Option<Vec<u8>>,
    fail_switch_into: Option<String>,
    async_delay: Option<Duration>,
    state: Mutex<State>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            response: Value::String("{}".to_string()),
            screenshot: None,
            fail_switch_into: None,
            async_delay: None,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }

    /// Value returned from the engine call
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    pub fn with_screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot = Some(png);
        self
    }

    pub fn failing_switch_into(mut self, frame_id: &str) -> Self {
        self.fail_switch_into = Some(frame_id.to_string());
        self
    }

    pub fn with_async_delay(mut self, delay: Duration) -> Self {
        self.async_delay = Some(delay);
        self
    }

    pub fn injections(&self) -> Vec<Injection> {
        self.state.lock().injections.clone()
    }

    pub fn injected_paths(&self) -> Vec<Vec<String>> {
        self.injections().into_iter().map(|i| i.path).collect()
    }

    /// Switch commands in order: `default` or `frame:<id>`
    pub fn switches(&self) -> Vec<String> {
        self.state.lock().switches.clone()
    }

    pub fn current_path(&self) -> Vec<String> {
        self.state.lock().current.clone()
    }

    pub fn async_calls(&self) -> Vec<(String, Vec<Value>)> {
        self.state.lock().async_calls.clone()
    }

    /// Arguments of the single engine call
    pub fn engine_args(&self) -> Vec<Value> {
        let calls = self.async_calls();
        assert_eq!(calls.len(), 1, "expected exactly one engine call");
        calls[0].1.clone()
    }

    fn children_at(&self, path: &[String]) -> Option<&[Frame]> {
        let mut level = self.frames.as_slice();
        for id in path {
            level = level.iter().find(|f| &f.id == id)?.children.as_slice();
        }
        Some(level)
    }
}

#[async_trait]
impl WebDriver for MockDriver {
    async fn find_elements(&self, by: &By) -> Result<Vec<ElementHandle>> {
        let current = self.current_path();
        match by {
            By::TagName(tag) if tag == "iframe" => Ok(self
                .children_at(&current)
                .unwrap_or_default()
                .iter()
                .map(|f| ElementHandle::new(f.id.clone()))
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.current.clear();
        state.switches.push("default".to_string());
        Ok(())
    }

    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<()> {
        if self.fail_switch_into.as_deref() == Some(frame.id.as_str()) {
            return Err(Error::Transport(format!("frame {} detached", frame.id)));
        }

        let mut state = self.state.lock();
        let exists = self
            .children_at(&state.current)
            .map_or(false, |children| children.iter().any(|f| f.id == frame.id));
        if !exists {
            return Err(Error::Transport(format!(
                "no frame {} under {:?}",
                frame.id, state.current
            )));
        }

        state.current.push(frame.id.clone());
        state.switches.push(format!("frame:{}", frame.id));
        Ok(())
    }

    async fn execute_script(&self, script: &str, _args: Vec<Value>) -> Result<Value> {
        let mut state = self.state.lock();
        let path = state.current.clone();
        state.injections.push(Injection {
            path,
            script: script.to_string(),
        });
        Ok(Value::Null)
    }

    async fn execute_async_script(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.state
            .lock()
            .async_calls
            .push((script.to_string(), args));

        if let Some(delay) = self.async_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.response.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.screenshot
            .clone()
            .ok_or_else(|| Error::Transport("screenshot not supported".to_string()))
    }
}
