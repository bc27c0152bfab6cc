//! Scanner configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use axescan_common::{Error, Result};

use crate::content::{
    ContentCache, EmbeddedScriptProvider, ExternalScriptProvider, FileScriptProvider,
    ScriptProvider,
};

/// Default bound on one engine run, in milliseconds
pub const DEFAULT_SCRIPT_TIMEOUT_MS: u64 = 30_000;

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Upper bound on one engine run
    pub script_timeout_ms: u64,

    /// Where to persist the raw engine response, if anywhere
    pub output_path: Option<PathBuf>,

    /// Local engine script
    pub engine_path: Option<PathBuf>,

    /// Engine script download location, used when no local path is set
    pub engine_url: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            script_timeout_ms: DEFAULT_SCRIPT_TIMEOUT_MS,
            output_path: None,
            engine_path: None,
            engine_url: None,
        }
    }
}

impl ScannerConfig {
    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: ScannerConfig = toml::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded scanner config from {}", path.display());
        config.with_env_overrides()
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(ms) = lookup("AXESCAN_SCRIPT_TIMEOUT_MS") {
            self.script_timeout_ms = ms.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("AXESCAN_SCRIPT_TIMEOUT_MS is not a number: {}", ms))
            })?;
        }
        if let Some(path) = lookup("AXESCAN_OUTPUT_PATH") {
            self.output_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("AXESCAN_ENGINE_PATH") {
            self.engine_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("AXESCAN_ENGINE_URL") {
            self.engine_url = Some(url);
        }
        Ok(self)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_millis(self.script_timeout_ms)
    }

    /// Resolve the engine source: local path, then URL, then the `embedded`
    /// script compiled into the caller.
    pub fn script_provider(
        &self,
        cache: Arc<ContentCache>,
        embedded: Option<&'static str>,
    ) -> Result<Arc<dyn ScriptProvider>> {
        if let Some(path) = &self.engine_path {
            return Ok(Arc::new(FileScriptProvider::new(path)?));
        }
        if let Some(url) = &self.engine_url {
            return Ok(Arc::new(ExternalScriptProvider::cached(url, cache)?));
        }
        if let Some(script) = embedded {
            debug!("Using embedded engine script");
            return Ok(Arc::new(EmbeddedScriptProvider::new(script)));
        }
        Err(Error::InvalidConfig(
            "no engine source configured (set engine_path or engine_url)".to_string(),
        ))
    }
}
