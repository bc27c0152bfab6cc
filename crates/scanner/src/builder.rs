//! Scan orchestration: configure a run, inject the engine, execute it, decode the result

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use axescan_common::{Error, Result, RunConfiguration, RunContext, RunOptions, ScanResult};

use crate::config::{ScannerConfig, DEFAULT_SCRIPT_TIMEOUT_MS};
use crate::content::ScriptProvider;
use crate::driver::{ElementHandle, WebDriver};
use crate::injector::FrameInjector;

/// In-page entry point that hands context and options to the engine
pub const SCAN_SCRIPT: &str = include_str!("../resources/scan.js");

/// Fluent scan builder bound to one automation session.
///
/// ```ignore
/// let result = AxeBuilder::new(&session, provider)
///     .include(["#main"])?
///     .with_tags(["wcag2a", "wcag2aa"])?
///     .analyze()
///     .await?;
/// ```
pub struct AxeBuilder<'a> {
    driver: &'a dyn WebDriver,
    provider: Arc<dyn ScriptProvider>,
    config: RunConfiguration,
    output_path: Option<PathBuf>,
    script_timeout: Duration,
}

impl<'a> AxeBuilder<'a> {
    pub fn new(driver: &'a dyn WebDriver, provider: Arc<dyn ScriptProvider>) -> Self {
        Self {
            driver,
            provider,
            config: RunConfiguration::new(),
            output_path: None,
            script_timeout: Duration::from_millis(DEFAULT_SCRIPT_TIMEOUT_MS),
        }
    }

    /// Scan only the subtree identified by this selector path
    pub fn include<I, S>(mut self, path: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.include(path)?;
        Ok(self)
    }

    /// Leave the subtree identified by this selector path out of the scan
    pub fn exclude<I, S>(mut self, path: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude(path)?;
        Ok(self)
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.limit_to_tags(tags)?;
        Ok(self)
    }

    pub fn with_rules<I, S>(mut self, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.limit_to_rules(rules)?;
        Ok(self)
    }

    pub fn disable_rules<I, S>(mut self, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.disable_rules(rules)?;
        Ok(self)
    }

    pub fn with_options(mut self, options: RunOptions) -> Result<Self> {
        self.config.set_options(options)?;
        Ok(self)
    }

    /// Legacy free-form options text; excludes every structured option mutator
    pub fn with_raw_options(mut self, raw: impl Into<String>) -> Result<Self> {
        self.config.set_raw_options(raw)?;
        Ok(self)
    }

    /// Persist the raw engine response to `path` after each successful scan
    pub fn with_output_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("output path is empty".to_string()));
        }
        self.output_path = Some(path.to_path_buf());
        Ok(self)
    }

    pub fn with_script_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::InvalidArgument("script timeout must be positive".to_string()));
        }
        self.script_timeout = timeout;
        Ok(self)
    }

    /// Take the timeout and output path from a scanner configuration
    pub fn with_config(self, config: &ScannerConfig) -> Result<Self> {
        let builder = self.with_script_timeout(config.script_timeout())?;
        match &config.output_path {
            Some(path) => builder.with_output_file(path),
            None => Ok(builder),
        }
    }

    pub fn configuration(&self) -> &RunConfiguration {
        &self.config
    }

    /// Scan the page, scoped by any include/exclude paths
    pub async fn analyze(&self) -> Result<ScanResult> {
        let context = context_argument(self.config.context())?;
        self.run(context).await
    }

    /// Scan the subtree rooted at `element`
    pub async fn analyze_element(&self, element: &ElementHandle) -> Result<ScanResult> {
        self.run(element.to_script_arg()).await
    }

    async fn run(&self, context: Value) -> Result<ScanResult> {
        let options = self.config.serialized_options()?;
        let script = self.provider.script().await?;

        FrameInjector::new(self.driver)
            .inject(&script, self.config.applies_to_frames())
            .await?;

        info!("Running accessibility scan");
        let start = Instant::now();

        let args = vec![context, Value::String(options)];
        let response = tokio::time::timeout(
            self.script_timeout,
            self.driver.execute_async_script(SCAN_SCRIPT, args),
        )
        .await
        .map_err(|_| Error::Timeout {
            millis: as_millis_saturating(self.script_timeout),
        })??;

        let raw = match response {
            Value::String(text) => text,
            other => serde_json::to_string(&other)?,
        };

        let result = ScanResult::from_json(&raw)?;

        if let Some(path) = &self.output_path {
            tokio::fs::write(path, raw.as_bytes()).await?;
            debug!("Wrote raw scan response to {}", path.display());
        }

        if let Some(error) = &result.error {
            warn!("Engine reported an error: {}", error);
        }

        info!(
            violations = result.violations.len(),
            passes = result.passes.len(),
            incomplete = result.incomplete.len(),
            inapplicable = result.inapplicable.len(),
            elapsed_ms = as_millis_saturating(start.elapsed()),
            "Scan complete"
        );

        Ok(result)
    }
}

fn as_millis_saturating(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Context value handed to the engine for a page scan.
///
/// Nothing scoped means the whole document (`null`); a lone single-selector
/// include goes over as that bare selector; anything else as serialized JSON.
pub fn context_argument(context: &RunContext) -> Result<Value> {
    if context.is_empty() {
        return Ok(Value::Null);
    }
    if let Some(selector) = context.single_selector() {
        return Ok(Value::String(selector.to_string()));
    }
    Ok(Value::String(context.to_json()?))
}
