//! Run configuration: scoping plus engine options, built up through validating mutators
//!
//! Every mutator validates its whole argument before touching any state, so a
//! failed call leaves the configuration exactly as it was.

use std::collections::BTreeMap;
use tracing::debug;

use crate::context::RunContext;
use crate::error::{validate_values, Error, Result};
use crate::options::{RuleOptions, RunOnly, RunOnlyKind, RunOptions};

/// Placeholder accepted as "no legacy options"
pub const EMPTY_RAW_OPTIONS: &str = "{}";

const LEGACY_CONFLICT: &str =
    "structured configuration cannot combine with legacy raw options";

/// Scan scoping and engine options for one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfiguration {
    context: RunContext,
    options: RunOptions,
    /// Free-form options text, mutually exclusive with the structured setters
    raw_options: Option<String>,
    /// Set once any structured option mutator has succeeded
    structured: bool,
}

impl RunConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one include selector path
    pub fn include<I, S>(&mut self, path: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = collect(path);
        validate_values("include", &path)?;
        self.context.include.push(path);
        Ok(self)
    }

    /// Add one exclude selector path
    pub fn exclude<I, S>(&mut self, path: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = collect(path);
        validate_values("exclude", &path)?;
        self.context.exclude.push(path);
        Ok(self)
    }

    /// Run only rules carrying one of these tags. Replaces any earlier rule/tag limit.
    pub fn limit_to_tags<I, S>(&mut self, tags: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_run_only(RunOnlyKind::Tag, "tags", collect(tags))
    }

    /// Run only these rules. Replaces any earlier rule/tag limit.
    pub fn limit_to_rules<I, S>(&mut self, rules: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_run_only(RunOnlyKind::Rule, "rules", collect(rules))
    }

    /// Disable rules by id. Additive across calls and independent of `runOnly`.
    pub fn disable_rules<I, S>(&mut self, rules: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = collect(rules);
        validate_values("disabled rules", &rules)?;
        self.ensure_structured_allowed()?;

        let map = self.options.rules.get_or_insert_with(BTreeMap::new);
        for rule in rules {
            map.entry(rule).or_insert_with(RuleOptions::default).enabled = Some(false);
        }
        self.structured = true;
        Ok(self)
    }

    /// Replace the structured options wholesale
    pub fn set_options(&mut self, options: RunOptions) -> Result<&mut Self> {
        self.ensure_structured_allowed()?;
        self.options = options;
        self.structured = true;
        Ok(self)
    }

    /// Use a legacy free-form options string instead of the structured options.
    ///
    /// `"{}"` is the empty placeholder and always accepted.
    pub fn set_raw_options(&mut self, raw: impl Into<String>) -> Result<&mut Self> {
        let raw = raw.into();
        if raw == EMPTY_RAW_OPTIONS {
            self.raw_options = None;
            return Ok(self);
        }

        if self.structured {
            return Err(Error::InvalidOperation(LEGACY_CONFLICT.to_string()));
        }

        debug!("Using legacy raw options");
        self.raw_options = Some(raw);
        Ok(self)
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn raw_options(&self) -> Option<&str> {
        self.raw_options.as_deref()
    }

    pub fn uses_legacy_options(&self) -> bool {
        self.raw_options.is_some()
    }

    /// Options text handed to the engine: the legacy string when active, else canonical JSON
    pub fn serialized_options(&self) -> Result<String> {
        match &self.raw_options {
            Some(raw) => Ok(raw.clone()),
            None => self.options.to_json(),
        }
    }

    /// Whether the engine should be injected into frames.
    ///
    /// Legacy options are opaque text, so they never switch frame injection off.
    pub fn applies_to_frames(&self) -> bool {
        self.raw_options.is_some() || self.options.applies_to_frames()
    }

    fn set_run_only(
        &mut self,
        kind: RunOnlyKind,
        name: &str,
        values: Vec<String>,
    ) -> Result<&mut Self> {
        validate_values(name, &values)?;
        self.ensure_structured_allowed()?;

        self.options.run_only = Some(RunOnly { kind, values });
        self.structured = true;
        Ok(self)
    }

    fn ensure_structured_allowed(&self) -> Result<()> {
        if self.raw_options.is_some() {
            return Err(Error::InvalidOperation(LEGACY_CONFLICT.to_string()));
        }
        Ok(())
    }
}

fn collect<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
