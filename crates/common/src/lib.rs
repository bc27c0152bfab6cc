//! axescan Common Library
//!
//! Run configuration and result model shared by the scanner and the CLI:
//! - `RunContext` / `RunOptions`: what the engine scans and how, with a canonical JSON form
//! - `RunConfiguration`: validating builder over both, with the legacy raw-options mode
//! - `ScanResult` and friends: the engine's result tree, including polymorphic selector targets

pub mod config;
pub mod context;
pub mod error;
pub mod options;
pub mod results;
pub mod target;

pub use config::{RunConfiguration, EMPTY_RAW_OPTIONS};
pub use context::{RunContext, SelectorPath};
pub use error::{Error, Result};
pub use options::{ResultType, RuleOptions, RunOnly, RunOnlyKind, RunOptions};
pub use results::{
    count_findings, Check, Finding, FindingNode, Impact, RelatedNode, ScanResult, TestEngine,
    TestEnvironment,
};
pub use target::SelectorTarget;

/// axescan version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
