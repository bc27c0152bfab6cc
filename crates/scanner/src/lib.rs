//! axescan Scanner
//!
//! Drives an accessibility engine inside a browser session and turns its
//! output into reports:
//! - Injects the engine script into the page and every nested frame
//! - Runs it with a validated scope and option set
//! - Decodes the response, optionally persisting it verbatim
//! - Renders an HTML report or a plain-text digest
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      AxeBuilder                             │
//! │    ├── include / exclude / with_tags / with_rules ...       │
//! │    ├── analyze() / analyze_element(handle) -> ScanResult    │
//! │    │     ├── ScriptProvider::script()                       │
//! │    │     ├── FrameInjector::inject(script, frames?)         │
//! │    │     └── WebDriver::execute_async_script(scan.js)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScriptProvider                                             │
//! │    ├── Embedded (compiled in)                               │
//! │    ├── File (local path)                                    │
//! │    └── External (URL, via shared ContentCache)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HtmlReport / summary                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod builder;
pub mod config;
pub mod content;
pub mod driver;
pub mod injector;
pub mod report;
pub mod summary;

pub use builder::{context_argument, AxeBuilder, SCAN_SCRIPT};
pub use config::ScannerConfig;
pub use content::{
    CachedContentDownloader, ContentCache, ContentDownloader, EmbeddedScriptProvider,
    ExternalScriptProvider, FileScriptProvider, HttpContentDownloader, ScriptProvider,
};
pub use driver::{By, ElementHandle, WebDriver, ELEMENT_REFERENCE_KEY};
pub use injector::FrameInjector;
pub use report::{create_html_report, escape_html, HtmlReport, ReportCategories};
pub use summary::{violations_report, write_results};
