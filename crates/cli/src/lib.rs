//! axescan CLI
//!
//! Command-line interface for turning persisted accessibility scan results
//! into HTML reports and terminal summaries.

pub mod commands;
pub mod output;
