//! CLI Commands

pub mod report;
pub mod summary;
