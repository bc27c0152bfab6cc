//! Summary Command

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use axescan_common::{ResultType, ScanResult};
use axescan_scanner::report::SECTION_ORDER;
use axescan_scanner::violations_report;

use crate::output::{print_error, print_list, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Persisted scan result (JSON)
    #[arg(short, long)]
    pub input: PathBuf,
}

/// One row of the category counts table
#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub findings: usize,
    pub count: usize,
}

impl TableDisplay for CategoryCount {
    fn headers() -> Vec<&'static str> {
        vec!["Category", "Findings", "Count"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.findings.to_string(),
            self.count.to_string(),
        ]
    }
}

pub fn category_counts(result: &ScanResult) -> Vec<CategoryCount> {
    SECTION_ORDER
        .iter()
        .map(|kind| CategoryCount {
            category: kind.label().to_string(),
            findings: result.findings(*kind).len(),
            count: result.count(*kind),
        })
        .collect()
}

/// Print counts and the violation digest. Returns whether any violation was found.
pub async fn execute(args: SummaryArgs, format: OutputFormat) -> Result<bool> {
    let result = ScanResult::load(&args.input)
        .with_context(|| format!("Failed to load scan result from {}", args.input.display()))?;

    if let Some(url) = &result.url {
        println!("Scanned: {}", url);
    }
    print_list(&category_counts(&result), format);

    if let Some(error) = result.error.as_deref().filter(|e| !e.is_empty()) {
        print_error(&format!("Engine reported an error: {}", error));
    }

    print!("{}", violations_report(&result.violations));

    Ok(!result.findings(ResultType::Violations).is_empty())
}
