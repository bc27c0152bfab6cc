//! Report Command

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use axescan_common::ScanResult;
use axescan_scanner::{HtmlReport, ReportCategories};

use crate::output::{print_success, print_warning};

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Persisted scan result (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination HTML file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Categories to include, comma separated (violations,incomplete,passes,inapplicable) or "all"
    #[arg(long, default_value = "all", value_parser = parse_categories)]
    pub types: ReportCategories,

    /// PNG screenshot to embed as the page thumbnail
    #[arg(long)]
    pub screenshot: Option<PathBuf>,
}

fn parse_categories(s: &str) -> std::result::Result<ReportCategories, axescan_common::Error> {
    s.parse()
}

pub async fn execute(args: ReportArgs) -> Result<()> {
    let result = ScanResult::load(&args.input)
        .with_context(|| format!("Failed to load scan result from {}", args.input.display()))?;

    if result.has_error() {
        print_warning("Scan result carries an engine error; it will be shown in the report");
    }

    let mut report = HtmlReport::new(&result).categories(args.types);
    if let Some(path) = &args.screenshot {
        let png = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read screenshot {}", path.display()))?;
        info!("Embedding {} byte screenshot", png.len());
        report = report.screenshot(png);
    }

    report
        .write(&args.output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    print_success(&format!("Report written to {}", args.output.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axescan_common::ResultType;

    #[tokio::test]
    async fn test_report_from_persisted_result() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.json");
        let output = dir.path().join("report.html");
        std::fs::write(
            &input,
            r#"{"violations":[{"id":"label","help":"Form elements must have labels","nodes":[]}],"passes":[{"id":"html-has-lang","nodes":[]}]}"#,
        )
        .unwrap();

        execute(ReportArgs {
            input,
            output: output.clone(),
            types: ReportCategories::none().with(ResultType::Violations),
            screenshot: None,
        })
        .await
        .unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("Violations: 1"));
        assert!(!html.contains("id=\"PassesSection\""));
    }

    #[tokio::test]
    async fn test_missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(ReportArgs {
            input: dir.path().join("absent.json"),
            output: dir.path().join("report.html"),
            types: ReportCategories::all(),
            screenshot: None,
        })
        .await;
        assert!(result.is_err());
    }
}
