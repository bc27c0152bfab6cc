//! Plain-text violation digest and JSON persistence of results

use std::path::Path;
use tracing::info;

use axescan_common::{Check, Finding, Result, ScanResult};

/// Readable digest of violations, with remediation guidance per node
pub fn violations_report(violations: &[Finding]) -> String {
    if violations.is_empty() {
        return "No accessibility violations found\n".to_string();
    }

    let mut out = format!("Found {} accessibility violations:\n", violations.len());

    for (index, finding) in violations.iter().enumerate() {
        out.push_str(&format!("{}) {}: {}\n", index + 1, finding.id, finding.help));
        if let Some(impact) = finding.impact {
            out.push_str(&format!("  Impact: {}\n", impact));
        }
        if !finding.help_url.is_empty() {
            out.push_str(&format!("  More info: {}\n", finding.help_url));
        }

        for node in &finding.nodes {
            let targets: Vec<String> = node.target.iter().map(|t| t.to_string()).collect();
            out.push_str(&format!("  Target: {}\n", targets.join(" ")));
            out.push_str(&format!("    {}\n", node.html));

            let must_fix: Vec<&Check> = node.all.iter().chain(node.none.iter()).collect();
            append_fixes(&mut out, "Fix all of the following:", &must_fix);

            let any: Vec<&Check> = node.any.iter().collect();
            append_fixes(&mut out, "Fix any of the following:", &any);
        }
    }

    out
}

fn append_fixes(out: &mut String, heading: &str, checks: &[&Check]) {
    if checks.is_empty() {
        return;
    }

    out.push_str(&format!("    {}\n", heading));
    for check in checks {
        out.push_str(&format!("      - {}\n", check.message));
    }
}

/// Persist a result as pretty-printed JSON
pub fn write_results(path: impl AsRef<Path>, result: &ScanResult) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, result.to_json_pretty()?)?;
    info!("Wrote scan results to {}", path.display());
    Ok(())
}
