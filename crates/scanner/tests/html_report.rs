//! HTML report rendering from decoded scan results

mod support;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use axescan_common::{Check, Finding, FindingNode, Impact, ResultType, ScanResult, SelectorTarget};
use axescan_scanner::{create_html_report, HtmlReport, ReportCategories};
use support::MockDriver;

fn node(html: &str) -> FindingNode {
    FindingNode {
        target: vec![SelectorTarget::from("#x")],
        html: html.to_string(),
        ..Default::default()
    }
}

fn finding(id: &str, nodes: Vec<FindingNode>) -> Finding {
    Finding {
        id: id.to_string(),
        help: format!("{} help", id),
        description: format!("{} description", id),
        help_url: format!("https://dequeuniversity.com/rules/axe/4.8/{}", id),
        tags: vec!["wcag2a".to_string(), "wcag111".to_string()],
        nodes,
        ..Default::default()
    }
}

fn check(impact: Impact, message: &str) -> Check {
    Check {
        id: "check".to_string(),
        impact: Some(impact),
        message: message.to_string(),
        ..Default::default()
    }
}

/// Two violations (three nodes and none) plus a pass
fn scenario() -> ScanResult {
    ScanResult {
        url: Some("http://localhost/form".to_string()),
        violations: vec![
            finding("label", vec![node("<input a>"), node("<input b>"), node("<input c>")]),
            finding("document-title", vec![]),
        ],
        passes: vec![finding("html-has-lang", vec![node("<html>")])],
        ..Default::default()
    }
}

#[test]
fn test_requested_section_counts_findings_without_nodes() {
    let result = scenario();
    let categories = ReportCategories::none().with(ResultType::Violations);

    let html = HtmlReport::new(&result).categories(categories).render();

    assert!(html.contains("id=\"ViolationsSection\""));
    assert!(html.contains("<h2 class=\"buttonInfoText\">Violations: 4</h2>"));
    assert!(!html.contains("id=\"PassesSection\""));
    assert!(!html.contains("Passes: "));
}

#[test]
fn test_sections_follow_fixed_order() {
    let mut result = scenario();
    result.incomplete = vec![finding("color-contrast", vec![node("<p>")])];
    result.inapplicable = vec![finding("audio-caption", vec![])];

    let html = HtmlReport::new(&result).render();

    let positions: Vec<usize> = ["Violations", "Incomplete", "Passes", "Inapplicable"]
        .iter()
        .map(|label| html.find(&format!("id=\"{}Section\"", label)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_empty_requested_category_is_omitted() {
    let result = scenario();
    let categories = ReportCategories::none()
        .with(ResultType::Violations)
        .with(ResultType::Incomplete);

    let html = HtmlReport::new(&result).categories(categories).render();

    assert!(html.contains("Incomplete: 0<br>"));
    assert!(!html.contains("id=\"IncompleteSection\""));
}

#[test]
fn test_context_header_and_escaping() {
    let mut result = scenario();
    result.url = Some("http://localhost/?q=<b>&x=1".to_string());
    result.violations[0].help = "Form <input> needs a label".to_string();

    let html = HtmlReport::new(&result).render();

    assert!(html.contains("Url: http://localhost/?q=&lt;b&gt;&amp;x=1<br>"));
    assert!(html.contains("1: Form &lt;input&gt; needs a label"));
    assert!(html.contains("<p class=\"wrapOne\">&lt;input a&gt;</p>"));
    assert!(!html.contains("<input a>"));
}

#[test]
fn test_engine_error_banner() {
    let result = ScanResult {
        error: Some("<script>alert(1)</script>".to_string()),
        ..Default::default()
    };

    let html = HtmlReport::new(&result).render();

    assert!(html.contains(
        "<div id=\"ErrorMessage\">&lt;script&gt;alert(1)&lt;/script&gt;</div>"
    ));
    assert!(!html.contains("id=\"ViolationsSection\""));
}

#[test]
fn test_remediation_only_for_violations() {
    let mut failing = node("<img>");
    failing.all = vec![check(Impact::Serious, "Element must have an alt")];
    failing.none = vec![check(Impact::Minor, "Element is decorative")];
    failing.any = vec![check(Impact::Critical, "Element has aria-label")];

    let result = ScanResult {
        violations: vec![finding("image-alt", vec![failing.clone()])],
        passes: vec![finding("image-redundant-alt", vec![failing])],
        ..Default::default()
    };

    let html = HtmlReport::new(&result).render();

    assert_eq!(html.matches("To solve:").count(), 1);
    let all = html.find("Fix all of the following issues:").unwrap();
    let any = html.find("Fix at least one of the following issues:").unwrap();
    assert!(all < any);
    assert!(html.contains("<li>SERIOUS: Element must have an alt</li>"));
    assert!(html.contains("<li>MINOR: Element is decorative</li>"));
    assert!(html.contains("<li>CRITICAL: Element has aria-label</li>"));
}

#[test]
fn test_multi_selector_targets_are_comma_joined() {
    let mut shadow = node("<button>");
    shadow.target = vec![SelectorTarget::Multi(vec![
        "#host".to_string(),
        "button".to_string(),
    ])];
    let result = ScanResult {
        violations: vec![finding("button-name", vec![shadow])],
        ..Default::default()
    };

    let html = HtmlReport::new(&result).render();

    assert!(html.contains("<p class=\"wrapTwo\">#host,button</p>"));
}

#[tokio::test]
async fn test_report_embeds_driver_screenshot() {
    let png = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
    let driver = MockDriver::new().with_screenshot(png.clone());
    let result = scenario();

    let html = create_html_report(&driver, &result, ReportCategories::all()).await;

    assert!(html.contains("id=\"screenshotThumbnail\""));
    assert!(html.contains(&format!("data:image/png;base64,{}", BASE64.encode(&png))));
}

#[tokio::test]
async fn test_screenshot_failure_omits_thumbnail() {
    let driver = MockDriver::new();
    let result = scenario();

    let html = create_html_report(&driver, &result, ReportCategories::all()).await;

    assert!(!html.contains("id=\"screenshotThumbnail\""));
    assert!(html.contains("id=\"ViolationsSection\""));
}

#[test]
fn test_write_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.html");
    let result = scenario();

    HtmlReport::new(&result).write(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
    assert!(written.contains("id=\"reportContext\""));
}
