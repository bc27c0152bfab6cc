//! Self-contained HTML report for a scan result
//!
//! Element ids `reportContext`, `ErrorMessage` and `<Category>Section` are
//! queried by downstream tooling and must stay stable.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use axescan_common::{Check, Error, Finding, FindingNode, Result, ResultType, ScanResult};

use crate::driver::WebDriver;

/// Order in which category sections are emitted
pub const SECTION_ORDER: [ResultType; 4] = [
    ResultType::Violations,
    ResultType::Incomplete,
    ResultType::Passes,
    ResultType::Inapplicable,
];

const STYLE: &str = r#"
body {font-family: sans-serif;}
.thumbnail {border: 1px solid black; margin-left: 1em; margin-right: 1em; width: auto; max-height: 150px; cursor: zoom-in;}
.thumbnail:hover {border: 2px solid black;}
.wrapOne {margin-left: 1em; overflow-wrap: anywhere;}
.wrapTwo {margin-left: 2em; overflow-wrap: anywhere;}
.emOne {margin-left: 1em; margin-right: 1em; overflow-wrap: anywhere;}
.emTwo {margin-left: 2em; overflow-wrap: anywhere;}
.emThree {margin-left: 3em; overflow-wrap: anywhere;}
#modal {display: none; position: fixed; z-index: 1; left: 0; top: 0; width: 100%; height: 100%; overflow: auto; background-color: rgba(0, 0, 0, 0.9); flex-direction: column;}
#modalclose {font-family: monospace; font-size: 35px; color: white; text-align: right; padding: 20px; cursor: pointer;}
#modalimage {margin: auto; display: block; max-width: 95%; padding: 10px; max-height: 90%;}
.htmlTable {border-top: double lightgray; width: 100%; display: table;}
.sectionbutton {background-color: #000000; color: #ffffff; cursor: pointer; padding: 18px; width: 100%; text-align: left; outline: none; transition: 0.4s; border: 1px solid black;}
.sectionbutton:hover {background-color: #828282;}
.buttonInfoText {width: 50%; float: left;}
.buttonExpandoText {text-align: right; width: 50%; float: right;}
.majorSection {padding: 0 18px; background-color: white; overflow: hidden; transition: max-height 0.2s ease-out;}
.findings {margin-top: 5px; border-top: 1px solid black;}
.active {background-color: #474747; margin-bottom: 0px;}
.resultWrapper {margin: 5px;}
#context {width: 50%;}
#image {width: 50%; height: 220px;}
#counts {width: 100%;}
#metadata {display: flex; flex-wrap: wrap;}
#results {display: flex; flex-direction: column;}
#ErrorMessage {color: #a00000; margin-left: 1em; white-space: pre-wrap;}
@media only screen and (max-width: 800px) {
  #metadata {flex-direction: column;}
  #context {width: 100%;}
  #image {width: 100%;}
}
"#;

const SCRIPT: &str = r#"
var buttons = document.getElementsByClassName("sectionbutton");
for (var i = 0; i < buttons.length; i++) {
  buttons[i].addEventListener("click", function () {
    var expando = this.getElementsByClassName("buttonExpandoText")[0];
    var content = this.nextElementSibling;
    this.classList.toggle("active");
    if (expando.innerHTML == "-") {
      content.style.maxHeight = 0;
      expando.innerHTML = "+";
    } else {
      content.style.maxHeight = content.scrollHeight + "px";
      expando.innerHTML = "-";
    }
  });
}

var thumbnail = document.getElementById("screenshotThumbnail");
var modal = document.getElementById("modal");
if (thumbnail && modal) {
  var modalImage = document.getElementById("modalimage");
  modal.addEventListener("click", function () {
    modal.style.display = "none";
    modalImage.src = "";
  });
  thumbnail.addEventListener("click", function () {
    modal.style.display = "flex";
    modalImage.src = thumbnail.src;
    modalImage.alt = thumbnail.alt;
  });
}
"#;

/// Set of result categories to put in a report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportCategories(BTreeSet<ResultType>);

impl ReportCategories {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self(SECTION_ORDER.iter().copied().collect())
    }

    pub fn with(mut self, kind: ResultType) -> Self {
        self.0.insert(kind);
        self
    }

    pub fn contains(&self, kind: ResultType) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Requested categories in section order
    pub fn iter(&self) -> impl Iterator<Item = ResultType> + '_ {
        SECTION_ORDER.iter().copied().filter(|k| self.contains(*k))
    }
}

impl FromIterator<ResultType> for ReportCategories {
    fn from_iter<T: IntoIterator<Item = ResultType>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for ReportCategories {
    type Err = Error;

    /// Parse a comma list such as `violations,passes`; `all` selects every category
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        let categories = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(ResultType::from_str)
            .collect::<Result<ReportCategories>>()?;

        if categories.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one report category is required".to_string(),
            ));
        }
        Ok(categories)
    }
}

/// Escape text for insertion into HTML content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML rendering of one scan result
pub struct HtmlReport<'r> {
    result: &'r ScanResult,
    categories: ReportCategories,
    screenshot: Option<Vec<u8>>,
}

impl<'r> HtmlReport<'r> {
    pub fn new(result: &'r ScanResult) -> Self {
        Self {
            result,
            categories: ReportCategories::all(),
            screenshot: None,
        }
    }

    pub fn categories(mut self, categories: ReportCategories) -> Self {
        self.categories = categories;
        self
    }

    /// PNG bytes shown as the page thumbnail
    pub fn screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot = Some(png);
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("<title>Accessibility Check</title>\n");
        html.push_str(&format!("<style>{}</style>\n", STYLE));
        html.push_str("</head>\n<body>\n<h1>Accessibility Check</h1>\n");

        html.push_str("<div id=\"metadata\">\n");
        self.render_context(&mut html);
        self.render_thumbnail(&mut html);
        self.render_counts(&mut html);
        html.push_str("</div>\n");

        if let Some(error) = self.result.error.as_deref().filter(|e| !e.is_empty()) {
            html.push_str("<h2>SCAN ERRORS:</h2>\n");
            html.push_str(&format!(
                "<div id=\"ErrorMessage\">{}</div>\n",
                escape_html(error)
            ));
        }

        html.push_str("<div id=\"results\">\n");
        for kind in self.categories.iter() {
            let count = self.result.count(kind);
            if count > 0 {
                render_section(&mut html, kind, self.result.findings(kind), count);
            }
        }
        html.push_str("</div>\n");

        if self.screenshot.is_some() {
            html.push_str(
                "<div id=\"modal\"><div id=\"modalclose\">X</div><img id=\"modalimage\" alt=\"\"></div>\n",
            );
        }

        html.push_str(&format!("<script>{}</script>\n", SCRIPT));
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Render and write the report as UTF-8
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render())?;
        info!("Wrote accessibility report to {}", path.display());
        Ok(())
    }

    fn render_context(&self, html: &mut String) {
        let result = self.result;
        let env = result.test_environment.clone().unwrap_or_default();
        let timestamp = result.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default();

        html.push_str("<div id=\"context\">\n<h3>Context:</h3>\n");
        html.push_str("<div class=\"emOne\" id=\"reportContext\">\n");
        html.push_str(&format!(
            "Url: {}<br>\n",
            escape_html(result.url.as_deref().unwrap_or_default())
        ));
        html.push_str(&format!(
            "Orientation: {}<br>\n",
            escape_html(env.orientation_type.as_deref().unwrap_or_default())
        ));
        html.push_str(&format!(
            "Size: {} x {}<br>\n",
            env.window_width, env.window_height
        ));
        html.push_str(&format!("Time: {}<br>\n", escape_html(&timestamp)));
        html.push_str(&format!("User agent: {}<br>\n", escape_html(&env.user_agent)));
        html.push_str(&format!(
            "Using: {} ({})\n",
            escape_html(result.test_engine_name().unwrap_or_default()),
            escape_html(result.test_engine_version().unwrap_or_default())
        ));
        html.push_str("</div>\n</div>\n");
    }

    fn render_thumbnail(&self, html: &mut String) {
        let Some(png) = &self.screenshot else {
            return;
        };

        html.push_str("<div id=\"image\">\n<h3>Image:</h3>\n");
        html.push_str(&format!(
            "<img class=\"thumbnail\" id=\"screenshotThumbnail\" alt=\"A screenshot of the page\" src=\"data:image/png;base64,{}\">\n",
            BASE64.encode(png)
        ));
        html.push_str("</div>\n");
    }

    fn render_counts(&self, html: &mut String) {
        html.push_str("<div id=\"counts\">\n<h3>Counts:</h3>\n<div class=\"emOne\">\n");
        for kind in self.categories.iter() {
            html.push_str(&format!(
                "{}: {}<br>\n",
                kind.label(),
                self.result.count(kind)
            ));
        }
        html.push_str("</div>\n</div>\n");
    }
}

fn render_section(html: &mut String, kind: ResultType, findings: &[Finding], count: usize) {
    html.push_str("<div class=\"resultWrapper\">\n");
    html.push_str(&format!(
        "<button class=\"sectionbutton active\"><h2 class=\"buttonInfoText\">{}: {}</h2><h2 class=\"buttonExpandoText\">-</h2></button>\n",
        kind.label(),
        count
    ));
    html.push_str(&format!(
        "<div class=\"majorSection\" id=\"{}Section\">\n",
        kind.label()
    ));

    for (index, finding) in findings.iter().enumerate() {
        render_finding(html, kind, index + 1, finding);
    }

    html.push_str("</div>\n</div>\n");
}

fn render_finding(html: &mut String, kind: ResultType, number: usize, finding: &Finding) {
    html.push_str(&format!(
        "<div class=\"findings\">{}: {}\n",
        number,
        escape_html(&finding.help)
    ));

    html.push_str("<div class=\"emTwo\">\n");
    html.push_str(&format!(
        "Description: {}<br>\n",
        escape_html(&finding.description)
    ));
    html.push_str(&format!("Help: {}<br>\n", escape_html(&finding.help)));
    let help_url = escape_html(&finding.help_url);
    html.push_str(&format!(
        "Help URL: <a href=\"{}\">{}</a><br>\n",
        help_url, help_url
    ));
    if let Some(impact) = finding.impact {
        html.push_str(&format!("Impact: {}<br>\n", impact));
    }
    html.push_str(&format!(
        "Tags: {}<br>\n",
        escape_html(&finding.tags.join(", "))
    ));
    if !finding.nodes.is_empty() {
        html.push_str("Element(s):\n");
    }
    html.push_str("</div>\n");

    for node in &finding.nodes {
        render_node(html, kind, node);
    }

    html.push_str("</div>\n");
}

fn render_node(html: &mut String, kind: ResultType, node: &FindingNode) {
    html.push_str("<div class=\"htmlTable\">\n<div class=\"emThree\">\n");
    html.push_str(&format!(
        "Html:\n<p class=\"wrapOne\">{}</p>\n",
        escape_html(&node.html)
    ));

    let selectors: Vec<String> = node
        .target
        .iter()
        .map(|t| escape_html(&t.to_string()))
        .collect();
    html.push_str(&format!(
        "Selector:\n<p class=\"wrapTwo\">{}</p>\n",
        selectors.join("\n")
    ));

    if kind == ResultType::Violations && node.check_count() > 0 {
        html.push_str("To solve:\n");

        let must_fix: Vec<&Check> = node.all.iter().chain(node.none.iter()).collect();
        if !must_fix.is_empty() {
            render_checks(html, "Fix all of the following issues:", &must_fix);
        }

        let any: Vec<&Check> = node.any.iter().collect();
        if !any.is_empty() {
            render_checks(html, "Fix at least one of the following issues:", &any);
        }
    }

    html.push_str("</div>\n</div>\n");
}

fn render_checks(html: &mut String, heading: &str, checks: &[&Check]) {
    html.push_str(&format!("<div class=\"wrapOne\">{}\n<ul>\n", heading));
    for check in checks {
        let message = escape_html(&check.message);
        match check.impact {
            Some(impact) => html.push_str(&format!(
                "<li>{}: {}</li>\n",
                impact.to_string().to_uppercase(),
                message
            )),
            None => html.push_str(&format!("<li>{}</li>\n", message)),
        }
    }
    html.push_str("</ul>\n</div>\n");
}

/// Render a report for `result`, decorated with a screenshot taken from `driver`.
///
/// A failed screenshot only drops the thumbnail.
pub async fn create_html_report(
    driver: &dyn WebDriver,
    result: &ScanResult,
    categories: ReportCategories,
) -> String {
    let report = HtmlReport::new(result).categories(categories);

    match driver.screenshot().await {
        Ok(png) if !png.is_empty() => report.screenshot(png).render(),
        Ok(_) => {
            warn!("Screenshot was empty, omitting thumbnail");
            report.render()
        }
        Err(e) => {
            warn!("Screenshot failed, omitting thumbnail: {}", e);
            report.render()
        }
    }
}
