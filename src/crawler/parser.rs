//! Link and anchor extraction from HTML and CSS payloads
//!
//! Parsing is a pure function of the body text: hrefs come back raw, and the
//! coordinator resolves them against the response's final URL before
//! interning. Anchor names are collected so fragment references can be
//! validated after the crawl.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#).expect("valid regex"));

static CSS_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@import\s+['"]([^'"]+)['"]"#).expect("valid regex"));

/// A link extracted from a document: the raw href plus where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub href: String,

    /// Textual location within the source, e.g. `a[href]` or `css url()`
    pub location: String,
}

/// Links and declared anchors extracted from one parseable document
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub links: Vec<ExtractedLink>,
    pub anchors: Vec<String>,
}

/// HTML elements whose attribute values are outbound links
const LINK_SELECTORS: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("link[href]", "href"),
    ("img[src]", "src"),
    ("script[src]", "src"),
    ("iframe[src]", "src"),
    ("frame[src]", "src"),
    ("source[src]", "src"),
];

/// Extracts outbound links and declared anchors from an HTML body
///
/// Every href/src comes back verbatim, including `mailto:` and fragment-only
/// values; classification happens downstream so that even unfetchable targets
/// are recorded in the crawl graph.
pub fn parse_html(html: &str) -> ParsedDocument {
    let document = Html::parse_document(html);
    let mut parsed = ParsedDocument::default();

    for (selector_str, attr) in LINK_SELECTORS {
        let selector = Selector::parse(selector_str).expect("static selector");
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                parsed.links.push(ExtractedLink {
                    href: value.to_string(),
                    location: format!("{}[{}]", element.value().name(), attr),
                });
            }
        }
    }

    // Anchor targets: any element with an id, plus the legacy <a name=...>
    let id_selector = Selector::parse("[id]").expect("static selector");
    for element in document.select(&id_selector) {
        if let Some(id) = element.value().attr("id") {
            if !id.is_empty() {
                parsed.anchors.push(id.to_string());
            }
        }
    }

    let name_selector = Selector::parse("a[name]").expect("static selector");
    for element in document.select(&name_selector) {
        if let Some(name) = element.value().attr("name") {
            if !name.is_empty() {
                parsed.anchors.push(name.to_string());
            }
        }
    }

    parsed
}

/// Extracts `url(...)` references and `@import` targets from a CSS body
///
/// CSS declares no anchors, so `anchors` is always empty here.
pub fn parse_css(css: &str) -> ParsedDocument {
    let mut parsed = ParsedDocument::default();

    for capture in CSS_URL.captures_iter(css) {
        let target = capture[1].trim();
        if target.is_empty() || target.starts_with("data:") {
            continue;
        }
        parsed.links.push(ExtractedLink {
            href: target.to_string(),
            location: "css url()".to_string(),
        });
    }

    for capture in CSS_IMPORT.captures_iter(css) {
        parsed.links.push(ExtractedLink {
            href: capture[1].to_string(),
            location: "css @import".to_string(),
        });
    }

    parsed
}

/// Dispatches on MIME subtype; returns `None` for content the parser does not
/// understand (the destination is then not a source)
pub fn parse_body(body: &str, primary_type: &str, sub_type: &str) -> Option<ParsedDocument> {
    match (primary_type, sub_type) {
        ("text", "html") => Some(parse_html(body)),
        ("text", "css") => Some(parse_css(body)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(parsed: &ParsedDocument) -> Vec<&str> {
        parsed.links.iter().map(|l| l.href.as_str()).collect()
    }

    #[test]
    fn test_extract_anchor_href() {
        let parsed = parse_html(r#"<a href="/page">x</a>"#);
        assert_eq!(hrefs(&parsed), vec!["/page"]);
        assert_eq!(parsed.links[0].location, "a[href]");
    }

    #[test]
    fn test_extract_img_script_frame() {
        let parsed = parse_html(
            r#"<img src="/x.png"><script src="/app.js"></script><iframe src="/embed"></iframe>"#,
        );
        let mut found = hrefs(&parsed);
        found.sort();
        assert_eq!(found, vec!["/app.js", "/embed", "/x.png"]);
    }

    #[test]
    fn test_extract_stylesheet_link() {
        let parsed = parse_html(r#"<link rel="stylesheet" href="/style.css">"#);
        assert_eq!(hrefs(&parsed), vec!["/style.css"]);
    }

    #[test]
    fn test_mailto_is_kept() {
        // Unfetchable targets still belong in the crawl graph
        let parsed = parse_html(r#"<a href="mailto:x@y.com">mail</a>"#);
        assert_eq!(hrefs(&parsed), vec!["mailto:x@y.com"]);
    }

    #[test]
    fn test_fragment_only_href_is_kept() {
        let parsed = parse_html(r##"<a href="#install">jump</a>"##);
        assert_eq!(hrefs(&parsed), vec!["#install"]);
    }

    #[test]
    fn test_empty_href_skipped() {
        let parsed = parse_html(r#"<a href="">x</a><a href="  ">y</a>"#);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_anchors_from_ids() {
        let parsed = parse_html(r#"<h2 id="install">Install</h2><div id="usage"></div>"#);
        assert_eq!(parsed.anchors, vec!["install", "usage"]);
    }

    #[test]
    fn test_anchors_from_a_name() {
        let parsed = parse_html(r#"<a name="legacy-target"></a>"#);
        assert_eq!(parsed.anchors, vec!["legacy-target"]);
    }

    #[test]
    fn test_css_url_references() {
        let parsed = parse_css(r#"body { background: url("/bg.png"); } .a { cursor: url(pointer.svg); }"#);
        assert_eq!(hrefs(&parsed), vec!["/bg.png", "pointer.svg"]);
        assert_eq!(parsed.links[0].location, "css url()");
    }

    #[test]
    fn test_css_import() {
        let parsed = parse_css(r#"@import "base.css"; @import url("theme.css");"#);
        let found = hrefs(&parsed);
        assert!(found.contains(&"base.css"));
        assert!(found.contains(&"theme.css"));
    }

    #[test]
    fn test_css_data_uri_skipped() {
        let parsed = parse_css(r#".icon { background: url(data:image/png;base64,xyz); }"#);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_css_has_no_anchors() {
        let parsed = parse_css(r#"#header { color: red; }"#);
        assert!(parsed.anchors.is_empty());
    }

    #[test]
    fn test_parse_body_dispatch() {
        assert!(parse_body("<a href='/x'>x</a>", "text", "html").is_some());
        assert!(parse_body("a { }", "text", "css").is_some());
        assert!(parse_body("{}", "application", "json").is_none());
        assert!(parse_body("hello", "text", "plain").is_none());
    }

    #[test]
    fn test_malformed_html_still_parses() {
        // scraper is error-tolerant; broken markup yields whatever it can
        let parsed = parse_html(r#"<a href="/ok"><div><span>unclosed"#);
        assert_eq!(hrefs(&parsed), vec!["/ok"]);
    }
}
