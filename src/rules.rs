//! Core document rules
//!
//! Each rule is a textual predicate over the raw document. No DOM is built,
//! so malformed markup still yields a verdict.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::validation::{DocumentRule, Outcome};

static DOCTYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE html>").unwrap());

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"charset=["'](?i:utf-8)["']"#).unwrap());

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.+?)</title>").unwrap());

static DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+name="description"\s+content="(.+?)""#).unwrap()
});

static IMG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<img\s[^>]*>").unwrap());

static INLINE_HANDLER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\son\w+=""#).unwrap());

/// Tunable rule boundaries. Defaults are the stock heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    #[serde(default = "default_title_min")]
    pub title_min: usize,
    #[serde(default = "default_title_max")]
    pub title_max: usize,
    #[serde(default = "default_description_min")]
    pub description_min: usize,
    #[serde(default = "default_og_min")]
    pub og_min: usize,
    #[serde(default = "default_alt_ratio")]
    pub alt_ratio: f64,
    /// Lazy loading is only expected once a page has more images than this.
    #[serde(default = "default_lazy_image_trigger")]
    pub lazy_image_trigger: usize,
    #[serde(default = "default_max_size_kb")]
    pub max_size_kb: f64,
}

fn default_title_min() -> usize { 10 }
fn default_title_max() -> usize { 70 }
fn default_description_min() -> usize { 50 }
fn default_og_min() -> usize { 2 }
fn default_alt_ratio() -> f64 { 0.9 }
fn default_lazy_image_trigger() -> usize { 2 }
fn default_max_size_kb() -> f64 { 100.0 }

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_min: default_title_min(),
            title_max: default_title_max(),
            description_min: default_description_min(),
            og_min: default_og_min(),
            alt_ratio: default_alt_ratio(),
            lazy_image_trigger: default_lazy_image_trigger(),
            max_size_kb: default_max_size_kb(),
        }
    }
}

/// All `<img ...>` tags in document order.
pub(crate) fn image_tags(html: &str) -> Vec<&str> {
    IMG_REGEX.find_iter(html).map(|m| m.as_str()).collect()
}

fn has_alt(tag: &str) -> bool {
    tag.contains("alt=\"") || tag.contains("alt='")
}

/// The twelve core rules, in reporting order.
pub fn core_rules() -> Vec<Box<dyn DocumentRule>> {
    vec![
        Box::new(DoctypeRule),
        Box::new(CharsetRule),
        Box::new(ViewportRule),
        Box::new(TitleRule),
        Box::new(MetaDescriptionRule),
        Box::new(OpenGraphRule),
        Box::new(ImageAltRule),
        Box::new(LazyLoadingRule),
        Box::new(CanonicalRule),
        Box::new(AriaLabelRule),
        Box::new(InlineHandlerRule),
        Box::new(DocumentSizeRule),
    ]
}

// --- Structural rules ---

pub struct DoctypeRule;

impl DocumentRule for DoctypeRule {
    fn name(&self) -> &'static str { "doctype" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        if DOCTYPE_REGEX.is_match(html) {
            Some(Outcome::Pass("Has DOCTYPE declaration".into()))
        } else {
            Some(Outcome::Error("Missing DOCTYPE declaration".into()))
        }
    }
}

pub struct CharsetRule;

impl DocumentRule for CharsetRule {
    fn name(&self) -> &'static str { "charset" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        if CHARSET_REGEX.is_match(html) {
            Some(Outcome::Pass("Has UTF-8 charset".into()))
        } else {
            Some(Outcome::Error("Missing UTF-8 charset meta tag".into()))
        }
    }
}

pub struct ViewportRule;

impl DocumentRule for ViewportRule {
    fn name(&self) -> &'static str { "viewport" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        if html.contains("viewport") {
            Some(Outcome::Pass("Has viewport meta tag".into()))
        } else {
            Some(Outcome::Error("Missing viewport meta tag (not mobile-friendly)".into()))
        }
    }
}

pub struct TitleRule;

impl DocumentRule for TitleRule {
    fn name(&self) -> &'static str { "title" }

    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome> {
        let Some(caps) = TITLE_REGEX.captures(html) else {
            return Some(Outcome::Error("Missing <title> tag".into()));
        };

        let title = &caps[1];
        let len = title.chars().count();
        let outcome = if len < limits.title_min {
            Outcome::Warn(format!(
                "Title too short: '{}' ({} chars, recommend 30-60)",
                title, len
            ))
        } else if len > limits.title_max {
            let preview: String = title.chars().take(50).collect();
            Outcome::Warn(format!(
                "Title too long: '{}...' ({} chars, recommend 30-60)",
                preview, len
            ))
        } else {
            Outcome::Pass(format!("Has title tag ({} chars)", len))
        };
        Some(outcome)
    }
}

// --- SEO quality rules ---

pub struct MetaDescriptionRule;

impl DocumentRule for MetaDescriptionRule {
    fn name(&self) -> &'static str { "meta_description" }

    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome> {
        let Some(caps) = DESCRIPTION_REGEX.captures(html) else {
            return Some(Outcome::Warn("Missing meta description tag".into()));
        };

        let len = caps[1].chars().count();
        if len < limits.description_min {
            Some(Outcome::Warn(format!(
                "Meta description too short ({} chars, recommend 120-155)",
                len
            )))
        } else {
            Some(Outcome::Pass(format!("Has meta description ({} chars)", len)))
        }
    }
}

pub struct OpenGraphRule;

impl DocumentRule for OpenGraphRule {
    fn name(&self) -> &'static str { "open_graph" }

    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome> {
        let count = html.matches("property=\"og:").count();
        if count >= limits.og_min {
            Some(Outcome::Pass(format!("Has {} Open Graph tags", count)))
        } else {
            Some(Outcome::Warn(format!(
                "Only {} OG tags found (recommend at least og:title + og:description)",
                count
            )))
        }
    }
}

pub struct CanonicalRule;

impl DocumentRule for CanonicalRule {
    fn name(&self) -> &'static str { "canonical" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        if html.contains("rel=\"canonical\"") {
            Some(Outcome::Pass("Has canonical URL".into()))
        } else {
            Some(Outcome::Warn("Missing canonical URL".into()))
        }
    }
}

// --- Image rules ---

pub struct ImageAltRule;

impl DocumentRule for ImageAltRule {
    fn name(&self) -> &'static str { "image_alt" }

    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome> {
        let images = image_tags(html);
        if images.is_empty() {
            return Some(Outcome::Pass("No images to check".into()));
        }

        let with_alt = images.iter().filter(|tag| has_alt(tag)).count();
        let ratio = with_alt as f64 / images.len() as f64;
        if ratio >= limits.alt_ratio {
            Some(Outcome::Pass(format!("Images have alt text ({}/{})", with_alt, images.len())))
        } else {
            Some(Outcome::Warn(format!(
                "Some images missing alt text ({}/{})",
                with_alt,
                images.len()
            )))
        }
    }
}

pub struct LazyLoadingRule;

impl DocumentRule for LazyLoadingRule {
    fn name(&self) -> &'static str { "lazy_loading" }

    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome> {
        let lazy = html.matches("loading=\"lazy\"").count();
        if lazy > 0 {
            return Some(Outcome::Pass(format!("Uses lazy loading ({} images)", lazy)));
        }

        if image_tags(html).len() > limits.lazy_image_trigger {
            Some(Outcome::Warn("Consider adding loading='lazy' to below-fold images".into()))
        } else {
            None
        }
    }
}

// --- Accessibility and hygiene rules ---

pub struct AriaLabelRule;

impl DocumentRule for AriaLabelRule {
    fn name(&self) -> &'static str { "aria_labels" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let count = html.matches("aria-label").count();
        if count > 0 {
            Some(Outcome::Pass(format!("Has ARIA labels ({})", count)))
        } else {
            Some(Outcome::Warn("No ARIA labels found (accessibility concern)".into()))
        }
    }
}

pub struct InlineHandlerRule;

impl DocumentRule for InlineHandlerRule {
    fn name(&self) -> &'static str { "inline_handlers" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let count = INLINE_HANDLER_REGEX.find_iter(html).count();
        if count == 0 {
            Some(Outcome::Pass("No inline event handlers".into()))
        } else {
            Some(Outcome::Warn(format!(
                "Found {} inline event handlers (prefer addEventListener)",
                count
            )))
        }
    }
}

pub struct DocumentSizeRule;

impl DocumentRule for DocumentSizeRule {
    fn name(&self) -> &'static str { "document_size" }

    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome> {
        let size_kb = html.len() as f64 / 1024.0;
        if size_kb > limits.max_size_kb {
            Some(Outcome::Warn(format!("HTML file is large ({:.1} KB)", size_kb)))
        } else {
            Some(Outcome::Pass(format!("HTML size OK ({:.1} KB)", size_kb)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &dyn DocumentRule, html: &str) -> Option<Outcome> {
        rule.check(html, &Thresholds::default())
    }

    fn titled(len: usize) -> String {
        format!("<title>{}</title>", "t".repeat(len))
    }

    fn images(total: usize, with_alt: usize, lazy: usize) -> String {
        (0..total)
            .map(|i| {
                let alt = if i < with_alt { r#" alt="x""# } else { "" };
                let loading = if i < lazy { r#" loading="lazy""# } else { "" };
                format!(r#"<img src="{}.jpg"{}{}>"#, i, alt, loading)
            })
            .collect()
    }

    #[test]
    fn test_doctype_case_insensitive() {
        assert!(matches!(run(&DoctypeRule, "<!doctype html>"), Some(Outcome::Pass(_))));
        assert!(matches!(run(&DoctypeRule, "<!DocType HTML>"), Some(Outcome::Pass(_))));
        assert!(matches!(run(&DoctypeRule, "<html>"), Some(Outcome::Error(_))));
    }

    #[test]
    fn test_charset_quotes_and_case() {
        assert!(matches!(run(&CharsetRule, r#"<meta charset="UTF-8">"#), Some(Outcome::Pass(_))));
        assert!(matches!(run(&CharsetRule, "<meta charset='utf-8'>"), Some(Outcome::Pass(_))));
        assert!(matches!(run(&CharsetRule, r#"<meta charset="latin1">"#), Some(Outcome::Error(_))));
    }

    #[test]
    fn test_title_boundaries() {
        match run(&TitleRule, &titled(9)) {
            Some(Outcome::Warn(msg)) => assert!(msg.contains("too short")),
            other => panic!("expected short warning, got {:?}", other),
        }
        assert!(matches!(run(&TitleRule, &titled(10)), Some(Outcome::Pass(_))));
        assert!(matches!(run(&TitleRule, &titled(70)), Some(Outcome::Pass(_))));
        match run(&TitleRule, &titled(71)) {
            Some(Outcome::Warn(msg)) => assert!(msg.contains("too long")),
            other => panic!("expected long warning, got {:?}", other),
        }
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        // 10 characters, 20 bytes
        let html = format!("<title>{}</title>", "é".repeat(10));
        assert!(matches!(run(&TitleRule, &html), Some(Outcome::Pass(_))));
    }

    #[test]
    fn test_missing_title_is_error() {
        assert!(matches!(run(&TitleRule, "<head></head>"), Some(Outcome::Error(_))));
        // Empty title does not satisfy the pattern
        assert!(matches!(run(&TitleRule, "<title></title>"), Some(Outcome::Error(_))));
    }

    #[test]
    fn test_description_absent_is_warning() {
        assert!(matches!(run(&MetaDescriptionRule, "<head></head>"), Some(Outcome::Warn(_))));

        let short = r#"<meta name="description" content="Too short">"#;
        assert!(matches!(run(&MetaDescriptionRule, short), Some(Outcome::Warn(_))));

        let long = format!(r#"<meta name="description" content="{}">"#, "d".repeat(50));
        assert!(matches!(run(&MetaDescriptionRule, &long), Some(Outcome::Pass(_))));
    }

    #[test]
    fn test_open_graph_needs_two() {
        let one = r#"<meta property="og:title" content="x">"#;
        let two = r#"<meta property="og:title"><meta property="og:image">"#;
        assert!(matches!(run(&OpenGraphRule, one), Some(Outcome::Warn(_))));
        assert_eq!(
            run(&OpenGraphRule, two),
            Some(Outcome::Pass("Has 2 Open Graph tags".into()))
        );
    }

    #[test]
    fn test_alt_ratio_threshold() {
        assert!(matches!(run(&ImageAltRule, &images(10, 9, 0)), Some(Outcome::Pass(_))));
        assert!(matches!(run(&ImageAltRule, &images(10, 8, 0)), Some(Outcome::Warn(_))));
        assert_eq!(
            run(&ImageAltRule, "<p>text only</p>"),
            Some(Outcome::Pass("No images to check".into()))
        );
    }

    #[test]
    fn test_alt_accepts_single_quotes_and_multiline_tags() {
        let html = "<img\n  src='a.jpg'\n  alt='A'>";
        assert!(matches!(run(&ImageAltRule, html), Some(Outcome::Pass(_))));
    }

    #[test]
    fn test_lazy_loading_trigger() {
        assert_eq!(run(&LazyLoadingRule, &images(2, 2, 0)), None);
        assert!(matches!(run(&LazyLoadingRule, &images(3, 3, 0)), Some(Outcome::Warn(_))));
        assert!(matches!(run(&LazyLoadingRule, &images(3, 3, 1)), Some(Outcome::Pass(_))));
    }

    #[test]
    fn test_canonical_absent_warns() {
        assert_eq!(
            run(&CanonicalRule, r#"<link rel="stylesheet" href="a.css">"#),
            Some(Outcome::Warn("Missing canonical URL".into()))
        );
        assert!(matches!(
            run(&CanonicalRule, r#"<link rel="canonical" href="https://a.com">"#),
            Some(Outcome::Pass(_))
        ));
    }

    #[test]
    fn test_aria_labels_counted() {
        assert_eq!(
            run(&AriaLabelRule, "<button>Menu</button>"),
            Some(Outcome::Warn("No ARIA labels found (accessibility concern)".into()))
        );
        assert_eq!(
            run(&AriaLabelRule, r#"<nav aria-label="Main"></nav><button aria-label="Cart">"#),
            Some(Outcome::Pass("Has ARIA labels (2)".into()))
        );
    }

    #[test]
    fn test_inline_handlers_counted() {
        let html = r#"<button onclick="buy()">Buy</button><img src="a" onerror="x()">"#;
        assert_eq!(
            run(&InlineHandlerRule, html),
            Some(Outcome::Warn("Found 2 inline event handlers (prefer addEventListener)".into()))
        );
        assert!(matches!(run(&InlineHandlerRule, "<button>Buy</button>"), Some(Outcome::Pass(_))));
    }

    #[test]
    fn test_document_size_limit() {
        let at_limit = "a".repeat(100 * 1024);
        let over = "a".repeat(100 * 1024 + 1);
        assert!(matches!(run(&DocumentSizeRule, &at_limit), Some(Outcome::Pass(_))));
        assert!(matches!(run(&DocumentSizeRule, &over), Some(Outcome::Warn(_))));
    }

    #[test]
    fn test_thresholds_deserialize_with_defaults() {
        let limits: Thresholds = serde_json::from_str(r#"{"titleMax": 60}"#).unwrap();
        assert_eq!(limits.title_max, 60);
        assert_eq!(limits.title_min, 10);
        assert_eq!(limits.alt_ratio, 0.9);
    }
}
