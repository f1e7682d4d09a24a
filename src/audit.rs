//! Template-quality audit
//!
//! Stricter storefront checks layered after the core rules. They only ever
//! warn, so an audited template passes or fails on the core rules alone.

use regex::Regex;
use std::sync::LazyLock;

use crate::rules::Thresholds;
use crate::validation::{DocumentRule, Outcome};

static LANG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<html[^>]+lang=""#).unwrap());

static H1_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h1[\s>]").unwrap());

static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h(\d)").unwrap());

static EMPTY_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a\s+href="""#).unwrap());

static BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<body.*?>(.*)</body>").unwrap());

static STYLESHEET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link[^>]+rel="stylesheet""#).unwrap());

static BUTTON_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<button[^>]*>").unwrap());

static BUTTON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<button[^>]*>(.*?)</button>").unwrap());

static INPUT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<input[^>]*>").unwrap());

const BREAKPOINTS: &[&str] = &["md:", "lg:", "sm:", "xl:", "@media"];

const CALLS_TO_ACTION: &[&str] = &[
    "buy now",
    "shop now",
    "add to cart",
    "get started",
    "subscribe",
    "quick add",
    "grab deal",
];

/// Audit rules, in reporting order.
pub fn audit_rules() -> Vec<Box<dyn DocumentRule>> {
    vec![
        Box::new(LangAttributeRule),
        Box::new(SingleH1Rule),
        Box::new(HeadingHierarchyRule),
        Box::new(EmptyLinkRule),
        Box::new(RenderBlockingCssRule),
        Box::new(NavigationLandmarkRule),
        Box::new(ButtonLabelRule),
        Box::new(InputLabelRule),
        Box::new(ResponsiveRule),
        Box::new(LayoutRule),
        Box::new(CallToActionRule),
    ]
}

fn verdict(ok: bool, pass: impl Into<String>, warn: impl Into<String>) -> Option<Outcome> {
    if ok {
        Some(Outcome::Pass(pass.into()))
    } else {
        Some(Outcome::Warn(warn.into()))
    }
}

fn preview(tag: &str) -> String {
    tag.chars().take(80).collect()
}

pub struct LangAttributeRule;

impl DocumentRule for LangAttributeRule {
    fn name(&self) -> &'static str { "lang_attribute" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        verdict(
            LANG_REGEX.is_match(html),
            "Has lang attribute on <html>",
            "Missing lang attribute on <html>",
        )
    }
}

pub struct SingleH1Rule;

impl DocumentRule for SingleH1Rule {
    fn name(&self) -> &'static str { "single_h1" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let count = H1_REGEX.find_iter(html).count();
        match count {
            1 => Some(Outcome::Pass("Has exactly one h1 heading".into())),
            0 => Some(Outcome::Warn("Missing h1 heading".into())),
            n => Some(Outcome::Warn(format!("Should have exactly 1 h1, found {}", n))),
        }
    }
}

pub struct HeadingHierarchyRule;

impl DocumentRule for HeadingHierarchyRule {
    fn name(&self) -> &'static str { "heading_hierarchy" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let levels: Vec<u32> = HEADING_REGEX
            .captures_iter(html)
            .filter_map(|c| c[1].parse().ok())
            .collect();

        let jump = levels
            .windows(2)
            .find(|pair| pair[1] > pair[0] + 1);

        match jump {
            Some(pair) => Some(Outcome::Warn(format!(
                "Heading jump from h{} to h{}",
                pair[0], pair[1]
            ))),
            None => Some(Outcome::Pass("Heading hierarchy is sequential".into())),
        }
    }
}

pub struct EmptyLinkRule;

impl DocumentRule for EmptyLinkRule {
    fn name(&self) -> &'static str { "empty_links" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let count = EMPTY_LINK_REGEX.find_iter(html).count();
        verdict(
            count == 0,
            "No empty href links",
            format!("Found {} empty href links", count),
        )
    }
}

pub struct RenderBlockingCssRule;

impl DocumentRule for RenderBlockingCssRule {
    fn name(&self) -> &'static str { "render_blocking_css" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let in_body = BODY_REGEX
            .captures(html)
            .map(|c| STYLESHEET_REGEX.find_iter(c.get(1).map_or("", |m| m.as_str())).count())
            .unwrap_or(0);

        verdict(
            in_body == 0,
            "No render-blocking CSS in body",
            format!("Found {} render-blocking stylesheets in body", in_body),
        )
    }
}

pub struct NavigationLandmarkRule;

impl DocumentRule for NavigationLandmarkRule {
    fn name(&self) -> &'static str { "navigation_landmark" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let has_nav = html.contains("<nav");
        let has_skip = html.to_lowercase().contains("skip");
        verdict(
            has_nav || has_skip,
            "Has navigation landmark or skip link",
            "Missing navigation landmark or skip link",
        )
    }
}

pub struct ButtonLabelRule;

impl DocumentRule for ButtonLabelRule {
    fn name(&self) -> &'static str { "button_labels" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let tags = BUTTON_TAG_REGEX.find_iter(html).map(|m| m.as_str());
        let contents = BUTTON_REGEX
            .captures_iter(html)
            .map(|c| c.get(1).map_or("", |m| m.as_str()));

        let unlabeled: Vec<usize> = tags
            .zip(contents)
            .enumerate()
            .filter(|(_, (tag, content))| {
                !tag.contains("aria-label") && content.trim().is_empty()
            })
            .map(|(i, _)| i + 1)
            .collect();

        match unlabeled.first() {
            Some(first) => Some(Outcome::Warn(format!(
                "{} buttons have no accessible label (first: button {})",
                unlabeled.len(),
                first
            ))),
            None => Some(Outcome::Pass("Buttons have text or labels".into())),
        }
    }
}

pub struct InputLabelRule;

impl DocumentRule for InputLabelRule {
    fn name(&self) -> &'static str { "input_labels" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let unlabeled = INPUT_REGEX
            .find_iter(html)
            .map(|m| m.as_str())
            .filter(|input| {
                !input.contains(r#"type="hidden""#) && !input.contains(r#"type="submit""#)
            })
            .find(|input| {
                !(input.contains("aria-label")
                    || input.contains("placeholder")
                    || input.contains("id="))
            });

        match unlabeled {
            Some(input) => Some(Outcome::Warn(format!(
                "Input missing accessible label: {}",
                preview(input)
            ))),
            None => Some(Outcome::Pass("Form inputs are labeled".into())),
        }
    }
}

pub struct ResponsiveRule;

impl DocumentRule for ResponsiveRule {
    fn name(&self) -> &'static str { "responsive" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        verdict(
            BREAKPOINTS.iter().any(|bp| html.contains(bp)),
            "Uses responsive breakpoints",
            "No responsive breakpoint classes found",
        )
    }
}

pub struct LayoutRule;

impl DocumentRule for LayoutRule {
    fn name(&self) -> &'static str { "layout" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        verdict(
            html.contains("grid") || html.contains("flex"),
            "Uses grid or flex layout",
            "No grid/flex layout found",
        )
    }
}

pub struct CallToActionRule;

impl DocumentRule for CallToActionRule {
    fn name(&self) -> &'static str { "call_to_action" }

    fn check(&self, html: &str, _limits: &Thresholds) -> Option<Outcome> {
        let lower = html.to_lowercase();
        verdict(
            CALLS_TO_ACTION.iter().any(|cta| lower.contains(cta)),
            "Has a call to action",
            "No call to action found",
        )
    }
}
