//! Validation System - Rules and Result Aggregation
//!
//! Rules classify raw document text.
//! The validator records each verdict, in rule order, into one result.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::audit;
use crate::rules::{self, Thresholds};

/// Outcome of one validation run over one document.
///
/// Append-only while the run is in progress; each category keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub passed: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result holding a single error, used when a run cannot start.
    pub fn short_circuit(message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.record_error(message);
        result
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn record_pass(&mut self, message: impl Into<String>) {
        self.passed.push(message.into());
    }

    /// True iff no error has been recorded. Warnings never count.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass(msg) => self.record_pass(msg),
            Outcome::Warn(msg) => self.record_warning(msg),
            Outcome::Error(msg) => self.record_error(msg),
        }
    }

    /// Human-readable report: passes, then warnings, then errors, then counts.
    pub fn summary(&self) -> String {
        let total = self.passed.len() + self.warnings.len() + self.errors.len();
        let mut lines = Vec::with_capacity(total + 1);
        lines.extend(self.passed.iter().map(|p| format!("  ✅ {}", p)));
        lines.extend(self.warnings.iter().map(|w| format!("  ⚠️  {}", w)));
        lines.extend(self.errors.iter().map(|e| format!("  ❌ {}", e)));

        let status = if self.is_ok() { "PASS" } else { "FAIL" };
        lines.push(format!(
            "  Result: {} ({} passed, {} warnings, {} errors)",
            status,
            self.passed.len(),
            self.warnings.len(),
            self.errors.len()
        ));
        lines.join("\n")
    }

    /// JSON view including the derived `ok` flag.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": self.is_ok(),
            "errors": self.errors,
            "warnings": self.warnings,
            "passed": self.passed,
        })
    }
}

/// Verdict produced by a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass(String),
    Warn(String),
    Error(String),
}

/// Validation rule trait - classifies document text
///
/// Returning `None` means the rule has nothing to report for this document.
pub trait DocumentRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, html: &str, limits: &Thresholds) -> Option<Outcome>;
}

/// Validator runs an ordered rule list against one document at a time
pub struct Validator {
    rules: Vec<Box<dyn DocumentRule>>,
    limits: Thresholds,
}

impl Validator {
    /// The twelve core SEO, accessibility and performance rules.
    pub fn new() -> Self {
        Self {
            rules: rules::core_rules(),
            limits: Thresholds::default(),
        }
    }

    /// Core rules followed by the template-quality audit.
    pub fn extended() -> Self {
        let mut validator = Self::new();
        validator.rules.extend(audit::audit_rules());
        validator
    }

    pub fn with_thresholds(mut self, limits: Thresholds) -> Self {
        self.limits = limits;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, html: &str) -> ValidationResult {
        let mut result = ValidationResult::new();

        for rule in &self.rules {
            if let Some(outcome) = rule.check(html, &self.limits) {
                debug!(rule = rule.name(), ?outcome, "rule evaluated");
                result.record(outcome);
            }
        }

        result
    }

    /// Validate a file on disk. Missing or unreadable files short-circuit
    /// with a single error and no rule runs.
    pub fn validate_file(&self, path: &Path) -> ValidationResult {
        if !path.exists() {
            return ValidationResult::short_circuit(format!("File not found: {}", path.display()));
        }

        match fs::read_to_string(path) {
            Ok(html) => self.validate(&html),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read document");
                ValidationResult::short_circuit(format!("Could not read {}: {}", path.display(), e))
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// True when every result in a batch is ok. Drives the CLI exit code.
pub fn all_ok<'a>(results: impl IntoIterator<Item = &'a ValidationResult>) -> bool {
    results.into_iter().all(ValidationResult::is_ok)
}

/// JSON report for a batch of named results, keeping batch order.
pub fn json_report(results: &[(String, ValidationResult)]) -> serde_json::Value {
    let entries: Vec<_> = results
        .iter()
        .map(|(name, result)| {
            let mut entry = result.to_json();
            entry["name"] = serde_json::Value::String(name.clone());
            entry
        })
        .collect();

    serde_json::json!({
        "engineVersion": crate::ENGINE_VERSION,
        "ok": all_ok(results.iter().map(|(_, r)| r)),
        "results": entries,
    })
}

/// Run the core rules over document text with default thresholds.
pub fn validate_document(html: &str) -> ValidationResult {
    Validator::new().validate(html)
}

/// Run the core rules over a file, with the missing-file pre-check.
pub fn validate_file(path: &Path) -> ValidationResult {
    Validator::new().validate_file(path)
}
