//! Template System - Registry and Template-Level Validation

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::validation::{ValidationResult, Validator};

pub type TemplateName = String;

/// Entry document every template directory must carry.
pub const ENTRY_DOCUMENT: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: TemplateName,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Could not read template manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Listing row for one registered template
#[derive(Debug, Clone, Serialize)]
pub struct TemplateStatus {
    pub name: TemplateName,
    pub description: String,
    pub exists: bool,
    pub file_count: usize,
}

/// Template registry - known template names and where they live on disk
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    root: PathBuf,
    entries: Vec<TemplateEntry>,
}

impl TemplateRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), entries: Vec::new() }
    }

    /// The stock storefront templates.
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new(root);
        registry.register(
            "minimal-store",
            "Clean minimal e-commerce store with Shopify Buy Button SDK",
        );
        registry.register(
            "dropship-starter",
            "High-conversion dropshipping store with flash sales & countdown",
        );
        registry.register(
            "landing-product",
            "Single product landing page with A/B testing",
        );
        registry
    }

    /// Load entries from a JSON manifest: `{"templates": [{"name", "description"}]}`.
    pub fn load_manifest(root: impl Into<PathBuf>, path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut registry = Self::new(root);
        for entry in manifest.templates {
            registry.register(entry.name, entry.description);
        }
        Ok(registry)
    }

    /// Add or replace an entry. Replacing keeps the original position.
    pub fn register(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let entry = TemplateEntry { name: name.into(), description: description.into() };
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&TemplateEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn list(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Directory a template name resolves to. Unregistered names resolve too.
    pub fn template_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn statuses(&self) -> Vec<TemplateStatus> {
        self.entries
            .iter()
            .map(|entry| {
                let dir = self.template_dir(&entry.name);
                let exists = dir.is_dir();
                TemplateStatus {
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    exists,
                    file_count: if exists { count_files(&dir) } else { 0 },
                }
            })
            .collect()
    }
}

/// Everything below `dir`, directories included, excluding `dir` itself.
fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .count()
}

/// Validate one template's entry document with the given validator.
pub fn validate_template_with(
    validator: &Validator,
    registry: &TemplateRegistry,
    name: &str,
) -> ValidationResult {
    let dir = registry.template_dir(name);
    if !dir.exists() {
        return ValidationResult::short_circuit(format!(
            "Template directory not found: {}",
            dir.display()
        ));
    }

    let index = dir.join(ENTRY_DOCUMENT);
    if !index.exists() {
        return ValidationResult::short_circuit(format!("Missing {} in {}/", ENTRY_DOCUMENT, name));
    }

    let result = validator.validate_file(&index);
    info!(
        template = name,
        ok = result.is_ok(),
        warnings = result.warnings.len(),
        "validated template"
    );
    result
}

pub fn validate_template(registry: &TemplateRegistry, name: &str) -> ValidationResult {
    validate_template_with(&Validator::new(), registry, name)
}

/// Per-template results, in registry order.
pub type TemplateReport = Vec<(TemplateName, ValidationResult)>;

/// Validate every registered template whose directory exists.
pub fn validate_all_with(validator: &Validator, registry: &TemplateRegistry) -> TemplateReport {
    let mut results = Vec::with_capacity(registry.list().len());
    for entry in registry.list() {
        if !registry.template_dir(&entry.name).exists() {
            warn!(template = %entry.name, "template directory missing, skipping");
            continue;
        }
        let result = validate_template_with(validator, registry, &entry.name);
        results.push((entry.name.clone(), result));
    }
    results
}

pub fn validate_all(registry: &TemplateRegistry) -> TemplateReport {
    validate_all_with(&Validator::new(), registry)
}
