//! Template Generator - Customized Storefront Copies
//!
//! Copies a registered template, stamps the store identity into its HTML
//! and records the choices in `config.json`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::templates::{TemplateRegistry, ENTRY_DOCUMENT};

pub const CONFIG_FILE: &str = "config.json";

/// Placeholders in stock templates replaced by the store name.
const NAME_PLACEHOLDERS: &[&str] = &["BRAND", "Your Store", "Your Brand"];

const DOMAIN_PLACEHOLDER: &str = "yourstore.com";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Template '{name}' not found. Available: {}", .available.join(", "))]
    TemplateNotFound { name: String, available: Vec<String> },

    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),

    #[error("Invalid {field}: {reason}")]
    InvalidOption { field: &'static str, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not walk template tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> GenerateError + '_ {
    move |source| GenerateError::Io { path: path.to_path_buf(), source }
}

/// Store identity applied to a generated template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOptions {
    pub store_name: String,
    pub primary_color: String,
    pub currency: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            store_name: "My Store".to_string(),
            primary_color: "#0ea5e9".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl StoreOptions {
    /// Build validated options. Color must be `#rgb` or `#rrggbb`,
    /// currency a three-letter code.
    pub fn new(
        store_name: impl Into<String>,
        primary_color: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self, GenerateError> {
        let store_name = store_name.into();
        let primary_color = primary_color.into();
        let currency = currency.into();

        if store_name.trim().is_empty() {
            return Err(GenerateError::InvalidOption {
                field: "store name",
                reason: "must not be empty".into(),
            });
        }

        let hex = primary_color.strip_prefix('#').unwrap_or("");
        if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GenerateError::InvalidOption {
                field: "primary color",
                reason: format!("'{}' is not a #rgb or #rrggbb hex color", primary_color),
            });
        }

        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GenerateError::InvalidOption {
                field: "currency",
                reason: format!("'{}' is not a three-letter currency code", currency),
            });
        }

        Ok(Self { store_name, primary_color, currency })
    }

    /// `Acme Shop` becomes `acmeshop.com`.
    pub fn domain(&self) -> String {
        format!("{}.com", self.store_name.to_lowercase().replace(' ', ""))
    }

    fn customize(&self, html: &str) -> String {
        let mut out = html.to_string();
        for placeholder in NAME_PLACEHOLDERS {
            out = out.replace(placeholder, &self.store_name);
        }
        out.replace(DOMAIN_PLACEHOLDER, &self.domain())
    }
}

/// Contents of the generated `config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub name: String,
    pub template: String,
    pub primary_color: String,
    pub currency: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct GeneratedTemplate {
    pub output_dir: PathBuf,
    pub entry_document: PathBuf,
    pub customized_files: usize,
    pub config: StoreConfig,
}

pub fn generate_template(
    registry: &TemplateRegistry,
    template: &str,
    output: &Path,
    options: &StoreOptions,
) -> Result<GeneratedTemplate, GenerateError> {
    let src = registry.template_dir(template);
    if !src.is_dir() {
        return Err(GenerateError::TemplateNotFound {
            name: template.to_string(),
            available: registry.names().into_iter().map(String::from).collect(),
        });
    }

    if output.exists() {
        return Err(GenerateError::OutputExists(output.to_path_buf()));
    }

    // Snapshot the source before the output exists, so an output nested
    // inside the template is never walked into.
    let entries: Vec<DirEntry> = WalkDir::new(&src).into_iter().collect::<Result<_, _>>()?;

    let (customized_files, config) = match populate(&src, &entries, output, template, options) {
        Ok(written) => written,
        Err(e) => {
            if let Err(cleanup) = fs::remove_dir_all(output) {
                warn!(
                    output = %output.display(),
                    error = %cleanup,
                    "could not remove partial output"
                );
            }
            return Err(e);
        }
    };

    info!(
        template,
        output = %output.display(),
        customized_files,
        "generated template"
    );

    Ok(GeneratedTemplate {
        output_dir: output.to_path_buf(),
        entry_document: output.join(ENTRY_DOCUMENT),
        customized_files,
        config,
    })
}

fn populate(
    src: &Path,
    entries: &[DirEntry],
    output: &Path,
    template: &str,
    options: &StoreOptions,
) -> Result<(usize, StoreConfig), GenerateError> {
    copy_tree(src, entries, output)?;
    let customized_files = customize_html(output, options)?;

    let config = StoreConfig {
        name: options.store_name.clone(),
        template: template.to_string(),
        primary_color: options.primary_color.clone(),
        currency: options.currency.clone(),
        created_at: Utc::now().format("%Y-%m-%d").to_string(),
    };
    let config_path = output.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, json).map_err(io_err(&config_path))?;

    Ok((customized_files, config))
}

fn copy_tree(src: &Path, entries: &[DirEntry], dst: &Path) -> Result<(), GenerateError> {
    for entry in entries {
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_err(&target))?;
        }
    }
    Ok(())
}

fn customize_html(dir: &Path, options: &StoreOptions) -> Result<usize, GenerateError> {
    let mut count = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "html") {
            continue;
        }

        let content = fs::read_to_string(path).map_err(io_err(path))?;
        fs::write(path, options.customize(&content)).map_err(io_err(path))?;
        debug!(file = %path.display(), "customized");
        count += 1;
    }
    Ok(count)
}
