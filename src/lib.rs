//! Storekit Core - Storefront Template Toolkit
//!
//! # Ground Rules
//! 1. Text In, Verdicts Out (no DOM, any markup gets a result)
//! 2. Rules Are Independent
//! 3. Report Order Is Contract
//! 4. Warnings Never Fail a Template
//! 5. Registry Is Explicit Configuration

pub mod rules;
pub mod audit;
pub mod validation;
pub mod templates;
pub mod generator;

pub use validation::{
    all_ok, json_report, validate_document, validate_file, DocumentRule, Outcome, ValidationResult,
    Validator,
};
pub use rules::Thresholds;
pub use templates::{
    validate_all, validate_template, RegistryError, TemplateRegistry, TemplateReport,
    TemplateStatus,
};
pub use generator::{
    generate_template, GenerateError, GeneratedTemplate, StoreConfig, StoreOptions,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
