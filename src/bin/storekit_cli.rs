//! Storekit CLI - list, validate and generate storefront templates
//!
//! Reports go to stdout, logs to stderr.
//! Returns non-zero when any validated document has errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use storekit_core::{
    all_ok, generate_template, json_report,
    templates::{validate_all_with, validate_template_with},
    StoreOptions, TemplateRegistry, TemplateReport, Validator,
};

#[derive(Parser)]
#[command(name = "storekit-cli")]
#[command(about = "Storekit CLI - Storefront Template Generator & Validator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the template directories
    #[arg(short, long, default_value = ".", env = "STOREKIT_TEMPLATES_DIR")]
    templates_dir: PathBuf,

    /// JSON manifest replacing the built-in template list
    #[arg(short, long)]
    manifest: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    List,

    /// Validate one template, one file, or every template
    Validate {
        /// Template name (all templates if omitted)
        template: Option<String>,

        /// Validate an arbitrary HTML file instead of a template
        #[arg(short, long, conflicts_with = "template")]
        file: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Also run the template-quality audit
        #[arg(long)]
        extended: bool,
    },

    /// Generate a customized copy of a template
    Generate {
        /// Template name
        template: String,

        /// Output directory (must not exist)
        output: PathBuf,

        /// Store name
        #[arg(long, default_value = "My Store")]
        name: String,

        /// Primary color hex
        #[arg(long, default_value = "#0ea5e9")]
        color: String,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storekit_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let registry = match &cli.manifest {
        Some(path) => match TemplateRegistry::load_manifest(&cli.templates_dir, path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => TemplateRegistry::builtin(&cli.templates_dir),
    };

    match cli.command {
        Commands::List => {
            list_templates(&registry);
            ExitCode::SUCCESS
        }

        Commands::Validate { template, file, json, extended } => {
            let validator = if extended { Validator::extended() } else { Validator::new() };

            let results: TemplateReport = match (template, file) {
                (_, Some(path)) => {
                    let result = validator.validate_file(&path);
                    vec![(path.display().to_string(), result)]
                }
                (Some(name), None) => {
                    let result = validate_template_with(&validator, &registry, &name);
                    vec![(name, result)]
                }
                (None, None) => validate_all_with(&validator, &registry),
            };

            if json {
                match serde_json::to_string_pretty(&json_report(&results)) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("❌ Could not serialize report: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                for (name, result) in &results {
                    println!("\n🔍 Validating: {}", name);
                    println!("{}", result.summary());
                }
            }

            if all_ok(results.iter().map(|(_, result)| result)) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }

        Commands::Generate { template, output, name, color, currency } => {
            let options = match StoreOptions::new(name, color, currency) {
                Ok(o) => o,
                Err(e) => {
                    println!("❌ {}", e);
                    return ExitCode::FAILURE;
                }
            };

            match generate_template(&registry, &template, &output, &options) {
                Ok(generated) => {
                    let absolute = generated
                        .entry_document
                        .canonicalize()
                        .unwrap_or_else(|_| generated.entry_document.clone());
                    println!(
                        "✅ Template '{}' generated at: {}",
                        template,
                        generated.output_dir.display()
                    );
                    println!("   Store: {}", options.store_name);
                    println!("   Open: file://{}", absolute.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("❌ {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn list_templates(registry: &TemplateRegistry) {
    println!("📦 Available Templates:\n");
    for status in registry.statuses() {
        let marker = if status.exists { "✅" } else { "❌" };
        println!("  {} {}", marker, status.name);
        println!("     {}", status.description);
        if status.exists {
            println!("     Files: {}", status.file_count);
        }
        println!();
    }
}
