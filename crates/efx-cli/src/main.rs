//! efx - translate EFX expressions and templates
//!
//! Thin driver around the translation engine: loads schema metadata,
//! registers the shipped XPath/XSLT back-end, and prints the translation
//! to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use efx_symbols::SymbolRepository;
use efx_translate::{translate_expression, translate_template, BackendRegistry, ANY_VERSION};
use efx_xpath::{XPathScriptComposer, XsltMarkupComposer};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "efx")]
#[command(about = "Translate EFX expressions and templates")]
struct Cli {
    /// Path to the schema-metadata JSON file, or a directory containing
    /// metadata.json
    #[arg(long)]
    sdk: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one EFX expression
    Expression {
        /// Field or node identifier supplying the root context
        #[arg(long)]
        context: String,

        /// The EFX expression
        source: String,
    },
    /// Translate an EFX template file
    Template {
        /// Path to the template file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "efx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let metadata_path = if cli.sdk.is_dir() {
        cli.sdk.join("metadata.json")
    } else {
        cli.sdk.clone()
    };
    let repository = match SymbolRepository::load(&metadata_path) {
        Ok(repository) => repository,
        Err(e) => {
            error!("failed to load schema metadata from {}: {}", metadata_path.display(), e);
            std::process::exit(1);
        }
    };
    debug!(version = repository.version(), "schema metadata loaded");

    let mut registry = BackendRegistry::new();
    let registered = registry
        .register_script(ANY_VERSION, "xpath", Arc::new(XPathScriptComposer::new()))
        .and_then(|_| {
            registry.register_markup(ANY_VERSION, "xslt", Arc::new(XsltMarkupComposer::new()))
        });
    if let Err(e) = registered {
        error!("back-end registration failed: {}", e);
        std::process::exit(1);
    }

    let output = match cli.command {
        Command::Expression { context, source } => {
            registry.script(repository.version(), "xpath").and_then(|script| {
                translate_expression(&repository, script.as_ref(), &context, &source)
                    .map(|result| result.script().to_string())
            })
        }
        Command::Template { file } => match std::fs::read_to_string(&file) {
            Ok(source) => registry.script(repository.version(), "xpath").and_then(|script| {
                let markup = registry.markup(repository.version(), "xslt")?;
                translate_template(&repository, script.as_ref(), markup.as_ref(), &source)
            }),
            Err(e) => {
                error!("failed to read template {}: {}", file.display(), e);
                std::process::exit(1);
            }
        },
    };

    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!("translation failed: {}", e);
            std::process::exit(1);
        }
    }
}
