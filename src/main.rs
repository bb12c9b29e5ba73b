//! coddoc command-line entry point.
//!
//! Errors are reported with `anyhow` context chains; logs go to stderr.

mod cli;

use coddoc::config;
use coddoc::constants;
use coddoc::env;
use coddoc::orchestrator;
use coddoc::providers;
use coddoc::store;

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, RecordAction, SourceArgs};
use config::Config;
use env::Env;
use orchestrator::{AnalyzeRequest, DocumentRequest, Orchestrator};
use providers::ProviderRegistry;
use store::PageRequest;

#[tokio::main]
async fn main() {
    init_tracing(&Env::real());
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr so JSON on stdout stays machine-readable.
fn init_tracing(env: &Env) {
    let filter = env
        .non_empty(constants::ENV_LOG)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let renderer = cli.format.renderer();

    match cli.command {
        Command::Analyze(args) => {
            let orchestrator = load_orchestrator()?;
            let (code, language, filename) = read_input(&args.source)?;
            let record = orchestrator
                .analyze(AnalyzeRequest {
                    code,
                    language,
                    filename,
                    provider: args.source.provider.clone(),
                })
                .await
                .context("analysis failed")?;
            save_output(args.source.output.as_deref(), &record)?;
            print!("{}", renderer.review(&record));
        }
        Command::Document(args) => {
            let orchestrator = load_orchestrator()?;
            let (code, language, filename) = read_input(&args.source)?;
            let record = orchestrator
                .document(DocumentRequest {
                    code,
                    language,
                    filename,
                    doc_style: args.style,
                    provider: args.source.provider.clone(),
                })
                .await
                .context("documentation failed")?;
            save_output(args.source.output.as_deref(), &record)?;
            print!("{}", renderer.documentation(&record));
        }
        Command::Reviews { action } => {
            let orchestrator = load_orchestrator()?;
            match action {
                RecordAction::List { page, limit, language } => {
                    let request = PageRequest::new(page, limit)?;
                    let listing = orchestrator.list_reviews(language.as_deref(), request)?;
                    print!("{}", renderer.records("reviews", &listing));
                }
                RecordAction::Show { id } => {
                    let record = orchestrator.get_review(&id)?;
                    print!("{}", renderer.review(&record));
                }
                RecordAction::Delete { id } => {
                    orchestrator.delete_review(&id)?;
                    eprintln!("Deleted review {id}.");
                }
            }
        }
        Command::Docs { action } => {
            let orchestrator = load_orchestrator()?;
            match action {
                RecordAction::List { page, limit, language } => {
                    let request = PageRequest::new(page, limit)?;
                    let listing = orchestrator.list_documentation(language.as_deref(), request)?;
                    print!("{}", renderer.records("documentation records", &listing));
                }
                RecordAction::Show { id } => {
                    let record = orchestrator.get_documentation(&id)?;
                    print!("{}", renderer.documentation(&record));
                }
                RecordAction::Delete { id } => {
                    orchestrator.delete_documentation(&id)?;
                    eprintln!("Deleted documentation {id}.");
                }
            }
        }
        Command::Providers => {
            let orchestrator = load_orchestrator()?;
            print!("{}", renderer.providers(&orchestrator.providers()));
        }
        Command::Version => run_version()?,
    }

    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    Ok(())
}

/// Load layered config for the working directory and build the orchestrator.
fn load_orchestrator() -> Result<Orchestrator> {
    let work_dir = std::env::current_dir().context("failed to determine working directory")?;
    let config =
        Config::load(Some(&work_dir), &Env::real()).context("failed to load configuration")?;
    build_orchestrator(&config)
}

/// Wire the registry and both stores into an orchestrator.
fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let registry = ProviderRegistry::from_config(config);
    if registry.is_empty() {
        tracing::warn!("no LLM provider has a credential configured");
    }

    let reviews = store::open(&config.store).context("failed to open review store")?;
    let docs = store::open(&config.store).context("failed to open documentation store")?;

    Ok(Orchestrator::new(Arc::new(registry), reviews, docs)
        .with_timeout(config.providers.timeout()))
}

/// Source text, language and recorded file name for an input path.
fn read_input(args: &SourceArgs) -> Result<(String, String, Option<String>)> {
    let code = cli::read_source(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    if code.trim().is_empty() {
        bail!("{} is empty", args.path.display());
    }
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| cli::detect_language(&args.path).to_string());
    Ok((code, language, cli::display_filename(&args.path)))
}

/// Write `record` as pretty JSON when `--output` is given.
fn save_output<T: Serialize>(path: Option<&Path>, record: &T) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(record).context("failed to serialize result")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("Saved result to {}", path.display());
    Ok(())
}
