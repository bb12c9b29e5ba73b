//! Clap argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use coddoc::output::OutputRenderer;
use coddoc::output::json::JsonRenderer;
use coddoc::output::terminal::TerminalRenderer;
use coddoc::store::DEFAULT_PAGE_SIZE;

/// AI-powered code review and documentation assistant.
#[derive(Parser, Debug)]
#[command(name = "coddoc", version = coddoc::constants::VERSION)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, default_value = "terminal")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a source file for quality, bugs and security concerns.
    Analyze(AnalyzeArgs),

    /// Generate structured documentation for a source file.
    Document(DocumentArgs),

    /// Browse stored reviews.
    Reviews {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Browse stored documentation.
    Docs {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// List configured LLM providers.
    Providers,

    /// Print version information.
    Version,
}

/// Inputs shared by `analyze` and `document`.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Source file to process, or `-` to read from stdin.
    pub path: PathBuf,

    /// Programming language (default: detected from the file extension).
    #[arg(long, short = 'l')]
    pub language: Option<String>,

    /// LLM provider: gemini, openai or anthropic (default: from config).
    #[arg(long, short = 'p')]
    pub provider: Option<String>,

    /// Also write the stored record as JSON to this file.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the `document` subcommand.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Docstring style, e.g. google, numpy, sphinx.
    #[arg(long, short = 's')]
    pub style: Option<String>,
}

/// Stored-record subcommands.
#[derive(Subcommand, Debug)]
pub enum RecordAction {
    /// List records, newest first.
    List {
        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Records per page (1-100).
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,

        /// Only records in this language.
        #[arg(long, short = 'l')]
        language: Option<String>,
    },
    /// Show one record in full.
    Show { id: String },
    /// Delete one record.
    Delete { id: String },
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Renderer for this format.
    pub fn renderer(&self) -> Box<dyn OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(TerminalRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}
