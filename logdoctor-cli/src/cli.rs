//! CLI argument parsing using clap derive API
//!
//! This module is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// logdoctor -- Renovate log analyzer for Mintmaker pipeline runs.
///
/// Use `logdoctor <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logdoctor", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logdoctor.toml configuration file.
    #[arg(short, long, default_value = "logdoctor.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a Renovate log file and report the results to Kite.
    Analyze(AnalyzeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Analyze a Renovate JSON log file.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Log file to analyze (overrides analyzer.log_file and LOG_FILE).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Development mode: debug level, pretty logs, print the analysis result.
    #[arg(long)]
    pub dev: bool,

    /// Analyze and print the result without contacting Kite.
    #[arg(long)]
    pub dry_run: bool,
}

// ---- config ----

/// Manage logdoctor configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analyzer, kite, pipeline).
        #[arg(long)]
        section: Option<String>,
    },
}
