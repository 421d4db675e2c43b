//! logdoctor CLI library.
//!
//! Exposes the command handlers for integration testing.
//! In production, `logdoctor` is used as a binary (main.rs).

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use logdoctor_core::config::{GeneralConfig, LogDoctorConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Analyze(args) => {
            let mut config = LogDoctorConfig::load_or_default(&cli.config).await?;
            commands::analyze::apply_cli_overrides(
                &mut config,
                cli.log_level.as_deref(),
                cli.log_format.as_deref(),
                &args,
            );
            config.validate()?;
            logging::init_tracing(&config.general)
                .map_err(|e| CliError::Command(e.to_string()))?;
            logdoctor_core::metrics::describe_all();

            commands::analyze::execute(&args, &config, &writer).await
        }
        Commands::Config(args) => {
            let mut general = GeneralConfig::default();
            if let Some(level) = cli.log_level {
                general.log_level = level;
            }
            if let Some(format) = cli.log_format {
                general.log_format = format;
            }
            logging::init_tracing(&general).map_err(|e| CliError::Command(e.to_string()))?;

            commands::config::execute(args, &cli.config, &writer).await
        }
    }
}
