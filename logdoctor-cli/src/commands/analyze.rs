//! `logdoctor analyze` command handler
//!
//! Scans the Renovate log, then reports the result to Kite:
//! custom webhooks for non-empty report lists, followed by exactly one
//! `pipeline-success` or `pipeline-failure` webhook.
//!
//! SIGTERM/SIGINT cancel one token shared by the scan and the Kite calls,
//! for as long as the command runs.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use logdoctor_analyzer::{LogScanner, ScanOutcome, ScanStats, ScannerConfig, SelectorRegistry};
use logdoctor_core::config::LogDoctorConfig;
use logdoctor_webhook::{KiteApi, KiteClient, ReportPublisher};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Separator between report entries in text output.
const ENTRY_SEPARATOR: &str = "-------------";

/// Apply command-line overrides on top of file and environment configuration.
///
/// `--dev` switches to debug level and pretty logs; explicit
/// `--log-level` / `--log-format` still win over it.
pub fn apply_cli_overrides(
    config: &mut LogDoctorConfig,
    log_level: Option<&str>,
    log_format: Option<&str>,
    args: &AnalyzeArgs,
) {
    if args.dev {
        config.general.log_level = "debug".to_owned();
        config.general.log_format = "pretty".to_owned();
    }
    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    if let Some(format) = log_format {
        config.general.log_format = format.to_owned();
    }
    if let Some(path) = &args.log_file {
        config.analyzer.log_file = path.display().to_string();
    }
}

/// Execute the `analyze` command.
pub async fn execute(
    args: &AnalyzeArgs,
    config: &LogDoctorConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = &config.pipeline;
    info!(
        pipeline_run = %pipeline.run,
        git_host = %pipeline.git_host,
        repository = %pipeline.repository,
        branch = %pipeline.branch,
        namespace = %config.kite.namespace,
        "starting log analyzer"
    );

    let cancel = CancellationToken::new();
    let signal_task = tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));
    let result = analyze_and_publish(args, config, writer, &cancel).await;
    signal_task.abort();
    result
}

async fn analyze_and_publish(
    args: &AnalyzeArgs,
    config: &LogDoctorConfig,
    writer: &OutputWriter,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let outcome = scan(config, cancel).await?;

    info!(
        failure_logs = %outcome.digest,
        report_errors = outcome.report.errors.len(),
        report_warnings = outcome.report.warnings.len(),
        report_infos = outcome.report.infos.len(),
        lines_read = outcome.stats.lines_read,
        "processed logs"
    );
    if let Some(reason) = &outcome.interruption {
        warn!(reason = %reason, "log scan stopped early, reporting partial result");
    }

    if args.dev || args.dry_run {
        writer.render(&AnalysisReport::new(&config.analyzer.log_file, &outcome))?;
    }
    if args.dry_run {
        info!("dry run, skipping kite webhooks");
        return Ok(());
    }

    config.require_remote()?;
    let client = KiteClient::new(
        &config.kite.api_url,
        Duration::from_secs(config.kite.timeout_secs),
    )?;
    let publisher = ReportPublisher::new(
        client,
        config.kite.namespace.clone(),
        config.pipeline.clone(),
    );
    publish_until_cancelled(&publisher, &outcome, cancel).await
}

/// Scan the configured log file.
pub async fn scan(
    config: &LogDoctorConfig,
    cancel: &CancellationToken,
) -> Result<ScanOutcome, CliError> {
    let scanner_config = ScannerConfig::from_core(&config.analyzer);
    scanner_config.validate()?;

    let scanner = LogScanner::new(scanner_config, SelectorRegistry::with_defaults());
    Ok(scanner.scan_log_file(cancel).await?)
}

/// Probe Kite health, then send the report and outcome webhooks.
///
/// Custom webhook failures are logged and skipped; a failed health probe
/// or outcome webhook is an error.
pub async fn publish<C: KiteApi>(
    publisher: &ReportPublisher<C>,
    outcome: &ScanOutcome,
) -> Result<(), CliError> {
    let status = publisher.client().health_status().await?;
    info!(status = %status, "kite api status request completed");

    if !outcome.report.is_empty() {
        publisher.publish_report(&outcome.report).await;
    }
    publisher.publish_outcome(&outcome.digest).await?;

    info!("completed log analysis and sent webhooks");
    Ok(())
}

/// Run [`publish`] until it completes or `cancel` fires.
///
/// An in-flight Kite request is dropped on cancellation. A token that is
/// already cancelled sends nothing.
pub async fn publish_until_cancelled<C: KiteApi>(
    publisher: &ReportPublisher<C>,
    outcome: &ScanOutcome,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("shutdown signal received, kite webhooks not completed");
            Err(CliError::Interrupted("kite webhooks".to_owned()))
        }
        result = publish(publisher, outcome) => result,
    }
}

async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    match wait_for_shutdown_signal().await {
        Ok(signal) => {
            warn!(signal, "shutdown signal received, cancelling log analysis");
            cancel.cancel();
        }
        Err(e) => warn!(error = %e, "failed to install signal handlers"),
    }
}

/// Wait for SIGTERM or SIGINT and return the signal name.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

/// Analysis result as printed by `--dev` and `--dry-run`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub log_file: String,
    pub digest: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub stats: ScanStats,
    pub interruption: Option<String>,
}

impl AnalysisReport {
    pub fn new(log_file: &str, outcome: &ScanOutcome) -> Self {
        Self {
            log_file: log_file.to_owned(),
            digest: outcome.digest.clone(),
            errors: outcome.report.errors.clone(),
            warnings: outcome.report.warnings.clone(),
            infos: outcome.report.infos.clone(),
            stats: outcome.stats,
            interruption: outcome.interruption.clone(),
        }
    }
}

impl Render for AnalysisReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Log Analysis: {}", self.log_file.bold())?;
        writeln!(
            w,
            "  Lines: {} read, {} parsed, {} skipped",
            self.stats.lines_read, self.stats.records_parsed, self.stats.lines_skipped
        )?;

        if self.digest.is_empty() {
            writeln!(w, "  Result: {}", "SUCCESS".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "FAILURE".red().bold())?;
            writeln!(w, "  Fail logs:")?;
            for line in self.digest.lines() {
                writeln!(w, "    {line}")?;
            }
        }
        if let Some(reason) = &self.interruption {
            writeln!(w, "  Partial: {}", reason.yellow())?;
        }

        for (title, entries) in [
            ("Errors", &self.errors),
            ("Warnings", &self.warnings),
            ("Infos", &self.infos),
        ] {
            if entries.is_empty() {
                continue;
            }
            writeln!(w)?;
            writeln!(w, "{} ({}):", title.bold(), entries.len())?;
            writeln!(w, "{}", entries.join(&format!("\n{ENTRY_SEPARATOR}\n")))?;
        }

        Ok(())
    }
}
