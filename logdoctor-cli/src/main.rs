use std::process::ExitCode;

use clap::Parser;

use logdoctor_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match logdoctor_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "application failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
