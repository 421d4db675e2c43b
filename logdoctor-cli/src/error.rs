//! CLI-specific error types and exit code mapping

use logdoctor_analyzer::AnalyzerError;
use logdoctor_core::error::LogDoctorError;
use logdoctor_webhook::WebhookError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A shutdown signal stopped the command before it finished.
    #[error("interrupted by shutdown signal: {0} not completed")]
    Interrupted(String),

    /// Wrapped domain error from logdoctor-core.
    #[error("{0}")]
    Core(#[from] LogDoctorError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                  |
    /// |------|--------------------------|
    /// | 0    | Success                  |
    /// | 1    | General / analysis error |
    /// | 2    | Configuration error      |
    /// | 3    | Kite API error           |
    /// | 10   | IO error                 |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                LogDoctorError::Config(_) => 2,
                LogDoctorError::Remote(_) => 3,
                LogDoctorError::Io(_) => 10,
                LogDoctorError::Analysis(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) | Self::Interrupted(_) => 1,
        }
    }
}

impl From<AnalyzerError> for CliError {
    fn from(e: AnalyzerError) -> Self {
        Self::Core(e.into())
    }
}

impl From<WebhookError> for CliError {
    fn from(e: WebhookError) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logdoctor_core::error::ConfigError;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err: CliError = LogDoctorError::Config(ConfigError::Missing("kite.api_url".to_owned())).into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_remote_error() {
        let err: CliError = WebhookError::Status {
            code: 502,
            body: String::new(),
        }
        .into();
        assert_eq!(err.exit_code(), 3, "kite api error should return exit code 3");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_analyzer_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CliError = AnalyzerError::Io(io_err).into();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_exit_code_missing_log_file() {
        let err: CliError = AnalyzerError::LogFileNotFound {
            path: "/workspace/shared-data/renovate-logs.json".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("renovate step may not have run"));
    }

    #[test]
    fn test_exit_code_cancelled() {
        let err: CliError = AnalyzerError::Cancelled.into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_interrupted() {
        let err = CliError::Interrupted("kite webhooks".to_owned());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "interrupted by shutdown signal: kite webhooks not completed"
        );
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1, "command error should return exit code 1");
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        let err = CliError::JsonSerialize(json_err);
        assert_eq!(err.exit_code(), 1);
    }
}
