//! 스캐너 설정
//!
//! [`ScannerConfig`]는 core의 [`AnalyzerConfig`]에서 파생됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use logdoctor_core::config::LogDoctorConfig;
//! use logdoctor_analyzer::config::ScannerConfig;
//!
//! let core_config = LogDoctorConfig::default();
//! let config = ScannerConfig::from_core(&core_config.analyzer);
//! ```

use serde::{Deserialize, Serialize};

use logdoctor_core::config::{AnalyzerConfig, DEFAULT_LOG_FILE};

use crate::error::AnalyzerError;

/// 로그 스캐너 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// 분석할 로그 파일 경로
    pub log_file: String,
    /// 취소 신호를 확인하는 라인 간격
    pub cancel_check_interval: usize,
    /// 한 라인의 최대 크기 (바이트)
    pub max_line_bytes: usize,
    /// 비어 있지 않은 digest 앞에 붙는 접두어
    pub digest_prefix: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            log_file: DEFAULT_LOG_FILE.to_owned(),
            cancel_check_interval: 100,
            max_line_bytes: 1024 * 1024, // 1MB
            digest_prefix: "Mintmaker finished with ".to_owned(),
        }
    }
}

impl ScannerConfig {
    /// core의 `AnalyzerConfig`에서 스캐너 설정을 생성합니다.
    pub fn from_core(core: &AnalyzerConfig) -> Self {
        Self {
            log_file: core.log_file.clone(),
            cancel_check_interval: core.cancel_check_interval,
            max_line_bytes: core.max_line_bytes,
            digest_prefix: core.digest_prefix.clone(),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        const MAX_LINE_BYTES: usize = 64 * 1024 * 1024; // 64MB

        if self.log_file.is_empty() {
            return Err(AnalyzerError::Config {
                field: "log_file".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.cancel_check_interval == 0 {
            return Err(AnalyzerError::Config {
                field: "cancel_check_interval".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES {
            return Err(AnalyzerError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{MAX_LINE_BYTES}"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ScannerConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_copies_fields() {
        let core = AnalyzerConfig {
            log_file: "/tmp/renovate.json".to_owned(),
            cancel_check_interval: 7,
            max_line_bytes: 2048,
            digest_prefix: "Run finished with ".to_owned(),
        };
        let config = ScannerConfig::from_core(&core);
        assert_eq!(config.log_file, "/tmp/renovate.json");
        assert_eq!(config.cancel_check_interval, 7);
        assert_eq!(config.max_line_bytes, 2048);
        assert_eq!(config.digest_prefix, "Run finished with ");
    }

    #[test]
    fn from_default_core_matches_default() {
        assert_eq!(
            ScannerConfig::from_core(&AnalyzerConfig::default()),
            ScannerConfig::default()
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = ScannerConfig {
            cancel_check_interval: 0,
            ..ScannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::Config { field, .. }) if field == "cancel_check_interval"
        ));
    }

    #[test]
    fn line_size_bounds() {
        let config = ScannerConfig {
            max_line_bytes: 0,
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScannerConfig {
            max_line_bytes: 128 * 1024 * 1024,
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_log_file_is_rejected() {
        let config = ScannerConfig {
            log_file: String::new(),
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
