//! 설정 관리: logdoctor.toml 파싱 및 런타임 설정
//!
//! [`LogDoctorConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGDOCTOR_ANALYZER_LOG_FILE=/tmp/x.json` 형식, 또는 배포 환경의
//!    `LOG_FILE`, `KITE_API_URL`, `NAMESPACE` 등)
//! 3. 설정 파일 (`logdoctor.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logdoctor_core::error::LogDoctorError> {
//! use logdoctor_core::config::LogDoctorConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogDoctorConfig::load("logdoctor.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogDoctorConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogDoctorError};

/// 분석 대상 로그 파일 기본 경로 (파이프라인 공유 워크스페이스)
pub const DEFAULT_LOG_FILE: &str = "/workspace/shared-data/renovate-logs.json";

/// logdoctor 통합 설정
///
/// `logdoctor.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogDoctorConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 분석기 설정
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    /// Kite API 설정
    #[serde(default)]
    pub kite: KiteConfig,
    /// 파이프라인 실행 식별 정보
    #[serde(default)]
    pub pipeline: PipelineInfo,
}

impl LogDoctorConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogDoctorError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작하는 `load` 변형입니다.
    ///
    /// 파이프라인 태스크처럼 환경변수만으로 구성되는 실행 환경에서 사용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogDoctorError> {
        let mut config = match Self::from_file(path.as_ref()).await {
            Ok(config) => config,
            Err(LogDoctorError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path = %path, "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogDoctorError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogDoctorError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogDoctorError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogDoctorError> {
        toml::from_str(toml_str).map_err(|e| {
            LogDoctorError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGDOCTOR_{SECTION}_{FIELD}`
    /// 예: `LOGDOCTOR_ANALYZER_CANCEL_CHECK_INTERVAL=500`
    ///
    /// 파이프라인 태스크가 주입하는 배포 환경변수(`LOG_FILE`, `KITE_API_URL`,
    /// `NAMESPACE`, `PIPELINE_RUN`, `GIT_HOST`, `REPOSITORY`, `BRANCH`)도 지원하며,
    /// 같은 필드에 대해서는 `LOGDOCTOR_*` 변수가 우선합니다.
    pub fn apply_env_overrides(&mut self) {
        // 배포 환경변수
        override_string(&mut self.analyzer.log_file, "LOG_FILE");
        override_string(&mut self.kite.api_url, "KITE_API_URL");
        override_string(&mut self.kite.namespace, "NAMESPACE");
        override_string(&mut self.pipeline.run, "PIPELINE_RUN");
        override_string(&mut self.pipeline.git_host, "GIT_HOST");
        override_string(&mut self.pipeline.repository, "REPOSITORY");
        override_string(&mut self.pipeline.branch, "BRANCH");

        // General
        override_string(&mut self.general.log_level, "LOGDOCTOR_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGDOCTOR_GENERAL_LOG_FORMAT");

        // Analyzer
        override_string(&mut self.analyzer.log_file, "LOGDOCTOR_ANALYZER_LOG_FILE");
        override_usize(
            &mut self.analyzer.cancel_check_interval,
            "LOGDOCTOR_ANALYZER_CANCEL_CHECK_INTERVAL",
        );
        override_usize(
            &mut self.analyzer.max_line_bytes,
            "LOGDOCTOR_ANALYZER_MAX_LINE_BYTES",
        );
        override_string(
            &mut self.analyzer.digest_prefix,
            "LOGDOCTOR_ANALYZER_DIGEST_PREFIX",
        );

        // Kite
        override_string(&mut self.kite.api_url, "LOGDOCTOR_KITE_API_URL");
        override_string(&mut self.kite.namespace, "LOGDOCTOR_KITE_NAMESPACE");
        override_u64(&mut self.kite.timeout_secs, "LOGDOCTOR_KITE_TIMEOUT_SECS");

        // Pipeline
        override_string(&mut self.pipeline.run, "LOGDOCTOR_PIPELINE_RUN");
        override_string(&mut self.pipeline.git_host, "LOGDOCTOR_PIPELINE_GIT_HOST");
        override_string(
            &mut self.pipeline.repository,
            "LOGDOCTOR_PIPELINE_REPOSITORY",
        );
        override_string(&mut self.pipeline.branch, "LOGDOCTOR_PIPELINE_BRANCH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogDoctorError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.analyzer.log_file.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.log_file".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        let positive = [
            (
                "analyzer.cancel_check_interval",
                self.analyzer.cancel_check_interval,
            ),
            ("analyzer.max_line_bytes", self.analyzer.max_line_bytes),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }
        }

        if self.kite.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "kite.timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }

    /// 웹훅 전송에 필요한 원격 설정이 모두 채워져 있는지 확인합니다.
    pub fn require_remote(&self) -> Result<(), LogDoctorError> {
        let mut missing = Vec::new();
        if self.kite.api_url.is_empty() {
            missing.push("kite.api_url (KITE_API_URL)");
        }
        if self.kite.namespace.is_empty() {
            missing.push("kite.namespace (NAMESPACE)");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing.join(", ")).into())
        }
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 로그 분석기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// 분석할 JSON 라인 로그 파일 경로
    pub log_file: String,
    /// 취소 신호를 확인하는 라인 간격
    pub cancel_check_interval: usize,
    /// 한 라인의 최대 크기 (바이트)
    pub max_line_bytes: usize,
    /// 심각도 요약 문자열 앞에 붙는 접두어
    pub digest_prefix: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_file: DEFAULT_LOG_FILE.to_owned(),
            cancel_check_interval: 100,
            max_line_bytes: 1024 * 1024, // 1MB
            digest_prefix: "Mintmaker finished with ".to_owned(),
        }
    }
}

/// Kite API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KiteConfig {
    /// Kite API 기본 URL
    pub api_url: String,
    /// 웹훅 대상 네임스페이스
    pub namespace: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            namespace: String::new(),
            timeout_secs: 30,
        }
    }
}

/// 파이프라인 실행 식별 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineInfo {
    /// PipelineRun 이름
    pub run: String,
    /// Git 호스트
    pub git_host: String,
    /// 저장소 이름
    pub repository: String,
    /// 브랜치 이름
    pub branch: String,
}

impl Default for PipelineInfo {
    fn default() -> Self {
        Self {
            run: "unknown".to_owned(),
            git_host: "unknown".to_owned(),
            repository: "unknown".to_owned(),
            branch: "unknown".to_owned(),
        }
    }
}

impl PipelineInfo {
    /// 웹훅 페이로드에 사용하는 파이프라인 식별자 (`host/repo@branch`)
    pub fn identifier(&self) -> String {
        format!("{}/{}@{}", self.git_host, self.repository, self.branch)
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key)
        && !val.is_empty()
    {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
