//! 로그 분석기 에러 타입
//!
//! [`AnalyzerError`]는 로그 분석기 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<AnalyzerError> for LogDoctorError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logdoctor_core::error::{ConfigError, LogDoctorError};

/// 로그 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 로그 라인 파싱 실패 (스캔 중에는 건너뛰고 계속 진행)
    #[error("parse error at offset {offset}: {reason}")]
    Parse {
        /// 실패 위치 (바이트 오프셋, 알 수 없으면 0)
        offset: usize,
        /// 실패 사유
        reason: String,
    },

    /// 로그 파일이 존재하지 않음
    #[error("log file not found (renovate step may not have run), path: {path}")]
    LogFileNotFound {
        /// 로그 파일 경로
        path: String,
    },

    /// 최대 라인 크기 초과
    #[error("line {line} exceeds maximum size of {max} bytes")]
    LineTooLong {
        /// 1부터 시작하는 라인 번호
        line: usize,
        /// 최대 허용 크기
        max: usize,
    },

    /// 결과가 쌓이기 전에 스캔이 취소됨
    #[error("log processing cancelled")]
    Cancelled,

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AnalyzerError> for LogDoctorError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Io(e) => LogDoctorError::Io(e),
            AnalyzerError::Config { field, reason } => {
                LogDoctorError::Config(ConfigError::InvalidValue { field, reason })
            }
            other => LogDoctorError::Analysis(other.to_string()),
        }
    }
}
