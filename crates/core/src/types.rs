//! 도메인 타입: Renovate 로그 레벨

use std::fmt;

use serde::{Deserialize, Serialize};

/// Renovate 로그 레벨
///
/// Renovate(bunyan 형식)는 레벨을 숫자 코드로 기록합니다.
/// `Ord` 구현으로 레벨 비교가 가능합니다 (`Trace < ... < Fatal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// 숫자 레벨 코드 -> 레벨 매핑 테이블
pub const LEVEL_TABLE: [(u64, LogLevel); 6] = [
    (10, LogLevel::Trace),
    (20, LogLevel::Debug),
    (30, LogLevel::Info),
    (40, LogLevel::Warn),
    (50, LogLevel::Error),
    (60, LogLevel::Fatal),
];

impl LogLevel {
    /// 숫자 코드에서 레벨을 찾습니다. 테이블에 없는 코드는 `None`입니다.
    pub fn from_code(code: u64) -> Option<Self> {
        LEVEL_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, level)| *level)
    }

    /// 레벨의 숫자 코드
    pub fn code(self) -> u64 {
        LEVEL_TABLE
            .iter()
            .find(|(_, level)| *level == self)
            .map(|(c, _)| *c)
            .unwrap_or_default()
    }

    /// 대문자 레벨 이름 (`"ERROR"` 등)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// ERROR 또는 FATAL 여부
    pub fn is_severe(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
