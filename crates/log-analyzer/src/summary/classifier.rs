//! 핵심 라인 분류기
//!
//! 긴 에러 메시지의 한 줄이 요약에 반드시 남겨야 할 "핵심(critical)" 라인인지,
//! 생략 가능한 잡음인지 판정합니다. 패턴 테이블은 상수이며, 처음 사용할 때
//! 한 번만 [`RegexSet`]으로 컴파일합니다.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

/// 핵심 라인 패턴 테이블 (대소문자 무시, 논리 OR)
///
/// 순서는 결과에 영향을 주지 않습니다.
pub const CRITICAL_PATTERNS: [&str; 9] = [
    r"(?i)^\s*Command failed:",
    r"(?i)^\s*(Error|FATAL|CRITICAL)\b",
    r"(?i)^\s*Caused by:",
    r"(?i)^\s*[\w.]+Error:",
    r"(?i)permission denied",
    r"(?i)failed",
    r"(?i)exception",
    r"(?i)could not connect",
    r"(?i)timed out",
];

/// 스택 트레이스 밑줄 장식 (`~~~^^^`, `====`) 패턴
pub const SYMBOL_ONLY_PATTERN: &str = r"^\s*[~^=]+\s*$";

static CRITICAL_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(CRITICAL_PATTERNS).unwrap_or_else(|_| RegexSet::empty()));

static SYMBOL_ONLY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(SYMBOL_ONLY_PATTERN).ok());

/// 핵심 라인 여부를 판정합니다. `line`은 앞뒤 공백이 제거된 상태여야 합니다.
pub fn is_critical_line(line: &str) -> bool {
    CRITICAL_SET.is_match(line)
}

/// `~`, `^`, `=` 문자와 공백만으로 이루어진 라인인지 판정합니다.
pub fn is_symbol_only_line(line: &str) -> bool {
    SYMBOL_ONLY
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(line))
}

/// 요약 시 통째로 건너뛰는 라인 (빈 라인 또는 기호 전용 라인)
pub fn is_filler_line(line: &str) -> bool {
    line.is_empty() || is_symbol_only_line(line)
}
