//! Renovate JSON 라인 파서
//!
//! 한 줄의 JSON 객체를 [`LogRecord`]로 정규화합니다.
//!
//! - `level`: 숫자 코드를 [`LogLevel`] 테이블로 매핑. 그 외 값은 레벨 없음
//! - `msg`: 문자열이면 메시지로 사용, 아니면 빈 메시지
//! - 나머지: 허용 목록([`ALLOWED_EXTRA_FIELDS`])에 있는 필드만 원시 JSON 값 그대로 보존
//!
//! # 사용 예시
//! ```ignore
//! use logdoctor_analyzer::parser::RecordParser;
//!
//! let parser = RecordParser::default();
//! let record = parser.parse(br#"{"level":50,"msg":"Repository has changed during renovation"}"#)?;
//! assert!(record.is_severe());
//! ```

pub mod extras;

pub use extras::{ALLOWED_EXTRA_FIELDS, Extras};

use serde_json::Value;

use logdoctor_core::types::LogLevel;

use crate::error::AnalyzerError;

/// 정규화된 로그 레코드
///
/// 입력 라인 하나당 하나 생성되며, 셀렉터 진단이 끝나면 버려집니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    /// 레벨 (알 수 없는 코드이면 `None`)
    pub level: Option<LogLevel>,
    /// 로그 메시지 (`msg` 필드)
    pub message: String,
    /// 허용된 보조 필드
    pub extras: Extras,
}

impl LogRecord {
    /// 메시지만 가진 레코드를 생성합니다.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// 레벨을 설정합니다.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// 보조 필드를 추가합니다. 허용 목록에 없는 키는 무시됩니다.
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extras.insert(key, value);
        self
    }

    /// ERROR/FATAL 레코드인지 여부
    pub fn is_severe(&self) -> bool {
        self.level.is_some_and(LogLevel::is_severe)
    }
}

/// JSON 라인 파서
pub struct RecordParser {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl RecordParser {
    /// 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            max_input_size: 1024 * 1024, // 1MB
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// JSON 바이트를 파싱하여 `LogRecord`를 생성합니다.
    pub fn parse(&self, raw: &[u8]) -> Result<LogRecord, AnalyzerError> {
        if raw.len() > self.max_input_size {
            return Err(AnalyzerError::Parse {
                offset: 0,
                reason: format!(
                    "input too large: {} bytes (max: {})",
                    raw.len(),
                    self.max_input_size
                ),
            });
        }

        let value: Value = serde_json::from_slice(raw).map_err(|e| AnalyzerError::Parse {
            offset: e.column(),
            reason: e.to_string(),
        })?;

        // 최상위가 JSON 객체여야 합니다
        let Value::Object(object) = value else {
            return Err(AnalyzerError::Parse {
                offset: 0,
                reason: "expected JSON object at top level".to_owned(),
            });
        };

        let mut record = LogRecord::default();
        for (key, value) in object {
            match key.as_str() {
                "level" => record.level = Self::level_from_value(&value),
                "msg" => {
                    if let Value::String(msg) = value {
                        record.message = msg;
                    }
                }
                _ => {
                    record.extras.insert(key, value);
                }
            }
        }

        Ok(record)
    }

    /// `level` 값을 레벨로 변환합니다.
    ///
    /// 정수 값(또는 소수부가 0인 실수)만 테이블 조회 대상입니다.
    /// `50.5`처럼 소수부가 있는 값은 잘라서 50으로 보지 않고 레벨 없음으로 둡니다.
    /// 테이블에 없는 숫자 코드와 같은 취급입니다.
    fn level_from_value(value: &Value) -> Option<LogLevel> {
        let Value::Number(number) = value else {
            return None;
        };
        let code = match number.as_u64() {
            Some(code) => code,
            None => {
                let float = number.as_f64()?;
                if float < 0.0 || float.fract() != 0.0 {
                    return None;
                }
                float as u64
            }
        };
        LogLevel::from_code(code)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: &str) -> LogRecord {
        RecordParser::default().parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn parse_basic_record() {
        let record = parse(r#"{"name":"renovate","level":30,"msg":"Repository started"}"#);
        assert_eq!(record.level, Some(LogLevel::Info));
        assert_eq!(record.message, "Repository started");
        assert!(record.extras.is_empty());
    }

    #[test]
    fn level_table_mapping() {
        let cases = [
            (10, LogLevel::Trace),
            (20, LogLevel::Debug),
            (30, LogLevel::Info),
            (40, LogLevel::Warn),
            (50, LogLevel::Error),
            (60, LogLevel::Fatal),
        ];
        for (code, expected) in cases {
            let record = parse(&format!(r#"{{"level":{code},"msg":"x"}}"#));
            assert_eq!(record.level, Some(expected), "code {code}");
        }
    }

    #[test]
    fn unknown_or_non_numeric_level_is_unset() {
        for level in ["0", "35", "70", "-10", "50.5", "\"ERROR\"", "null", "true", "[50]"] {
            let record = parse(&format!(r#"{{"level":{level},"msg":"still delivered"}}"#));
            assert_eq!(record.level, None, "level {level}");
            assert_eq!(record.message, "still delivered");
        }
    }

    #[test]
    fn integral_float_level_is_accepted() {
        let record = parse(r#"{"level":50.0,"msg":"x"}"#);
        assert_eq!(record.level, Some(LogLevel::Error));
    }

    #[test]
    fn missing_level_is_unset() {
        let record = parse(r#"{"msg":"no level"}"#);
        assert_eq!(record.level, None);
    }

    #[test]
    fn non_string_msg_is_dropped() {
        let record = parse(r#"{"level":30,"msg":{"nested":true}}"#);
        assert_eq!(record.message, "");
        let record = parse(r#"{"level":30,"msg":42}"#);
        assert_eq!(record.message, "");
    }

    #[test]
    fn only_allow_listed_extras_are_kept() {
        let record = parse(
            r#"{"level":50,"msg":"rawExec err","branch":"renovate/x","durationMs":12,
                "err":{"message":"m"},"hostname":"pod-1","pid":7,"time":"2024-01-01T00:00:00Z"}"#,
        );
        let keys: Vec<&str> = record.extras.keys().collect();
        assert_eq!(record.extras.len(), 3);
        assert!(keys.contains(&"branch"));
        assert!(keys.contains(&"durationMs"));
        assert!(keys.contains(&"err"));
        assert!(!keys.contains(&"hostname"));
        assert!(!keys.contains(&"level"));
        assert!(!keys.contains(&"msg"));
    }

    #[test]
    fn extras_keep_raw_json_values() {
        let record = parse(r#"{"msg":"x","errors":[{"topic":"a","message":"b"}],"context":null}"#);
        assert_eq!(
            record.extras.get("errors"),
            Some(&json!([{"topic": "a", "message": "b"}]))
        );
        assert_eq!(record.extras.get("context"), Some(&Value::Null));
    }

    #[test]
    fn parse_invalid_json_fails() {
        let parser = RecordParser::default();
        assert!(parser.parse(b"not json at all").is_err());
        assert!(parser.parse(b"").is_err());
        assert!(parser.parse(br#"{"msg":"truncated"#).is_err());
    }

    #[test]
    fn parse_non_object_fails() {
        let parser = RecordParser::default();
        assert!(parser.parse(br#"["not","an","object"]"#).is_err());
        assert!(parser.parse(b"42").is_err());
    }

    #[test]
    fn parse_too_large_input_fails() {
        let parser = RecordParser::default().with_max_input_size(10);
        let result = parser.parse(br#"{"msg":"this is way too long for the limit"}"#);
        assert!(matches!(result, Err(AnalyzerError::Parse { .. })));
    }

    #[test]
    fn record_builders() {
        let record = LogRecord::new("hello")
            .with_level(LogLevel::Fatal)
            .with_extra("branch", json!("main"))
            .with_extra("msg", json!("ignored"));
        assert!(record.is_severe());
        assert_eq!(record.extras.len(), 1);
        assert!(!LogRecord::new("x").is_severe());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics(input in ".{0,256}") {
                let _ = RecordParser::default().parse(input.as_bytes());
            }

            #[test]
            fn level_outside_table_is_unset(code in 0u64..1000) {
                prop_assume!(![10, 20, 30, 40, 50, 60].contains(&code));
                let raw = format!(r#"{{"level":{code},"msg":"m"}}"#);
                let record = RecordParser::default().parse(raw.as_bytes()).unwrap();
                prop_assert_eq!(record.level, None);
            }

            #[test]
            fn extras_never_contain_reserved_keys(key in "[a-zA-Z]{1,12}") {
                let raw = format!(r#"{{"level":30,"msg":"m","{key}":1}}"#);
                let record = RecordParser::default().parse(raw.as_bytes()).unwrap();
                prop_assert!(record.extras.get("level").is_none());
                prop_assert!(record.extras.get("msg").is_none());
                prop_assert!(record.extras.keys().all(extras::is_allowed));
            }
        }
    }
}
