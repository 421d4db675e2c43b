//! 보조 필드(extras) 타입 안전 접근자
//!
//! 셀렉터 진단 함수는 임의 형태의 JSON 값을 읽어야 합니다.
//! 모든 접근은 이 모듈의 접근자를 거치며, 타입이 맞지 않거나 필드가 없으면
//! `None`을 반환할 뿐 절대 패닉하지 않습니다.

use serde_json::{Map, Value};

/// 값이 없거나 표시할 수 없을 때 사용하는 문자열
pub const MISSING_VALUE: &str = "unknown";

/// 레코드에 보존하는 보조 필드 허용 목록
///
/// 목록에 없는 필드는 파싱 단계에서 버려집니다.
pub const ALLOWED_EXTRA_FIELDS: [&str; 15] = [
    "err",
    "errors",
    "errorMessage",
    "branch",
    "durationMs",
    "depName",
    "branchesInformation",
    "context",
    "packageFile",
    "currentValue",
    "previousNewValue",
    "thisNewValue",
    "oldConfig",
    "newConfig",
    "migratedConfig",
];

/// 허용 목록에 있는 필드인지 확인합니다.
pub fn is_allowed(key: &str) -> bool {
    ALLOWED_EXTRA_FIELDS.contains(&key)
}

/// 허용된 보조 필드 모음
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extras {
    fields: Map<String, Value>,
}

impl Extras {
    /// 빈 모음을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드를 추가합니다. 허용 목록에 없는 키는 무시하고 `false`를 반환합니다.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if !is_allowed(&key) {
            return false;
        }
        self.fields.insert(key, value);
        true
    }

    /// 원시 JSON 값
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 문자열 필드
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// 객체 필드
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// 배열 필드
    pub fn array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    /// 객체 필드 안의 문자열 (`err.message` 등)
    pub fn nested_str(&self, key: &str, inner: &str) -> Option<&str> {
        self.object(key).and_then(|obj| nested_str(obj, inner))
    }

    /// 사람이 읽을 수 있는 형태로 렌더링한 필드 값
    pub fn display(&self, key: &str) -> String {
        self.get(key)
            .map(render_value)
            .unwrap_or_else(|| MISSING_VALUE.to_owned())
    }

    /// 보존된 필드 수
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 보존된 필드가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 필드 이름 목록
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// 객체 안의 문자열 값
pub fn nested_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// 객체 안의 객체 값
pub fn nested_object<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

/// JSON 값을 리포트용 문자열로 렌더링합니다.
///
/// 문자열은 따옴표 없이, null은 [`MISSING_VALUE`]로, 나머지는 JSON 표기로 렌더링합니다.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => MISSING_VALUE.to_owned(),
        other => other.to_string(),
    }
}

/// 객체 안의 값을 렌더링합니다. 없으면 [`MISSING_VALUE`]입니다.
pub fn render_nested(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .map(render_value)
        .unwrap_or_else(|| MISSING_VALUE.to_owned())
}
