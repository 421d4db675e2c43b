//! 진단 리포트 누적기
//!
//! [`Report`]는 셀렉터 진단 함수가 기록하는 errors / warnings / infos 세 목록을 가집니다.
//! 스캔 중에만 변경되며, 스캔이 끝나면 웹훅 전송 레이어로 그대로 넘겨집니다.

use serde::Serialize;

/// 별도 블록으로 렌더링되는 필드 이름
const MESSAGE_FIELD: &str = "Message";

/// 스캔 1회의 진단 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// 에러 (중복 허용)
    pub errors: Vec<String>,
    /// 경고 (중복 제거, 최초 등장 순서 유지)
    pub warnings: Vec<String>,
    /// 정보 (중복 허용)
    pub infos: Vec<String>,
}

impl Report {
    /// 빈 리포트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 에러를 추가합니다.
    pub fn error(&mut self, msg: &str, fields: &[(&str, &str)]) {
        self.errors.push(format_message(msg, fields));
    }

    /// 경고를 추가합니다. 이미 같은 문자열이 있으면 무시합니다.
    pub fn warning(&mut self, msg: &str, fields: &[(&str, &str)]) {
        let formatted = format_message(msg, fields);
        if self.warnings.contains(&formatted) {
            return;
        }
        self.warnings.push(formatted);
    }

    /// 정보를 추가합니다.
    pub fn info(&mut self, msg: &str, fields: &[(&str, &str)]) {
        self.infos.push(format_message(msg, fields));
    }

    /// 세 목록이 모두 비었는지 여부
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.infos.is_empty()
    }

    /// 전체 항목 수
    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.infos.len()
    }
}

/// 메시지와 키/값 쌍을 한 줄 문자열로 렌더링합니다.
///
/// 일반 필드는 `" | key: value"`, `Message` 필드는 다음 줄에 `"Message: value"` 블록으로 붙습니다.
pub fn format_message(msg: &str, fields: &[(&str, &str)]) -> String {
    let mut result = String::from(msg);
    for (key, value) in fields {
        if *key == MESSAGE_FIELD {
            result.push_str(&format!("\n{key}: {value}\n"));
        } else {
            result.push_str(&format!(" | {key}: {value}"));
        }
    }
    result
}
