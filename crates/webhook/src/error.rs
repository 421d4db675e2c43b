//! 웹훅 에러 타입
//!
//! [`WebhookError`]는 `From<WebhookError> for LogDoctorError` 변환으로
//! 상위 레이어에서 `?` 연산자로 전파됩니다.

use logdoctor_core::error::LogDoctorError;

/// Kite API 호출 에러
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// 기본 URL이 비어 있거나 파싱할 수 없음
    #[error("invalid kite base url '{url}': {reason}")]
    InvalidBaseUrl {
        /// 입력된 URL
        url: String,
        /// 실패 사유
        reason: String,
    },

    /// 요청 전송 실패 (연결, 타임아웃 등)
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    /// 2xx가 아닌 응답
    #[error("kite api returned status code {code}: {body}")]
    Status {
        /// HTTP 상태 코드
        code: u16,
        /// 응답 본문 (읽기 실패 시 빈 문자열)
        body: String,
    },

    /// 응답 본문 디코딩 실패
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// 페이로드 직렬화 실패
    #[error("unable to marshal payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<WebhookError> for LogDoctorError {
    fn from(err: WebhookError) -> Self {
        LogDoctorError::Remote(err.to_string())
    }
}
