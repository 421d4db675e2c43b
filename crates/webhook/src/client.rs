//! Kite API 클라이언트
//!
//! [`KiteApi`] 트레이트가 HTTP 호출을 추상화합니다. 운영 코드는 [`KiteClient`]를,
//! 테스트는 `MockKite`를 사용합니다.
//!
//! # 엔드포인트
//!
//! | 메서드 | 경로 | 용도 |
//! |--------|------|------|
//! | `GET`  | `{base}/api/v1/health` | 헬스 체크 |
//! | `POST` | `{base}/api/v1/webhooks/{name}?namespace={ns}` | 웹훅 전송 |
//!
//! 기본 URL에 경로가 있으면 그 뒤에 이어 붙입니다 (`http://kite/prefix` ->
//! `http://kite/prefix/api/v1/health`).

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WebhookError;

const HEALTH_PATH: [&str; 3] = ["api", "v1", "health"];
const WEBHOOKS_PATH: [&str; 3] = ["api", "v1", "webhooks"];

/// Kite API 연산
///
/// `Send + Sync + 'static`이므로 비동기 태스크 간에 공유할 수 있습니다.
pub trait KiteApi: Send + Sync + 'static {
    /// Kite API 상태를 `"<status>: <message>"` 형식으로 반환합니다.
    ///
    /// 응답의 `status` / `message`가 비어 있으면 각각 `unknown status`,
    /// `unknown status detail`로 대체합니다.
    fn health_status(&self) -> impl Future<Output = Result<String, WebhookError>> + Send;

    /// 이름이 `name`인 웹훅으로 `payload`를 JSON으로 전송합니다.
    fn send_webhook<P>(
        &self,
        namespace: &str,
        name: &str,
        payload: &P,
    ) -> impl Future<Output = Result<(), WebhookError>> + Send
    where
        P: Serialize + Sync;
}

/// 헬스 체크 응답
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HealthResponse {
    status: String,
    message: String,
}

/// `reqwest` 기반 Kite API 클라이언트
#[derive(Debug, Clone)]
pub struct KiteClient {
    base_url: Url,
    http: reqwest::Client,
}

impl KiteClient {
    /// 기본 URL과 요청 타임아웃으로 클라이언트를 생성합니다.
    ///
    /// # Errors
    ///
    /// - URL이 비어 있거나 파싱할 수 없으면 `WebhookError::InvalidBaseUrl`
    /// - HTTP 클라이언트 생성 실패 시 `WebhookError::Request`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_http_client(base_url, http)
    }

    /// 미리 구성한 `reqwest::Client`로 클라이언트를 생성합니다.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, WebhookError> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self { base_url, http })
    }

    /// 검증된 기본 URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 헬스 체크 URL
    pub fn health_url(&self) -> Url {
        self.endpoint(&HEALTH_PATH)
    }

    /// 웹훅 URL (`namespace` 쿼리 파라미터 포함)
    pub fn webhook_url(&self, namespace: &str, name: &str) -> Url {
        let mut url = self.endpoint(&WEBHOOKS_PATH);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(name);
        }
        url.query_pairs_mut().append_pair("namespace", namespace);
        url
    }

    fn endpoint(&self, path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url이 cannot-be-a-base URL을 걸러내므로 항상 Ok
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }
        url
    }
}

impl KiteApi for KiteClient {
    async fn health_status(&self) -> Result<String, WebhookError> {
        let url = self.health_url();
        debug!(url = %url, "requesting kite health");

        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| WebhookError::Decode(e.to_string()))?;

        Ok(format_health(&health))
    }

    async fn send_webhook<P>(&self, namespace: &str, name: &str, payload: &P) -> Result<(), WebhookError>
    where
        P: Serialize + Sync,
    {
        let body = serde_json::to_vec(payload)?;
        let url = self.webhook_url(namespace, name);
        debug!(url = %url, webhook = name, bytes = body.len(), "sending webhook");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, WebhookError> {
    let invalid = |reason: String| WebhookError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(invalid("must not be empty".to_owned()));
    }
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".to_owned()));
    }
    Ok(url)
}

/// 2xx가 아니면 응답 본문을 담아 `WebhookError::Status`로 변환합니다.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, WebhookError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WebhookError::Status {
        code: status.as_u16(),
        body,
    })
}

fn format_health(health: &HealthResponse) -> String {
    let status = if health.status.is_empty() {
        "unknown status"
    } else {
        health.status.as_str()
    };
    let message = if health.message.is_empty() {
        "unknown status detail"
    } else {
        health.message.as_str()
    };
    format!("{status}: {message}")
}

/// 테스트용 Mock Kite 클라이언트
///
/// 전송된 웹훅을 `(namespace, name, payload)`로 기록합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockKite {
    /// 전송된 웹훅 기록
    pub sent: std::sync::Mutex<Vec<(String, String, serde_json::Value)>>,
    /// 이 `type` 값을 가진 커스텀 페이로드는 실패시킴
    pub failing_types: Vec<String>,
    /// 모든 전송을 실패시킬지 여부
    pub fail_all: bool,
}

#[cfg(test)]
impl MockKite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_type(mut self, issue_type: &str) -> Self {
        self.failing_types.push(issue_type.to_owned());
        self
    }

    pub fn failing_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn sent(&self) -> Vec<(String, String, serde_json::Value)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl KiteApi for MockKite {
    async fn health_status(&self) -> Result<String, WebhookError> {
        Ok("ok: mock".to_owned())
    }

    async fn send_webhook<P>(&self, namespace: &str, name: &str, payload: &P) -> Result<(), WebhookError>
    where
        P: Serialize + Sync,
    {
        let value = serde_json::to_value(payload)?;
        let issue_type = value["type"].as_str().unwrap_or_default();
        if self.fail_all || self.failing_types.iter().any(|t| t == issue_type) {
            return Err(WebhookError::Status {
                code: 500,
                body: "mock failure".to_owned(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((namespace.to_owned(), name.to_owned(), value));
        }
        Ok(())
    }
}
