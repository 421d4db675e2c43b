//! 분석 결과 웹훅 전송
//!
//! [`ReportPublisher`]는 스캔 결과를 두 단계로 보냅니다.
//!
//! 1. [`publish_report`](ReportPublisher::publish_report): 비어 있지 않은 리포트
//!    목록마다 `mintmaker-custom` 웹훅 하나. 한 목록이 실패해도 나머지는 계속 전송합니다.
//! 2. [`publish_outcome`](ReportPublisher::publish_outcome): digest가 비어 있으면
//!    `pipeline-success`, 아니면 digest를 실패 사유로 담은 `pipeline-failure`.

use tracing::{error, info};

use logdoctor_analyzer::Report;
use logdoctor_core::config::PipelineInfo;
use logdoctor_core::metrics as m;

use crate::client::KiteApi;
use crate::error::WebhookError;
use crate::payload::{CustomPayload, PipelineFailurePayload, PipelineSuccessPayload};

/// 리포트 목록 웹훅 이름
pub const CUSTOM_WEBHOOK: &str = "mintmaker-custom";
/// 성공 웹훅 이름
pub const SUCCESS_WEBHOOK: &str = "pipeline-success";
/// 실패 웹훅 이름
pub const FAILURE_WEBHOOK: &str = "pipeline-failure";

/// 스캔 결과를 Kite 웹훅으로 전송합니다.
pub struct ReportPublisher<C: KiteApi> {
    client: C,
    namespace: String,
    pipeline: PipelineInfo,
}

impl<C: KiteApi> ReportPublisher<C> {
    pub fn new(client: C, namespace: impl Into<String>, pipeline: PipelineInfo) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            pipeline,
        }
    }

    /// 내부 Kite 클라이언트
    pub fn client(&self) -> &C {
        &self.client
    }

    /// 웹훅 페이로드에 쓰이는 파이프라인 식별자 (`host/repo@branch`)
    pub fn pipeline_id(&self) -> String {
        self.pipeline.identifier()
    }

    /// 리포트의 비어 있지 않은 목록을 `mintmaker-custom` 웹훅으로 보냅니다.
    ///
    /// 전송에 성공한 목록 종류(`"error"`, `"warning"`, `"info"`)를 순서대로 반환합니다.
    /// 개별 전송 실패는 로그만 남깁니다.
    pub async fn publish_report(&self, report: &Report) -> Vec<&'static str> {
        let lists: [(&'static str, &Vec<String>); 3] = [
            ("error", &report.errors),
            ("warning", &report.warnings),
            ("info", &report.infos),
        ];

        let pipeline_id = self.pipeline_id();
        let mut sent = Vec::new();
        for (issue_type, logs) in lists {
            if logs.is_empty() {
                continue;
            }
            let payload = CustomPayload {
                pipeline_id: pipeline_id.clone(),
                namespace: self.namespace.clone(),
                issue_type: issue_type.to_owned(),
                logs: logs.clone(),
            };
            match self.send(CUSTOM_WEBHOOK, &payload).await {
                Ok(()) => sent.push(issue_type),
                Err(e) => error!(issue_type, error = %e, "failed to send custom webhook"),
            }
        }

        if sent.is_empty() {
            info!(
                errors = report.errors.len(),
                warnings = report.warnings.len(),
                infos = report.infos.len(),
                "custom webhooks were not sent"
            );
        } else {
            info!(types = ?sent, "sent custom webhooks");
        }
        sent
    }

    /// digest에 따라 성공 또는 실패 웹훅을 보냅니다.
    pub async fn publish_outcome(&self, digest: &str) -> Result<(), WebhookError> {
        let pipeline_name = self.pipeline_id();
        if digest.is_empty() {
            let payload = PipelineSuccessPayload {
                pipeline_name,
                namespace: self.namespace.clone(),
            };
            self.send(SUCCESS_WEBHOOK, &payload).await?;
            info!("sent success webhook");
        } else {
            let payload = PipelineFailurePayload {
                pipeline_name,
                namespace: self.namespace.clone(),
                failure_reason: digest.to_owned(),
                run_id: self.pipeline.run.clone(),
                logs_url: String::new(),
            };
            self.send(FAILURE_WEBHOOK, &payload).await?;
            info!(failure_reason = digest, "sent failure webhook");
        }
        Ok(())
    }

    async fn send<P>(&self, name: &'static str, payload: &P) -> Result<(), WebhookError>
    where
        P: serde::Serialize + Sync,
    {
        let result = self.client.send_webhook(&self.namespace, name, payload).await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!(m::WEBHOOKS_SENT_TOTAL, m::LABEL_WEBHOOK => name, m::LABEL_RESULT => outcome)
            .increment(1);
        result
    }
}
