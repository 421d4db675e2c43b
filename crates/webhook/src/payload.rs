//! 웹훅 페이로드
//!
//! Kite API가 기대하는 camelCase JSON 구조입니다.

use serde::{Deserialize, Serialize};

/// `pipeline-failure` 웹훅 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFailurePayload {
    pub pipeline_name: String,
    pub namespace: String,
    pub failure_reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub run_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logs_url: String,
}

/// `pipeline-success` 웹훅 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSuccessPayload {
    pub pipeline_name: String,
    pub namespace: String,
}

/// `mintmaker-custom` 웹훅 페이로드
///
/// `issue_type`은 `"error"`, `"warning"`, `"info"` 중 하나입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPayload {
    pub pipeline_id: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub logs: Vec<String>,
}
