#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`client`]: Kite API 트레이트와 `reqwest` 구현
//! - [`payload`]: 웹훅 페이로드 (camelCase JSON)
//! - [`publisher`]: 리포트 / 결과 웹훅 전송
//! - [`error`]: 도메인 에러 타입

pub mod client;
pub mod error;
pub mod payload;
pub mod publisher;

pub use client::{KiteApi, KiteClient};
pub use error::WebhookError;
pub use payload::{CustomPayload, PipelineFailurePayload, PipelineSuccessPayload};
pub use publisher::ReportPublisher;
