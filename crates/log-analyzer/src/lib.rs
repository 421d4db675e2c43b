#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: JSON 라인을 [`LogRecord`]로 정규화 (허용 목록 기반 보조 필드)
//! - [`summary`]: 핵심 라인 분류기와 장문 메시지 요약기
//! - [`selector`]: 셀렉터 레지스트리와 내장 진단 함수
//! - [`report`]: errors / warnings / infos 누적기
//! - [`severity`]: ERROR/FATAL 집계와 digest 렌더링
//! - [`scan`]: 취소 가능한 단일 패스 스캐너
//! - [`config`]: 스캐너 설정 (core 설정 파생)
//! - [`error`]: 도메인 에러 타입

pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod scan;
pub mod selector;
pub mod severity;
pub mod summary;

// --- 주요 타입 re-export ---

// 스캐너
pub use scan::{LogScanner, ScanOutcome, ScanSession, ScanStats};

// 설정
pub use config::ScannerConfig;

// 에러
pub use error::AnalyzerError;

// 파서
pub use parser::{Extras, LogRecord, RecordParser};

// 셀렉터
pub use selector::{CheckFn, SelectorRegistry, SelectorRegistryBuilder};

// 리포트 / 집계
pub use report::Report;
pub use severity::{SeverityAggregator, SeverityTally};

// 요약기
pub use summary::{summarize, summarize_default};
