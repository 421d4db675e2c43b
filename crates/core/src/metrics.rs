//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우(일회성 CLI 실행) 카운터 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logdoctor_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logdoctor_core::metrics::LINES_SCANNED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 로그 레벨 레이블 키 (ERROR, FATAL)
pub const LABEL_LEVEL: &str = "level";

/// 셀렉터 레이블 키
pub const LABEL_SELECTOR: &str = "selector";

/// 웹훅 이름 레이블 키 (pipeline-success, pipeline-failure, mintmaker-custom)
pub const LABEL_WEBHOOK: &str = "webhook";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Analyzer 메트릭 ────────────────────────────────────────────────

/// Analyzer: 읽은 전체 라인 수 (counter)
pub const LINES_SCANNED_TOTAL: &str = "logdoctor_lines_scanned_total";

/// Analyzer: 파싱 실패로 건너뛴 라인 수 (counter)
pub const LINES_SKIPPED_TOTAL: &str = "logdoctor_lines_skipped_total";

/// Analyzer: ERROR/FATAL 레코드 수 (counter, label: level)
pub const SEVERE_RECORDS_TOTAL: &str = "logdoctor_severe_records_total";

/// Analyzer: 셀렉터 매칭 수 (counter, label: selector)
pub const SELECTOR_MATCHES_TOTAL: &str = "logdoctor_selector_matches_total";

// ─── Webhook 메트릭 ─────────────────────────────────────────────────

/// Webhook: 전송 시도 수 (counter, labels: webhook, result)
pub const WEBHOOKS_SENT_TOTAL: &str = "logdoctor_webhooks_sent_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 프로세스 시작 시 한 번 호출합니다. 레코더가 없으면 no-op입니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        LINES_SCANNED_TOTAL,
        "Total number of log lines read by the analyzer"
    );
    describe_counter!(
        LINES_SKIPPED_TOTAL,
        "Log lines skipped because they were not valid JSON objects"
    );
    describe_counter!(
        SEVERE_RECORDS_TOTAL,
        "ERROR and FATAL records seen during a scan"
    );
    describe_counter!(
        SELECTOR_MATCHES_TOTAL,
        "Diagnostic selector matches per selector"
    );
    describe_counter!(
        WEBHOOKS_SENT_TOTAL,
        "Webhook requests sent to the Kite API by name and result"
    );
}
