//! 단일 패스 로그 스캐너
//!
//! JSON 라인 스트림을 한 줄씩 읽어 파서, 심각도 집계기, 셀렉터 레지스트리를 차례로 적용합니다.
//!
//! # 취소 및 부분 결과
//! - 취소 신호는 `cancel_check_interval` 라인마다, 라인을 읽은 뒤 처리하기 전에만 확인합니다.
//! - 취소나 읽기 실패 시 이미 쌓인 결과(리포트 또는 집계)가 있으면
//!   `interruption`이 채워진 부분 결과를 반환합니다.
//! - 쌓인 결과가 없으면 "문제 없음"과 구분할 수 없으므로 에러를 반환합니다.
//!
//! # 사용 예시
//! ```ignore
//! let scanner = LogScanner::new(ScannerConfig::default(), SelectorRegistry::with_defaults());
//! let cancel = CancellationToken::new();
//! let outcome = scanner.scan_file("/workspace/shared-data/renovate-logs.json", &cancel).await?;
//! if outcome.is_success() {
//!     // 심각한 실패 없음
//! }
//! ```

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use logdoctor_core::metrics as m;

use crate::config::ScannerConfig;
use crate::error::AnalyzerError;
use crate::parser::RecordParser;
use crate::report::Report;
use crate::selector::SelectorRegistry;
use crate::severity::SeverityAggregator;

/// 스캔 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// 읽은 라인 수
    pub lines_read: u64,
    /// 파싱에 성공한 레코드 수
    pub records_parsed: u64,
    /// 파싱 실패로 건너뛴 라인 수
    pub lines_skipped: u64,
    /// ERROR/FATAL 레코드 수
    pub severe_records: u64,
    /// 실행된 진단 함수 수
    pub selector_matches: u64,
}

/// 스캔 결과
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanOutcome {
    /// 심각도 요약 (접두어 포함). 빈 문자열이면 심각한 실패 없음
    pub digest: String,
    /// 셀렉터 진단 리포트
    pub report: Report,
    /// 스캔 통계
    pub stats: ScanStats,
    /// 스캔이 중간에 멈춘 경우 그 사유 (부분 결과)
    pub interruption: Option<String>,
}

impl ScanOutcome {
    /// 심각한 실패가 없었는지 여부
    pub fn is_success(&self) -> bool {
        self.digest.is_empty()
    }

    /// 스트림 끝까지 읽지 못한 부분 결과인지 여부
    pub fn is_partial(&self) -> bool {
        self.interruption.is_some()
    }
}

/// 로그 스캐너
///
/// 설정과 불변 셀렉터 레지스트리를 소유합니다. 스캔마다 새 [`ScanSession`]이 만들어지므로
/// 하나의 스캐너로 여러 번 스캔할 수 있습니다.
#[derive(Debug)]
pub struct LogScanner {
    config: ScannerConfig,
    registry: SelectorRegistry,
}

impl LogScanner {
    /// 새 스캐너를 생성합니다.
    pub fn new(config: ScannerConfig, registry: SelectorRegistry) -> Self {
        Self { config, registry }
    }

    /// 스캐너 설정
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// 새 스캔 세션을 시작합니다.
    pub fn session(&self) -> ScanSession<'_> {
        ScanSession {
            parser: RecordParser::new().with_max_input_size(self.config.max_line_bytes),
            registry: &self.registry,
            digest_prefix: &self.config.digest_prefix,
            aggregator: SeverityAggregator::new(),
            report: Report::new(),
            stats: ScanStats::default(),
        }
    }

    /// 설정된 로그 파일을 스캔합니다.
    pub async fn scan_log_file(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, AnalyzerError> {
        self.scan_file(&self.config.log_file, cancel).await
    }

    /// 로그 파일을 스캔합니다. 파일이 없으면 [`AnalyzerError::LogFileNotFound`]입니다.
    pub async fn scan_file(
        &self,
        path: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, AnalyzerError> {
        let path = path.as_ref();
        let not_found = || AnalyzerError::LogFileNotFound {
            path: path.display().to_string(),
        };

        match tokio::fs::metadata(path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                not_found()
            } else {
                AnalyzerError::Io(e)
            }
        })?;

        info!(path = %path.display(), "scanning log file");
        self.scan_reader(BufReader::new(file), cancel).await
    }

    /// 임의의 비동기 라인 스트림을 스캔합니다.
    pub async fn scan_reader<R>(
        &self,
        mut reader: R,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, AnalyzerError>
    where
        R: AsyncBufRead + Unpin,
    {
        let interval = self.config.cancel_check_interval.max(1) as u64;
        let max_line_bytes = self.config.max_line_bytes;
        let mut session = self.session();
        let mut line = Vec::with_capacity(4096);

        loop {
            line.clear();
            // 최대 크기 + 구분자 1바이트까지만 읽어 메모리 사용을 제한
            let limit = max_line_bytes as u64 + 1;
            let read = match (&mut reader).take(limit).read_until(b'\n', &mut line).await {
                Ok(read) => read,
                Err(e) => return session.interrupt(AnalyzerError::Io(e)),
            };
            if read == 0 {
                break;
            }

            // 취소되었으면 방금 읽은 라인은 처리하지 않음
            if session.stats.lines_read % interval == 0 && cancel.is_cancelled() {
                return session.interrupt(AnalyzerError::Cancelled);
            }

            let content = strip_line_ending(&line);
            if content.len() > max_line_bytes {
                let line_number = session.stats.lines_read as usize + 1;
                return session.interrupt(AnalyzerError::LineTooLong {
                    line: line_number,
                    max: max_line_bytes,
                });
            }

            session.process_line(content);
        }

        Ok(session.finish(None))
    }
}

/// 스캔 1회의 누적 상태
///
/// 리포트와 집계는 세션이 독점하며 동시에 접근되지 않습니다.
pub struct ScanSession<'a> {
    parser: RecordParser,
    registry: &'a SelectorRegistry,
    digest_prefix: &'a str,
    aggregator: SeverityAggregator,
    report: Report,
    stats: ScanStats,
}

impl ScanSession<'_> {
    /// 한 라인을 처리합니다. 파싱 실패 라인은 건너뜁니다.
    pub fn process_line(&mut self, raw: &[u8]) {
        self.stats.lines_read += 1;
        metrics::counter!(m::LINES_SCANNED_TOTAL).increment(1);

        let record = match self.parser.parse(raw) {
            Ok(record) => record,
            Err(e) => {
                self.stats.lines_skipped += 1;
                metrics::counter!(m::LINES_SKIPPED_TOTAL).increment(1);
                debug!(line = self.stats.lines_read, error = %e, "skipping unparseable line");
                return;
            }
        };
        self.stats.records_parsed += 1;

        if record.is_severe() {
            self.stats.severe_records += 1;
            self.aggregator.record(&record);
        }

        let fired = self.registry.dispatch(&record, &mut self.report);
        self.stats.selector_matches += fired as u64;
    }

    /// 지금까지 쌓인 결과가 있는지 여부
    pub fn has_findings(&self) -> bool {
        !self.aggregator.is_empty() || !self.report.is_empty()
    }

    /// 현재까지의 통계
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// 세션을 종료하고 결과를 만듭니다.
    pub fn finish(self, interruption: Option<String>) -> ScanOutcome {
        let severity = self.aggregator.render();
        let digest = if severity.is_empty() {
            severity
        } else {
            format!("{}{severity}", self.digest_prefix)
        };

        info!(
            lines_read = self.stats.lines_read,
            records_parsed = self.stats.records_parsed,
            lines_skipped = self.stats.lines_skipped,
            severe_records = self.stats.severe_records,
            selector_matches = self.stats.selector_matches,
            partial = interruption.is_some(),
            "log scan finished"
        );

        ScanOutcome {
            digest,
            report: self.report,
            stats: self.stats,
            interruption,
        }
    }

    /// 스캔 중단 처리: 쌓인 결과가 있으면 부분 결과, 없으면 에러
    fn interrupt(self, cause: AnalyzerError) -> Result<ScanOutcome, AnalyzerError> {
        if !self.has_findings() {
            return Err(cause);
        }
        warn!(
            error = %cause,
            lines_read = self.stats.lines_read,
            "log scan interrupted, returning partial result"
        );
        Ok(self.finish(Some(cause.to_string())))
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
