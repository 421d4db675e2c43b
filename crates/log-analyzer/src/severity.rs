//! ERROR/FATAL 레코드 집계
//!
//! 셀렉터 레지스트리와 독립적으로, 심각 레벨 레코드를 포맷된 메시지 기준으로
//! 중복 제거하여 세고 스캔 종료 시 하나의 요약 문자열(severity digest)로 렌더링합니다.
//! 빈 문자열은 "심각한 실패 없음"을 뜻합니다.

use std::collections::HashMap;

use logdoctor_core::metrics as m;
use logdoctor_core::types::LogLevel;

use crate::parser::LogRecord;

/// 메시지별 발생 횟수 (최초 등장 순서 유지)
#[derive(Debug, Clone, Default)]
pub struct SeverityTally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl SeverityTally {
    /// 메시지 발생 횟수를 1 증가시킵니다.
    pub fn increment(&mut self, message: String) {
        match self.index.get(&message) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(message.clone(), self.entries.len());
                self.entries.push((message, 1));
            }
        }
    }

    /// 전체 발생 횟수
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// 서로 다른 메시지 수
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// 메시지의 발생 횟수
    pub fn count(&self, message: &str) -> u64 {
        self.index
            .get(message)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"<total> <LEVEL>: "` 뒤에 메시지를 이어붙여 렌더링합니다. 비어 있으면 빈 문자열입니다.
    pub fn render(&self, level: LogLevel) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = format!("{} {}: ", self.total(), level);
        for (message, count) in &self.entries {
            if *count > 1 {
                out.push_str(&format!("{count}x {message}\n"));
            } else {
                out.push_str(message);
                out.push('\n');
            }
        }
        out
    }
}

/// ERROR/FATAL 집계기
#[derive(Debug, Clone, Default)]
pub struct SeverityAggregator {
    errors: SeverityTally,
    fatals: SeverityTally,
}

impl SeverityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드를 집계합니다. ERROR/FATAL 이외의 레코드는 무시합니다.
    pub fn record(&mut self, record: &LogRecord) {
        let tally = match record.level {
            Some(LogLevel::Error) => &mut self.errors,
            Some(LogLevel::Fatal) => &mut self.fatals,
            _ => return,
        };
        tally.increment(formatted_message(record));

        if let Some(level) = record.level {
            metrics::counter!(m::SEVERE_RECORDS_TOTAL, m::LABEL_LEVEL => level.as_str())
                .increment(1);
        }
    }

    /// ERROR 집계
    pub fn errors(&self) -> &SeverityTally {
        &self.errors
    }

    /// FATAL 집계
    pub fn fatals(&self) -> &SeverityTally {
        &self.fatals
    }

    /// 집계된 레코드가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.fatals.is_empty()
    }

    /// ERROR, FATAL 순서로 렌더링한 digest. 둘 다 비었으면 빈 문자열입니다.
    pub fn render(&self) -> String {
        let mut digest = self.errors.render(LogLevel::Error);
        digest.push_str(&self.fatals.render(LogLevel::Fatal));
        digest
    }
}

/// 집계 키로 쓰는 포맷된 메시지
///
/// `err.message` 문자열이 있으면 그것을, 없으면 `errorMessage` 문자열을 `": "`로 덧붙입니다.
///
/// 줄바꿈은 붙이지 않습니다. digest에서는 detail 유무와 관계없이
/// [`SeverityTally::render`]가 모든 항목 끝에 `\n`을 붙이므로, detail이 있는
/// 항목도 다음 항목과 같은 줄에 이어지지 않습니다.
pub fn formatted_message(record: &LogRecord) -> String {
    let detail = record
        .extras
        .nested_str("err", "message")
        .or_else(|| record.extras.str("errorMessage"));

    match detail {
        Some(detail) => format!("{}: {detail}", record.message),
        None => record.message.clone(),
    }
}
