//! 셀렉터 레지스트리 -- 메시지 부분 문자열 기반 진단 디스패치
//!
//! 셀렉터는 로그 메시지에 포함 여부를 검사하는 리터럴 부분 문자열입니다
//! (정규식 아님, 대소문자 구분). 메시지에 셀렉터가 포함되면 연결된 진단 함수가
//! 레코드의 보조 필드를 읽어 [`Report`]에 결과를 기록합니다.
//!
//! # 아키텍처
//! - [`SelectorRegistryBuilder`]: 시작 시점에 셀렉터를 등록
//! - [`SelectorRegistry`]: 불변 매핑, 스캐너에 명시적으로 전달
//! - [`checks`]: 내장 진단 함수
//!
//! # 사용 예시
//! ```ignore
//! let registry = SelectorRegistry::with_defaults();
//! let mut report = Report::new();
//! let fired = registry.dispatch(&record, &mut report);
//! ```

pub mod checks;

use std::collections::BTreeMap;
use std::fmt;

use logdoctor_core::metrics as m;

use crate::parser::LogRecord;
use crate::report::Report;

/// 진단 함수 시그니처
///
/// 보조 필드가 없거나 타입이 맞지 않으면 부분 결과를 기록하거나 아무것도 하지 않아야 합니다.
pub type CheckFn = fn(&LogRecord, &mut Report);

/// 셀렉터 레지스트리 빌더
#[derive(Default)]
pub struct SelectorRegistryBuilder {
    entries: BTreeMap<String, CheckFn>,
}

impl SelectorRegistryBuilder {
    /// 빈 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 셀렉터를 등록합니다. 같은 셀렉터가 이미 있으면 덮어쓰고 경고를 남깁니다.
    pub fn register(mut self, selector: impl Into<String>, check: CheckFn) -> Self {
        let selector = selector.into();
        if self.insert(selector.clone(), check).is_some() {
            tracing::warn!(selector = %selector, "selector registered twice, previous check replaced");
        }
        self
    }

    /// 셀렉터를 등록하고, 덮어쓴 이전 함수가 있으면 반환합니다.
    pub fn insert(&mut self, selector: impl Into<String>, check: CheckFn) -> Option<CheckFn> {
        self.entries.insert(selector.into(), check)
    }

    /// 내장 진단 함수를 모두 등록합니다.
    pub fn with_builtin_checks(self) -> Self {
        checks::BUILTIN_CHECKS
            .iter()
            .fold(self, |builder, (selector, check)| {
                builder.register(*selector, *check)
            })
    }

    /// 불변 레지스트리를 생성합니다.
    pub fn build(self) -> SelectorRegistry {
        SelectorRegistry {
            entries: self.entries,
        }
    }
}

/// 불변 셀렉터 레지스트리
///
/// 셀렉터 정렬 순서로 순회하므로 같은 입력에 대해 디스패치 순서가 항상 같습니다.
#[derive(Clone, Default)]
pub struct SelectorRegistry {
    entries: BTreeMap<String, CheckFn>,
}

impl SelectorRegistry {
    /// 빌더를 생성합니다.
    pub fn builder() -> SelectorRegistryBuilder {
        SelectorRegistryBuilder::new()
    }

    /// 내장 진단 함수만 등록된 레지스트리
    pub fn with_defaults() -> Self {
        SelectorRegistryBuilder::new().with_builtin_checks().build()
    }

    /// 메시지에 포함된 모든 셀렉터의 진단 함수를 실행합니다 (match-all).
    ///
    /// 실행된 함수 수를 반환합니다.
    pub fn dispatch(&self, record: &LogRecord, report: &mut Report) -> usize {
        let mut fired = 0;
        for (selector, check) in &self.entries {
            if record.message.contains(selector.as_str()) {
                tracing::debug!(selector = %selector, "selector matched");
                check(record, report);
                metrics::counter!(m::SELECTOR_MATCHES_TOTAL, m::LABEL_SELECTOR => selector.clone())
                    .increment(1);
                fired += 1;
            }
        }
        fired
    }

    /// 등록된 셀렉터 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 등록된 셀렉터 목록 (정렬 순서)
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for SelectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorRegistry")
            .field("selectors", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
