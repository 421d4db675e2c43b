//! 내장 진단 함수
//!
//! 모든 함수는 [`Extras`](crate::parser::Extras) 접근자로만 보조 필드를 읽으며,
//! 필드가 없거나 타입이 다르면 부분 결과를 기록하거나 아무것도 하지 않습니다.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::parser::LogRecord;
use crate::parser::extras::{MISSING_VALUE, nested_object, nested_str, render_nested};
use crate::report::Report;
use crate::summary::summarize_default;

use super::CheckFn;

/// PR 생성 한도 도달
pub const PR_LIMIT_SELECTOR: &str = "Reached PR limit - skipping PR creation";

/// Renovate 설정 오류
pub const CONFIG_ERRORS_SELECTOR: &str = "Found renovate config errors";

/// 외부 명령 실행 실패
pub const RAW_EXEC_SELECTOR: &str = "rawExec err";

/// 플랫폼 네이티브 커밋 실패
pub const PLATFORM_COMMIT_SELECTOR: &str = "Platform-native commit: unknown error";

/// 내장 셀렉터 테이블
pub const BUILTIN_CHECKS: [(&str, CheckFn); 4] = [
    (PR_LIMIT_SELECTOR, pr_limit_reached),
    (CONFIG_ERRORS_SELECTOR, renovate_config_errors),
    (RAW_EXEC_SELECTOR, raw_exec_error),
    (PLATFORM_COMMIT_SELECTOR, platform_commit_error),
];

/// 구독 활성화 키 문제를 시사하는 메시지
const METADATA_DOWNLOAD_FAILURE: &str = "Failed to download metadata for repo";

static FILE_NOT_FOUND: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"FileNotFoundError: \[Errno 2\] No such file or directory: '([\w/.\-]+)'").ok()
});

/// PR 한도 도달 경고
pub fn pr_limit_reached(_record: &LogRecord, report: &mut Report) {
    report.warning("PR limit reached - skipping PR creation", &[]);
}

/// `errors` 배열의 topic/message 목록을 에러로 기록합니다.
pub fn renovate_config_errors(record: &LogRecord, report: &mut Report) {
    let details = match record.extras.array("errors") {
        Some(errors) => errors
            .iter()
            .filter_map(Value::as_object)
            .map(|entry| {
                format!(
                    "\n{}: {}",
                    render_nested(entry, "topic"),
                    render_nested(entry, "message")
                )
            })
            .collect::<String>(),
        None => "Unable to parse config errors".to_owned(),
    };
    report.error("Found renovate config errors", &[("Errors", details.as_str())]);
}

/// 명령 실행 실패를 힌트와 요약 메시지와 함께 기록합니다.
///
/// `err` 객체가 없으면 아무것도 하지 않습니다.
pub fn raw_exec_error(record: &LogRecord, report: &mut Report) {
    let Some(err) = record.extras.object("err") else {
        return;
    };

    let branch = record.extras.display("branch");
    let duration = record.extras.display("durationMs");
    let mut fields: Vec<(&str, String)> = vec![("Branch", branch), ("Duration", duration)];

    if let Some(options) = nested_object(err, "options") {
        fields.push(("Timeout", render_nested(options, "timeout")));
    }

    let message = nested_str(err, "message").unwrap_or_default();

    if message.contains(METADATA_DOWNLOAD_FAILURE) {
        fields.push((
            "Hint",
            "Possible Red Hat subscription activation key issue".to_owned(),
        ));
    }

    if let Some(pattern) = FILE_NOT_FOUND.as_ref()
        && let Some(path) = pattern.captures(message).and_then(|caps| caps.get(1))
    {
        fields.push((
            "Hint",
            format!(
                "File not found: {}, check rpms.in.yaml configuration",
                path.as_str()
            ),
        ));
    }

    fields.push(("Message", summarize_default(message)));

    let borrowed: Vec<(&str, &str)> = fields
        .iter()
        .map(|(key, value)| (*key, value.as_str()))
        .collect();
    report.error("Error executing command", &borrowed);
}

/// 플랫폼 네이티브 커밋 실패를 브랜치와 실행 명령과 함께 기록합니다.
///
/// `err.task.commands`가 없거나 배열이 아니면 `Task`는 빈 문자열입니다.
pub fn platform_commit_error(record: &LogRecord, report: &mut Report) {
    let Some(err) = record.extras.object("err") else {
        return;
    };

    let branch = record.extras.display("branch");
    let message = nested_str(err, "message").unwrap_or_default();
    let task: String = nested_object(err, "task")
        .and_then(|task| task.get("commands"))
        .and_then(Value::as_array)
        .map(|commands| {
            commands
                .iter()
                .map(|command| match command {
                    Value::String(s) => format!(" {s}"),
                    Value::Null => format!(" {MISSING_VALUE}"),
                    other => format!(" {other}"),
                })
                .collect()
        })
        .unwrap_or_default();

    report.error(
        &record.message,
        &[
            ("Branch", branch.as_str()),
            ("Message", message),
            ("Task", task.as_str()),
        ],
    );
}
