//! 통합 테스트 -- 로그 파일 스캔 전체 흐름 검증
//!
//! 파일/스트림 입력부터 심각도 digest와 리포트 생성까지의 흐름을 검증합니다.

use std::io::Write;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use logdoctor_analyzer::selector::checks::{PR_LIMIT_SELECTOR, RAW_EXEC_SELECTOR};
use logdoctor_analyzer::{
    AnalyzerError, LogRecord, LogScanner, Report, ScannerConfig, SelectorRegistry,
};
use logdoctor_core::config::LogDoctorConfig;
use logdoctor_core::error::LogDoctorError;

fn default_scanner() -> LogScanner {
    LogScanner::new(ScannerConfig::default(), SelectorRegistry::with_defaults())
}

fn jsonl(lines: &[serde_json::Value]) -> String {
    lines
        .iter()
        .map(|line| format!("{line}\n"))
        .collect::<String>()
}

fn write_log(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(content.as_bytes()).expect("write log");
    file.flush().expect("flush log");
    file
}

/// FATAL 2회 + ERROR 1회 -> ERROR 먼저, FATAL에 "2x" 접두어
#[tokio::test]
async fn test_severity_digest_scenario() {
    let log = jsonl(&[
        json!({"level": 30, "msg": "Repository started"}),
        json!({"level": 60, "msg": "disk full"}),
        json!({"level": 50, "msg": "network timeout"}),
        json!({"level": 60, "msg": "disk full"}),
    ]);
    let file = write_log(&log);

    let outcome = default_scanner()
        .scan_file(file.path(), &CancellationToken::new())
        .await
        .expect("scan should succeed");

    assert_eq!(
        outcome.digest,
        "Mintmaker finished with 1 ERROR: network timeout\n2 FATAL: 2x disk full\n"
    );
    assert!(!outcome.is_success());
    assert!(!outcome.is_partial());
    assert_eq!(outcome.stats.severe_records, 3);
}

/// PR 한도 메시지 3회 -> 경고 정확히 1개
#[tokio::test]
async fn test_pr_limit_warning_deduplicated() {
    let line = json!({"level": 20, "msg": PR_LIMIT_SELECTOR});
    let log = jsonl(&[line.clone(), line.clone(), line]);
    let file = write_log(&log);

    let outcome = default_scanner()
        .scan_file(file.path(), &CancellationToken::new())
        .await
        .expect("scan should succeed");

    assert_eq!(
        outcome.report.warnings,
        vec!["PR limit reached - skipping PR creation"]
    );
    assert!(outcome.report.errors.is_empty());
    assert!(outcome.report.infos.is_empty());
    assert_eq!(outcome.stats.selector_matches, 3);
    assert!(outcome.is_success());
}

/// 빈 스트림 -> 빈 digest, 빈 리포트, 에러 없음
#[tokio::test]
async fn test_empty_stream() {
    let file = write_log("");
    let outcome = default_scanner()
        .scan_file(file.path(), &CancellationToken::new())
        .await
        .expect("empty log is not an error");

    assert_eq!(outcome.digest, "");
    assert!(outcome.report.is_empty());
    assert_eq!(outcome.stats.lines_read, 0);
}

/// 파싱 불가 라인은 건너뛰고 계속 진행
#[tokio::test]
async fn test_unparseable_lines_are_skipped() {
    let mut log = String::from("not json\n{\"level\":50,\n[1,2,3]\n");
    log.push_str(&jsonl(&[json!({"level": 50, "msg": "after garbage"})]));

    let outcome = default_scanner()
        .scan_reader(log.as_bytes(), &CancellationToken::new())
        .await
        .expect("garbage lines are not fatal");

    assert_eq!(outcome.stats.lines_skipped, 3);
    assert_eq!(
        outcome.digest,
        "Mintmaker finished with 1 ERROR: after garbage\n"
    );
}

#[tokio::test]
async fn test_missing_log_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("renovate-logs.json");

    let result = default_scanner()
        .scan_file(&path, &CancellationToken::new())
        .await;

    match result {
        Err(AnalyzerError::LogFileNotFound { path: reported }) => {
            assert!(reported.ends_with("renovate-logs.json"));
        }
        other => panic!("expected LogFileNotFound, got {other:?}"),
    }

    let err: LogDoctorError = default_scanner()
        .scan_file(&path, &CancellationToken::new())
        .await
        .unwrap_err()
        .into();
    assert!(err.to_string().contains("renovate step may not have run"));
}

/// 설정 파일의 log_file 경로를 그대로 사용
#[tokio::test]
async fn test_scan_configured_log_file() {
    let file = write_log(&jsonl(&[json!({"level": 60, "msg": "out of memory"})]));
    let mut core = LogDoctorConfig::default();
    core.analyzer.log_file = file.path().display().to_string();
    core.analyzer.digest_prefix = "Run finished with ".to_owned();

    let scanner = LogScanner::new(
        ScannerConfig::from_core(&core.analyzer),
        SelectorRegistry::with_defaults(),
    );
    let outcome = scanner
        .scan_log_file(&CancellationToken::new())
        .await
        .expect("scan should succeed");

    assert_eq!(outcome.digest, "Run finished with 1 FATAL: out of memory\n");
}

/// 취소 전 결과가 없으면 에러
#[tokio::test]
async fn test_cancelled_without_findings_is_error() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let log = jsonl(&[json!({"level": 30, "msg": "info only"})]);

    let result = default_scanner().scan_reader(log.as_bytes(), &cancel).await;
    assert!(matches!(result, Err(AnalyzerError::Cancelled)));
}

/// 취소 전 결과가 쌓였으면 부분 결과 반환
#[tokio::test]
async fn test_cancelled_after_findings_returns_partial() {
    let config = ScannerConfig {
        cancel_check_interval: 2,
        ..ScannerConfig::default()
    };
    let scanner = LogScanner::new(config, SelectorRegistry::with_defaults());

    // 세 번째 라인을 읽은 직후 취소를 확인하므로 처리되지 않음
    let log = jsonl(&[
        json!({"level": 50, "msg": "first failure"}),
        json!({"level": 30, "msg": PR_LIMIT_SELECTOR}),
        json!({"level": 60, "msg": "never processed"}),
    ]);

    let (mut writer, reader) = tokio::io::duplex(64 * 1024);
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();

    // 두 라인만 먼저 쓰고, 취소 후 나머지를 씀
    let mut lines = log.lines();
    let head = format!(
        "{}\n{}\n",
        lines.next().expect("line 1"),
        lines.next().expect("line 2")
    );
    let tail = format!("{}\n", lines.next().expect("line 3"));

    let writer_task = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        writer.write_all(head.as_bytes()).await.expect("write head");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        task_cancel.cancel();
        writer.write_all(tail.as_bytes()).await.expect("write tail");
    });

    let reader = tokio::io::BufReader::new(reader);
    let outcome = scanner
        .scan_reader(reader, &cancel)
        .await
        .expect("partial result expected");
    writer_task.await.expect("writer task");

    assert!(outcome.is_partial());
    assert_eq!(outcome.stats.lines_read, 2);
    assert_eq!(
        outcome.digest,
        "Mintmaker finished with 1 ERROR: first failure\n"
    );
    assert_eq!(outcome.report.warnings.len(), 1);
}

/// 결과가 쌓인 뒤 너무 긴 라인 -> 부분 결과
#[tokio::test]
async fn test_overlong_line_after_findings_returns_partial() {
    let config = ScannerConfig {
        max_line_bytes: 128,
        ..ScannerConfig::default()
    };
    let scanner = LogScanner::new(config, SelectorRegistry::with_defaults());

    let mut log = jsonl(&[json!({"level": 50, "msg": "before the long line"})]);
    log.push_str(&format!("{{\"msg\":\"{}\"}}\n", "x".repeat(512)));
    log.push_str(&jsonl(&[json!({"level": 50, "msg": "after the long line"})]));

    let outcome = scanner
        .scan_reader(log.as_bytes(), &CancellationToken::new())
        .await
        .expect("partial result expected");

    assert!(outcome.is_partial());
    let reason = outcome.interruption.as_deref().unwrap_or_default();
    assert!(reason.contains("line 2"));
    assert_eq!(
        outcome.digest,
        "Mintmaker finished with 1 ERROR: before the long line\n"
    );
}

/// 두 셀렉터를 모두 포함한 메시지 -> 두 진단 함수 모두 실행
#[tokio::test]
async fn test_match_all_dispatch() {
    fn note_scope(_: &LogRecord, report: &mut Report) {
        report.info("scope matched", &[]);
    }

    let registry = SelectorRegistry::builder()
        .with_builtin_checks()
        .register("renovation", note_scope)
        .build();
    let scanner = LogScanner::new(ScannerConfig::default(), registry);

    let log = jsonl(&[json!({
        "level": 40,
        "msg": format!("{PR_LIMIT_SELECTOR} during renovation"),
    })]);
    let outcome = scanner
        .scan_reader(log.as_bytes(), &CancellationToken::new())
        .await
        .expect("scan should succeed");

    assert_eq!(outcome.report.warnings.len(), 1);
    assert_eq!(outcome.report.infos, vec!["scope matched"]);
    assert_eq!(outcome.stats.selector_matches, 2);
}

/// rawExec 에러 -> 요약된 메시지와 힌트가 리포트에 기록됨
#[tokio::test]
async fn test_raw_exec_error_report() {
    let mut message = vec![
        "Command failed: rpm-lockfile-prototype rpms.in.yaml".to_owned(),
        "Updating Subscription Management repositories.".to_owned(),
    ];
    message.extend((0..20).map(|n| format!("  File \"/usr/lib/python3.9/site-packages/mod{n}.py\", line {n}")));
    message.push(
        "FileNotFoundError: [Errno 2] No such file or directory: 'rpms.in.yaml'".to_owned(),
    );

    let log = jsonl(&[json!({
        "level": 50,
        "msg": RAW_EXEC_SELECTOR,
        "branch": "konflux/mintmaker/rpms",
        "durationMs": 8812,
        "err": {"message": message.join("\n"), "options": {"timeout": 900000}},
        "hostname": "dropped"
    })]);

    let outcome = default_scanner()
        .scan_reader(log.as_bytes(), &CancellationToken::new())
        .await
        .expect("scan should succeed");

    assert_eq!(outcome.report.errors.len(), 1);
    let entry = &outcome.report.errors[0];
    assert!(entry.starts_with(
        "Error executing command | Branch: konflux/mintmaker/rpms | Duration: 8812 | Timeout: 900000"
    ));
    assert!(entry.contains("Hint: File not found: rpms.in.yaml, check rpms.in.yaml configuration"));
    assert!(entry.contains("\nMessage: Command failed: rpm-lockfile-prototype rpms.in.yaml\n"));
    assert!(entry.contains("lines omitted"));
    assert!(entry.ends_with("FileNotFoundError: [Errno 2] No such file or directory: 'rpms.in.yaml'\n"));

    assert!(outcome.digest.starts_with("Mintmaker finished with 1 ERROR: rawExec err: Command failed"));
}

/// 같은 입력은 항상 같은 결과
#[tokio::test]
async fn test_scan_is_deterministic() {
    let log = jsonl(&[
        json!({"level": 50, "msg": "b"}),
        json!({"level": 50, "msg": "a"}),
        json!({"level": 60, "msg": "c", "errorMessage": "detail"}),
        json!({"level": 50, "msg": "b"}),
        json!({"level": 30, "msg": "Found renovate config errors", "errors": []}),
    ]);
    let scanner = default_scanner();
    let cancel = CancellationToken::new();

    let first = scanner.scan_reader(log.as_bytes(), &cancel).await.expect("scan 1");
    let second = scanner.scan_reader(log.as_bytes(), &cancel).await.expect("scan 2");

    assert_eq!(first.digest, second.digest);
    assert_eq!(first.report, second.report);
    assert_eq!(
        first.digest,
        "Mintmaker finished with 3 ERROR: 2x b\na\n1 FATAL: c: detail\n"
    );
}
