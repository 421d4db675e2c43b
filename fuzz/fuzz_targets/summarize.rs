#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logdoctor_analyzer::summarize;

#[derive(Debug, Arbitrary)]
struct Input {
    message: String,
    max_lines: u8,
}

fuzz_target!(|input: Input| {
    let summary = summarize(&input.message, usize::from(input.max_lines));

    // 첫 줄(선행 빈 줄 하나 제외)은 항상 유지
    let mut lines = input.message.split('\n');
    let mut first = lines.next().unwrap_or_default();
    if first.is_empty() {
        first = lines.next().unwrap_or_default();
    }
    assert!(summary.contains(first.trim()));
});
