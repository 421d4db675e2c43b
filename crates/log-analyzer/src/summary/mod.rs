//! 장문 에러 메시지 요약기
//!
//! 스택 트레이스나 명령 출력처럼 긴 여러 줄 메시지를 정해진 라인 예산 안에서
//! 정보 손실이 적은 발췌본으로 줄입니다.
//!
//! # 알고리즘
//! 1. 첫 라인은 항상 유지합니다.
//! 2. 빈 라인과 기호 전용 라인은 건너뜁니다 (카운트에도 포함하지 않음).
//! 3. 핵심 라인이 아닌 라인은 최근 2개만 문맥 버퍼에 보관합니다.
//! 4. 핵심 라인을 만나면 생략 표시, 문맥 버퍼, 핵심 라인 순으로 출력합니다.
//! 5. 출력이 예산에 도달하면 나머지를 생략 표시로 대체하고 마지막 3라인을 붙입니다.
//!
//! 순수 함수이므로 같은 입력과 예산에 대해 항상 같은 결과를 반환합니다.

pub mod classifier;

use std::collections::VecDeque;

pub use classifier::{is_critical_line, is_symbol_only_line};

use classifier::is_filler_line;

/// 시스템 기본 라인 예산
pub const DEFAULT_MAX_LINES: usize = 8;

/// 핵심 라인 앞에 함께 출력하는 문맥 라인 수
const CONTEXT_LINES: usize = 2;

/// 예산 초과 시 항상 덧붙이는 마지막 라인 수
const TAIL_LINES: usize = 3;

/// 메시지를 `max_lines` 예산에 맞게 요약합니다.
///
/// 앞뒤의 빈 라인 하나씩을 제거한 뒤 라인 수가 예산 이하이면
/// 원본을 trim 한 문자열을 그대로 반환합니다.
pub fn summarize(full_message: &str, max_lines: usize) -> String {
    if full_message.is_empty() {
        return String::new();
    }

    let mut lines: Vec<&str> = full_message.split('\n').collect();
    if lines.first() == Some(&"") {
        lines.remove(0);
    }
    if lines.last() == Some(&"") {
        lines.pop();
    }

    if lines.len() <= max_lines {
        return full_message.trim().to_owned();
    }

    condense(&lines, max_lines)
}

/// 기본 예산(8라인)으로 요약합니다.
pub fn summarize_default(full_message: &str) -> String {
    summarize(full_message, DEFAULT_MAX_LINES)
}

/// 윈도 기반 핵심 라인 추출
fn condense(lines: &[&str], max_lines: usize) -> String {
    let Some((first, _)) = lines.split_first() else {
        return String::new();
    };
    let last = lines.len() - 1;

    let mut useful: Vec<String> = vec![first.trim().to_owned()];
    let mut context: VecDeque<&str> = VecDeque::with_capacity(CONTEXT_LINES);
    let mut cut = 0usize;

    for (i, line) in lines.iter().enumerate().skip(1) {
        let trimmed = line.trim();

        // 마지막 라인은 필터와 무관하게 항상 출력
        if i == last {
            push_omission(&mut useful, cut.saturating_sub(context.len()));
            useful.extend(context.drain(..).map(str::to_owned));
            useful.push(trimmed.to_owned());
            break;
        }

        if is_filler_line(trimmed) {
            continue;
        }

        if useful.len() >= max_lines {
            // 마지막 3라인을 제외한 나머지 전부 (근사치)
            push_omission(&mut useful, (cut + lines.len()).saturating_sub(i + 2));
            let tail_start = lines.len().saturating_sub(TAIL_LINES).max(i);
            useful.extend(
                lines[tail_start..]
                    .iter()
                    .map(|tail| tail.trim())
                    .filter(|tail| !is_filler_line(tail))
                    .map(str::to_owned),
            );
            break;
        }

        if is_critical_line(trimmed) {
            push_omission(&mut useful, cut.saturating_sub(context.len()));
            cut = 0;
            useful.extend(context.drain(..).map(str::to_owned));
            useful.push(trimmed.to_owned());
        } else {
            cut += 1;
            if context.len() == CONTEXT_LINES {
                context.pop_front();
            }
            context.push_back(trimmed);
        }
    }

    useful.join("\n")
}

fn push_omission(useful: &mut Vec<String>, count: usize) {
    if count > 0 {
        useful.push(format!("[... {count} lines omitted ...]"));
    }
}
