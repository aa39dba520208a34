//! Attributes a match to the test function declared before it.
//!
//! This is a line heuristic, not a parse: it ignores scopes, comments and
//! string contents. A marker line stays armed until the next `fn` line,
//! whatever lies between them, and every `fn` line disarms it.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::snippet::UNKNOWN_TEST;

fn fn_decl_regex() -> &'static Regex {
    static FN_DECL: OnceLock<Regex> = OnceLock::new();
    FN_DECL.get_or_init(|| {
        Regex::new(r"^fn\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").expect("valid regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    AwaitingFunction,
}

/// Name of the last marked test function declared before `offset`, or
/// [`UNKNOWN_TEST`].
pub fn enclosing_test_name<'a>(content: &'a str, offset: usize, marker: &str) -> &'a str {
    let before = content.get(..offset).unwrap_or(content);
    let mut state = ScanState::Idle;
    let mut current = None;

    for line in before.split('\n') {
        let line = line.trim();
        if line == marker {
            state = ScanState::AwaitingFunction;
        }
        if let Some(caps) = fn_decl_regex().captures(line) {
            if state == ScanState::AwaitingFunction {
                current = caps.get(1).map(|m| m.as_str());
            }
            state = ScanState::Idle;
        }
    }

    current.unwrap_or(UNKNOWN_TEST)
}
