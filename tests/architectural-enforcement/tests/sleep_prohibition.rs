//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Core state machines advance only through `tick(delta)`; they
//! never sleep or read the clock. The TUI may sleep only to limit its frame
//! rate, in `app.rs`.
//!
//! **Exceptions**: test modules; request timing inside the LLM backends.

use std::path::Path;

use architectural_enforcement::{code_lines, in_test_module, rust_files};

fn is_sleep(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// Frame limiting: `frame` mentioned within a few lines of the sleep
fn is_frame_limiting_context(lines: &[(usize, String)], idx: usize) -> bool {
    let range = idx.saturating_sub(10)..std::cmp::min(idx + 5, lines.len());
    lines[range]
        .iter()
        .any(|(_, line)| line.to_lowercase().contains("frame"))
}

#[test]
fn test_no_sleep_in_core() {
    let mut violations = Vec::new();

    for path in rust_files("companion/core/src") {
        let lines = code_lines(&path);
        for (idx, (line_number, code)) in lines.iter().enumerate() {
            if is_sleep(code) && !in_test_module(&lines, idx) {
                violations.push(format!("{}:{} - {}", path.display(), line_number, code.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Sleep calls in companion-core (advance with tick(delta) instead):\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_core_state_machines_never_read_the_clock() {
    let mut violations = Vec::new();

    for path in rust_files("companion/core/src") {
        // Backends time their own requests
        if path.components().any(|c| c.as_os_str() == "backend") {
            continue;
        }
        let lines = code_lines(&path);
        for (idx, (line_number, code)) in lines.iter().enumerate() {
            let reads_clock = code.contains("Instant::now") || code.contains("SystemTime::now");
            if reads_clock && !in_test_module(&lines, idx) {
                violations.push(format!("{}:{} - {}", path.display(), line_number, code.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Clock reads in core state machines:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_tui_sleeps_only_for_frame_limiting() {
    let mut violations = Vec::new();

    for path in rust_files("tui/src") {
        let lines = code_lines(&path);
        for (idx, (line_number, code)) in lines.iter().enumerate() {
            if !is_sleep(code) || in_test_module(&lines, idx) {
                continue;
            }
            if path.ends_with(Path::new("src/app.rs")) && is_frame_limiting_context(&lines, idx) {
                continue;
            }
            violations.push(format!("{}:{} - {}", path.display(), line_number, code.trim()));
        }
    }

    assert!(
        violations.is_empty(),
        "Sleep calls outside frame limiting:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_frame_limiting_detection() {
    let lines: Vec<(usize, String)> = [
        "fn render_loop() {",
        "    let frame_duration = Duration::from_millis(100);",
        "    tokio::time::sleep(frame_duration).await;",
        "}",
    ]
    .iter()
    .enumerate()
    .map(|(i, l)| (i + 1, (*l).to_string()))
    .collect();

    assert!(is_sleep(&lines[2].1));
    assert!(is_frame_limiting_context(&lines, 2));
}
