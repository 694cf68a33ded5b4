//! Integration Test: Headless Core
//!
//! **Policy**: `companion-core` must not depend on or import any terminal
//! crate. Every surface is built on top of it, never inside it. The core
//! also owns no async runtime: surfaces bring their own, and tokio appears
//! in the core only for its tests.

use std::fs;

use architectural_enforcement::{code_lines, in_test_module, rust_files, workspace_root};

const FORBIDDEN_CRATES: [&str; 2] = ["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = workspace_root().join("companion/core/Cargo.toml");
    let content = fs::read_to_string(&manifest).expect("core manifest readable");

    for krate in FORBIDDEN_CRATES {
        let declared = content
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with(krate) && line.contains('='));
        assert!(!declared, "companion-core must not depend on {krate}");
    }
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_files("companion/core/src") {
        for (line_number, code) in code_lines(&path) {
            for krate in FORBIDDEN_CRATES {
                if code.contains(&format!("{krate}::")) {
                    violations.push(format!("{}:{} - {}", path.display(), line_number, code.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI crates used in companion-core:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_core_runtime_is_test_only() {
    let manifest = workspace_root().join("companion/core/Cargo.toml");
    let content = fs::read_to_string(&manifest).expect("core manifest readable");

    let mut section = "";
    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            section = line;
        } else if line.starts_with("tokio") && line.contains('=') {
            assert_eq!(section, "[dev-dependencies]", "tokio declared under {section}");
        }
    }

    let mut violations = Vec::new();
    for path in rust_files("companion/core/src") {
        let lines = code_lines(&path);
        for (idx, (line_number, code)) in lines.iter().enumerate() {
            if code.contains("tokio::") && !in_test_module(&lines, idx) {
                violations.push(format!("{}:{} - {}", path.display(), line_number, code.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "tokio used outside tests in companion-core:\n{}",
        violations.join("\n")
    );
}
