//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The companion core stays headless (no terminal crates)
//! - Core state machines advance on `tick(delta)`, never on a clock or sleep
//! - The TUI sleeps only to limit its frame rate
//!
//! Shared helpers for walking the workspace live here.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Lines of `path` with trailing `//` comments removed, numbered from 1
pub fn code_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code.to_string())
        })
        .collect()
}

/// Whether line `idx` (0-based) sits after a `#[cfg(test)]` marker
pub fn in_test_module(lines: &[(usize, String)], idx: usize) -> bool {
    lines[..idx]
        .iter()
        .any(|(_, line)| line.trim_start().starts_with("#[cfg(test)]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_found() {
        assert!(workspace_root().join("Cargo.toml").exists());
        assert!(!rust_files("companion/core/src").is_empty());
    }

    #[test]
    fn test_test_module_detection() {
        let lines = vec![
            (1, "fn run() {}".to_string()),
            (2, "#[cfg(test)]".to_string()),
            (3, "mod tests {".to_string()),
        ];
        assert!(!in_test_module(&lines, 0));
        assert!(in_test_module(&lines, 2));
    }
}
