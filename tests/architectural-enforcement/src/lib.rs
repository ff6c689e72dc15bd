//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles
//! of the overlay core:
//! - No blocking sleeps; every delay goes through the surface
//! - No direct terminal output; diagnostics go through `tracing`
//! - No async runtime inside the core; it stays synchronous and toolkit-free
//!
//! These tests are designed to catch violations early in the development cycle.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A rule violation found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the match
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text)
    }
}

/// Root of the workspace this crate lives in
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// All `.rs` files under `dir`
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Lines under `dir` containing any of `patterns`
///
/// Comment lines are skipped, and scanning of a file stops at its
/// `#[cfg(test)]` module, so test helpers may do what production code may not.
pub fn find_violations(dir: &Path, patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_sources(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("#[cfg(test)]") {
                break;
            }
            if trimmed.starts_with("//") {
                continue;
            }
            if patterns.iter().any(|pattern| trimmed.contains(pattern)) {
                violations.push(Violation {
                    path: path.clone(),
                    line: index + 1,
                    text: trimmed.to_string(),
                });
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_find_violations_skips_comments_and_tests() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("lib.rs")).unwrap();
        writeln!(
            file,
            "// println!(\"comment\")\nfn a() {{ println!(\"real\"); }}\n#[cfg(test)]\nmod tests {{ fn b() {{ println!(\"test\"); }} }}"
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "println!").unwrap();

        let found = find_violations(dir.path(), &["println!"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 2);
    }
}
