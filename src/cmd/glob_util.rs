//! Glob pattern expansion utilities for CLI commands.
//!
//! Provides functions to expand glob patterns like `*.sql` or `schema/**/*.sql`
//! into lists of matching file paths, and `--skip` patterns into entity names.

use glob::Pattern;
use std::path::{Path, PathBuf};

/// Result of expanding a file pattern (either a literal path or glob pattern).
#[derive(Debug)]
pub struct ExpandedFiles {
    pub files: Vec<PathBuf>,
    pub pattern_was_glob: bool,
}

/// Check if a path string contains glob pattern characters.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Expand a file path or glob pattern into a list of matching files.
///
/// If the input is a literal path (no glob characters), returns that single path.
/// If the input is a glob pattern, expands it and returns all matching files.
///
/// # Errors
///
/// Returns an error if:
/// - The glob pattern is invalid
/// - No files match the pattern
/// - A literal path doesn't exist
pub fn expand_file_pattern(pattern: &Path) -> anyhow::Result<ExpandedFiles> {
    let pattern_str = pattern.to_string_lossy();

    if !is_glob_pattern(&pattern_str) {
        if !pattern.exists() {
            anyhow::bail!("file does not exist: {}", pattern.display());
        }
        return Ok(ExpandedFiles {
            files: vec![pattern.to_path_buf()],
            pattern_was_glob: false,
        });
    }

    let entries: Vec<_> = glob::glob(&pattern_str)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern_str, e))?
        .collect();

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                anyhow::bail!("error reading path for pattern '{}': {}", pattern_str, e);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("no files match pattern: {}", pattern_str);
    }

    files.sort();

    Ok(ExpandedFiles {
        files,
        pattern_was_glob: true,
    })
}

/// Split a comma-separated `--skip` value into trimmed, non-empty patterns.
pub fn parse_skip_list(skip: &str) -> Vec<String> {
    skip.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Names matching any of the patterns (case-insensitive).
///
/// Literal names are kept even when nothing matches them, so an explicit skip
/// of an unknown entity is harmless. Invalid glob patterns are ignored.
pub fn expand_skip_patterns<S: AsRef<str>>(patterns: &[String], names: &[S]) -> Vec<String> {
    let mut skip = Vec::new();
    for pattern in patterns {
        if !is_glob_pattern(pattern) {
            skip.push(pattern.clone());
            continue;
        }
        let Ok(compiled) = Pattern::new(&pattern.to_lowercase()) else {
            continue;
        };
        skip.extend(
            names
                .iter()
                .map(|n| n.as_ref())
                .filter(|n| compiled.matches(&n.to_lowercase()))
                .map(str::to_string),
        );
    }
    skip
}
