//! Source discovery: ordered glob patterns in, relative `/`-separated paths out.
//!
//! Patterns are applied in order. A pattern starting with `!` drops every
//! path collected so far that it matches. A positive pattern that matches
//! nothing is kept verbatim so the read step reports the missing file.
//! Absolute patterns are globbed as written and yield absolute paths.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use preconcat_core::{ErrorCode, SourceFile};
use tracing::{debug, warn};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expand `patterns` relative to `base`.
///
/// # Errors
///
/// Returns an error if a pattern is not a valid glob or a directory cannot
/// be traversed.
pub fn expand_patterns(base: &Path, patterns: &[String]) -> Result<Vec<String>> {
    let mut paths: Vec<String> = Vec::new();

    for raw in patterns {
        if let Some(negated) = raw.strip_prefix('!') {
            let pattern = Pattern::new(negated)
                .with_context(|| format!("invalid glob pattern `{raw}`"))?;
            let before = paths.len();
            paths.retain(|path| !pattern.matches_with(path, MATCH_OPTIONS));
            debug!(pattern = %raw, removed = before - paths.len(), "applied exclusion");
            continue;
        }

        let matches = expand_one(base, raw)?;
        if matches.is_empty() {
            warn!(pattern = %raw, "pattern matched no files, keeping it as a literal path");
            paths.push(raw.clone());
        } else {
            debug!(pattern = %raw, matched = matches.len(), "expanded pattern");
            paths.extend(matches);
        }
    }

    let mut seen = HashSet::with_capacity(paths.len());
    paths.retain(|path| seen.insert(path.clone()));
    Ok(paths)
}

fn expand_one(base: &Path, pattern: &str) -> Result<Vec<String>> {
    let absolute = Path::new(pattern).is_absolute();
    let full = if absolute || is_current_dir(base) {
        pattern.to_string()
    } else {
        format!("{}/{pattern}", Pattern::escape(&base.to_string_lossy()))
    };

    let entries = glob::glob_with(&full, MATCH_OPTIONS)
        .with_context(|| format!("invalid glob pattern `{pattern}`"))?;

    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.context("failed to read glob entry")?;
        if !path.is_file() {
            continue;
        }
        if absolute {
            matches.push(slash_path(&path));
        } else {
            matches.push(slash_path(path.strip_prefix(base).unwrap_or(&path)));
        }
    }
    matches.sort();
    Ok(matches)
}

fn is_current_dir(base: &Path) -> bool {
    base.as_os_str().is_empty() || base == Path::new(".")
}

/// Render `path` with `/` separators, dropping `.` components.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::CurDir => None,
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read every path (relative to `base`) into a [`SourceFile`], in order.
///
/// # Errors
///
/// Fails with [`ErrorCode::SourceReadFailed`] on the first unreadable path.
pub fn read_sources(base: &Path, paths: &[String]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let content = fs::read_to_string(base.join(path))
                .with_context(|| format!("failed to read {path}"))
                .context(ErrorCode::SourceReadFailed)?;
            Ok(SourceFile::new(path.clone(), content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, format!("// {file}\n")).expect("write");
        }
        dir
    }

    fn patterns(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn expands_relative_to_base_in_sorted_order() {
        let dir = tree(&["src/b.js", "src/a.js", "src/util/c.js"]);
        let paths = expand_patterns(dir.path(), &patterns(&["src/**/*.js"])).expect("expand");
        assert_eq!(paths, vec!["src/a.js", "src/b.js", "src/util/c.js"]);
    }

    #[test]
    fn negation_removes_earlier_matches() {
        let dir = tree(&["src/a.js", "src/a.spec.js", "src/util/b.spec.js"]);
        let paths = expand_patterns(dir.path(), &patterns(&["src/**/*.js", "!src/**/*.spec.js"]))
            .expect("expand");
        assert_eq!(paths, vec!["src/a.js"]);
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let dir = tree(&["src/a.js", "src/util/b.js"]);
        let paths = expand_patterns(dir.path(), &patterns(&["src/*.js"])).expect("expand");
        assert_eq!(paths, vec!["src/a.js"]);
    }

    #[test]
    fn unmatched_pattern_is_kept_literally() {
        let dir = tree(&["src/a.js"]);
        let paths = expand_patterns(dir.path(), &patterns(&["src/a.js", "src/missing.js"]))
            .expect("expand");
        assert_eq!(paths, vec!["src/a.js", "src/missing.js"]);
    }

    #[test]
    fn overlapping_patterns_keep_first_occurrence() {
        let dir = tree(&["src/a.js", "src/b.js"]);
        let paths =
            expand_patterns(dir.path(), &patterns(&["src/b.js", "src/*.js"])).expect("expand");
        assert_eq!(paths, vec!["src/b.js", "src/a.js"]);
    }

    #[test]
    fn directories_are_skipped() {
        let dir = tree(&["src/a.js", "src/nested.js/inner.txt"]);
        let paths = expand_patterns(dir.path(), &patterns(&["src/*.js"])).expect("expand");
        assert_eq!(paths, vec!["src/a.js"]);
    }

    #[test]
    fn absolute_pattern_ignores_base() {
        let dir = tree(&["src/a.js", "src/b.txt"]);
        let elsewhere = tree(&[]);
        let pattern = format!("{}/src/*.js", dir.path().display());

        let paths = expand_patterns(elsewhere.path(), &[pattern]).expect("expand");
        assert_eq!(paths, vec![slash_path(&dir.path().join("src/a.js"))]);

        let files = read_sources(elsewhere.path(), &paths).expect("read");
        assert_eq!(files[0].content, "// src/a.js\n");
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let dir = tree(&[]);
        assert!(expand_patterns(dir.path(), &patterns(&["src/[.js"])).is_err());
    }

    #[test]
    fn read_sources_loads_content() {
        let dir = tree(&["src/a.js"]);
        let files = read_sources(dir.path(), &patterns(&["src/a.js"])).expect("read");
        assert_eq!(files, vec![SourceFile::new("src/a.js", "// src/a.js\n")]);
    }

    #[test]
    fn read_failure_carries_error_code() {
        let dir = tree(&[]);
        let err = read_sources(dir.path(), &patterns(&["src/missing.js"])).expect_err("missing");
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::SourceReadFailed));
        assert!(format!("{err:#}").contains("failed to read src/missing.js"));
    }

    #[test]
    fn slash_path_drops_current_dir() {
        assert_eq!(slash_path(Path::new("./src/a.js")), "src/a.js");
    }
}
