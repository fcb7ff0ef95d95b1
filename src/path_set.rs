//! Ordered path sets and include/exclude file selection
//!
//! A [`PathSet`] is an ordered, deduplicated collection of relative file
//! paths. Order is insertion order, which downstream catenation relies on:
//! files are appended to the accumulator in exactly the order they appear
//! here.
//!
//! [`select_files`] populates a set from an on-disk tree using glob-style
//! include/exclude patterns. The empty-include policy is explicit: no
//! include patterns means no files selected, never "match all".

use std::collections::HashSet;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::Result;

/// An ordered, deduplicated set of relative file paths.
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl PathSet {
    /// Create a new empty path set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path, normalizing separators to `/`. Duplicates are ignored;
    /// the first insertion fixes the position.
    pub fn add(&mut self, path: impl AsRef<str>) {
        let normalized = path.as_ref().replace('\\', "/");
        if self.seen.insert(normalized.clone()) {
            self.paths.push(normalized);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    /// Iterate paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Select files under `base_dir` matching the include patterns and not
/// matching the exclude patterns.
///
/// Returns relative paths in a deterministic order (directory walk sorted by
/// file name). An empty include list selects nothing. Patterns use glob
/// syntax (`*`, `**`, `?`); `case_sensitive` controls matching on both
/// include and exclude sides.
pub fn select_files(
    base_dir: &Path,
    includes: &[String],
    excludes: Option<&[String]>,
    case_sensitive: bool,
) -> Result<PathSet> {
    let mut selected = PathSet::new();
    if includes.is_empty() {
        return Ok(selected);
    }

    let options = MatchOptions {
        case_sensitive,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let include_patterns = compile_patterns(includes)?;
    let exclude_patterns = match excludes {
        Some(patterns) => compile_patterns(patterns)?,
        None => Vec::new(),
    };

    for entry in WalkDir::new(base_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(base_dir) {
            Ok(p) => p,
            Err(_) => continue,
        };
        let Some(relative_str) = relative.to_str() else {
            continue;
        };
        let relative_str = relative_str.replace('\\', "/");

        let included = include_patterns
            .iter()
            .any(|p| p.matches_with(&relative_str, options));
        let excluded = exclude_patterns
            .iter()
            .any(|p| p.matches_with(&relative_str, options));
        if included && !excluded {
            selected.add(relative_str);
        }
    }

    Ok(selected)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(crate::error::Error::Glob))
        .collect()
}
