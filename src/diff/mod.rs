//! Line-level diff between same-path blobs across two commits.
//!
//! This is deliberately NOT a minimal LCS diff: it is a stable, positional
//! comparison that walks both line sequences in lockstep.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::objects::{Commit, ObjectStore};

/// One line of a text diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Removed(String),
    Added(String),
}

/// The diff for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDiff {
    /// Both sides are identical (or the path is present on only one side
    /// with no counterpart to compare against is still run through the
    /// positional algorithm against an empty sequence).
    Text { path: String, lines: Vec<DiffLine> },
    /// At least one side failed to decode as UTF-8.
    Binary { path: String },
}

impl FileDiff {
    pub fn path(&self) -> &str {
        match self {
            FileDiff::Text { path, .. } => path,
            FileDiff::Binary { path } => path,
        }
    }
}

/// Walks two line sequences positionally: equal lines emit context,
/// unequal lines emit a delete then an add and both indices advance,
/// and exhaustion of one side emits the remaining trailing lines.
pub fn diff_lines(a: &[&str], b: &[&str]) -> Vec<DiffLine> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(DiffLine::Context(a[i].to_string()));
            i += 1;
            j += 1;
        } else {
            out.push(DiffLine::Removed(a[i].to_string()));
            out.push(DiffLine::Added(b[j].to_string()));
            i += 1;
            j += 1;
        }
    }
    while i < a.len() {
        out.push(DiffLine::Removed(a[i].to_string()));
        i += 1;
    }
    while j < b.len() {
        out.push(DiffLine::Added(b[j].to_string()));
        j += 1;
    }
    out
}

/// Diffs two commits over the union of their tree paths.
pub fn diff_commits(
    objects: &ObjectStore,
    commit_a: &Commit,
    commit_b: &Commit,
) -> Result<Vec<FileDiff>> {
    let mut paths: BTreeSet<&str> = BTreeSet::new();
    paths.extend(commit_a.tree.keys().map(|s| s.as_str()));
    paths.extend(commit_b.tree.keys().map(|s| s.as_str()));

    let mut out = Vec::new();
    for path in paths {
        let bytes_a = match commit_a.tree.get(path) {
            Some(id) => objects.get(id)?,
            None => Vec::new(),
        };
        let bytes_b = match commit_b.tree.get(path) {
            Some(id) => objects.get(id)?,
            None => Vec::new(),
        };

        let text_a = std::str::from_utf8(&bytes_a);
        let text_b = std::str::from_utf8(&bytes_b);
        match (text_a, text_b) {
            (Ok(a), Ok(b)) => {
                let a_lines: Vec<&str> = if a.is_empty() { Vec::new() } else { a.lines().collect() };
                let b_lines: Vec<&str> = if b.is_empty() { Vec::new() } else { b.lines().collect() };
                out.push(FileDiff::Text {
                    path: path.to_string(),
                    lines: diff_lines(&a_lines, &b_lines),
                });
            }
            _ => out.push(FileDiff::Binary { path: path.to_string() }),
        }
    }
    Ok(out)
}
