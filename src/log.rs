//! First-parent linear history, newest first.

use crate::error::Result;
use crate::objects::{CommitStore, ObjectId};

/// One entry of `log()` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: ObjectId,
    pub timestamp: String,
    pub message: String,
}

/// Walks first parents from `start`, emitting newest first. Merge second
/// parents are never followed. An absent `start` (an `Empty` HEAD) yields
/// an empty log rather than an error.
pub fn walk(commits: &CommitStore, start: Option<ObjectId>) -> Result<Vec<LogEntry>> {
    let mut out = Vec::new();
    let mut current = start;
    while let Some(id) = current {
        let commit = match commits.load(&id) {
            Ok(commit) => commit,
            Err(_) => break,
        };
        out.push(LogEntry {
            id,
            timestamp: commit.timestamp.clone(),
            message: commit.message.clone(),
        });
        current = commit.parent.clone();
    }
    Ok(out)
}
