//! The index (staging area): an append-only list of staged path/blob-id
//! pairs, persisted as the flat text form `<path> <blob-id>` per line.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::infra::{read_file, write_file_atomic};
use crate::objects::{ObjectId, Tree};

/// A single staged entry. Duplicate paths are legal; the last entry for a
/// path wins when the index is folded into a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: String,
    pub blob_id: ObjectId,
}

/// The ordered sequence of staged entries since the last commit.
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Index { entries: Vec::new() }
    }

    /// Loads the index file; a missing file is equivalent to an empty index.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Index::new());
        }
        let bytes = read_file(path)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::MalformedRecord {
            reason: "index is not valid UTF-8".to_string(),
        })?;
        let mut entries = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, ' ');
            let path = parts.next().ok_or_else(|| Error::MalformedRecord {
                reason: format!("malformed index line: {:?}", line),
            })?;
            let blob_id = parts.next().ok_or_else(|| Error::MalformedRecord {
                reason: format!("malformed index line: {:?}", line),
            })?;
            entries.push(IndexEntry {
                path: path.to_string(),
                blob_id: blob_id.parse()?,
            });
        }
        Ok(Index { entries })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&format!("{} {}\n", entry.path, entry.blob_id));
        }
        write_file_atomic(path, text.as_bytes())
    }

    pub fn append(&mut self, path: String, blob_id: ObjectId) {
        self.entries.push(IndexEntry { path, blob_id });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Folds the ordered entries into a tree, last write wins per path.
    pub fn current_tree(&self) -> Tree {
        let mut tree = Tree::new();
        for entry in &self.entries {
            tree.insert(entry.path.clone(), entry.blob_id.clone());
        }
        tree
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The repository-relative path of the index file.
pub fn index_path(minigit_dir: &Path) -> PathBuf {
    minigit_dir.join("index")
}
