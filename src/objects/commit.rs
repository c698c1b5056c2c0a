//! Commit records: the text envelope binding a tree, metadata and parents.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::rc::Rc;

use super::oid::{ObjectId, NONE_SENTINEL};
use crate::error::{Error, Result};
use crate::infra::{digest, read_file, write_file_atomic};

/// A path -> blob-id mapping held inside a commit. Keys are unique; ascending
/// order is required only at serialization time.
pub type Tree = BTreeMap<String, ObjectId>;

/// An immutable commit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub timestamp: String,
    pub message: String,
    pub parent: Option<ObjectId>,
    pub parent2: Option<ObjectId>,
    pub tree: Tree,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parent2.is_some()
    }

    /// Renders the commit in the exact textual envelope described by the
    /// commit-store format: one header line per field, then a `blobs:`
    /// section with two-space-indented `<path> <blob-id>` lines in
    /// ascending path order.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("timestamp: {}\n", self.timestamp));
        out.push_str(&format!("message: {}\n", self.message));
        match &self.parent {
            Some(id) => out.push_str(&format!("parent: {}\n", id)),
            None => out.push_str(&format!("parent: {}\n", NONE_SENTINEL)),
        }
        if let Some(id) = &self.parent2 {
            out.push_str(&format!("parent2: {}\n", id));
        }
        out.push_str("blobs:\n");
        for (path, blob_id) in &self.tree {
            out.push_str(&format!("  {} {}\n", path, blob_id));
        }
        out
    }

    /// Parses the envelope produced by [`Commit::serialize`]. Any line
    /// outside the recognized header fields and the `blobs:` section is a
    /// parse failure.
    pub fn parse(text: &str) -> Result<Commit> {
        let mut lines = text.lines();

        let timestamp = parse_field(lines.next(), "timestamp")?;
        let message = parse_field(lines.next(), "message")?;
        let parent_raw = parse_field(lines.next(), "parent")?;
        let parent = if parent_raw == NONE_SENTINEL {
            None
        } else {
            Some(parent_raw.parse::<ObjectId>()?)
        };

        let mut next_line = lines.next();
        let mut parent2 = None;
        if let Some(line) = next_line {
            if let Some(rest) = line.strip_prefix("parent2: ") {
                parent2 = Some(rest.parse::<ObjectId>()?);
                next_line = lines.next();
            }
        }

        match next_line {
            Some("blobs:") => {}
            Some(other) => {
                return Err(Error::MalformedRecord {
                    reason: format!("expected `blobs:` header, found {:?}", other),
                })
            }
            None => {
                return Err(Error::MalformedRecord {
                    reason: "missing `blobs:` section".to_string(),
                })
            }
        }

        let mut tree = Tree::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let rest = line.strip_prefix("  ").ok_or_else(|| Error::MalformedRecord {
                reason: format!("blob line not indented by two spaces: {:?}", line),
            })?;
            let mut parts = rest.splitn(2, ' ');
            let path = parts.next().ok_or_else(|| Error::MalformedRecord {
                reason: format!("blob line missing path: {:?}", line),
            })?;
            let blob_id = parts.next().ok_or_else(|| Error::MalformedRecord {
                reason: format!("blob line missing blob id: {:?}", line),
            })?;
            tree.insert(path.to_string(), blob_id.parse::<ObjectId>()?);
        }

        Ok(Commit {
            timestamp,
            message,
            parent,
            parent2,
            tree,
        })
    }
}

fn parse_field(line: Option<&str>, key: &str) -> Result<String> {
    let line = line.ok_or_else(|| Error::MalformedRecord {
        reason: format!("missing `{}:` field", key),
    })?;
    let prefix = format!("{}: ", key);
    line.strip_prefix(&prefix)
        .map(|s| s.to_string())
        .ok_or_else(|| Error::MalformedRecord {
            reason: format!("expected `{}:` field, found {:?}", key, line),
        })
}

/// Maps commit ids to their parsed records on disk, with an in-process
/// cache that lives only for the duration of the owning `CommitStore` —
/// a fresh `Repository` handle starts with an empty cache.
#[derive(Debug)]
pub struct CommitStore {
    root: PathBuf,
    cache: RefCell<HashMap<ObjectId, Rc<Commit>>>,
}

impl CommitStore {
    pub fn new(root: PathBuf) -> Self {
        CommitStore {
            root,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn path_for(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Serializes and writes `commit`, returning its id. A no-op on content
    /// if a commit with the same id is already stored.
    pub fn write(&self, commit: &Commit) -> Result<ObjectId> {
        let text = commit.serialize();
        let id = ObjectId::from_digest(digest(text.as_bytes()));
        let path = self.path_for(&id);
        if !path.is_file() {
            write_file_atomic(&path, text.as_bytes())?;
        }
        self.cache
            .borrow_mut()
            .insert(id.clone(), Rc::new(commit.clone()));
        Ok(id)
    }

    pub fn load(&self, id: &ObjectId) -> Result<Rc<Commit>> {
        if let Some(hit) = self.cache.borrow().get(id) {
            return Ok(Rc::clone(hit));
        }
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(Error::ObjectMissing(id.to_string()));
        }
        let bytes = read_file(&path)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::MalformedRecord {
            reason: "commit envelope is not valid UTF-8".to_string(),
        })?;
        let commit = Rc::new(Commit::parse(&text)?);
        self.cache.borrow_mut().insert(id.clone(), Rc::clone(&commit));
        Ok(commit)
    }

    pub fn exists(&self, id: &ObjectId) -> bool {
        self.cache.borrow().contains_key(id) || self.path_for(id).is_file()
    }
}
