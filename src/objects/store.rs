//! Content-addressed blob store.
//!
//! Objects are stored as their literal bytes under `objects/<id>` with no
//! header, type tag, or compression — `cat`-ing an object file reproduces
//! exactly what was staged.

use std::path::PathBuf;

use super::oid::ObjectId;
use crate::error::{Error, Result};
use crate::infra::{digest, read_file, write_file_atomic};

/// The blob store rooted at `.minigit/objects`.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: PathBuf) -> Self {
        ObjectStore { root }
    }

    fn path_for(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Writes `bytes`, returning its id. A no-op if the object already
    /// exists: content is assumed identical for a shared id.
    pub fn put(&self, bytes: &[u8]) -> Result<ObjectId> {
        let id = ObjectId::from_digest(digest(bytes));
        let path = self.path_for(&id);
        if !path.is_file() {
            write_file_atomic(&path, bytes)?;
        }
        Ok(id)
    }

    pub fn get(&self, id: &ObjectId) -> Result<Vec<u8>> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(Error::ObjectMissing(id.to_string()));
        }
        read_file(&path)
    }

    pub fn exists(&self, id: &ObjectId) -> bool {
        self.path_for(id).is_file()
    }
}
