//! Flat ref namespace plus the HEAD slot, both written atomically.

use std::fs;
use std::path::PathBuf;

use super::head::Head;
use crate::error::{Error, Result};
use crate::infra::{read_file, write_file_atomic};
use crate::objects::ObjectId;

/// Owns `.minigit/refs/` and `.minigit/HEAD`.
#[derive(Debug, Clone)]
pub struct RefStore {
    minigit_dir: PathBuf,
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(Error::MalformedRecord {
            reason: format!("invalid ref name: {:?}", name),
        });
    }
    Ok(())
}

impl RefStore {
    pub fn new(minigit_dir: PathBuf) -> Self {
        RefStore { minigit_dir }
    }

    fn refs_dir(&self) -> PathBuf {
        self.minigit_dir.join("refs")
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        self.refs_dir().join(name)
    }

    fn head_path(&self) -> PathBuf {
        self.minigit_dir.join("HEAD")
    }

    pub fn set_ref(&self, name: &str, id: &ObjectId) -> Result<()> {
        validate_name(name)?;
        write_file_atomic(self.ref_path(name), format!("{}\n", id).as_bytes())
    }

    pub fn get_ref(&self, name: &str) -> Result<ObjectId> {
        validate_name(name)?;
        let path = self.ref_path(name);
        if !path.is_file() {
            return Err(Error::RefMissing(name.to_string()));
        }
        let bytes = read_file(&path)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::MalformedRecord {
            reason: format!("ref {:?} is not valid UTF-8", name),
        })?;
        text.trim().parse::<ObjectId>()
    }

    pub fn ref_exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.ref_path(name).is_file()
    }

    pub fn list_refs(&self) -> Result<Vec<(String, ObjectId)>> {
        let dir = self.refs_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let name = entry.file_name().to_string_lossy().to_string();
                out.push((name.clone(), self.get_ref(&name)?));
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    pub fn read_head(&self) -> Result<Head> {
        let path = self.head_path();
        if !path.is_file() {
            return Ok(Head::Empty);
        }
        let bytes = read_file(&path)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::MalformedRecord {
            reason: "HEAD is not valid UTF-8".to_string(),
        })?;
        Head::parse(&text)
    }

    pub fn write_head_attached(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        write_file_atomic(self.head_path(), Head::Attached(name.to_string()).serialize().as_bytes())
    }

    pub fn write_head_detached(&self, id: &ObjectId) -> Result<()> {
        write_file_atomic(self.head_path(), Head::Detached(id.clone()).serialize().as_bytes())
    }

    /// Initializes an empty HEAD file, used by repository init.
    pub fn write_head_empty(&self) -> Result<()> {
        write_file_atomic(self.head_path(), b"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, RefStore) {
        let dir = TempDir::new().unwrap();
        (dir, RefStore::new(dir.path().to_path_buf()))
    }

    #[test]
    fn set_then_get_ref_round_trips() {
        let (_dir, store) = store();
        let id: ObjectId = "abc123".parse().unwrap();
        store.set_ref("main", &id).unwrap();
        assert_eq!(store.get_ref("main").unwrap(), id);
        assert!(store.ref_exists("main"));
    }

    #[test]
    fn get_missing_ref_errors() {
        let (_dir, store) = store();
        assert!(matches!(store.get_ref("nope"), Err(Error::RefMissing(_))));
    }

    #[test]
    fn set_ref_overwrites() {
        let (_dir, store) = store();
        let a: ObjectId = "aaa".parse().unwrap();
        let b: ObjectId = "bbb".parse().unwrap();
        store.set_ref("main", &a).unwrap();
        store.set_ref("main", &b).unwrap();
        assert_eq!(store.get_ref("main").unwrap(), b);
    }

    #[test]
    fn list_refs_sorted_by_name() {
        let (_dir, store) = store();
        let id: ObjectId = "aaa".parse().unwrap();
        store.set_ref("zeta", &id).unwrap();
        store.set_ref("alpha", &id).unwrap();
        let names: Vec<_> = store.list_refs().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn head_defaults_to_empty() {
        let (_dir, store) = store();
        assert_eq!(store.read_head().unwrap(), Head::Empty);
    }

    #[test]
    fn head_attach_and_detach_round_trip() {
        let (_dir, store) = store();
        store.write_head_attached("dev").unwrap();
        assert_eq!(store.read_head().unwrap(), Head::Attached("dev".to_string()));

        let id: ObjectId = "deadbeef".parse().unwrap();
        store.write_head_detached(&id).unwrap();
        assert_eq!(store.read_head().unwrap(), Head::Detached(id));
    }

    #[test]
    fn rejects_ref_names_with_path_separators() {
        let (_dir, store) = store();
        let id: ObjectId = "aaa".parse().unwrap();
        assert!(store.set_ref("a/b", &id).is_err());
        assert!(store.set_ref("", &id).is_err());
    }
}
