//! Small filesystem helpers shared by every on-disk store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Reads the entire contents of a file as bytes.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(fs::read(path.as_ref())?)
}

/// Writes `data` to `path` atomically: write to a sibling temp file, then
/// rename it into place. Readers never observe a partially written file.
/// Creates parent directories as needed.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = sibling_temp_path(path);
    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(&temp_path, path)?;

    Ok(())
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "tmp".to_string());
    let mut temp = path.to_path_buf();
    temp.set_file_name(format!(".{}.tmp", file_name));
    temp
}

/// Recursively lists every regular file under `root`, excluding `skip_dir`
/// (typically the store's own directory), as paths relative to `root`.
pub fn list_working_tree<P: AsRef<Path>>(root: P, skip_dir: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();
    walk(root, root, skip_dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(root: &Path, current: &Path, skip_dir: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    if !current.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_name() == skip_dir {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_file() {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            files.push(relative.to_path_buf());
        } else if file_type.is_dir() {
            walk(root, &path, skip_dir, files)?;
        }
    }
    Ok(())
}
