//! Error types for minigit.

use std::fmt;
use std::path::PathBuf;

/// The main error type for minigit operations.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred.
    Io(std::io::Error),

    /// `.minigit/` is missing where a repository was expected.
    NotARepository(PathBuf),

    /// `.minigit/` already exists at the given root.
    AlreadyARepository(PathBuf),

    /// A file to be staged does not exist in the working directory.
    FileMissing(PathBuf),

    /// `commit` was called with an empty index.
    NothingStaged,

    /// A checkout designator resolved to neither a ref nor a commit id.
    UnknownTarget(String),

    /// A merge or lca query named a ref that does not exist.
    RefMissing(String),

    /// Three-way merge found no common ancestor.
    NoCommonAncestor,

    /// A blob or commit id referenced by a commit tree or parent link is absent.
    ObjectMissing(String),

    /// A commit envelope failed to parse.
    MalformedRecord {
        /// What made the record unreadable.
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::NotARepository(path) => {
                write!(f, "not a minigit repository: {}", path.display())
            }
            Error::AlreadyARepository(path) => {
                write!(f, "repository already exists: {}", path.display())
            }
            Error::FileMissing(path) => write!(f, "file not found: {}", path.display()),
            Error::NothingStaged => write!(f, "nothing staged"),
            Error::UnknownTarget(designator) => {
                write!(f, "unknown checkout target: {}", designator)
            }
            Error::RefMissing(name) => write!(f, "reference not found: {}", name),
            Error::NoCommonAncestor => write!(f, "no common ancestor"),
            Error::ObjectMissing(id) => write!(f, "object not found: {}", id),
            Error::MalformedRecord { reason } => write!(f, "malformed commit record: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for minigit operations.
pub type Result<T> = std::result::Result<T, Error>;
