//! # minigit
//!
//! The core of a miniature content-addressed version-control system: a
//! deduplicating object store, a named-ref namespace, an append-only
//! commit DAG, a working-tree checkout engine, and a merge engine
//! supporting both a simple overlay merge and a three-way merge with
//! lowest-common-ancestor resolution.
//!
//! This crate is the command API only — there is no interactive CLI here.
//! A front-end (menu loop, prompt formatting, environment bootstrap) is
//! expected to sit on top of [`Repository`] and map its own verbs onto
//! this crate's operations.
//!
//! ## Quick start
//!
//! ```no_run
//! use minigit::{Repository, Result};
//!
//! fn main() -> Result<()> {
//!     let repo = Repository::init("my-project")?;
//!     std::fs::write("my-project/a.txt", b"hello\n")?;
//!     repo.stage("a.txt")?;
//!     let commit_id = repo.commit("first commit")?;
//!     println!("committed {commit_id}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module overview
//!
//! - [`error`] — the error taxonomy and `Result` alias
//! - [`repository`] — the [`Repository`] handle, the crate's command API
//! - [`objects`] — object ids, the blob store, and commit records
//! - [`refs`] — the HEAD state machine and the flat ref namespace
//! - [`index`] — the staging area
//! - [`diff`] — positional line diffing between commits
//! - [`log`] — first-parent history traversal
//! - [`merge`] — ancestry, lowest common ancestor, and the two merge strategies

pub mod diff;
pub mod error;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod refs;
pub mod repository;

pub(crate) mod infra;

pub use error::{Error, Result};
pub use repository::{MergeOutcome, Repository};

pub use diff::{DiffLine, FileDiff};
pub use index::{Index, IndexEntry};
pub use log::LogEntry;
pub use merge::Conflict;
pub use objects::{Commit, ObjectId, Tree};
pub use refs::Head;
