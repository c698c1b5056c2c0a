//! Object model: blob store and commit records.

pub mod commit;
pub mod oid;
pub mod store;

pub use commit::{Commit, CommitStore, Tree};
pub use oid::ObjectId;
pub use store::ObjectStore;
