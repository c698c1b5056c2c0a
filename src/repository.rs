//! The `Repository` handle: the command API consumed by any front-end.
//!
//! Every operation takes an explicit handle carrying the repository root —
//! there is no process-wide mutable state. Initialization is explicit
//! (`init`/`open`); there is no teardown, since no in-memory resource
//! outlives a single call.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::diff::{diff_commits, FileDiff};
use crate::error::{Error, Result};
use crate::index::{index_path, Index};
use crate::infra::{list_working_tree, read_file, write_file_atomic};
use crate::log::{self, LogEntry};
use crate::merge::{self, Conflict};
use crate::objects::{Commit, CommitStore, ObjectId, ObjectStore, Tree};
use crate::refs::{Head, RefStore};

const STORE_DIR_NAME: &str = ".minigit";

/// A handle onto one minigit repository, rooted at a working directory.
#[derive(Debug)]
pub struct Repository {
    work_dir: PathBuf,
    minigit_dir: PathBuf,
    objects: ObjectStore,
    commits: CommitStore,
    refs: RefStore,
}

/// The outcome of a merge: the new commit id plus any conflicts the
/// three-way resolution policy had to apply (target side wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub commit_id: ObjectId,
    pub conflicts: Vec<Conflict>,
}

impl Repository {
    fn minigit_dir_for(root: &Path) -> PathBuf {
        root.join(STORE_DIR_NAME)
    }

    /// Creates a fresh repository layout at `root`. Fails if `.minigit/`
    /// already exists there.
    pub fn init(root: impl Into<PathBuf>) -> Result<Repository> {
        let work_dir = root.into();
        let minigit_dir = Self::minigit_dir_for(&work_dir);
        if minigit_dir.is_dir() {
            return Err(Error::AlreadyARepository(minigit_dir));
        }

        std::fs::create_dir_all(&minigit_dir)?;
        std::fs::create_dir_all(minigit_dir.join("objects"))?;
        std::fs::create_dir_all(minigit_dir.join("commits"))?;
        std::fs::create_dir_all(minigit_dir.join("refs"))?;

        let refs = RefStore::new(minigit_dir.clone());
        refs.write_head_empty()?;

        Ok(Repository {
            objects: ObjectStore::new(minigit_dir.join("objects")),
            commits: CommitStore::new(minigit_dir.join("commits")),
            refs,
            work_dir,
            minigit_dir,
        })
    }

    /// Opens an existing repository at `root`. Fails with
    /// [`Error::NotARepository`] if no `.minigit/` directory is present.
    /// Repository discovery never walks up parent directories: the root
    /// must be given explicitly.
    pub fn open(root: impl Into<PathBuf>) -> Result<Repository> {
        let work_dir = root.into();
        let minigit_dir = Self::minigit_dir_for(&work_dir);
        if !minigit_dir.is_dir() {
            return Err(Error::NotARepository(minigit_dir));
        }
        Ok(Repository {
            objects: ObjectStore::new(minigit_dir.join("objects")),
            commits: CommitStore::new(minigit_dir.join("commits")),
            refs: RefStore::new(minigit_dir.clone()),
            work_dir,
            minigit_dir,
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn index_file(&self) -> PathBuf {
        index_path(&self.minigit_dir)
    }

    fn load_index(&self) -> Result<Index> {
        Index::load(&self.index_file())
    }

    // -- staging --------------------------------------------------------

    /// Stages the working-directory file at `path`, returning its blob id.
    pub fn stage(&self, path: impl AsRef<Path>) -> Result<ObjectId> {
        let path = path.as_ref();
        let abs = self.work_dir.join(path);
        if !abs.is_file() {
            return Err(Error::FileMissing(path.to_path_buf()));
        }
        let bytes = read_file(&abs)?;
        let blob_id = self.objects.put(&bytes)?;

        let mut index = self.load_index()?;
        index.append(path.to_string_lossy().to_string(), blob_id.clone());
        index.save(&self.index_file())?;

        Ok(blob_id)
    }

    /// Stages every regular file found under the working directory
    /// (excluding the `.minigit` store itself). A convenience built from
    /// the same [`stage`](Self::stage) primitive for an `add .`-style
    /// front-end command.
    pub fn stage_all(&self) -> Result<Vec<ObjectId>> {
        let files = list_working_tree(&self.work_dir, STORE_DIR_NAME)?;
        files.into_iter().map(|p| self.stage(p)).collect()
    }

    // -- committing -------------------------------------------------------

    /// Builds a commit from the current index, advances HEAD, and clears
    /// the index. Fails with [`Error::NothingStaged`] if the index is
    /// empty, and with [`Error::MalformedRecord`] if `message` spans more
    /// than one line (the envelope format has no escaping for embedded
    /// newlines).
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        if message.contains('\n') {
            return Err(Error::MalformedRecord {
                reason: "commit message must be single-line".to_string(),
            });
        }

        let mut index = self.load_index()?;
        if index.is_empty() {
            return Err(Error::NothingStaged);
        }

        let head = self.refs.read_head()?;
        let parent = match &head {
            Head::Attached(name) => Some(self.refs.get_ref(name)?),
            Head::Detached(id) => Some(id.clone()),
            Head::Empty => None,
        };

        let tree = index.current_tree();
        let commit = Commit {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            message: message.to_string(),
            parent,
            parent2: None,
            tree,
        };
        let commit_id = self.commits.write(&commit)?;

        match &head {
            Head::Attached(name) => {
                self.refs.set_ref(name, &commit_id)?;
            }
            Head::Detached(_) | Head::Empty => {
                self.refs.write_head_detached(&commit_id)?;
            }
        }

        index.clear();
        index.save(&self.index_file())?;

        Ok(commit_id)
    }

    // -- branching / checkout --------------------------------------------

    fn resolve_head_commit_id(&self) -> Result<ObjectId> {
        match self.refs.read_head()? {
            Head::Attached(name) => self.refs.get_ref(&name),
            Head::Detached(id) => Ok(id),
            Head::Empty => Err(Error::UnknownTarget("HEAD".to_string())),
        }
    }

    /// Creates a ref named `name` pointing at HEAD's resolved commit.
    pub fn branch(&self, name: &str) -> Result<()> {
        let id = self.resolve_head_commit_id()?;
        self.refs.set_ref(name, &id)
    }

    /// Resolves `designator` (a ref name or a commit id), materializes its
    /// tree into the working directory, and updates HEAD. Files present in
    /// the working directory but absent from the target tree are left
    /// untouched. Does not consult or modify the index.
    pub fn checkout(&self, designator: &str) -> Result<()> {
        let (commit_id, was_ref) = if self.refs.ref_exists(designator) {
            (self.refs.get_ref(designator)?, true)
        } else if let Ok(id) = designator.parse::<ObjectId>() {
            if self.commits.exists(&id) {
                (id, false)
            } else {
                return Err(Error::UnknownTarget(designator.to_string()));
            }
        } else {
            return Err(Error::UnknownTarget(designator.to_string()));
        };

        let commit = self.commits.load(&commit_id)?;
        for (path, blob_id) in &commit.tree {
            let bytes = self.objects.get(blob_id)?;
            write_file_atomic(self.work_dir.join(path), &bytes)?;
        }

        if was_ref {
            self.refs.write_head_attached(designator)?;
        } else {
            self.refs.write_head_detached(&commit_id)?;
        }
        Ok(())
    }

    // -- history / inspection ---------------------------------------------

    /// Enumerates commits reachable from HEAD via first parent, newest
    /// first. An `Empty` HEAD yields an empty log.
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        let start = match self.refs.read_head()? {
            Head::Attached(name) => Some(self.refs.get_ref(&name)?),
            Head::Detached(id) => Some(id),
            Head::Empty => None,
        };
        log::walk(&self.commits, start)
    }

    /// Diffs two commits, returning one entry per path in their union.
    pub fn diff(&self, id_a: &str, id_b: &str) -> Result<Vec<FileDiff>> {
        let a = self.commits.load(&id_a.parse()?)?;
        let b = self.commits.load(&id_b.parse()?)?;
        diff_commits(&self.objects, &a, &b)
    }

    // -- merging -----------------------------------------------------------

    fn other_branch_tip(&self, branch_name: &str) -> Result<ObjectId> {
        self.refs.get_ref(branch_name)
    }

    fn tree_of(&self, id: &ObjectId) -> Result<Tree> {
        Ok(self.commits.load(id)?.tree.clone())
    }

    fn write_merge_commit(
        &self,
        head_id: ObjectId,
        other_id: ObjectId,
        message: String,
        tree: Tree,
    ) -> Result<ObjectId> {
        let commit = Commit {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            message,
            parent: Some(head_id),
            parent2: Some(other_id),
            tree,
        };
        let commit_id = self.commits.write(&commit)?;

        match self.refs.read_head()? {
            Head::Attached(name) => self.refs.set_ref(&name, &commit_id)?,
            Head::Detached(_) | Head::Empty => self.refs.write_head_detached(&commit_id)?,
        }
        Ok(commit_id)
    }

    /// Overlay merge: the union of HEAD's tree and `branch_name`'s tree,
    /// `branch_name`'s entries winning on collision. Does not touch the
    /// working directory.
    pub fn merge_simple(&self, branch_name: &str) -> Result<ObjectId> {
        let head_id = self.resolve_head_commit_id()?;
        let other_id = self.other_branch_tip(branch_name)?;

        let head_tree = self.tree_of(&head_id)?;
        let other_tree = self.tree_of(&other_id)?;
        let merged = merge::merge_simple_tree(&head_tree, &other_tree);

        self.write_merge_commit(
            head_id,
            other_id,
            format!("Merged branch '{}'", branch_name),
            merged,
        )
    }

    /// Three-way merge of HEAD and `branch_name` against their lowest
    /// common ancestor. Conflicts are reported, not fatal: the merge
    /// commit is still created with the target side winning on each
    /// conflicting path.
    pub fn merge_three_way(&self, branch_name: &str) -> Result<MergeOutcome> {
        let head_id = self.resolve_head_commit_id()?;
        let other_id = self.other_branch_tip(branch_name)?;
        let base_id = merge::lca(&self.commits, &head_id, &other_id)?
            .ok_or(Error::NoCommonAncestor)?;

        let base_tree = self.tree_of(&base_id)?;
        let head_tree = self.tree_of(&head_id)?;
        let other_tree = self.tree_of(&other_id)?;
        let (merged, conflicts) = merge::merge_three_way_tree(&base_tree, &head_tree, &other_tree);

        let commit_id = self.write_merge_commit(
            head_id,
            other_id,
            format!("3-way merge with branch '{}'", branch_name),
            merged,
        )?;

        Ok(MergeOutcome { commit_id, conflicts })
    }

    /// Reports the lowest common ancestor of HEAD and `branch_name`
    /// without creating any commit.
    pub fn lca(&self, branch_name: &str) -> Result<ObjectId> {
        let head_id = self.resolve_head_commit_id()?;
        let other_id = self.other_branch_tip(branch_name)?;
        merge::lca(&self.commits, &head_id, &other_id)?.ok_or(Error::NoCommonAncestor)
    }
}
