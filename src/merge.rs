//! Ancestry queries and the two merge strategies.

use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::objects::{CommitStore, ObjectId, Tree};

/// A path whose three-way resolution required the documented conflict
/// policy (target side wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub path: String,
}

/// BFS over the parent DAG from `id`, following both `parent` and
/// `parent2`, skipping the `none` sentinel and already-visited nodes.
/// The returned set always contains `id` itself.
pub fn ancestors(commits: &CommitStore, id: &ObjectId) -> Result<HashSet<ObjectId>> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(id.clone());
    seen.insert(id.clone());

    while let Some(current) = queue.pop_front() {
        let commit = commits.load(&current)?;
        for parent in [commit.parent.clone(), commit.parent2.clone()].into_iter().flatten() {
            if seen.insert(parent.clone()) {
                queue.push_back(parent);
            }
        }
    }
    Ok(seen)
}

/// BFS from `b`; the first node also reachable from `a` is the LCA. When
/// several lowest common ancestors exist, the one this BFS meets first
/// wins — deterministic given stable traversal order.
pub fn lca(commits: &CommitStore, a: &ObjectId, b: &ObjectId) -> Result<Option<ObjectId>> {
    let ancestors_of_a = ancestors(commits, a)?;

    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(b.clone());
    seen.insert(b.clone());

    while let Some(current) = queue.pop_front() {
        if ancestors_of_a.contains(&current) {
            return Ok(Some(current));
        }
        let commit = commits.load(&current)?;
        for parent in [commit.parent.clone(), commit.parent2.clone()].into_iter().flatten() {
            if seen.insert(parent.clone()) {
                queue.push_back(parent);
            }
        }
    }
    Ok(None)
}

/// Overlay merge: union of both trees, `other` wins on path collision.
pub fn merge_simple_tree(head: &Tree, other: &Tree) -> Tree {
    let mut result = head.clone();
    for (path, id) in other {
        result.insert(path.clone(), id.clone());
    }
    result
}

/// Three-way merge over the union of base/head/other paths, applying the
/// documented per-path resolution rules. Returns the merged tree and the
/// list of paths that required the conflict policy (target side wins).
/// Paths whose resolved value is empty are dropped from the result tree.
pub fn merge_three_way_tree(base: &Tree, head: &Tree, other: &Tree) -> (Tree, Vec<Conflict>) {
    let mut paths: HashSet<&str> = HashSet::new();
    paths.extend(base.keys().map(|s| s.as_str()));
    paths.extend(head.keys().map(|s| s.as_str()));
    paths.extend(other.keys().map(|s| s.as_str()));

    let mut sorted_paths: Vec<&str> = paths.into_iter().collect();
    sorted_paths.sort();

    let mut result = Tree::new();
    let mut conflicts = Vec::new();

    for path in sorted_paths {
        let b = base.get(path);
        let c = head.get(path);
        let t = other.get(path);

        let resolved: Option<&ObjectId> = if c == t || b == t {
            c
        } else if b == c {
            t
        } else {
            conflicts.push(Conflict { path: path.to_string() });
            t
        };

        if let Some(id) = resolved {
            result.insert(path.to_string(), id.clone());
        }
    }

    (result, conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Commit, CommitStore};

    fn write(store: &CommitStore, parent: Option<ObjectId>, parent2: Option<ObjectId>, msg: &str) -> ObjectId {
        store
            .write(&Commit {
                timestamp: "t".to_string(),
                message: msg.to_string(),
                parent,
                parent2,
                tree: Tree::new(),
            })
            .unwrap()
    }

    #[test]
    fn ancestors_contains_self_and_closes_over_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CommitStore::new(dir.path().to_path_buf());
        let root = write(&store, None, None, "root");
        let a = write(&store, Some(root.clone()), None, "a");
        let b = write(&store, Some(a.clone()), None, "b");

        let set = ancestors(&store, &b).unwrap();
        assert!(set.contains(&b));
        assert!(set.contains(&a));
        assert!(set.contains(&root));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn lca_of_diverging_branches() {
        // root <- A <- B <- D (parents B and C)
        // root <- A <- C <- D
        let dir = tempfile::TempDir::new().unwrap();
        let store = CommitStore::new(dir.path().to_path_buf());
        let root = write(&store, None, None, "root");
        let a = write(&store, Some(root.clone()), None, "A");
        let b = write(&store, Some(a.clone()), None, "B");
        let c = write(&store, Some(a.clone()), None, "C");
        let _d = write(&store, Some(b.clone()), Some(c.clone()), "D");

        assert_eq!(lca(&store, &b, &c).unwrap(), Some(a));
    }

    #[test]
    fn lca_none_for_disjoint_histories() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CommitStore::new(dir.path().to_path_buf());
        let a = write(&store, None, None, "a");
        let b = write(&store, None, None, "b");
        assert_eq!(lca(&store, &a, &b).unwrap(), None);
    }

    #[test]
    fn simple_merge_is_union_other_wins_on_collision() {
        let mut head = Tree::new();
        head.insert("a.txt".to_string(), "h1".parse().unwrap());
        head.insert("shared.txt".to_string(), "h1".parse().unwrap());
        let mut other = Tree::new();
        other.insert("b.txt".to_string(), "h2".parse().unwrap());
        other.insert("shared.txt".to_string(), "h2".parse().unwrap());

        let merged = merge_simple_tree(&head, &other);
        assert_eq!(merged.get("a.txt").unwrap().as_str(), "h1");
        assert_eq!(merged.get("b.txt").unwrap().as_str(), "h2");
        assert_eq!(merged.get("shared.txt").unwrap().as_str(), "h2");
    }

    #[test]
    fn three_way_no_conflict_disjoint_changes() {
        let mut base = Tree::new();
        base.insert("a".to_string(), "1".parse().unwrap());
        base.insert("b".to_string(), "1".parse().unwrap());
        let mut head = base.clone();
        head.insert("a".to_string(), "2".parse().unwrap());
        let mut other = base.clone();
        other.insert("b".to_string(), "2".parse().unwrap());

        let (merged, conflicts) = merge_three_way_tree(&base, &head, &other);
        assert!(conflicts.is_empty());
        assert_eq!(merged.get("a").unwrap().as_str(), "2");
        assert_eq!(merged.get("b").unwrap().as_str(), "2");
    }

    #[test]
    fn three_way_conflict_target_wins() {
        let mut base = Tree::new();
        base.insert("a".to_string(), "1".parse().unwrap());
        let mut head = base.clone();
        head.insert("a".to_string(), "2".parse().unwrap());
        let mut other = base.clone();
        other.insert("a".to_string(), "3".parse().unwrap());

        let (merged, conflicts) = merge_three_way_tree(&base, &head, &other);
        assert_eq!(conflicts, vec![Conflict { path: "a".to_string() }]);
        assert_eq!(merged.get("a").unwrap().as_str(), "3");
    }

    #[test]
    fn three_way_both_sides_equal_is_not_a_conflict() {
        let mut base = Tree::new();
        base.insert("a".to_string(), "1".parse().unwrap());
        let mut head = base.clone();
        head.insert("a".to_string(), "2".parse().unwrap());
        let other = head.clone();

        let (merged, conflicts) = merge_three_way_tree(&base, &head, &other);
        assert!(conflicts.is_empty());
        assert_eq!(merged.get("a").unwrap().as_str(), "2");
    }
}
