//! The HEAD state machine: Empty, Attached(branch), or Detached(commit).

use crate::error::Result;
use crate::objects::ObjectId;

/// Where the working tree is currently checked out.
///
/// Replaces the convention (seen in some source implementations) of
/// overloading a single text file and returning its literal first line —
/// `HEAD` is always resolved into this tagged form before a caller sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// No commit has ever been made in this repository.
    Empty,
    /// HEAD follows a named ref; commits advance that ref.
    Attached(String),
    /// HEAD points directly at a commit id; commits leave no ref updated.
    Detached(ObjectId),
}

impl Head {
    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }

    pub fn branch_name(&self) -> Option<&str> {
        match self {
            Head::Attached(name) => Some(name),
            _ => None,
        }
    }

    /// Renders HEAD's on-disk form: `ref: refs/<name>\n` when attached, a
    /// bare id followed by `\n` when detached, empty when no commit exists.
    pub fn serialize(&self) -> String {
        match self {
            Head::Empty => String::new(),
            Head::Attached(name) => format!("ref: refs/{}\n", name),
            Head::Detached(id) => format!("{}\n", id),
        }
    }

    pub fn parse(text: &str) -> Result<Head> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Head::Empty);
        }
        if let Some(name) = trimmed.strip_prefix("ref: refs/") {
            return Ok(Head::Attached(name.to_string()));
        }
        Ok(Head::Detached(trimmed.parse::<ObjectId>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_round_trips() {
        assert_eq!(Head::parse("").unwrap(), Head::Empty);
        assert_eq!(Head::Empty.serialize(), "");
    }

    #[test]
    fn attached_round_trips() {
        let head = Head::Attached("main".to_string());
        let text = head.serialize();
        assert_eq!(text, "ref: refs/main\n");
        assert_eq!(Head::parse(&text).unwrap(), head);
    }

    #[test]
    fn detached_round_trips() {
        let id: ObjectId = "deadbeef".parse().unwrap();
        let head = Head::Detached(id);
        let text = head.serialize();
        assert_eq!(text, "deadbeef\n");
        assert_eq!(Head::parse(&text).unwrap(), head);
    }

    #[test]
    fn never_resolves_to_the_literal_ref_string() {
        let head = Head::parse("ref: refs/dev\n").unwrap();
        assert!(matches!(head, Head::Attached(ref name) if name == "dev"));
    }
}
