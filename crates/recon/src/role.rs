//! Member roles as a set of tags.
//!
//! Roster files store the role as display text such as
//! `"President, Cooking Captain"`. Reconciliation works on tags and only
//! renders text when a record is written back.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleTag {
    President,
    Member,
    CookingCaptain,
    Other(String),
}

impl RoleTag {
    fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "president" => Self::President,
            "member" => Self::Member,
            "cooking captain" => Self::CookingCaptain,
            _ => Self::Other(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::President => "President",
            Self::Member => "Member",
            Self::CookingCaptain => "Cooking Captain",
            Self::Other(label) => label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    tags: Vec<RoleTag>,
}

impl RoleSet {
    /// Parse comma-separated role text. Blank parts and repeats are dropped.
    pub fn parse(text: &str) -> Self {
        let mut set = Self::default();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            set.insert(RoleTag::parse(part));
        }
        set
    }

    pub fn insert(&mut self, tag: RoleTag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn remove(&mut self, tag: &RoleTag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn contains(&self, tag: &RoleTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_captain(&self) -> bool {
        self.contains(&RoleTag::CookingCaptain)
    }

    /// Make this member a cooking captain. The plain `Member` tag is replaced;
    /// offices such as `President` are kept. Returns whether anything changed.
    pub fn promote_to_captain(&mut self) -> bool {
        let dropped = self.remove(&RoleTag::Member);
        let added = self.insert(RoleTag::CookingCaptain);
        dropped || added
    }
}

/// Display order: `President` first, other tags as parsed, `Cooking Captain`
/// last.
impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let president = self.tags.iter().filter(|t| **t == RoleTag::President);
        let middle = self
            .tags
            .iter()
            .filter(|t| !matches!(t, RoleTag::President | RoleTag::CookingCaptain));
        let captain = self.tags.iter().filter(|t| **t == RoleTag::CookingCaptain);

        let mut first = true;
        for tag in president.chain(middle).chain(captain) {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(tag.label())?;
            first = false;
        }
        Ok(())
    }
}
