/// Catalog orderings and query results
use crate::error::ShelfError;
use crate::types::CatalogEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The supported catalog orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Most recently read first; never-read entries last
    #[serde(rename = "last-read")]
    ByLastRead,

    /// Most recently added first
    #[default]
    #[serde(rename = "last-added")]
    LastAdded,

    /// Unread entries only, most recently added first
    #[serde(rename = "unread")]
    Unread,

    /// Title ascending
    #[serde(rename = "title")]
    ByTitle,

    /// Author surname, then given name, ascending
    #[serde(rename = "author")]
    ByAuthor,
}

impl Selection {
    pub const ALL: [Selection; 5] = [
        Selection::ByLastRead,
        Selection::LastAdded,
        Selection::Unread,
        Selection::ByTitle,
        Selection::ByAuthor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByLastRead => "last-read",
            Self::LastAdded => "last-added",
            Self::Unread => "unread",
            Self::ByTitle => "title",
            Self::ByAuthor => "author",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selection {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sel| sel.as_str() == s)
            .ok_or_else(|| {
                ShelfError::invalid_input(format!(
                    "unknown ordering '{}' (expected one of: last-read, last-added, unread, title, author)",
                    s
                ))
            })
    }
}

/// Ordered entries plus the number of matching entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub entries: Vec<CatalogEntry>,
    pub total: usize,
}

impl QueryResult {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let total = entries.len();
        Self { entries, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = CatalogEntry;
    type IntoIter = std::vec::IntoIter<CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
