/// Catalog entry domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Unique catalog key, derived from the source file name
///
/// The same file offered twice (from any folder) maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    /// Create a key from a raw string
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key for a source file
    ///
    /// Returns `None` for paths without a final component (e.g. `/` or `..`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .map(|name| Self(name.to_string_lossy().into_owned()))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured author name; either part may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Split a free-form name into given and family name
    ///
    /// Accepts both "First Last" and the catalogue form "Last, First".
    /// A single word is treated as a family name.
    pub fn from_full_name(name: &str) -> Self {
        let name = name.trim();

        if let Some((last, first)) = name.split_once(',') {
            return Self::new(first.trim(), last.trim());
        }

        match name.rsplit_once(char::is_whitespace) {
            Some((first, last)) => Self::new(first.trim(), last.trim()),
            None => Self::new("", name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }

    /// "First Last", without stray whitespace when a part is missing
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, _) => self.last_name.clone(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Whether an entry has been opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadState {
    #[default]
    Unread,
    Read,
}

impl ReadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }

    /// Parse the stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unread" => Some(Self::Unread),
            "read" => Some(Self::Read),
            _ => None,
        }
    }
}

/// A catalogued document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique key (source file name)
    pub key: EntryKey,

    pub title: String,

    pub author: Author,

    /// Where the document lives: the managed copy, or the original location
    pub file_path: PathBuf,

    /// When the entry was added to the catalog
    pub added_at: DateTime<Utc>,

    /// Last time the document was opened
    pub last_read: Option<DateTime<Utc>>,

    pub read_state: ReadState,

    /// Raw cover image bytes, as found in the document
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover: Option<Vec<u8>>,
}

impl CatalogEntry {
    pub fn is_unread(&self) -> bool {
        self.read_state == ReadState::Unread
    }
}

/// Entry handed to a [`CatalogStore`](crate::CatalogStore) by the import pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub key: EntryKey,
    pub title: String,
    pub author: Author,
    /// File the entry was discovered at
    pub source_path: PathBuf,
    pub cover: Option<Vec<u8>>,
    pub added_at: DateTime<Utc>,
}

impl NewEntry {
    /// Create a new entry stamped with the current time
    pub fn new(key: EntryKey, title: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            key,
            title: title.into(),
            author: Author::default(),
            source_path: source_path.into(),
            cover: None,
            added_at: Utc::now(),
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    pub fn with_cover(mut self, cover: Option<Vec<u8>>) -> Self {
        self.cover = cover;
        self
    }

    /// Override the added timestamp
    pub fn added_at(mut self, added_at: DateTime<Utc>) -> Self {
        self.added_at = added_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_file_name() {
        let a = EntryKey::from_path(Path::new("/media/books/a.epub")).unwrap();
        let b = EntryKey::from_path(Path::new("/elsewhere/a.epub")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "a.epub");
        assert!(EntryKey::from_path(Path::new("/")).is_none());
    }

    #[test]
    fn author_from_full_name() {
        assert_eq!(
            Author::from_full_name("Jane Austen"),
            Author::new("Jane", "Austen")
        );
        assert_eq!(
            Author::from_full_name("Austen, Jane"),
            Author::new("Jane", "Austen")
        );
        assert_eq!(
            Author::from_full_name("Ursula K. Le Guin"),
            Author::new("Ursula K. Le", "Guin")
        );
        assert_eq!(Author::from_full_name(" Plato "), Author::new("", "Plato"));
        assert!(Author::from_full_name("").is_empty());
    }

    #[test]
    fn author_display_name() {
        assert_eq!(Author::new("Jane", "Austen").display_name(), "Jane Austen");
        assert_eq!(Author::new("", "Plato").display_name(), "Plato");
        assert_eq!(Author::new("Homer", "").display_name(), "Homer");
    }

    #[test]
    fn read_state_round_trip() {
        for state in [ReadState::Unread, ReadState::Read] {
            assert_eq!(ReadState::parse(state.as_str()), Some(state));
        }
        assert_eq!(ReadState::parse("skimmed"), None);
    }
}
