use crate::types::Author;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata read from a document container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Author,
    /// Raw cover image bytes
    #[serde(skip)]
    pub cover: Option<Vec<u8>>,
}

impl BookMetadata {
    /// Title, falling back to the file stem when the document has none
    pub fn title_or_file_stem(&self, path: &Path) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Unknown".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_falls_back_to_file_stem() {
        let path = Path::new("/books/moby-dick.epub");

        let meta = BookMetadata::default();
        assert_eq!(meta.title_or_file_stem(path), "moby-dick");

        let meta = BookMetadata {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.title_or_file_stem(path), "moby-dick");

        let meta = BookMetadata {
            title: Some("Moby-Dick; or, The Whale".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.title_or_file_stem(path), "Moby-Dick; or, The Whale");
    }
}
