/// Shelf configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use shelf_importer::ImportConfig;
use std::path::{Path, PathBuf};

/// Default config file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "shelf.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShelfConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Where imported documents are copied; never scanned
    #[serde(default = "default_managed_storage_path")]
    pub managed_storage_path: PathBuf,
}

impl ShelfConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `shelf.toml` is used if present.
    /// Environment variables prefixed `SHELF_` override both, with `__`
    /// between section and key (`SHELF_LIBRARY__DATABASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SHELF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document, without file or environment layers
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set SHELF_LIBRARY__DATABASE_URL)".to_string(),
            ));
        }

        self.import.validate()?;

        Ok(())
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        database_url: default_database_url(),
        managed_storage_path: default_managed_storage_path(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/shelf.db".to_string()
}

fn default_managed_storage_path() -> PathBuf {
    PathBuf::from("./data/books")
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            import: ImportConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ErrorKind;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ShelfConfig::from_toml("").unwrap();

        assert_eq!(config.library.database_url, "sqlite://./data/shelf.db");
        assert_eq!(config.library.managed_storage_path, PathBuf::from("./data/books"));
        assert_eq!(config.import, ImportConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = ShelfConfig::from_toml(
            r#"
            [library]
            managed_storage_path = "/srv/shelf/books"

            [import]
            extensions = [".epub", ".kepub"]
            case_sensitive = false
            copy_to_library = false
            fatal_errors = ["store_unavailable"]
            max_cover_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.library.database_url, "sqlite://./data/shelf.db");
        assert_eq!(config.library.managed_storage_path, PathBuf::from("/srv/shelf/books"));
        assert_eq!(config.import.extensions, vec![".epub", ".kepub"]);
        assert!(!config.import.case_sensitive);
        assert!(!config.import.copy_to_library);
        assert_eq!(config.import.fatal_errors, vec![ErrorKind::StoreUnavailable]);
        assert_eq!(config.import.max_cover_bytes, 1024);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ShelfConfig::from_toml("[library]\ndatabase_url = \"\"").is_err());
        assert!(ShelfConfig::from_toml("[import]\nextensions = []").is_err());
        assert!(ShelfConfig::from_toml("[import]\nfatal_errors = [\"bogus\"]").is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[library]\ndatabase_url = \"sqlite://custom.db\"\n").unwrap();

        let config = ShelfConfig::load(Some(&path)).unwrap();
        assert_eq!(config.library.database_url, "sqlite://custom.db");

        assert!(ShelfConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
