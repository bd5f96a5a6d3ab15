//! Managed storage folder
//!
//! Imported documents are optionally copied under one root directory so the
//! catalog keeps working when removable media is unplugged. Scanners are given
//! this root as their exclusion prefix so copies are never re-imported.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The catalog's own document folder
#[derive(Debug, Clone)]
pub struct ManagedStorage {
    root: PathBuf,
}

impl ManagedStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` lies inside the managed root
    ///
    /// Compares component-wise after resolving both paths where possible.
    pub fn contains(&self, path: &Path) -> bool {
        let root = resolve(&self.root);
        resolve(path).starts_with(root)
    }

    /// Copy `source` into the managed root and return the new location
    ///
    /// Files already inside the root are returned unchanged. Name clashes get a
    /// numeric suffix: "book.epub" -> "book-1.epub" -> "book-2.epub".
    pub fn import(&self, source: &Path) -> io::Result<PathBuf> {
        if self.contains(source) {
            return Ok(source.to_path_buf());
        }

        fs::create_dir_all(&self.root)?;

        let filename = source
            .file_name()
            .map(|n| sanitize_filename(&n.to_string_lossy()))
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no file name", source.display()),
                )
            })?;

        let mut dest = self.root.join(&filename);
        if dest.exists() {
            dest = self.resolve_conflict(&filename)?;
        }

        fs::copy(source, &dest)?;
        tracing::debug!("Copied {} -> {}", source.display(), dest.display());

        Ok(dest)
    }

    /// Delete a managed copy
    ///
    /// Paths outside the managed root are never touched; returns whether a file
    /// was removed.
    pub fn remove(&self, path: &Path) -> io::Result<bool> {
        if !self.contains(path) {
            return Ok(false);
        }
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn resolve_conflict(&self, filename: &str) -> io::Result<PathBuf> {
        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        for counter in 1..1000 {
            let candidate = if extension.is_empty() {
                format!("{}-{}", stem, counter)
            } else {
                format!("{}-{}.{}", stem, counter, extension)
            };

            let candidate = self.root.join(candidate);
            if !candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for {} after 1000 attempts", filename),
        ))
    }
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Replace characters that are invalid on common filesystems
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
