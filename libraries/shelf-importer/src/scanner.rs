//! File scanning for importable documents

use crate::ImportConfig;
use shelf_core::types::EntryKey;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, FilterEntry, WalkDir};

/// Folder to scan plus the prefix that must never be entered
///
/// Both paths are canonicalised when they exist and made absolute when they
/// don't, so the prefix test compares like with like.
#[derive(Debug, Clone)]
pub struct ScanRoot {
    root: PathBuf,
    exclude: Option<PathBuf>,
}

impl ScanRoot {
    /// An empty `exclude` path disables exclusion
    pub fn new(root: impl AsRef<Path>, exclude: impl AsRef<Path>) -> Self {
        let exclude = exclude.as_ref();
        Self {
            root: resolve(root.as_ref()),
            exclude: (!exclude.as_os_str().is_empty()).then(|| resolve(exclude)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exclude(&self) -> Option<&Path> {
        self.exclude.as_deref()
    }

    /// Component-wise prefix test: `/lib/managed2` is not under `/lib/managed`
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude
            .as_deref()
            .is_some_and(|exclude| path.starts_with(exclude))
    }
}

/// Canonical path when it exists, otherwise absolute against the working directory
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Accepted file-name suffixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    suffixes: Vec<String>,
    case_sensitive: bool,
}

impl FileFilter {
    pub fn new<S: Into<String>>(suffixes: impl IntoIterator<Item = S>, case_sensitive: bool) -> Self {
        let suffixes = suffixes
            .into_iter()
            .map(Into::into)
            .map(|s: String| if case_sensitive { s } else { s.to_lowercase() })
            .collect();
        Self {
            suffixes,
            case_sensitive,
        }
    }

    /// Only `.epub`, case-sensitive
    pub fn epub() -> Self {
        Self::new([".epub"], true)
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();

        if self.case_sensitive {
            self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
        } else {
            let name = name.to_lowercase();
            self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::epub()
    }
}

/// A file found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub key: EntryKey,
}

/// Depth-first scanner for importable files
#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    filter: FileFilter,

    /// Whether to follow symbolic links
    follow_links: bool,
}

impl FileScanner {
    pub fn new(filter: FileFilter) -> Self {
        Self {
            filter,
            follow_links: false,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(FileFilter::new(
            config.extensions.iter().cloned(),
            config.case_sensitive,
        ))
        .follow_links(config.follow_links)
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Lazily walk `root`
    ///
    /// Children are visited in file-name order and a directory is reported
    /// after all of its children. Anything under the exclusion prefix is
    /// pruned before it is entered or matched.
    pub fn scan(&self, root: &ScanRoot) -> Candidates {
        let excluded = root.clone();
        let walker = self.walker(
            root.root(),
            Box::new(move |entry: &DirEntry| !excluded.is_excluded(entry.path())),
        );

        Candidates {
            inner: walker,
            filter: self.filter.clone(),
            open_dirs: Vec::new(),
            folders: 0,
            on_folder: None,
            stop: None,
            stopped: false,
            exhausted: false,
        }
    }

    /// Pre-order walk so `keep` sees a directory before anything inside it
    fn walker(&self, root: &Path, keep: ExcludeFn) -> FilterEntry<walkdir::IntoIter, ExcludeFn> {
        WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(keep)
    }
}

type ExcludeFn = Box<dyn FnMut(&DirEntry) -> bool + Send>;

/// Lazy, finite, non-restartable sequence of candidates
pub struct Candidates {
    inner: FilterEntry<walkdir::IntoIter, ExcludeFn>,
    filter: FileFilter,

    /// Depths of directories entered but not yet finished
    open_dirs: Vec<usize>,
    folders: usize,
    on_folder: Option<Box<dyn FnMut(usize) + Send>>,
    stop: Option<CancellationToken>,
    stopped: bool,
    exhausted: bool,
}

impl Candidates {
    /// Called with the cumulative directory count after each directory
    pub fn on_folder(mut self, hook: impl FnMut(usize) + Send + 'static) -> Self {
        self.on_folder = Some(Box::new(hook));
        self
    }

    /// End iteration at the next boundary once `token` is cancelled
    pub fn stop_on(mut self, token: CancellationToken) -> Self {
        self.stop = Some(token);
        self
    }

    pub fn folders_scanned(&self) -> usize {
        self.folders
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped
    }

    /// Finish every open directory at `depth` or deeper
    fn close_dirs(&mut self, depth: usize) {
        while self.open_dirs.last().is_some_and(|&open| open >= depth) {
            self.open_dirs.pop();
            self.folders += 1;
            if let Some(hook) = self.on_folder.as_mut() {
                hook(self.folders);
            }
        }
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if self.stopped || self.exhausted {
                return None;
            }
            if self.stop.as_ref().is_some_and(CancellationToken::is_cancelled) {
                self.stopped = true;
                return None;
            }

            let entry = match self.inner.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
                None => {
                    self.close_dirs(0);
                    self.exhausted = true;
                    return None;
                }
            };

            self.close_dirs(entry.depth());

            if entry.file_type().is_dir() {
                self.open_dirs.push(entry.depth());
                continue;
            }

            if !self.filter.matches(entry.path()) {
                continue;
            }

            let Some(key) = EntryKey::from_path(entry.path()) else {
                continue;
            };
            return Some(Candidate {
                path: entry.into_path(),
                key,
            });
        }
    }
}
