//! Import orchestration - scans a folder and catalogues every new document

use crate::{
    policy::{FailurePolicy, Severity},
    progress::ProgressSink,
    scanner::{Candidate, FileScanner, ScanRoot},
    ImportConfig, ImportOutcome, ImportProgress, ImportState,
};
use shelf_core::{
    BookMetadata, CatalogEntry, CatalogStore, MetadataExtractor, NewEntry, ShelfError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// What happened to one candidate
#[derive(Debug)]
pub enum CandidateResult {
    Imported(CatalogEntry),
    AlreadyPresent,
    Failed(ShelfError),
}

struct ScanResult {
    candidates: Vec<Candidate>,
    folders: usize,
    stopped: bool,
}

/// Scans a folder and imports every candidate not yet in the catalog
///
/// Runs never fail as a whole: per-file problems are recorded in the
/// [`ImportOutcome`], and errors the [`FailurePolicy`] treats as fatal end
/// the run early in the `Aborted` state. Entries already written are kept.
pub struct ImportPipeline {
    store: Arc<dyn CatalogStore>,
    extractor: Arc<dyn MetadataExtractor>,
    scanner: FileScanner,
    policy: FailurePolicy,

    /// Managed storage root; never scanned
    exclude: PathBuf,

    copy_to_library: bool,
}

impl ImportPipeline {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        extractor: Arc<dyn MetadataExtractor>,
        exclude: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            extractor,
            scanner: FileScanner::default(),
            policy: FailurePolicy::default(),
            exclude: exclude.into(),
            copy_to_library: true,
        }
    }

    pub fn from_config(
        store: Arc<dyn CatalogStore>,
        extractor: Arc<dyn MetadataExtractor>,
        exclude: impl Into<PathBuf>,
        config: &ImportConfig,
    ) -> Self {
        Self::new(store, extractor, exclude)
            .with_scanner(FileScanner::from_config(config))
            .with_policy(FailurePolicy::new(config.fatal_errors.iter().copied()))
            .copy_to_library(config.copy_to_library)
    }

    pub fn with_scanner(mut self, scanner: FileScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Copy imported files into managed storage (default) or reference them in place
    pub fn copy_to_library(mut self, copy: bool) -> Self {
        self.copy_to_library = copy;
        self
    }

    /// Run one import over `root`
    ///
    /// `cancel` is checked per directory during the scan and before every
    /// candidate; an extraction already in flight is allowed to finish.
    pub async fn run(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        progress: Arc<dyn ProgressSink>,
    ) -> ImportOutcome {
        let span = tracing::info_span!("import", root = %root.display());
        self.run_inner(root, cancel, progress).instrument(span).await
    }

    async fn run_inner(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        progress: Arc<dyn ProgressSink>,
    ) -> ImportOutcome {
        let started = Instant::now();
        let mut outcome = ImportOutcome::new(root);

        outcome.state = ImportState::Scanning;
        progress.report(ImportProgress::Scanning);
        tracing::info!("Scanning {}", root.display());

        match self.scan(root, cancel, Arc::clone(&progress)).await {
            Ok(scan) => {
                outcome.folders_scanned = scan.folders;
                if scan.stopped || cancel.is_cancelled() {
                    tracing::info!("Import cancelled during scan");
                    outcome.mark_cancelled();
                } else {
                    self.import_all(scan.candidates, cancel, progress.as_ref(), &mut outcome)
                        .await;
                }
            }
            Err(e) => {
                tracing::error!("Scan of {} failed: {}", root.display(), e);
                outcome.mark_aborted(format!("scan failed: {}", e));
            }
        }

        outcome.duration = started.elapsed();
        tracing::info!("{}", outcome.summary_text());
        progress.report(outcome.finished_event());

        outcome
    }

    async fn scan(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<ScanResult, tokio::task::JoinError> {
        let scanner = self.scanner.clone();
        let scan_root = ScanRoot::new(root, &self.exclude);
        let token = cancel.clone();

        tokio::task::spawn_blocking(move || {
            let mut candidates = scanner
                .scan(&scan_root)
                .on_folder(move |count| progress.report(ImportProgress::FolderScanned { count }))
                .stop_on(token);

            let found: Vec<Candidate> = candidates.by_ref().collect();
            ScanResult {
                candidates: found,
                folders: candidates.folders_scanned(),
                stopped: candidates.was_stopped(),
            }
        })
        .await
    }

    async fn import_all(
        &self,
        candidates: Vec<Candidate>,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
        outcome: &mut ImportOutcome,
    ) {
        let total = candidates.len();
        outcome.candidates = total;
        outcome.state = ImportState::Importing;
        progress.report(ImportProgress::Importing { current: 0, total });
        tracing::info!("Found {} candidate files", total);

        for (index, candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Import cancelled after {} of {}", index, total);
                outcome.mark_cancelled();
                return;
            }

            let mut halt = false;
            match self.import_one(candidate).await {
                CandidateResult::Imported(entry) => {
                    tracing::info!("Imported {} ({})", entry.key, entry.title);
                    outcome.imported += 1;
                }
                CandidateResult::AlreadyPresent => {
                    tracing::debug!("Already catalogued: {}", candidate.key);
                    outcome.already_present += 1;
                }
                CandidateResult::Failed(err) => {
                    outcome.record_failure(&candidate.path, &err);
                    match self.policy.classify(&err) {
                        Severity::Skip => {
                            tracing::warn!("Failed to import {}: {}", candidate.path.display(), err);
                        }
                        Severity::Fatal => {
                            tracing::error!(
                                "Stopping import at {}: {}",
                                candidate.path.display(),
                                err
                            );
                            outcome.mark_aborted(err.to_string());
                            halt = true;
                        }
                    }
                }
            }

            progress.report(ImportProgress::Importing {
                current: index + 1,
                total,
            });
            if halt {
                return;
            }
        }

        outcome.state = ImportState::Completed;
    }

    /// Process one candidate: existence check, extraction, catalog write
    pub async fn import_one(&self, candidate: &Candidate) -> CandidateResult {
        match self.store.exists(&candidate.key).await {
            Ok(true) => return CandidateResult::AlreadyPresent,
            Ok(false) => {}
            Err(e) => return CandidateResult::Failed(e),
        }

        let metadata = match self.extract(&candidate.path).await {
            Ok(metadata) => metadata,
            Err(e) => return CandidateResult::Failed(e),
        };

        let title = metadata.title_or_file_stem(&candidate.path);
        let entry = NewEntry::new(candidate.key.clone(), title, &candidate.path)
            .with_author(metadata.author)
            .with_cover(metadata.cover);

        match self.store.upsert(entry, self.copy_to_library).await {
            Ok(entry) => CandidateResult::Imported(entry),
            Err(e) => CandidateResult::Failed(e),
        }
    }

    /// Extraction is blocking; a panic counts as a failure of this file
    async fn extract(&self, path: &Path) -> shelf_core::Result<BookMetadata> {
        let extractor = Arc::clone(&self.extractor);
        let path = path.to_path_buf();

        match tokio::task::spawn_blocking(move || extractor.extract(&path)).await {
            Ok(result) => result,
            Err(e) => Err(ShelfError::metadata(format!("extractor failed: {}", e))),
        }
    }
}
