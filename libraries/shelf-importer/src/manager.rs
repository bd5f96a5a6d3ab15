//! Caller-facing import surface: one run at a time, cancellable, observable

use crate::{
    pipeline::ImportPipeline, progress::ChannelProgress, ImportError, ImportOutcome,
    ImportProgress, Result,
};
use shelf_core::{QueryResult, Selection};
use shelf_storage::CatalogQuery;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Releases the running flag when the import task ends, including on panic
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Serializes import runs and exposes catalog reads
pub struct ImportManager {
    pipeline: Arc<ImportPipeline>,
    query: CatalogQuery,
    running: Arc<AtomicBool>,
}

impl ImportManager {
    pub fn new(pipeline: ImportPipeline, query: CatalogQuery) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            query,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_importing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start importing `root` on a background task
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`ImportError::AlreadyRunning`] while another run is active
    pub fn start_import(&self, root: impl Into<PathBuf>) -> Result<ImportHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ImportError::AlreadyRunning);
        }
        let guard = RunningGuard(Arc::clone(&self.running));

        let root = root.into();
        let (sink, progress) = ChannelProgress::new();
        let cancel = CancellationToken::new();

        let pipeline = Arc::clone(&self.pipeline);
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            pipeline.run(&root, &token, Arc::new(sink)).await
        });

        Ok(ImportHandle {
            progress,
            cancel,
            task,
        })
    }

    /// Load the catalog in the given ordering
    pub async fn load(&self, selection: Selection) -> shelf_core::Result<QueryResult> {
        self.query.load(selection).await
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }
}

/// A running import
pub struct ImportHandle {
    /// Progress events; the last one is always `Finished`
    pub progress: mpsc::UnboundedReceiver<ImportProgress>,
    cancel: CancellationToken,
    task: JoinHandle<ImportOutcome>,
}

impl ImportHandle {
    /// Ask the run to stop at the next candidate or directory
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the run to finish
    ///
    /// # Errors
    /// Returns [`ImportError::Join`] if the import task panicked
    pub async fn wait(self) -> Result<ImportOutcome> {
        Ok(self.task.await?)
    }
}
