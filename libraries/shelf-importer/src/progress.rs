//! Progress reporting for import runs

use crate::ImportProgress;
use tokio::sync::mpsc;

/// Receives progress events from a running import
///
/// Called from the import task and from the blocking scan thread, so
/// implementations must not block for long.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: ImportProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(ImportProgress) + Send + Sync,
{
    fn report(&self, progress: ImportProgress) {
        self(progress);
    }
}

/// Forwards events to an unbounded channel
///
/// A dropped receiver is ignored; the run continues without a listener.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: mpsc::UnboundedSender<ImportProgress>,
}

impl ChannelProgress {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ImportProgress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, progress: ImportProgress) {
        let _ = self.tx.send(progress);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: ImportProgress) {}
}
