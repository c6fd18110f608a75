//! First-error capture across concurrently failing batches.

use tokio::sync::mpsc;
use tracing::warn;

use crate::errors::IngestError;

/// Bounded queue with one slot per batch.
///
/// Each failing batch reports exactly one error without blocking. After the
/// join barrier the queue is drained and the first observed error wins.
pub(crate) struct ErrorAggregator {
    tx: mpsc::Sender<IngestError>,
    rx: mpsc::Receiver<IngestError>,
}

/// Sending half handed to every batch task.
#[derive(Clone)]
pub(crate) struct ErrorReporter {
    tx: mpsc::Sender<IngestError>,
}

impl ErrorReporter {
    pub(crate) fn report(&self, err: IngestError) {
        if let Err(e) = self.tx.try_send(err) {
            // Capacity equals the batch count, so this only fires on misuse.
            warn!("error queue rejected a batch error: {e}");
        }
    }
}

impl ErrorAggregator {
    pub(crate) fn with_capacity(batches: usize) -> Self {
        let (tx, rx) = mpsc::channel(batches.max(1));
        Self { tx, rx }
    }

    pub(crate) fn reporter(&self) -> ErrorReporter {
        ErrorReporter {
            tx: self.tx.clone(),
        }
    }

    /// Drains the queue. Must only be called after all reporters are done.
    ///
    /// Errors after the first are logged and dropped.
    pub(crate) fn into_first(self) -> Option<IngestError> {
        let Self { tx, mut rx } = self;
        drop(tx);
        drain_first(&mut rx).map(|(first, _)| first)
    }
}

/// Takes the first queued error and logs the rest; returns it with the
/// number of errors discarded.
fn drain_first(rx: &mut mpsc::Receiver<IngestError>) -> Option<(IngestError, usize)> {
    let first = rx.try_recv().ok()?;
    let mut discarded = 0usize;
    while let Ok(other) = rx.try_recv() {
        discarded += 1;
        warn!(
            stage = other.stage(),
            offset = ?other.batch_offset(),
            "additional batch failure: {other}"
        );
    }
    if discarded > 0 {
        warn!(
            "{discarded} further batch error(s) besides the reported one ({})",
            first.stage()
        );
    }
    Some((first, discarded))
}
