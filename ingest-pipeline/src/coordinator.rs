//! Bounded fan-out / fan-in over batch tasks.
//!
//! - One tokio task per batch, all spawned up front.
//! - A `Semaphore` with `max_concurrency` permits (capped at the batch count)
//!   gates the worker body, so at most that many batches run at once; waiting
//!   tasks hold no permit.
//! - A failing batch never cancels its siblings.
//! - Every task is joined before results or errors are looked at.

use std::collections::HashMap;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::aggregator::ErrorAggregator;
use crate::assembler::ResultAssembler;
use crate::errors::IngestError;
use crate::record::Batch;
use crate::worker::{WorkerDeps, run_batch};

/// Runs every batch and returns ids in input order, or the first error.
#[instrument(skip_all, fields(batches = batches.len(), total = total_docs, max = max_concurrency))]
pub(crate) async fn run_batches<R: Send + 'static>(
    deps: Arc<WorkerDeps<R>>,
    batches: Vec<Batch>,
    total_docs: usize,
    max_concurrency: usize,
    progress: ProgressBar,
) -> Result<Vec<String>, IngestError> {
    let aggregator = ErrorAggregator::with_capacity(batches.len());
    let mut assembler = ResultAssembler::with_len(total_docs);

    // More permits than batches would never be used.
    let permits = max_concurrency.clamp(1, batches.len().max(1));
    let sem = Arc::new(Semaphore::new(permits));
    let mut tasks = JoinSet::new();
    let mut offsets = HashMap::with_capacity(batches.len());

    for batch in batches {
        let deps = Arc::clone(&deps);
        let sem = Arc::clone(&sem);
        let reporter = aggregator.reporter();
        let offset = batch.start_offset;

        let handle = tasks.spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                reporter.report(IngestError::Internal("concurrency gate closed".into()));
                return None;
            };
            match run_batch(&deps, batch).await {
                Ok(out) => Some(out),
                Err(e) => {
                    warn!(offset, stage = e.stage(), "batch failed: {e}");
                    reporter.report(e);
                    None
                }
            }
        });
        offsets.insert(handle.id(), offset);
    }

    // Join barrier: results are only read below, after every task is done.
    let reporter = aggregator.reporter();
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, Some(out))) => {
                debug!("batch at offset {} joined", out.start_offset);
                if let Err(e) = assembler.place(out.start_offset, out.ids) {
                    reporter.report(e);
                }
            }
            Ok((_, None)) => {}
            Err(e) => {
                let offset = offsets.get(&e.id()).copied().unwrap_or_default();
                reporter.report(IngestError::Join { offset, source: e });
            }
        }
        progress.inc(1);
    }
    drop(reporter);
    progress.finish_and_clear();

    if let Some(err) = aggregator.into_first() {
        return Err(err);
    }
    let ids = assembler.finish()?;
    info!("all {} ids assembled", ids.len());
    Ok(ids)
}

/// Progress bar over batches; hidden unless `enabled`.
pub(crate) fn batch_progress(batches: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(batches as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches ({eta})",
    )
    .map(|s| s.progress_chars("##-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
