//! Splits the input into contiguous, index-stable batches.

use crate::record::{Batch, BatchSpan, Document};

/// Computes batch spans covering `[0, total)` in order.
///
/// Every span has `batch_size` items except possibly the last one.
/// `total == 0` yields no spans. `batch_size` must be > 0 (validated by the
/// caller); zero is treated as 1.
pub fn plan_spans(total: usize, batch_size: usize) -> Vec<BatchSpan> {
    let size = batch_size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| BatchSpan {
            start,
            len: size.min(total - start),
        })
        .collect()
}

/// Moves `docs` into batches following [`plan_spans`].
pub fn plan_batches(docs: Vec<Document>, batch_size: usize) -> Vec<Batch> {
    let spans = plan_spans(docs.len(), batch_size);
    let mut rest = docs.into_iter();
    spans
        .into_iter()
        .map(|span| Batch {
            start_offset: span.start,
            docs: rest.by_ref().take(span.len).collect(),
        })
        .collect()
}
