//! One unit of work: embed → check shape → convert → insert, for one batch.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::backend::BackendClient;
use crate::convert::RowConverter;
use crate::embed::Embedder;
use crate::errors::IngestError;
use crate::record::Batch;

/// Collaborators shared by every batch task of one `store` call.
pub(crate) struct WorkerDeps<R: Send + 'static> {
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) converter: Arc<dyn RowConverter<Row = R>>,
    pub(crate) client: Arc<dyn BackendClient<Row = R>>,
    pub(crate) collection: String,
    pub(crate) partition: Option<String>,
}

/// Ids produced by one successful batch.
#[derive(Debug)]
pub(crate) struct BatchOutput {
    pub(crate) start_offset: usize,
    pub(crate) ids: Vec<String>,
}

/// Runs the four steps for `batch`. No retries; the first failing step aborts.
#[instrument(skip_all, fields(offset = batch.start_offset, docs = batch.docs.len()))]
pub(crate) async fn run_batch<R: Send + 'static>(
    deps: &WorkerDeps<R>,
    batch: Batch,
) -> Result<BatchOutput, IngestError> {
    let offset = batch.start_offset;
    let expected = batch.docs.len();

    let texts: Vec<String> = batch.docs.iter().map(|d| d.content.clone()).collect();
    let vectors = deps
        .embedder
        .embed_strings(&texts)
        .await
        .map_err(|source| IngestError::Embedding { offset, source })?;
    trace!("embedded {} texts", vectors.len());

    if vectors.len() != expected {
        return Err(IngestError::ShapeMismatch {
            offset,
            docs: expected,
            vectors: vectors.len(),
        });
    }

    let rows = deps
        .converter
        .convert(&batch.docs, vectors)
        .map_err(|source| IngestError::Conversion { offset, source })?;
    if rows.len() != expected {
        return Err(IngestError::Conversion {
            offset,
            source: anyhow::anyhow!(
                "converter returned {} rows for {} documents",
                rows.len(),
                expected
            ),
        });
    }

    let result = deps
        .client
        .insert(&deps.collection, deps.partition.as_deref(), rows)
        .await
        .map_err(|source| IngestError::Insert { offset, source })?;
    if result.ids.len() != expected {
        return Err(IngestError::Insert {
            offset,
            source: anyhow::anyhow!(
                "backend returned {} ids for {} rows",
                result.ids.len(),
                expected
            ),
        });
    }

    debug!("batch inserted");
    Ok(BatchOutput {
        start_offset: offset,
        ids: result.into_strings(),
    })
}
