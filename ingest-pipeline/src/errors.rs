//! Unified error types for the crate.

use std::time::Duration;

use thiserror::Error;

/// Top-level error for ingestion operations.
///
/// Per-batch variants carry the `offset` of the failing batch (index of its
/// first document in the input) so callers can tell which slice of the input
/// was affected. Sibling batches are never rolled back.
#[derive(Debug, Error)]
pub enum IngestError {
    // ── Configuration ───────────────────────────────────────────────────────
    /// Invalid options or missing collaborators. Raised before any batch runs.
    #[error("config error: {0}")]
    Config(String),

    // ── Per-batch stages ────────────────────────────────────────────────────
    /// The embedder failed for a batch.
    #[error("embedding failed for batch at offset {offset}: {source:#}")]
    Embedding {
        offset: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The embedder returned a different number of vectors than documents.
    #[error("embedding count mismatch for batch at offset {offset}: got {vectors} vectors for {docs} documents")]
    ShapeMismatch {
        offset: usize,
        docs: usize,
        vectors: usize,
    },

    /// The row converter rejected a batch.
    #[error("row conversion failed for batch at offset {offset}: {source:#}")]
    Conversion {
        offset: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The backend insert call failed for a batch.
    #[error("insert failed for batch at offset {offset}: {source:#}")]
    Insert {
        offset: usize,
        #[source]
        source: anyhow::Error,
    },

    /// A batch task panicked or was aborted before reporting a result.
    #[error("batch task at offset {offset} did not complete: {source}")]
    Join {
        offset: usize,
        #[source]
        source: tokio::task::JoinError,
    },

    // ── Finalization ────────────────────────────────────────────────────────
    /// Every batch was inserted but the flush failed. Data may already be
    /// written; only read-after-write visibility is uncertain.
    #[error("flush of collection '{collection}' failed: {source:#}")]
    Flush {
        collection: String,
        #[source]
        source: anyhow::Error,
    },

    /// The whole call exceeded its deadline.
    #[error("store timed out after {0:?}")]
    Timeout(Duration),

    // ── Input sources ───────────────────────────────────────────────────────
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors with line context.
    #[error("parse error: {0}")]
    Parse(String),

    /// Broken internal bookkeeping (should not happen).
    #[error("internal: {0}")]
    Internal(String),
}

impl IngestError {
    /// Short name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            IngestError::Config(_) => "config",
            IngestError::Embedding { .. } => "embedding",
            IngestError::ShapeMismatch { .. } => "shape",
            IngestError::Conversion { .. } => "conversion",
            IngestError::Insert { .. } => "insert",
            IngestError::Join { .. } => "join",
            IngestError::Flush { .. } => "flush",
            IngestError::Timeout(_) => "timeout",
            IngestError::Io(_) | IngestError::Parse(_) => "input",
            IngestError::Internal(_) => "internal",
        }
    }

    /// Offset of the failing batch, for per-batch errors.
    pub fn batch_offset(&self) -> Option<usize> {
        match self {
            IngestError::Embedding { offset, .. }
            | IngestError::ShapeMismatch { offset, .. }
            | IngestError::Conversion { offset, .. }
            | IngestError::Insert { offset, .. }
            | IngestError::Join { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_and_offset() {
        let e = IngestError::Insert {
            offset: 20,
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(e.stage(), "insert");
        assert_eq!(e.batch_offset(), Some(20));
        assert!(e.to_string().contains("offset 20"));
        assert!(e.to_string().contains("connection reset"));

        let e = IngestError::Config("batch_size must be > 0".into());
        assert_eq!(e.stage(), "config");
        assert_eq!(e.batch_offset(), None);
    }

    #[test]
    fn shape_mismatch_message() {
        let e = IngestError::ShapeMismatch {
            offset: 0,
            docs: 1,
            vectors: 0,
        };
        assert_eq!(e.stage(), "shape");
        assert_eq!(
            e.to_string(),
            "embedding count mismatch for batch at offset 0: got 0 vectors for 1 documents"
        );
    }
}
