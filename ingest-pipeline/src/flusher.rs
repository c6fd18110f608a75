//! Final visibility step after all batches succeed.

use tracing::{debug, error};

use crate::backend::BackendClient;
use crate::errors::IngestError;

/// Flushes `collection` once.
///
/// A failure here does not mean nothing was written: every batch has already
/// been inserted, only read-after-write visibility is in doubt.
pub(crate) async fn flush_collection<R: Send + 'static>(
    client: &dyn BackendClient<Row = R>,
    collection: &str,
) -> Result<(), IngestError> {
    debug!("flushing collection '{collection}'");
    client.flush(collection).await.map_err(|source| {
        error!("flush failed after all batches were inserted: {source:#}");
        IngestError::Flush {
            collection: collection.to_string(),
            source,
        }
    })
}
