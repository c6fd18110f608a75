//! Remote store abstraction.

use crate::embed::BoxFuture;
use crate::record::InsertResult;

/// Minimal client contract the pipeline needs from a vector store.
pub trait BackendClient: Send + Sync {
    /// Row type accepted by [`BackendClient::insert`].
    type Row: Send + 'static;

    /// Inserts rows into `collection` (optionally into `partition`).
    ///
    /// The returned ids must be in the same order as `rows`.
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        partition: Option<&'a str>,
        rows: Vec<Self::Row>,
    ) -> BoxFuture<'a, anyhow::Result<InsertResult>>;

    /// Makes previously inserted rows visible to subsequent reads.
    fn flush<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, anyhow::Result<()>>;
}
