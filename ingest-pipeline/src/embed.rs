//! Embedding abstraction.

use std::{future::Future, pin::Pin};

/// Boxed `Send` future used by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Implementations must return exactly one vector per input text, in input
/// order. Retries and backoff, if any, belong here and not in the pipeline.
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts.
    fn embed_strings<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, anyhow::Result<Vec<Vec<f32>>>>;
}
