//! Error type for the Qdrant adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QdrantSinkError {
    /// Missing or unparsable settings.
    #[error("config error: {0}")]
    Config(String),

    /// A document cannot be represented as a Qdrant point.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
