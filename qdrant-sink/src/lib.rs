//! Qdrant collaborators for `ingest-pipeline`.
//!
//! - [`QdrantRowConverter`] → documents + vectors to `PointStruct`s
//! - [`QdrantBackend`] → upsert points, flush barrier, collection bootstrap
//!
//! ```no_run
//! # async fn demo(embedder: std::sync::Arc<impl ingest_pipeline::Embedder + 'static>) -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use ingest_pipeline::{Document, StoreOptions, VectorIndexer};
//! use qdrant_sink::{QdrantBackend, QdrantConfig, QdrantRowConverter};
//!
//! let cfg = QdrantConfig::new_default("http://localhost:6334", "docs");
//! let backend = Arc::new(QdrantBackend::new(&cfg)?);
//! backend.ensure_collection(&cfg.collection, 1024).await?;
//!
//! let indexer = VectorIndexer::builder()
//!     .embedder(embedder)
//!     .converter(Arc::new(QdrantRowConverter::new(Some(1024))))
//!     .client(backend)
//!     .collection(cfg.collection.clone())
//!     .build()?;
//! let ids = indexer
//!     .store(vec![Document::new("a", "hello")], &StoreOptions::new(128, 4))
//!     .await?;
//! # let _ = ids;
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod converter;
mod errors;
mod ids;
mod payload;

pub use backend::QdrantBackend;
pub use config::{DistanceKind, QdrantConfig};
pub use converter::{CONTENT_KEY, DOC_ID_KEY, PARTITION_KEY, QdrantRowConverter};
pub use errors::QdrantSinkError;
pub use ids::{point_id_for, point_id_string, stable_uuid};
pub use payload::{json_to_qvalue, qvalue_to_json};
