//! Bounded-concurrency ingestion of documents into a vector store.
//!
//! The pipeline splits the input into contiguous batches and, for each batch,
//! embeds the contents, converts `(document, vector)` pairs into backend rows
//! and inserts them. Batches run in parallel up to a concurrency limit; ids
//! come back in input order. After every batch succeeds the collection is
//! flushed once.
//!
//! Ingestion is **not transactional**: when a batch fails, the call returns
//! that error and no ids, but rows written by sibling batches stay in the
//! backend.
//!
//! Collaborators are plugged in through three traits:
//! - [`Embedder`] → texts to vectors
//! - [`RowConverter`] → documents + vectors to backend rows
//! - [`BackendClient`] → insert rows, flush collection

mod aggregator;
mod assembler;
mod backend;
mod config;
mod convert;
mod coordinator;
mod embed;
mod errors;
mod flusher;
pub mod io_jsonl;
pub mod planner;
mod record;
mod worker;

pub use backend::BackendClient;
pub use config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY, IngestConfig, StoreOptions};
pub use convert::{PairConverter, RowConverter};
pub use embed::{BoxFuture, Embedder};
pub use errors::IngestError;
pub use record::{Batch, BatchSpan, Document, InsertResult, PointKey};

use std::sync::Arc;

use tracing::{debug, info, instrument, trace};

use crate::worker::WorkerDeps;

/// Entry point wiring the collaborators for one target collection.
///
/// Each [`VectorIndexer::store`] call owns its own batches, workers, result
/// slots and error queue; nothing is shared between calls.
pub struct VectorIndexer<R: Send + 'static> {
    embedder: Arc<dyn Embedder>,
    converter: Arc<dyn RowConverter<Row = R>>,
    client: Arc<dyn BackendClient<Row = R>>,
    collection: String,
    defaults: StoreOptions,
}

impl<R: Send + 'static> VectorIndexer<R> {
    pub fn builder() -> VectorIndexerBuilder<R> {
        VectorIndexerBuilder::default()
    }

    /// Target collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Options used by [`VectorIndexer::store_default`].
    pub fn default_options(&self) -> &StoreOptions {
        &self.defaults
    }

    /// Embeds, converts and inserts `docs`, then flushes the collection.
    ///
    /// On success `ids[i]` is the backend id of `docs[i]`. An empty input
    /// returns an empty list and still flushes.
    ///
    /// # Errors
    /// - [`IngestError::Config`] for invalid options (nothing is called).
    /// - The first per-batch error (`Embedding`, `ShapeMismatch`,
    ///   `Conversion`, `Insert`, `Join`); other batches may have been written.
    /// - [`IngestError::Flush`] if every insert succeeded but flush did not.
    /// - [`IngestError::Timeout`] if `opts.timeout` elapsed.
    #[instrument(skip_all, fields(collection = %self.collection, docs = docs.len(), batch_size = opts.batch_size, max = opts.max_concurrency))]
    pub async fn store(
        &self,
        docs: Vec<Document>,
        opts: &StoreOptions,
    ) -> Result<Vec<String>, IngestError> {
        opts.validate()?;
        match opts.timeout {
            // Dropping the inner future aborts the in-flight batch tasks.
            Some(limit) => tokio::time::timeout(limit, self.store_inner(docs, opts))
                .await
                .map_err(|_| IngestError::Timeout(limit))?,
            None => self.store_inner(docs, opts).await,
        }
    }

    /// [`VectorIndexer::store`] with the indexer's default options.
    pub async fn store_default(&self, docs: Vec<Document>) -> Result<Vec<String>, IngestError> {
        self.store(docs, &self.defaults).await
    }

    /// Reads documents from a JSONL file (strict) and stores them.
    ///
    /// # Errors
    /// Returns I/O or parse errors, or any [`VectorIndexer::store`] error.
    pub async fn store_file(
        &self,
        jsonl_path: impl AsRef<std::path::Path>,
        opts: &StoreOptions,
    ) -> Result<Vec<String>, IngestError> {
        trace!("VectorIndexer::store_file path={:?}", jsonl_path.as_ref());
        let docs = io_jsonl::read_documents(jsonl_path)?;
        self.store(docs, opts).await
    }

    async fn store_inner(
        &self,
        docs: Vec<Document>,
        opts: &StoreOptions,
    ) -> Result<Vec<String>, IngestError> {
        let total = docs.len();
        let batches = planner::plan_batches(docs, opts.batch_size);
        info!("storing {} documents in {} batches", total, batches.len());

        let deps = Arc::new(WorkerDeps {
            embedder: Arc::clone(&self.embedder),
            converter: Arc::clone(&self.converter),
            client: Arc::clone(&self.client),
            collection: self.collection.clone(),
            partition: opts.partition.clone(),
        });
        let progress = coordinator::batch_progress(batches.len(), opts.progress);

        let ids =
            coordinator::run_batches(deps, batches, total, opts.max_concurrency, progress).await?;

        flusher::flush_collection(self.client.as_ref(), &self.collection).await?;
        debug!("store finished with {} ids", ids.len());
        Ok(ids)
    }
}

/// Builder for [`VectorIndexer`]; missing collaborators are config errors.
pub struct VectorIndexerBuilder<R: Send + 'static> {
    embedder: Option<Arc<dyn Embedder>>,
    converter: Option<Arc<dyn RowConverter<Row = R>>>,
    client: Option<Arc<dyn BackendClient<Row = R>>>,
    collection: Option<String>,
    defaults: StoreOptions,
}

impl<R: Send + 'static> Default for VectorIndexerBuilder<R> {
    fn default() -> Self {
        Self {
            embedder: None,
            converter: None,
            client: None,
            collection: None,
            defaults: StoreOptions::default(),
        }
    }
}

impl<R: Send + 'static> VectorIndexerBuilder<R> {
    pub fn embedder<E: Embedder + 'static>(mut self, embedder: Arc<E>) -> Self {
        self.embedder = Some(embedder as Arc<dyn Embedder>);
        self
    }

    pub fn converter<C: RowConverter<Row = R> + 'static>(mut self, converter: Arc<C>) -> Self {
        self.converter = Some(converter as Arc<dyn RowConverter<Row = R>>);
        self
    }

    pub fn client<B: BackendClient<Row = R> + 'static>(mut self, client: Arc<B>) -> Self {
        self.client = Some(client as Arc<dyn BackendClient<Row = R>>);
        self
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn default_options(mut self, opts: StoreOptions) -> Self {
        self.defaults = opts;
        self
    }

    /// Takes collection and default options from `cfg`.
    pub fn config(self, cfg: &IngestConfig) -> Self {
        self.collection(cfg.collection.clone())
            .default_options(cfg.store_options())
    }

    /// # Errors
    /// Returns [`IngestError::Config`] if a collaborator or the collection is
    /// missing, or the default options are invalid.
    pub fn build(self) -> Result<VectorIndexer<R>, IngestError> {
        let embedder = self
            .embedder
            .ok_or_else(|| IngestError::Config("embedder is not set".into()))?;
        let converter = self
            .converter
            .ok_or_else(|| IngestError::Config("row converter is not set".into()))?;
        let client = self
            .client
            .ok_or_else(|| IngestError::Config("backend client is not set".into()))?;
        let collection = self
            .collection
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| IngestError::Config("collection is empty".into()))?;
        self.defaults.validate()?;

        Ok(VectorIndexer {
            embedder,
            converter,
            client,
            collection,
            defaults: self.defaults,
        })
    }
}
