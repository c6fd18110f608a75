//! Runtime configuration for ingestion calls.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::IngestError;

/// Default number of documents per batch.
pub const DEFAULT_BATCH_SIZE: usize = 256;
/// Default number of batches processed at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Per-call knobs for [`crate::VectorIndexer::store`].
#[derive(Clone, Debug, PartialEq)]
pub struct StoreOptions {
    /// Documents per batch (must be > 0).
    pub batch_size: usize,
    /// Maximum batches in flight (must be > 0).
    pub max_concurrency: usize,
    /// Target partition, if the backend supports them.
    pub partition: Option<String>,
    /// Deadline for the whole call.
    pub timeout: Option<Duration>,
    /// Draw a progress bar over completed batches.
    pub progress: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            partition: None,
            timeout: None,
            progress: false,
        }
    }
}

impl StoreOptions {
    pub fn new(batch_size: usize, max_concurrency: usize) -> Self {
        Self {
            batch_size,
            max_concurrency,
            ..Self::default()
        }
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates option values.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.batch_size == 0 {
            return Err(IngestError::Config("batch_size must be > 0".into()));
        }
        if self.max_concurrency == 0 {
            return Err(IngestError::Config("max_concurrency must be > 0".into()));
        }
        if let Some(p) = &self.partition {
            if p.trim().is_empty() {
                return Err(IngestError::Config("partition is empty".into()));
            }
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(IngestError::Config("timeout must be > 0".into()));
        }
        Ok(())
    }
}

/// Process-level ingestion settings (collection + default call options).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Target collection name.
    pub collection: String,
    /// Documents per batch.
    pub batch_size: usize,
    /// Maximum batches in flight.
    pub max_concurrency: usize,
    /// Optional partition name.
    pub partition: Option<String>,
    /// Optional deadline for each `store` call, in seconds.
    pub timeout_secs: Option<u64>,
    /// Progress bar on/off.
    pub progress: bool,
}

impl IngestConfig {
    /// Creates a config with defaults for the given collection.
    pub fn new_default(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            partition: None,
            timeout_secs: None,
            progress: false,
        }
    }

    /// Builds configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `INGEST_COLLECTION` (required)
    /// - `INGEST_BATCH_SIZE` (default: 256)
    /// - `INGEST_MAX_CONCURRENCY` (default: 4)
    /// - `INGEST_PARTITION` (optional)
    /// - `INGEST_TIMEOUT_SECS` (optional)
    /// - `INGEST_PROGRESS` (default: false)
    pub fn from_env() -> Result<Self, IngestError> {
        let collection = std::env::var("INGEST_COLLECTION")
            .map_err(|_| IngestError::Config("missing env variable: INGEST_COLLECTION".into()))?;

        let cfg = Self {
            collection,
            batch_size: read_env("INGEST_BATCH_SIZE")?.unwrap_or(DEFAULT_BATCH_SIZE),
            max_concurrency: read_env("INGEST_MAX_CONCURRENCY")?
                .unwrap_or(DEFAULT_MAX_CONCURRENCY),
            partition: std::env::var("INGEST_PARTITION")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            timeout_secs: read_env("INGEST_TIMEOUT_SECS")?,
            progress: read_env("INGEST_PROGRESS")?.unwrap_or(false),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.collection.trim().is_empty() {
            return Err(IngestError::Config("collection is empty".into()));
        }
        self.store_options().validate()
    }

    /// Default options for `store` derived from this config.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            batch_size: self.batch_size,
            max_concurrency: self.max_concurrency,
            partition: self.partition.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            progress: self.progress,
        }
    }
}

/// Reads and parses an optional env variable; unparsable values are errors.
fn read_env<T: FromStr>(key: &str) -> Result<Option<T>, IngestError> {
    match std::env::var(key) {
        Ok(v) => v.trim().parse::<T>().map(Some).map_err(|_| {
            IngestError::Config(format!("failed to parse env variable: {key} = '{v}'"))
        }),
        Err(_) => Ok(None),
    }
}
