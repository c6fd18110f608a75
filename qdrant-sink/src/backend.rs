//! Thin adapter around `qdrant-client` implementing [`BackendClient`].

use ingest_pipeline::{BackendClient, BoxFuture, InsertResult, PointKey};
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePoints, DeletePointsBuilder, Filter, PointStruct,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::{debug, info};

use crate::config::{DistanceKind, QdrantConfig};
use crate::converter::PARTITION_KEY;
use crate::errors::QdrantSinkError;
use crate::ids::barrier_point;
use crate::payload::qstring;

/// Qdrant-backed store for the ingestion pipeline.
///
/// - `insert` upserts points (optionally waiting for them to be applied) and
///   returns their ids in submission order.
/// - Qdrant has no partitions; a partition name is stored in the `partition`
///   payload field instead.
/// - `flush` sends a waited no-op delete selected by filter. Filter deletes
///   reach every shard, and each shard applies updates in order, so once it
///   returns every earlier upsert is visible.
pub struct QdrantBackend {
    client: Qdrant,
    distance: DistanceKind,
    wait: bool,
}

impl QdrantBackend {
    /// Creates the client from `cfg`.
    pub fn new(cfg: &QdrantConfig) -> Result<Self, QdrantSinkError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.url);
        if let Some(key) = &cfg.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| QdrantSinkError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            distance: cfg.distance,
            wait: cfg.wait,
        })
    }

    /// Creates `collection` with `size`-dimensional vectors unless it exists.
    ///
    /// Returns `true` when the collection was created.
    pub async fn ensure_collection(
        &self,
        collection: &str,
        size: usize,
    ) -> Result<bool, QdrantSinkError> {
        if size == 0 {
            return Err(QdrantSinkError::Config("vector size must be > 0".into()));
        }
        let exists = self
            .client
            .collection_exists(collection)
            .await
            .map_err(|e| QdrantSinkError::Qdrant(e.to_string()))?;
        if exists {
            debug!(collection, "collection present");
            return Ok(false);
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection).vectors_config(VectorParamsBuilder::new(
                    size as u64,
                    self.distance.to_qdrant(),
                )),
            )
            .await
            .map_err(|e| QdrantSinkError::Qdrant(e.to_string()))?;

        info!(collection, size, distance = ?self.distance, "collection created");
        Ok(true)
    }

    async fn upsert(
        &self,
        collection: &str,
        partition: Option<&str>,
        mut points: Vec<PointStruct>,
    ) -> Result<InsertResult, QdrantSinkError> {
        let ids = confirmed_ids(&points)?;
        if points.is_empty() {
            debug!("No points provided for upsert");
            return Ok(InsertResult::default());
        }
        if let Some(p) = partition {
            for point in &mut points {
                point.payload.insert(PARTITION_KEY.into(), qstring(p));
            }
        }

        debug!(
            "Upserting {} points into collection '{}' (wait={})",
            points.len(),
            collection,
            self.wait
        );
        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(self.wait))
            .await
            .map_err(|e| QdrantSinkError::Qdrant(e.to_string()))?;
        debug!("Upsert operation result={:?}", res.result);

        Ok(InsertResult { ids })
    }

    async fn barrier(&self, collection: &str) -> Result<(), QdrantSinkError> {
        self.client
            .delete_points(barrier_request(collection))
            .await
            .map_err(|e| QdrantSinkError::Qdrant(e.to_string()))?;
        debug!("Collection '{}' flushed", collection);
        Ok(())
    }
}

/// Waited delete of the reserved barrier point.
///
/// Selected by filter rather than by id: an id selector is routed to the one
/// shard owning that id, a filter is broadcast to all shards.
pub(crate) fn barrier_request(collection: &str) -> DeletePoints {
    DeletePointsBuilder::new(collection)
        .points(Filter::must([Condition::has_id([barrier_point()])]))
        .wait(true)
        .build()
}

impl BackendClient for QdrantBackend {
    type Row = PointStruct;

    fn insert<'a>(
        &'a self,
        collection: &'a str,
        partition: Option<&'a str>,
        rows: Vec<PointStruct>,
    ) -> BoxFuture<'a, anyhow::Result<InsertResult>> {
        Box::pin(async move { Ok(self.upsert(collection, partition, rows).await?) })
    }

    fn flush<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move { Ok(self.barrier(collection).await?) })
    }
}

/// Ids of `points` in order; every point must carry one.
pub(crate) fn confirmed_ids(points: &[PointStruct]) -> Result<Vec<PointKey>, QdrantSinkError> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| match p.id.as_ref().and_then(|id| id.point_id_options.as_ref()) {
            Some(PointIdOptions::Num(n)) => Ok(PointKey::Num(*n)),
            Some(PointIdOptions::Uuid(s)) => Ok(PointKey::Str(s.clone())),
            None => Err(QdrantSinkError::Conversion(format!(
                "point #{i} has no id"
            ))),
        })
        .collect()
}
