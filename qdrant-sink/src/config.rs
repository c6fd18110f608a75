//! Connection and collection settings for Qdrant.

use qdrant_client::qdrant::Distance;
use serde::{Deserialize, Serialize};

use crate::errors::QdrantSinkError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    #[default]
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Parses a case-insensitive name. Unknown values fall back to Cosine.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dot" | "dotproduct" => DistanceKind::Dot,
            "euclid" | "l2" => DistanceKind::Euclid,
            _ => DistanceKind::Cosine,
        }
    }

    pub fn to_qdrant(self) -> Distance {
        match self {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC endpoint, e.g. `http://localhost:6334`.
    pub url: String,
    /// Optional API key for Qdrant Cloud.
    pub api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance used when the collection has to be created.
    pub distance: DistanceKind,
    /// Wait for each upsert to be applied before acknowledging it.
    pub wait: bool,
}

impl QdrantConfig {
    /// Creates a default config for a given endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            wait: false,
        }
    }

    /// Builds configuration from environment variables.
    ///
    /// - `QDRANT_URL` (default: "http://localhost:6334")
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (required)
    /// - `QDRANT_DISTANCE` ("Cosine" | "Dot" | "Euclid"; default: "Cosine")
    /// - `QDRANT_WAIT` (default: false)
    pub fn from_env() -> Result<Self, QdrantSinkError> {
        let collection = std::env::var("QDRANT_COLLECTION").map_err(|_| {
            QdrantSinkError::Config("missing env variable: QDRANT_COLLECTION".into())
        })?;
        let wait = match std::env::var("QDRANT_WAIT") {
            Ok(v) => v.trim().parse::<bool>().map_err(|_| {
                QdrantSinkError::Config(format!("failed to parse env variable: QDRANT_WAIT = '{v}'"))
            })?,
            Err(_) => false,
        };

        let cfg = Self {
            url: std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6334".into()),
            api_key: std::env::var("QDRANT_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            collection,
            distance: std::env::var("QDRANT_DISTANCE")
                .map(|s| DistanceKind::parse(&s))
                .unwrap_or_default(),
            wait,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), QdrantSinkError> {
        if self.url.trim().is_empty() {
            return Err(QdrantSinkError::Config("url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(QdrantSinkError::Config("collection is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_names() {
        assert_eq!(DistanceKind::parse("DOT"), DistanceKind::Dot);
        assert_eq!(DistanceKind::parse("l2"), DistanceKind::Euclid);
        assert_eq!(DistanceKind::parse("whatever"), DistanceKind::Cosine);
        assert_eq!(DistanceKind::parse("dot").to_qdrant(), Distance::Dot);
        assert_eq!(DistanceKind::default().to_qdrant(), Distance::Cosine);
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(QdrantConfig::new_default("http://localhost:6334", "c").validate().is_ok());
        assert!(QdrantConfig::new_default("", "c").validate().is_err());
        assert!(QdrantConfig::new_default("http://localhost:6334", " ").validate().is_err());
    }
}
