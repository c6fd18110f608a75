//! Documents + vectors → Qdrant points.

use std::collections::HashMap;

use ingest_pipeline::{Document, RowConverter};
use qdrant_client::qdrant::{PointStruct, Value as QValue};

use crate::errors::QdrantSinkError;
use crate::ids::point_id_for;
use crate::payload::{json_to_qvalue, qstring};

/// Payload key holding the document content.
pub const CONTENT_KEY: &str = "content";
/// Payload key holding the caller's original document id.
pub const DOC_ID_KEY: &str = "doc_id";
/// Payload key written by the backend when a partition is given.
pub const PARTITION_KEY: &str = "partition";

const RESERVED_KEYS: [&str; 3] = [CONTENT_KEY, DOC_ID_KEY, PARTITION_KEY];

/// Builds one [`PointStruct`] per document.
///
/// Payload = `content` + `doc_id` (when set) + metadata. Fails on metadata
/// keys that collide with the reserved ones, on non-finite vector components,
/// and on vectors of the wrong size when `dim` is set.
#[derive(Clone, Debug, Default)]
pub struct QdrantRowConverter {
    dim: Option<usize>,
}

impl QdrantRowConverter {
    pub fn new(dim: Option<usize>) -> Self {
        Self { dim }
    }

    fn to_point(&self, doc: &Document, vector: Vec<f32>) -> Result<PointStruct, QdrantSinkError> {
        if let Some(want) = self.dim {
            if vector.len() != want {
                return Err(QdrantSinkError::Conversion(format!(
                    "vector size mismatch for '{}': got {}, want {want}",
                    doc.id,
                    vector.len()
                )));
            }
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(QdrantSinkError::Conversion(format!(
                "vector for '{}' has non-finite components",
                doc.id
            )));
        }

        let mut payload: HashMap<String, QValue> = HashMap::with_capacity(doc.metadata.len() + 2);
        for (k, v) in &doc.metadata {
            if RESERVED_KEYS.contains(&k.as_str()) {
                return Err(QdrantSinkError::Conversion(format!(
                    "metadata key '{k}' of '{}' is reserved",
                    doc.id
                )));
            }
            payload.insert(k.clone(), json_to_qvalue(v.clone()));
        }
        payload.insert(CONTENT_KEY.into(), qstring(&doc.content));
        if !doc.id.is_empty() {
            payload.insert(DOC_ID_KEY.into(), qstring(&doc.id));
        }

        Ok(PointStruct {
            id: Some(point_id_for(&doc.id)?),
            payload,
            vectors: Some(vector.into()),
            ..Default::default()
        })
    }
}

impl RowConverter for QdrantRowConverter {
    type Row = PointStruct;

    fn convert(
        &self,
        docs: &[Document],
        vectors: Vec<Vec<f32>>,
    ) -> anyhow::Result<Vec<PointStruct>> {
        anyhow::ensure!(
            docs.len() == vectors.len(),
            "got {} vectors for {} documents",
            vectors.len(),
            docs.len()
        );
        let points = docs
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| self.to_point(doc, vector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(points)
    }
}
