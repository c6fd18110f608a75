//! Conversion of documents + vectors into backend-native rows.

use crate::record::Document;

/// Turns a batch of documents and their vectors into backend rows.
///
/// Must return exactly `docs.len()` rows in the same order, and must fail
/// instead of silently dropping documents it cannot represent.
pub trait RowConverter: Send + Sync {
    /// Backend-native record type. Opaque to the pipeline.
    type Row: Send + 'static;

    fn convert(&self, docs: &[Document], vectors: Vec<Vec<f32>>)
    -> anyhow::Result<Vec<Self::Row>>;
}

/// Converter for callers that need the raw `(document, vector)` pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairConverter;

impl RowConverter for PairConverter {
    type Row = (Document, Vec<f32>);

    fn convert(
        &self,
        docs: &[Document],
        vectors: Vec<Vec<f32>>,
    ) -> anyhow::Result<Vec<Self::Row>> {
        anyhow::ensure!(
            docs.len() == vectors.len(),
            "got {} vectors for {} documents",
            vectors.len(),
            docs.len()
        );
        Ok(docs.iter().cloned().zip(vectors).collect())
    }
}
