//! In-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ingest_pipeline::{
    BackendClient, BoxFuture, Document, Embedder, InsertResult, PairConverter, RowConverter,
};

pub type Row = (Document, Vec<f32>);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn docs(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| Document::new(format!("doc-{i}"), format!("content {i}")))
        .collect()
}

/// Tracks how many batches are between "embed started" and "insert finished".
#[derive(Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    pub fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Embeds each text as `[len, index-in-batch]`.
///
/// Texts containing `fail-embed` fail the batch, `drop-one` makes the batch
/// come back one vector short, `panic` panics.
#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
    pub delay: Option<Duration>,
    pub gauge: Option<Arc<Gauge>>,
}

impl FakeEmbedder {
    pub fn with_delay(delay: Duration, gauge: Arc<Gauge>) -> Self {
        Self {
            delay: Some(delay),
            gauge: Some(gauge),
            ..Self::default()
        }
    }
}

impl Embedder for FakeEmbedder {
    fn embed_strings<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, anyhow::Result<Vec<Vec<f32>>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(g) = &self.gauge {
                g.enter();
            }
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            if texts.iter().any(|t| t.contains("panic")) {
                panic!("embedder panicked");
            }
            if texts.iter().any(|t| t.contains("fail-embed")) {
                anyhow::bail!("model unavailable");
            }
            let mut out: Vec<Vec<f32>> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| vec![t.len() as f32, i as f32])
                .collect();
            if texts.iter().any(|t| t.contains("drop-one")) {
                out.pop();
            }
            Ok(out)
        })
    }
}

/// Wraps [`PairConverter`] and counts calls; can be told to drop a row.
#[derive(Default)]
pub struct CountingConverter {
    pub calls: AtomicUsize,
    pub drop_last_row: bool,
}

impl RowConverter for CountingConverter {
    type Row = Row;

    fn convert(&self, docs: &[Document], vectors: Vec<Vec<f32>>) -> anyhow::Result<Vec<Row>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if docs.iter().any(|d| d.metadata.contains_key("unserializable")) {
            anyhow::bail!("metadata field 'unserializable' cannot be stored");
        }
        let mut rows = PairConverter.convert(docs, vectors)?;
        if self.drop_last_row {
            rows.pop();
        }
        Ok(rows)
    }
}

/// Stores rows in memory. Empty document ids get `gen-<content>`.
///
/// Inserts fail when any row's content contains `fail-insert`.
#[derive(Default)]
pub struct MemoryBackend {
    pub rows: Mutex<Vec<(String, Option<String>, String)>>,
    pub inserts: AtomicUsize,
    pub flushes: AtomicUsize,
    pub fail_flush: bool,
    pub short_ids: bool,
    pub gauge: Option<Arc<Gauge>>,
}

impl MemoryBackend {
    pub fn with_gauge(gauge: Arc<Gauge>) -> Self {
        Self {
            gauge: Some(gauge),
            ..Self::default()
        }
    }

    pub fn stored_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, id)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl BackendClient for MemoryBackend {
    type Row = Row;

    fn insert<'a>(
        &'a self,
        collection: &'a str,
        partition: Option<&'a str>,
        rows: Vec<Row>,
    ) -> BoxFuture<'a, anyhow::Result<InsertResult>> {
        Box::pin(async move {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            let result = if rows.iter().any(|(d, _)| d.content.contains("fail-insert")) {
                Err(anyhow::anyhow!("server closed the connection"))
            } else {
                let mut ids = Vec::with_capacity(rows.len());
                let mut stored = self.rows.lock().unwrap();
                for (doc, _vector) in rows {
                    let id = if doc.id.is_empty() {
                        format!("gen-{}", doc.content)
                    } else {
                        doc.id.clone()
                    };
                    stored.push((
                        collection.to_string(),
                        partition.map(str::to_string),
                        id.clone(),
                    ));
                    ids.push(id);
                }
                if self.short_ids {
                    ids.pop();
                }
                Ok(InsertResult::new(ids))
            };
            if let Some(g) = &self.gauge {
                g.leave();
            }
            result
        })
    }

    fn flush<'a>(&'a self, _collection: &'a str) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            if self.fail_flush {
                anyhow::bail!("flush rejected");
            }
            Ok(())
        })
    }
}
