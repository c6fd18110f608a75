//! [`Embedder`] implementation over the Ollama HTTP API.

use ingest_pipeline::{BoxFuture, Embedder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::OllamaConfig;
use crate::errors::OllamaError;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Batch embedder backed by an Ollama server.
///
/// No retries: a failed request fails the batch.
#[derive(Clone)]
pub struct OllamaEmbedder {
    http: reqwest::Client,
    cfg: OllamaConfig,
    url: String,
}

impl OllamaEmbedder {
    pub fn new(cfg: OllamaConfig) -> Result<Self, OllamaError> {
        cfg.validate()?;
        let http = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        let url = cfg.embed_url();
        Ok(Self { http, cfg, url })
    }

    /// Expected vector size.
    pub fn dim(&self) -> usize {
        self.cfg.dim
    }

    /// Embeds `texts` in one request.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, OllamaError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        trace!("POST {} model={} inputs={}", self.url, self.cfg.model, texts.len());

        let resp = self
            .http
            .post(&self.url)
            .json(&EmbedRequest {
                model: &self.cfg.model,
                input: texts,
            })
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".into());
            return Err(OllamaError::Status { status, body });
        }

        let parsed: EmbedResponse = resp.json().await?;
        check_embeddings(&parsed.embeddings, texts.len(), self.cfg.dim)?;
        debug!("embedded {} texts with {}", texts.len(), self.cfg.model);
        Ok(parsed.embeddings)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_strings<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, anyhow::Result<Vec<Vec<f32>>>> {
        Box::pin(async move { Ok(self.embed(texts).await?) })
    }
}

/// Count and dimensionality check for a server answer.
fn check_embeddings(vectors: &[Vec<f32>], want_count: usize, dim: usize) -> Result<(), OllamaError> {
    if vectors.len() != want_count {
        return Err(OllamaError::Response(format!(
            "got {} embeddings for {} inputs",
            vectors.len(),
            want_count
        )));
    }
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
        return Err(OllamaError::Response(format!(
            "embedding #{i} has dim {} != expected {dim}",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let input = vec!["a".to_string(), "b".to_string()];
        let body = serde_json::to_value(EmbedRequest {
            model: "bge-m3",
            input: &input,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"model": "bge-m3", "input": ["a", "b"]}));
    }

    #[test]
    fn response_checks() {
        let parsed: EmbedResponse =
            serde_json::from_str(r#"{"model":"bge-m3","embeddings":[[0.1,0.2],[0.3,0.4]]}"#)
                .unwrap();
        assert!(check_embeddings(&parsed.embeddings, 2, 2).is_ok());
        assert!(check_embeddings(&parsed.embeddings, 3, 2).is_err());
        assert!(check_embeddings(&parsed.embeddings, 2, 3).is_err());
    }

    #[tokio::test]
    async fn empty_batch_needs_no_request() {
        let embedder = OllamaEmbedder::new(OllamaConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..OllamaConfig::default()
        })
        .unwrap();
        let out = embedder.embed_strings(&[]).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(embedder.dim(), 1024);
    }
}
