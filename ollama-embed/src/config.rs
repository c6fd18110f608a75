//! Settings for the Ollama embedding backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::OllamaError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Server base URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Embedding model identifier (e.g., "bge-m3").
    pub model: String,
    /// Expected embedding dimensionality (e.g., 1024 for bge-m3).
    pub dim: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "bge-m3".to_string(),
            dim: 1024,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OllamaConfig {
    /// Builds configuration from environment variables.
    ///
    /// - `OLLAMA_URL` (default: "http://localhost:11434")
    /// - `EMBEDDING_MODEL` (default: "bge-m3")
    /// - `EMBEDDING_DIM` (default: 1024)
    /// - `OLLAMA_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, OllamaError> {
        let d = Self::default();
        let cfg = Self {
            base_url: std::env::var("OLLAMA_URL").unwrap_or(d.base_url),
            model: std::env::var("EMBEDDING_MODEL").unwrap_or(d.model),
            dim: read_usize_env("EMBEDDING_DIM")?.unwrap_or(d.dim),
            timeout: read_usize_env("OLLAMA_TIMEOUT_SECS")?
                .map(|s| Duration::from_secs(s as u64))
                .unwrap_or(d.timeout),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), OllamaError> {
        if self.base_url.trim().is_empty() {
            return Err(OllamaError::Config("base_url is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(OllamaError::Config("model is empty".into()));
        }
        if self.dim == 0 {
            return Err(OllamaError::Config("EMBEDDING_DIM must be > 0".into()));
        }
        if self.timeout.is_zero() {
            return Err(OllamaError::Config("timeout must be > 0".into()));
        }
        Ok(())
    }

    /// Full URL of the batch embedding endpoint.
    pub fn embed_url(&self) -> String {
        format!("{}/api/embed", self.base_url.trim_end_matches('/'))
    }
}

/// Reads an optional `usize` from env; unparsable values are errors.
fn read_usize_env(key: &str) -> Result<Option<usize>, OllamaError> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| OllamaError::Config(format!("failed to parse env variable: {key} = '{v}'"))),
        Err(_) => Ok(None),
    }
}
