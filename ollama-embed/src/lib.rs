//! Ollama embedding provider for `ingest-pipeline`.
//!
//! Calls `POST {base}/api/embed` with the whole batch as `input` and checks
//! that one vector of the configured size comes back per text.

mod client;
mod config;
mod errors;

pub use client::OllamaEmbedder;
pub use config::OllamaConfig;
pub use errors::OllamaError;
