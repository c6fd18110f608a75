//! Error type for the Ollama provider.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OllamaError {
    /// Missing or unparsable settings.
    #[error("config error: {0}")]
    Config(String),

    /// Transport failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 answer from the server.
    #[error("ollama returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Well-formed answer with the wrong shape.
    #[error("unexpected response: {0}")]
    Response(String),
}
