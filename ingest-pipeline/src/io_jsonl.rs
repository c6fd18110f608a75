//! JSONL document sources.
//!
//! - [`read_documents`] → strict: every non-empty line must be a [`Document`].
//! - [`read_documents_lenient`] → tolerant: malformed lines are logged and skipped.
//!
//! Accepted line shape: `{"id": "...", "content": "...", "metadata": {...}}`
//! where `id` and `metadata` are optional.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::IngestError;
use crate::record::Document;

/// Reads documents strictly.
///
/// # Errors
/// - [`IngestError::Io`] if the file cannot be read.
/// - [`IngestError::Parse`] on the first malformed line.
pub fn read_documents(jsonl_path: impl AsRef<Path>) -> Result<Vec<Document>, IngestError> {
    info!("Reading documents JSONL: {:?}", jsonl_path.as_ref());

    let reader = BufReader::new(File::open(jsonl_path.as_ref())?);
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(&line)
            .map_err(|e| IngestError::Parse(format!("line {}: {}", i + 1, e)))?;
        out.push(doc);
    }

    debug!("Loaded {} documents", out.len());
    Ok(out)
}

/// Reads documents, skipping lines that do not parse.
///
/// # Errors
/// - [`IngestError::Io`] if the file cannot be read.
pub fn read_documents_lenient(jsonl_path: impl AsRef<Path>) -> Result<Vec<Document>, IngestError> {
    info!("Reading documents JSONL (lenient): {:?}", jsonl_path.as_ref());

    let reader = BufReader::new(File::open(jsonl_path.as_ref())?);
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Document>(&line) {
            Ok(doc) => out.push(doc),
            Err(e) => warn!("Skipping malformed document on line {}: {}", i + 1, e),
        }
    }

    debug!("Loaded {} documents", out.len());
    Ok(out)
}
