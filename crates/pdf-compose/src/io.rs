//! Document I/O operations
//!
//! File access is async; parsing and serialization run on blocking tasks.

use crate::document::{OutputDocument, SourceDocument};
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load any supported source file. The document id is the file name.
pub async fn load_source(path: impl AsRef<Path>) -> Result<SourceDocument> {
    let path = path.as_ref();
    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || SourceDocument::from_bytes(id, bytes)).await?
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save an output document
pub async fn save_pdf(output: OutputDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || output.to_bytes()).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
