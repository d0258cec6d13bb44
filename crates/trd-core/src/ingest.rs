use crate::chunker::Chunker;
use crate::config::Config;
use crate::document::Document;
use crate::embedding::Embedder;
use crate::error::{Result, TrdError};
use crate::types::DocumentStatus;
use crate::vector::{VectorIndex, VectorRecord};
use std::path::Path;

// ---------------------------------------------------------------------------
// Document ingestion
// ---------------------------------------------------------------------------

/// Chunk, embed, and index a stored document, then mark it `indexed`.
/// Returns the number of chunks written.
pub fn ingest_document(
    root: &Path,
    index: &mut VectorIndex,
    embedder: &dyn Embedder,
    config: &Config,
    document: &Document,
    lob: &str,
) -> Result<usize> {
    let chunker = Chunker::from_config(&config.chunking);
    let chunks = chunker.split(&document.content);
    let total = chunks.len();

    for (i, chunk) in chunks.iter().enumerate() {
        let embedding = embedder.embed(chunk)?;
        index.upsert(VectorRecord {
            id: format!("{}-{i}", document.id),
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            content: chunk.clone(),
            lob: lob.to_string(),
            source: "upload".to_string(),
            chunk_index: i,
            total_chunks: total,
            embedding,
        })?;
    }

    Document::set_status(root, &document.id, DocumentStatus::Indexed)?;
    tracing::info!(document = %document.id, chunks = total, "indexed document");
    Ok(total)
}

/// Ingest every `.txt`/`.md` file in a directory as its own document,
/// tagged with the given LOB. Returns (documents, chunks) counts.
pub fn ingest_dir(
    root: &Path,
    index: &mut VectorIndex,
    embedder: &dyn Embedder,
    config: &Config,
    dir: &Path,
    lob: &str,
) -> Result<(usize, usize)> {
    if !dir.is_dir() {
        return Err(TrdError::InvalidRequest(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|s| s.to_str()),
                Some("txt") | Some("md")
            )
        })
        .collect();
    files.sort();

    let mut doc_count = 0;
    let mut chunk_count = 0;
    for file in files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let content = std::fs::read_to_string(&file)?;
        if content.trim().is_empty() {
            tracing::warn!(file = %name, "skipping empty file");
            continue;
        }
        let file_type = file
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("txt")
            .to_string();

        let mut doc = Document::new(uuid::Uuid::new_v4().to_string(), name, file_type, content);
        doc.file_path = Some(file.display().to_string());
        doc.meta = Some(serde_json::json!({ "source": "training_data", "lob": lob }));
        let doc = Document::create(root, doc)?;

        chunk_count += ingest_document(root, index, embedder, config, &doc, lob)?;
        doc_count += 1;
    }
    Ok((doc_count, chunk_count))
}
