use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::config::Config;
use trd_core::document::Document;
use trd_core::vector::VectorIndex;
use trd_core::{embedding, ingest, TrdError};

#[derive(serde::Deserialize)]
pub struct UploadDocumentBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub lob: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// POST /api/documents — store a document and index it for retrieval.
pub async fn upload_document(
    State(app): State<AppState>,
    Json(body): Json<UploadDocumentBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let guard = app.index_lock.clone().lock_owned().await;
    let result = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        let config = Config::load(&root)?;
        let lob = body.lob.unwrap_or_else(|| config.project.default_lob.clone());

        let id = body.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let file_type = body.file_type.unwrap_or_else(|| "txt".to_string());
        let mut doc = Document::new(id, body.name, file_type, body.content);
        if let Some(email) = body.user_email {
            doc.user_email = email;
        }
        doc.meta = Some(serde_json::json!({ "lob": lob, "source": "upload" }));
        let doc = Document::create(&root, doc)?;

        let embedder = embedding::from_config(&config)?;
        let mut index = VectorIndex::open(&root)?;
        let chunks =
            ingest::ingest_document(&root, &mut index, embedder.as_ref(), &config, &doc, &lob)?;

        Ok::<_, TrdError>(serde_json::json!({
            "id": doc.id,
            "name": doc.name,
            "status": "indexed",
            "chunks": chunks,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/documents — all documents, newest first, content omitted.
pub async fn list_documents(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let docs = Document::list(&root)?;
        let list: Vec<serde_json::Value> = docs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "name": d.name,
                    "file_type": d.file_type,
                    "upload_date": d.upload_date,
                    "status": d.status,
                    "user_email": d.user_email,
                    "meta": d.meta,
                })
            })
            .collect();
        Ok::<_, TrdError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/documents/{id} — full document, content included.
pub async fn get_document(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let doc = Document::load(&root, &id)?;
        Ok::<_, TrdError>(serde_json::to_value(&doc)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/documents/{id} — remove a document and its index rows.
pub async fn delete_document(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let guard = app.index_lock.clone().lock_owned().await;
    let result = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        // Load first so a missing id surfaces as 404.
        let doc = Document::load(&root, &id)?;
        let mut index = VectorIndex::open(&root)?;
        let removed = index.delete_by_document(&doc.id)?;
        std::fs::remove_file(trd_core::paths::document_path(&root, &doc.id))
            .map_err(TrdError::Io)?;
        Ok::<_, TrdError>(serde_json::json!({
            "id": doc.id,
            "deleted": true,
            "chunks_removed": removed,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
