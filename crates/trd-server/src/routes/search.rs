use axum::extract::{Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::config::Config;
use trd_core::vector::VectorIndex;
use trd_core::{embedding, TrdError};

#[derive(serde::Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub lob: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/search?q=<query>&lob=<lob>&limit=<n> — cosine similarity search
/// over the vector index with an optional LOB metadata filter.
pub async fn search(
    State(app): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let embedder = embedding::from_config(&config)?;
        let index = VectorIndex::open(&root)?;

        let limit = params.limit.unwrap_or(10);
        let hits = index.search(embedder.as_ref(), &params.q, params.lob.as_deref(), limit)?;
        Ok::<_, TrdError>(serde_json::to_value(&hits)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
