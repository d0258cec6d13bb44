use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::analysis::Analysis;
use trd_core::TrdError;

#[derive(serde::Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// GET /api/analyses?limit&offset — paginated summaries without the heavy
/// result payloads.
pub async fn list_analyses(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let limit = params.limit.unwrap_or(50);
        let offset = params.offset.unwrap_or(0);
        let summaries = Analysis::list(&root, limit, offset)?;
        Ok::<_, TrdError>(serde_json::to_value(&summaries)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/analyses/{id} — full analysis record, results included.
pub async fn get_analysis(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let analysis = Analysis::load(&root, &id)?;
        Ok::<_, TrdError>(serde_json::to_value(&analysis)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
