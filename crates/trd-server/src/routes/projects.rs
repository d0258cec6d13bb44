use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::config::Config;
use trd_core::project::Project;
use trd_core::TrdError;

#[derive(serde::Deserialize)]
pub struct CreateProjectBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub lob: Option<String>,
}

/// POST /api/projects — create a project. LOB defaults from config.
pub async fn create_project(
    State(app): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let id = body.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let lob = body.lob.unwrap_or(config.project.default_lob);
        let project = Project::create(&root, id, body.name, lob)?;
        Ok::<_, TrdError>(serde_json::to_value(&project)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/projects — list all projects.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let projects = Project::list(&root)?;
        Ok::<_, TrdError>(serde_json::to_value(&projects)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/projects/{id} — project detail.
pub async fn get_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let project = Project::load(&root, &id)?;
        Ok::<_, TrdError>(serde_json::to_value(&project)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
