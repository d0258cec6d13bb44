use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::approval::Approval;
use trd_core::types::ApprovalStatus;
use trd_core::TrdError;

#[derive(serde::Deserialize)]
pub struct CreateApprovalBody {
    pub analysis_id: String,
    #[serde(default)]
    pub approver_email: Option<String>,
}

/// POST /api/approvals — open a pending approval for an analysis.
pub async fn create_approval(
    State(app): State<AppState>,
    Json(body): Json<CreateApprovalBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let approval = Approval::create(&root, &body.analysis_id, body.approver_email)?;
        Ok::<_, TrdError>(serde_json::to_value(&approval)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/approvals — newest first.
pub async fn list_approvals(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let approvals = Approval::list(&root)?;
        Ok::<_, TrdError>(serde_json::to_value(&approvals)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/approvals/{id}
pub async fn get_approval(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let approval = Approval::load(&root, &id)?;
        Ok::<_, TrdError>(serde_json::to_value(&approval)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct DecisionBody {
    pub status: String,
    #[serde(default)]
    pub approver_response: Option<String>,
}

/// POST /api/approvals/{id}/decision — approve or reject a pending approval.
pub async fn decide_approval(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DecisionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = ApprovalStatus::parse(&body.status)
        .ok_or_else(|| AppError::bad_request(format!("unknown approval status: {}", body.status)))?;

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let approval = Approval::decide(&root, &id, status, body.approver_response)?;
        Ok::<_, TrdError>(serde_json::to_value(&approval)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
