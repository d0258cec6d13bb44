use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::generation::GenerationRequest;

/// JSON analyze request. `analysis_type` selects the flavor; only `trd`
/// generation is supported.
#[derive(serde::Deserialize)]
pub struct AnalyzeBody {
    #[serde(rename = "type")]
    pub analysis_type: String,
    #[serde(default)]
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub text_input_ids: Vec<String>,
    #[serde(default)]
    pub selected_sections: Option<Vec<String>>,
}

/// POST /api/projects/{project_id}/analyze — JSON variant of the generation
/// dispatcher, scoped to a project path.
pub async fn analyze_project(
    State(app): State<AppState>,
    Path(project_id): Path<String>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.analysis_type != "trd" {
        return Err(AppError::bad_request(format!(
            "unsupported analysis type: {}",
            body.analysis_type
        )));
    }

    let request = GenerationRequest {
        project_id,
        document_ids: body.document_ids,
        text_input_ids: body.text_input_ids,
        selected_sections: body.selected_sections,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || super::generate::execute(&root, &request))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
