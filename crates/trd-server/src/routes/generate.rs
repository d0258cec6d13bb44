use axum::extract::State;
use axum::{Form, Json};
use std::path::Path;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::config::Config;
use trd_core::generation::{self, GenerationRequest};
use trd_core::vector::VectorIndex;
use trd_core::{embedding, Result as TrdResult};

// ---------------------------------------------------------------------------
// POST /api/generate
// ---------------------------------------------------------------------------

/// Form-encoded generation request. The id lists arrive as JSON array
/// strings inside form fields, matching the historical wire shape.
#[derive(serde::Deserialize)]
pub struct GenerateForm {
    pub project_id: String,
    #[serde(default)]
    pub document_ids: Option<String>,
    #[serde(default)]
    pub text_input_ids: Option<String>,
    #[serde(default)]
    pub selected_sections: Option<String>,
}

fn parse_id_list(field: &str, raw: Option<&str>) -> Result<Vec<String>, AppError> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s).map_err(|e| {
            AppError::bad_request(format!("{field} is not a JSON array string: {e}"))
        }),
    }
}

/// POST /api/generate — run a generation request, returning the stored
/// analysis synchronously.
pub async fn generate(
    State(app): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let document_ids = parse_id_list("document_ids", form.document_ids.as_deref())?;
    let text_input_ids = parse_id_list("text_input_ids", form.text_input_ids.as_deref())?;
    // Absent field means "all sections"; a present-but-empty array is the
    // zero-section request the domain layer rejects.
    let selected_sections = match form.selected_sections.as_deref() {
        None => None,
        Some(s) => Some(serde_json::from_str::<Vec<String>>(s).map_err(|e| {
            AppError::bad_request(format!("selected_sections is not a JSON array string: {e}"))
        })?),
    };

    let request = GenerationRequest {
        project_id: form.project_id,
        document_ids,
        text_input_ids,
        selected_sections,
    };

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || execute(&root, &request))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// Shared blocking generation path, also used by the project analyze route.
pub(crate) fn execute(root: &Path, request: &GenerationRequest) -> TrdResult<serde_json::Value> {
    let config = Config::load(root)?;
    let embedder = embedding::from_config(&config)?;
    let writer = generation::writer_from_config(&config)?;
    let index = VectorIndex::open(root)?;

    let analysis = generation::run_generation(
        root,
        &index,
        embedder.as_ref(),
        writer.as_ref(),
        &config,
        request,
    )?;

    Ok(serde_json::json!({
        "analysis_id": analysis.id,
        "title": analysis.title,
        "status": analysis.status,
        "date": analysis.date,
        "results": analysis.results,
    }))
}
