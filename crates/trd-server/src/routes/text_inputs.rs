use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use trd_core::text_input::TextInput;
use trd_core::TrdError;

#[derive(serde::Deserialize)]
pub struct CreateTextInputBody {
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

/// POST /api/text-inputs — store ad hoc text for later generation requests.
pub async fn create_text_input(
    State(app): State<AppState>,
    Json(body): Json<CreateTextInputBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let input = TextInput::new(uuid::Uuid::new_v4().to_string(), body.title, body.content);
        let input = TextInput::create(&root, input)?;
        Ok::<_, TrdError>(serde_json::to_value(&input)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/text-inputs — newest first.
pub async fn list_text_inputs(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let inputs = TextInput::list(&root)?;
        Ok::<_, TrdError>(serde_json::to_value(&inputs)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
