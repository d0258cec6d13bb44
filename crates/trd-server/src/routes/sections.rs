use axum::Json;

/// GET /api/trd/sections — the static ordered section catalog.
/// Read-only, idempotent, cacheable.
pub async fn list_sections() -> Json<serde_json::Value> {
    let sections: Vec<serde_json::Value> = trd_core::section::catalog()
        .iter()
        .map(|s| {
            serde_json::json!({
                "key": s.key,
                "title": s.title,
                "description": s.description,
            })
        })
        .collect();
    Json(serde_json::json!({ "sections": sections }))
}
