use axum::Json;

/// GET /api/health — liveness probe for deployment checks.
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "trd-agent",
    }))
}
