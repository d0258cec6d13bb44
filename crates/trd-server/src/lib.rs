pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/api/health", get(routes::health::get_health))
        // Section catalog
        .route("/api/trd/sections", get(routes::sections::list_sections))
        // Generation
        .route("/api/generate", post(routes::generate::generate))
        .route(
            "/api/projects/{project_id}/analyze",
            post(routes::analyze::analyze_project),
        )
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects", post(routes::projects::create_project))
        .route("/api/projects/{id}", get(routes::projects::get_project))
        // Documents
        .route("/api/documents", get(routes::documents::list_documents))
        .route("/api/documents", post(routes::documents::upload_document))
        .route("/api/documents/{id}", get(routes::documents::get_document))
        .route(
            "/api/documents/{id}",
            delete(routes::documents::delete_document),
        )
        // Text inputs
        .route("/api/text-inputs", get(routes::text_inputs::list_text_inputs))
        .route(
            "/api/text-inputs",
            post(routes::text_inputs::create_text_input),
        )
        // Analyses
        .route("/api/analyses", get(routes::analyses::list_analyses))
        .route("/api/analyses/{id}", get(routes::analyses::get_analysis))
        // Approvals
        .route("/api/approvals", get(routes::approvals::list_approvals))
        .route("/api/approvals", post(routes::approvals::create_approval))
        .route("/api/approvals/{id}", get(routes::approvals::get_approval))
        .route(
            "/api/approvals/{id}/decision",
            post(routes::approvals::decide_approval),
        )
        // Vector search
        .route("/api/search", get(routes::search::search))
        .layer(cors)
        .with_state(app_state)
}

/// Start the TRD agent API server.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("TRD agent API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("TRD agent API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
