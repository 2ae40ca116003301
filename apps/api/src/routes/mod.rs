pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/resume/defaults", get(generation::handle_defaults))
        .route(
            "/api/v1/resume/source",
            post(generation::handle_generate_source),
        )
        // Render API
        .route("/api/v1/resume/pdf", post(render::handle_resume_pdf))
        .route("/api/v1/resume/svg", post(render::handle_resume_svg))
        .route("/api/v1/render/pdf", post(render::handle_source_pdf))
        .route("/api/v1/render/svg", post(render::handle_source_svg))
        .route("/api/v1/engine/status", get(render::handle_engine_status))
        .with_state(state)
}
