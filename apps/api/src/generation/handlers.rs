//! Axum route handlers for the Generation API.

use axum::{http::header, response::IntoResponse, Json};
use tracing::debug;

use crate::generation::generate;
use crate::models::resume::ResumeData;

/// POST /api/v1/resume/source
///
/// Returns the generated Typst source as plain text. Never fails on content:
/// blank or partial records produce partial documents.
pub async fn handle_generate_source(Json(data): Json<ResumeData>) -> impl IntoResponse {
    let source = generate(&data);
    debug!(
        "Generated {} bytes of source for {} sections",
        source.len(),
        data.section_order.len()
    );
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        source,
    )
}

/// GET /api/v1/resume/defaults
///
/// The blank record the editor starts from: default theme, sizes and section order.
pub async fn handle_defaults() -> Json<ResumeData> {
    Json(ResumeData::default())
}
