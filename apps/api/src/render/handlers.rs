//! Axum route handlers for the Render API.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::generate;
use crate::models::resume::ResumeData;
use crate::render::compiler::EngineStatus;
use crate::render::download::ArtifactDownload;
use crate::render::engine::OutputFormat;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub filename: Option<String>,
}

/// POST /api/v1/resume/pdf
///
/// Generates and compiles the resume, returning it as a PDF attachment
/// (`resume.pdf` unless `?filename=` says otherwise).
pub async fn handle_resume_pdf(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
    Json(data): Json<ResumeData>,
) -> Result<ArtifactDownload, AppError> {
    let source = generate(&data);
    let pdf = state.compiler.compile_to_pdf(&source).await?;
    let size = pdf.len();
    let download = ArtifactDownload::new(pdf, query.filename.as_deref(), OutputFormat::Pdf);
    info!("Rendered {} ({} bytes)", download.filename(), size);
    Ok(download)
}

/// POST /api/v1/resume/svg
///
/// Generates and compiles the resume for preview, all pages in one SVG.
pub async fn handle_resume_svg(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<impl IntoResponse, AppError> {
    let source = generate(&data);
    let svg = state.compiler.compile_to_svg(&source).await?;
    Ok(svg_response(svg))
}

/// POST /api/v1/render/pdf
///
/// Compiles caller-supplied Typst source (e.g. a hand-edited export) to PDF.
pub async fn handle_source_pdf(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
    source: String,
) -> Result<ArtifactDownload, AppError> {
    let pdf = state.compiler.compile_to_pdf(&source).await?;
    Ok(ArtifactDownload::new(
        pdf,
        query.filename.as_deref(),
        OutputFormat::Pdf,
    ))
}

/// POST /api/v1/render/svg
pub async fn handle_source_svg(
    State(state): State<AppState>,
    source: String,
) -> Result<impl IntoResponse, AppError> {
    let svg = state.compiler.compile_to_svg(&source).await?;
    Ok(svg_response(svg))
}

/// GET /api/v1/engine/status
pub async fn handle_engine_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.compiler.status())
}

fn svg_response(svg: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, OutputFormat::Svg.content_type())], svg)
}
