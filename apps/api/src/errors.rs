use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::CompileError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The typesetting engine never came up. Stays this way until restart.
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The document was rejected; the message is the engine's diagnostics.
    #[error("Compilation failed: {0}")]
    Compilation(String),
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Init(message) => AppError::EngineUnavailable(message),
            CompileError::Compilation(message) => AppError::Compilation(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::EngineUnavailable(msg) => {
                tracing::error!("Engine unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ENGINE_UNAVAILABLE",
                    format!("The typesetting engine failed to initialize: {msg}"),
                )
            }
            AppError::Compilation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "COMPILATION_FAILED",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
