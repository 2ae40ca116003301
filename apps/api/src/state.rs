use std::sync::Arc;

use crate::render::Compiler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one compiler (and engine) for the process.
    pub compiler: Arc<Compiler>,
}
