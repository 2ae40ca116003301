//! Compiler adapter. Owns the one engine instance for the process.
//!
//! # Invariants
//! - Bring-up runs at most once. The first `ensure_ready` spawns it as its own
//!   task; every caller, the first included, waits on the published lifecycle
//!   state. A caller that stops waiting does not cancel the bring-up.
//! - A failed bring-up is remembered and re-raised on every later call without
//!   retrying, until the process restarts.
//! - Compile failures are per call: a failed compile leaves the engine usable.
//! - Compiles are serialized on the engine lock, since `reset` / `add_source` /
//!   `compile` mutate shared engine state.
//!
//! No timeout is applied here; callers own that policy.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::render::engine::{Diagnostic, Engine, OutputFormat, MAIN_SOURCE};

/// Message used when the engine fails without saying why.
pub const UNKNOWN_COMPILE_ERROR: &str = "Unknown compilation error";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Engine bring-up failed. Sticky for the process lifetime.
    #[error("Typesetting engine failed to initialize: {0}")]
    Init(String),

    /// The document did not compile; the message carries the engine diagnostics.
    #[error("{0}")]
    Compilation(String),
}

#[derive(Debug, Clone, PartialEq)]
enum InitState {
    Uninitialized,
    Initializing,
    Ready,
    Failed(String),
}

/// Engine lifecycle as reported by `GET /api/v1/engine/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineStatus {
    Uninitialized,
    Initializing,
    Ready,
    Failed { message: String },
}

pub struct Compiler {
    engine_name: &'static str,
    engine: Arc<Mutex<Box<dyn Engine>>>,
    lifecycle: Arc<watch::Sender<InitState>>,
}

impl Compiler {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        let (lifecycle, _) = watch::channel(InitState::Uninitialized);
        Self {
            engine_name: engine.name(),
            engine: Arc::new(Mutex::new(engine)),
            lifecycle: Arc::new(lifecycle),
        }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine_name
    }

    /// Brings the engine up on first use; see the module invariants.
    pub async fn ensure_ready(&self) -> Result<(), CompileError> {
        let mut outcome = self.lifecycle.subscribe();
        self.start_bring_up();

        let state = outcome
            .wait_for(|state| !matches!(state, InitState::Uninitialized | InitState::Initializing))
            .await
            .map_err(|_| CompileError::Init("engine bring-up was dropped".to_string()))?
            .clone();

        match state {
            InitState::Ready => Ok(()),
            InitState::Failed(message) => Err(CompileError::Init(message)),
            other => Err(CompileError::Init(format!("engine left in state {other:?}"))),
        }
    }

    /// Spawns the bring-up task if no attempt has been made yet.
    fn start_bring_up(&self) {
        let claimed = self.lifecycle.send_if_modified(|state| {
            if *state == InitState::Uninitialized {
                *state = InitState::Initializing;
                true
            } else {
                false
            }
        });
        if !claimed {
            return;
        }

        info!("Initializing {} typesetting engine", self.engine_name);
        let engine = Arc::clone(&self.engine);
        let lifecycle = Arc::clone(&self.lifecycle);
        let name = self.engine_name;
        tokio::spawn(async move {
            let result = engine.lock().await.init().await;
            let next = match result {
                Ok(()) => {
                    info!("{name} typesetting engine ready");
                    InitState::Ready
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("{name} engine initialization failed: {message}");
                    InitState::Failed(message)
                }
            };
            lifecycle.send_replace(next);
        });
    }

    /// Compiles `source` to PDF bytes.
    pub async fn compile_to_pdf(&self, source: &str) -> Result<Vec<u8>, CompileError> {
        self.compile(source, OutputFormat::Pdf).await
    }

    /// Compiles `source` to a single SVG document.
    pub async fn compile_to_svg(&self, source: &str) -> Result<String, CompileError> {
        let bytes = self.compile(source, OutputFormat::Svg).await?;
        String::from_utf8(bytes).map_err(|_| {
            CompileError::Compilation("Engine returned SVG that is not valid UTF-8".to_string())
        })
    }

    pub fn status(&self) -> EngineStatus {
        match &*self.lifecycle.borrow() {
            InitState::Uninitialized => EngineStatus::Uninitialized,
            InitState::Initializing => EngineStatus::Initializing,
            InitState::Ready => EngineStatus::Ready,
            InitState::Failed(message) => EngineStatus::Failed {
                message: message.clone(),
            },
        }
    }

    async fn compile(&self, source: &str, format: OutputFormat) -> Result<Vec<u8>, CompileError> {
        self.ensure_ready().await?;

        let mut engine = self.engine.lock().await;
        engine.reset();
        engine.add_source(MAIN_SOURCE, source);

        debug!(
            "Compiling {} bytes of source to {}",
            source.len(),
            format.extension()
        );
        let output = engine
            .compile(format)
            .await
            .map_err(|e| CompileError::Compilation(e.to_string()))?;

        match output.artifact {
            Some(artifact) => {
                debug!("Compiled {} artifact: {} bytes", format.extension(), artifact.len());
                Ok(artifact)
            }
            None => {
                let message = join_diagnostics(&output.diagnostics);
                warn!("Compilation failed: {message}");
                Err(CompileError::Compilation(message))
            }
        }
    }
}

/// Newline-joined diagnostic messages, or the generic message when there are none.
pub fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return UNKNOWN_COMPILE_ERROR.to_string();
    }
    diagnostics
        .iter()
        .map(Diagnostic::message)
        .collect::<Vec<_>>()
        .join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
