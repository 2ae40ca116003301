//! The typesetting engine seam.
//!
//! The adapter only ever drives an engine through [`Engine`]: bring it up once,
//! then per document `reset` → `add_source` → `compile`. Any binding that honours
//! this contract can back the compiler.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Virtual path of the generated document inside the engine's file set.
pub const MAIN_SOURCE: &str = "/main.typ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Svg => "image/svg+xml",
        }
    }
}

/// One engine message. Engines report either bare strings or objects with a
/// `message` field (extra fields such as spans are ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnostic {
    Text(String),
    Structured { message: String },
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Text(message) | Diagnostic::Structured { message } => message,
        }
    }
}

/// Result of one compile: the artifact, or the reasons there is none.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub artifact: Option<Vec<u8>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EngineOutput {
    pub fn artifact(bytes: Vec<u8>) -> Self {
        Self {
            artifact: Some(bytes),
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            artifact: None,
            diagnostics,
        }
    }
}

/// Failures talking to the engine itself, as opposed to errors in the document.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Engine protocol error: {0}")]
    Protocol(String),

    #[error("Engine used before initialization")]
    NotInitialized,
}

#[async_trait]
pub trait Engine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Loads the engine. Called at most once per process by the adapter.
    async fn init(&mut self) -> Result<(), EngineError>;

    /// Drops every registered source.
    fn reset(&mut self);

    /// Registers `text` under `path`, replacing any earlier source at that path.
    fn add_source(&mut self, path: &str, text: &str);

    /// Compiles [`MAIN_SOURCE`]. `Err` means the engine could not be driven at all;
    /// a document that fails to compile is an `Ok` with no artifact.
    async fn compile(&mut self, format: OutputFormat) -> Result<EngineOutput, EngineError>;
}
