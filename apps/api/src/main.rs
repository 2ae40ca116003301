mod config;
mod errors;
mod generation;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EngineConfig};
use crate::render::engine::Engine;
use crate::render::remote::RemoteEngine;
use crate::render::typst_cli::TypstCliEngine;
use crate::render::Compiler;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on invalid env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // One compiler per process; the engine inside it is brought up lazily.
    let compiler = Arc::new(Compiler::new(build_engine(&config.engine)));
    info!("Compiler configured (engine: {})", compiler.engine_name());

    if config.engine_warmup {
        let compiler = compiler.clone();
        tokio::spawn(async move {
            if let Err(e) = compiler.ensure_ready().await {
                warn!("Engine warm-up failed, renders will report it: {e}");
            }
        });
    }

    let state = AppState { compiler };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor's deploy host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the engine binding selected by `TYPST_ENGINE`.
fn build_engine(config: &EngineConfig) -> Box<dyn Engine> {
    match config {
        EngineConfig::Cli { binary, font_path } => {
            Box::new(TypstCliEngine::new(binary.clone(), font_path.clone()))
        }
        EngineConfig::Remote { base_url } => Box::new(RemoteEngine::new(base_url)),
    }
}
