//! StageFlow API - Proposal Workflow Dashboard
//!
//! Tracks procurement proposals as they move through the ordered stages of a
//! predefined scheme: approvals, feedback, threaded discussion and
//! administrative stage skipping.
//!
//! All state is held in memory for the lifetime of the process.

mod config;
mod error;
mod models;
mod routes;
mod state;
mod workflow;

use crate::config::{LogFormat, Settings};
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing(LogFormat::from_env());

    info!("🚀 Starting StageFlow - Proposal Workflow Dashboard...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let state = Arc::new(AppState::from_settings(&settings).await?);
    info!(
        "📚 Scheme catalog loaded with {} schemes",
        state.proposals.schemes().len()
    );

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Schemes ───");
    info!("   GET  /api/schemes                  - List schemes");
    info!("   GET  /api/schemes/{{id}}             - Get scheme");
    info!("");
    info!("   ─── Proposals ───");
    info!("   POST /api/proposals                - Create proposal");
    info!("   GET  /api/proposals?q=             - List / search proposals");
    info!("   GET  /api/proposals/{{id}}           - Get proposal");
    info!("   POST /api/proposals/{{id}}/advance   - Approve or send feedback");
    info!("   POST /api/proposals/{{id}}/skip      - Skip to a later stage");
    info!("   POST /api/proposals/{{id}}/comments  - Comment or reply");
    info!("   GET  /api/proposals/{{id}}/insights  - Stage recommendations");
    info!("   GET  /api/active-proposal          - Get active proposal");
    info!("   PUT  /api/active-proposal          - Set active proposal");
    info!("   GET  /api/stats                    - Dashboard statistics");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stageflow_api=debug,tower_http=debug"));

    let layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry.with(layer.json()).init(),
        LogFormat::Compact => registry.with(layer.compact()).init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
