//! GM Companion - session sync core for an AI game-master chat
//!
//! A Rust backend that reconciles the conversation transcript,
//! character sheet, and world model of one play session against a
//! remote game-master service, and serves the derived state to a
//! browser UI.

mod api;
mod config;
mod gateway;
mod runtime;
mod session;
mod sync;

use api::{create_router, AppState};
use config::Config;
use gateway::HttpGateway;
use runtime::SessionRuntime;
use std::net::SocketAddr;
use std::sync::Arc;
use sync::SyncContext;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gm_companion=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(gateway = %config.gateway_url, "Connecting to game-master gateway");

    let gateway = HttpGateway::new(&config.gateway_url)?;
    let context = SyncContext {
        edit_policy: config.edit_policy,
    };
    let runtime = Arc::new(SessionRuntime::new(gateway, context));

    // Session creation and the initial loads must not block serving;
    // a dead gateway degrades to an empty session, not a hung start.
    let startup = Arc::clone(&runtime);
    tokio::spawn(async move { startup.start().await });

    let state = AppState::new(runtime);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("GM companion listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
