// ABOUTME: HTTP server assembly: routes, tracing and CORS layers, and graceful shutdown
// ABOUTME: Binds the configured address and serves until ctrl-c or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes;

/// Routes with request tracing and CORS applied
pub fn build_app(resources: Arc<ServerResources>, config: &ServerConfig) -> Router {
    routes::router(resources)
        .layer(setup_cors(config))
        .layer(TraceLayer::new_for_http())
}

/// Serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(config: &ServerConfig, resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.http_port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HealthLife server listening on http://{}", addr);
    display_available_endpoints(&addr);

    axum::serve(listener, build_app(resources, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HealthLife server stopped");
    Ok(())
}

fn display_available_endpoints(addr: &SocketAddr) {
    info!("=== Available API Endpoints ===");
    info!("   Health:       GET    http://{addr}/health");
    info!("   Chat (SSE):   POST   http://{addr}/chat/stream");
    info!("   Chat (text):  GET    http://{addr}/chat?msg=...");
    info!("   New chat:     DELETE http://{addr}/chat/memory");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received ctrl-c, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
