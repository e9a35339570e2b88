// ABOUTME: Server binary entry point for the HealthLife assistant
// ABOUTME: Loads configuration, initializes logging and resources, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use healthlife_server::{
    config::ServerConfig, logging, resources::ServerResources, server,
};
use tracing::{error, info};

/// Command-line overrides
#[derive(Parser)]
#[command(name = "healthlife-server")]
#[command(about = "HealthLife assistant - streamed health chat over personal records")]
pub struct Args {
    /// Override `HTTP_PORT`
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting HealthLife server");
    let resources = Arc::new(ServerResources::from_config(&config).await?);

    if let Err(e) = server::run(&config, resources).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }
    Ok(())
}
