// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vidshare API Server
//!
//! Serves the JSON API for accounts, uploads, votes and comments, plus the
//! uploaded media and static pages.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidshare::{config::Config, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Vidshare API");

    // Open JSON documents and media directories
    let state = AppState::initialize(config.clone()).await?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        upload_dir = %config.upload_dir.display(),
        public_dir = %config.public_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Storage initialized"
    );

    // Build router
    let app = vidshare::routes::create_router(Arc::new(state));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vidshare=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
