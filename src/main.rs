// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Followings API Server
//!
//! Lets a user sign in with Spotify and serves a JSON view of their
//! profile and the artists they follow.

use spotify_followings::{
    config::Config,
    services::{SpotifyClient, SpotifyService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Spotify Followings API");

    // Initialize the Spotify service
    let client = SpotifyClient::new(config.client_id.clone(), config.client_secret.clone());
    let spotify = SpotifyService::new(client, config.redirect_uri.clone());
    tracing::info!(
        client_id = %config.client_id,
        redirect_uri = %config.redirect_uri,
        "Spotify service initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        spotify,
    });

    // Build router
    let app = spotify_followings::routes::create_router(state);

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

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spotify_followings=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
