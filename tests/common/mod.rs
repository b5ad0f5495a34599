// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use spotify_followings::config::Config;
use spotify_followings::models::TokenResponse;
use spotify_followings::routes::create_router;
use spotify_followings::services::{SpotifyClient, SpotifyService};
use spotify_followings::AppState;
use std::sync::Arc;

/// Basic credential for `Config::default()`:
/// base64("test_client_id:test_client_secret").
#[allow(dead_code)]
pub const TEST_BASIC_AUTH: &str = "dGVzdF9jbGllbnRfaWQ6dGVzdF9jbGllbnRfc2VjcmV0";

/// Create a service whose accounts and Web API hosts both point at a
/// mock server.
#[allow(dead_code)]
pub fn test_service(mock_base: &str) -> SpotifyService {
    let config = Config::default();
    let client = SpotifyClient::with_base_urls(
        config.client_id,
        config.client_secret,
        mock_base.to_string(),
        format!("{}/v1", mock_base),
    );
    SpotifyService::new(client, config.redirect_uri)
}

/// Create a test app against a mock Spotify host.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(mock_base: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let spotify = test_service(mock_base);

    let state = Arc::new(AppState { config, spotify });

    (create_router(state.clone()), state)
}

/// Token response as the token endpoint would serve it.
#[allow(dead_code)]
pub fn token_response(
    access_token: &str,
    expires_in: i64,
    refresh_token: Option<&str>,
) -> TokenResponse {
    TokenResponse {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        scope: Some("user-read-email user-read-private user-follow-read".to_string()),
        expires_in,
        refresh_token: refresh_token.map(|s| s.to_string()),
    }
}
