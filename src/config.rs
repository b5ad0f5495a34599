//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; nothing re-reads the environment
//! after that, so a running server never changes identity.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify OAuth client ID (public)
    pub client_id: String,
    /// Spotify OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with Spotify, hit on the callback leg
    pub redirect_uri: String,
    /// Frontend URL for post-callback redirects
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
            redirect_uri: "http://localhost:8080/authCallback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The client credentials are required and startup fails without
    /// them; everything else has a local-development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            client_id: env::var("SPOTIFY_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("SPOTIFY_CLIENT_ID"))?,
            client_secret: env::var("SPOTIFY_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SPOTIFY_CLIENT_SECRET"))?,
            redirect_uri: env::var("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|_| format!("http://localhost:{port}/authCallback")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
