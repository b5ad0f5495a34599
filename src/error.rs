// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! The variants are the closed set of outcomes the frontend understands;
//! [`AppError::status`] yields the wire form carried in login redirects
//! and JSON error bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Spotify refused the authorization, answered a request with a
    /// non-success status, or the request itself failed. The detail is
    /// logged but never surfaced to the caller.
    #[error("Spotify error: {0}")]
    Provider(String),

    /// The state echoed by the callback did not match the login cookie.
    #[error("Authorization state mismatch")]
    StateMismatch,

    /// No token is held; the user has to log in first.
    #[error("No valid token held")]
    InvalidToken,

    /// A token is held but its expiry has passed.
    #[error("Access token expired")]
    ExpiredToken,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wire status for redirect query parameters and error bodies.
    /// Success paths use the literal `"ok"`, which no variant maps to.
    pub fn status(&self) -> &'static str {
        match self {
            AppError::Provider(_) | AppError::Internal(_) => "error",
            AppError::StateMismatch => "state_mismatch",
            AppError::InvalidToken => "invalid_token",
            AppError::ExpiredToken => "expired_token",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Provider(msg) => {
                tracing::warn!(error = %msg, "Spotify request failed");
                StatusCode::BAD_GATEWAY
            }
            AppError::StateMismatch => StatusCode::BAD_REQUEST,
            AppError::InvalidToken | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.status(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
