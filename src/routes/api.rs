// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes for the frontend.

use crate::error::Result;
use crate::models::FollowedArtist;
use crate::AppState;
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/me", get(get_me))
        .route("/api/followings", get(get_followings))
}

// ─── Session ─────────────────────────────────────────────────

/// Authentication probe response.
#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

/// Report whether a usable Spotify token is held.
///
/// This never fails: any trouble obtaining a token, network trouble
/// included, reads as `authenticated: false`.
async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: state.spotify.is_authenticated().await,
    })
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub display_name: String,
    pub profile_url: String,
    pub image_url: Option<String>,
}

/// Get the authenticated user's profile (cached for an hour).
async fn get_me(State(state): State<Arc<AppState>>) -> Result<Json<UserResponse>> {
    let user = state.spotify.ensure_user().await?;

    Ok(Json(UserResponse {
        id: user.id,
        display_name: user.display_name,
        profile_url: user.profile_url,
        image_url: user.image_url,
    }))
}

// ─── Followed Artists ────────────────────────────────────────

/// Followed artists response.
#[derive(Serialize)]
pub struct FollowingsResponse {
    pub total: usize,
    pub artists: Vec<FollowedArtist>,
}

/// Get every artist the user follows (cached for an hour).
async fn get_followings(State(state): State<Arc<AppState>>) -> Result<Json<FollowingsResponse>> {
    let artists = state.spotify.ensure_followings().await?;

    Ok(Json(FollowingsResponse {
        total: artists.len(),
        artists,
    }))
}
