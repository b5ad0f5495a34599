// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Spotify Followings: see every artist you follow in one place
//!
//! This crate provides the backend API for the followings page: the
//! OAuth authorization-code flow against Spotify, token upkeep, and
//! cached projections of the profile and followed-artist payloads.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::SpotifyService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub spotify: SpotifyService,
}
