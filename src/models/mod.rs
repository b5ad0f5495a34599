// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod artist;
pub mod token;
pub mod user;

pub use artist::{Artist, FollowedArtist, FollowedArtistsPage};
pub use token::{StoredToken, TokenResponse};
pub use user::{Image, StoredUser, UserProfile};
