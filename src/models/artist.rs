// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Followed-artist models: the cursor-paged Web API payload and the
//! flat projection served to the frontend.

use serde::{Deserialize, Serialize};

use super::user::Image;

/// Envelope of `GET /v1/me/following?type=artist`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedArtistsPage {
    pub artists: ArtistPage,
}

/// One cursor page of followed artists.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistPage {
    /// Artists on this page
    pub items: Vec<Artist>,
    /// Cursor to the next page; `after` is null on the last page
    #[serde(default)]
    pub cursors: Cursors,
    /// Total number of followed artists
    #[serde(default)]
    pub total: u64,
}

/// Pagination cursors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

/// Artist object as the Web API returns it (the subset we consume).
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    /// Spotify artist ID
    pub id: String,
    /// Artist name
    pub name: String,
    /// Web API endpoint for this artist
    pub href: String,
    /// Genre tags; often empty
    #[serde(default)]
    pub genres: Vec<String>,
    /// Artist images, largest first; often empty
    #[serde(default)]
    pub images: Vec<Image>,
    /// Follower counts
    #[serde(default)]
    pub followers: Followers,
}

/// Follower counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

/// Followed-artist projection served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowedArtist {
    pub id: String,
    pub name: String,
    pub url: String,
    /// First artist image, if any
    pub image_url: Option<String>,
    pub genres: Vec<String>,
    pub followers: u64,
}

impl From<Artist> for FollowedArtist {
    fn from(artist: Artist) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
            url: artist.href,
            image_url: artist.images.into_iter().next().map(|image| image.url),
            genres: artist.genres,
            followers: artist.followers.total,
        }
    }
}
