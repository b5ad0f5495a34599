// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify OAuth authentication routes.
//!
//! `/login` sets the CSRF state cookie and bounces the browser to the
//! Spotify authorize page; `/authCallback` consumes the cookie, runs the
//! code exchange, and sends the browser back to the frontend with the
//! outcome in a `status` query parameter.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::error::Result;
use crate::services::spotify::CallbackQuery;
use crate::AppState;

/// Cookie carrying the state nonce between `/login` and the callback.
pub const STATE_COOKIE: &str = "spotify_auth_state";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/authCallback", get(auth_callback))
}

/// Start the OAuth flow: set the state cookie, redirect to Spotify.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let redirect = state.spotify.login_redirect()?;

    tracing::info!("Starting authorization flow, redirecting to Spotify");

    let jar = jar.add(state_cookie(redirect.state));
    Ok((jar, Redirect::temporary(&redirect.url)))
}

/// Build the single-use state cookie.
///
/// A login normally consumes it within seconds; the long deadline just
/// keeps a stalled authorize tab usable.
fn state_cookie(value: String) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(7))
        .build()
}

/// OAuth callback from Spotify.
///
/// Every outcome, success included, is a redirect to the frontend with
/// `?status=...`; errors never surface as HTTP error pages here since
/// the caller is a browser mid-flow. The state cookie is removed no
/// matter how the exchange went: the nonce is single-use.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> (CookieJar, Redirect) {
    let cookie_state = jar
        .get(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let status = match state
        .spotify
        .handle_callback(&query, cookie_state.as_deref())
        .await
    {
        Ok(()) => "ok",
        Err(e) => e.status(),
    };

    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/").build());

    let destination = format!("{}/?status={}", state.config.frontend_url, status);
    (jar, Redirect::temporary(&destination))
}
