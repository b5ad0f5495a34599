// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API client and token lifecycle.
//!
//! Handles:
//! - Authorization-code exchange and refresh (Basic client credential)
//! - Web API requests with the stored bearer token
//! - The process-wide token slot and its expiry tracking
//! - Cached projections of the profile and followed artists

use crate::error::{AppError, Result};
use crate::models::artist::ArtistPage;
use crate::models::{FollowedArtistsPage, StoredToken, TokenResponse, UserProfile};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::time::Duration;

/// Timeout for any single request to Spotify.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size for the followed-artists endpoint (Spotify caps it at 50).
const FOLLOWING_PAGE_LIMIT: u32 = 50;

/// Spotify API client.
///
/// Holds the app credential and nothing user-specific. The Basic
/// credential is derived once here and only ever sent to the accounts
/// token endpoint; Web API requests always carry the user token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    basic_auth: String,
}

impl SpotifyClient {
    /// Create a new Spotify client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            "https://accounts.spotify.com".to_string(),
            "https://api.spotify.com/v1".to_string(),
        )
    }

    /// Create a client against explicit hosts. Tests point this at a
    /// local mock server.
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        accounts_url: String,
        api_url: String,
    ) -> Self {
        let basic_auth = STANDARD.encode(format!("{}:{}", client_id, client_secret));
        Self {
            http: reqwest::Client::new(),
            accounts_url,
            api_url,
            client_id,
            basic_auth,
        }
    }

    /// Exchange an authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// Get the authenticated user's profile.
    pub async fn get_profile(&self, token: &StoredToken) -> Result<UserProfile> {
        let url = format!("{}/me", self.api_url);
        self.get_json(&url, token, &[]).await
    }

    /// Get one cursor page of followed artists.
    pub async fn get_followed_artists(
        &self,
        token: &StoredToken,
        after: Option<&str>,
    ) -> Result<ArtistPage> {
        let url = format!("{}/me/following", self.api_url);
        let limit = FOLLOWING_PAGE_LIMIT.to_string();

        let mut query = vec![("type", "artist"), ("limit", limit.as_str())];
        if let Some(after) = after {
            query.push(("after", after));
        }

        let page: FollowedArtistsPage = self.get_json(&url, token, &query).await?;
        Ok(page.artists)
    }

    /// POST to the accounts token endpoint with a form body and the
    /// Basic client credential.
    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.basic_auth),
            )
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Token request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Generic GET request against the Web API. The Authorization value
    /// is `{token_type} {access_token}` from the stored token, never the
    /// client credential.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        token: &StoredToken,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::AUTHORIZATION, token.authorization_value())
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Spotify returned an error response");
            return Err(AppError::Provider(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SpotifyService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

use crate::cache::BoundedCache;
use crate::models::{FollowedArtist, StoredUser};
use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::{Mutex, RwLock};

/// Scopes requested on the authorization leg.
const SCOPES: &str = "user-read-email user-read-private user-follow-read";

/// Lifetime of cached profile/followings projections (1 hour).
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Entry bound for each projection cache.
const CACHE_CAPACITY: usize = 100;

/// Well-known cache keys.
const USER_KEY: &str = "me";
const FOLLOWINGS_KEY: &str = "followings";

/// High-level Spotify service that manages token lifecycle and API calls.
///
/// This service encapsulates:
/// - The single stored token and its expiry tracking
/// - Automatic refresh when the token has expired
/// - Serialization of refreshes so concurrent callers trigger one
/// - Bounded, time-expiring caches of the profile and followings
///
/// Clones share the same token slot and caches.
#[derive(Clone)]
pub struct SpotifyService {
    client: SpotifyClient,
    redirect_uri: String,
    /// The one token this deployment holds (single Spotify account).
    token: Arc<RwLock<Option<StoredToken>>>,
    /// Serializes token refresh so concurrent expired callers do not
    /// each burn the refresh token.
    refresh_lock: Arc<Mutex<()>>,
    user_cache: Arc<BoundedCache<&'static str, StoredUser>>,
    followings_cache: Arc<BoundedCache<&'static str, Vec<FollowedArtist>>>,
}

impl SpotifyService {
    /// Create a new Spotify service around a client.
    pub fn new(client: SpotifyClient, redirect_uri: String) -> Self {
        Self {
            client,
            redirect_uri,
            token: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
            user_cache: Arc::new(BoundedCache::new(CACHE_TTL, CACHE_CAPACITY)),
            followings_cache: Arc::new(BoundedCache::new(CACHE_TTL, CACHE_CAPACITY)),
        }
    }

    /// Base64 client credential, as sent on the token legs.
    pub fn client_credential(&self) -> &str {
        &self.client.basic_auth
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Overwrite the stored token with a fresh token response.
    ///
    /// Last write wins; the record is replaced wholesale, never merged
    /// with the previous one.
    pub async fn store_token(&self, response: TokenResponse) {
        let token = StoredToken::from_response(response, Utc::now());
        *self.token.write().await = Some(token);
    }

    /// Validate the held token without side effects.
    pub async fn validate_token(&self) -> Result<StoredToken> {
        self.validate_token_at(Utc::now()).await
    }

    /// Validate against an explicit instant. A missing token and an
    /// expired token are distinct failures; the expiry boundary itself
    /// counts as expired.
    pub async fn validate_token_at(&self, now: DateTime<Utc>) -> Result<StoredToken> {
        let guard = self.token.read().await;
        match guard.as_ref() {
            None => Err(AppError::InvalidToken),
            Some(token) if token.is_expired_at(now) => Err(AppError::ExpiredToken),
            Some(token) => Ok(token.clone()),
        }
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Fails with `InvalidToken` when there is nothing to refresh with:
    /// no token at all, or a token stored without a refresh token.
    pub async fn refresh_access_token(&self) -> Result<()> {
        let refresh_token = {
            let guard = self.token.read().await;
            match guard.as_ref().and_then(|token| token.refresh_token.clone()) {
                Some(value) => value,
                None => return Err(AppError::InvalidToken),
            }
        };

        let response = self.client.refresh_token(&refresh_token).await?;
        self.store_token(response).await;

        tracing::info!("Access token refreshed");
        Ok(())
    }

    /// Get a valid (non-expired) token, refreshing when needed.
    ///
    /// 1. Validate the held token (fast path, read lock only)
    /// 2. If expired, acquire the refresh lock
    /// 3. Re-validate after the lock (another task may have refreshed
    ///    while we waited), and only then refresh
    pub async fn ensure_token(&self) -> Result<StoredToken> {
        match self.validate_token().await {
            Ok(token) => return Ok(token),
            Err(AppError::ExpiredToken) => {}
            Err(e) => return Err(e),
        }

        let _guard = self.refresh_lock.lock().await;

        // Another task may have refreshed while we waited for the lock.
        match self.validate_token().await {
            Ok(token) => return Ok(token),
            Err(AppError::ExpiredToken) => {}
            Err(e) => return Err(e),
        }

        self.refresh_access_token().await?;
        self.validate_token().await
    }

    /// Whether a usable token is held or can be obtained by refreshing.
    ///
    /// Failures of any kind, network included, read as "not
    /// authenticated"; this never propagates an error.
    pub async fn is_authenticated(&self) -> bool {
        self.ensure_token().await.is_ok()
    }

    // ─── OAuth Flow ──────────────────────────────────────────────────────────

    /// Build the authorization redirect: the URL to send the browser to
    /// and the state nonce the caller must set as the login cookie.
    pub fn login_redirect(&self) -> Result<LoginRedirect> {
        let state = generate_state()?;
        let url = format!(
            "{}/authorize?response_type=code&client_id={}&scope={}&redirect_uri={}&state={}",
            self.client.accounts_url,
            urlencoding::encode(&self.client.client_id),
            urlencoding::encode(SCOPES),
            urlencoding::encode(&self.redirect_uri),
            state,
        );

        Ok(LoginRedirect { url, state })
    }

    /// Handle the provider callback: verify the state nonce, exchange
    /// the code, and store the resulting token.
    ///
    /// Check order follows the provider contract: an explicit `error`
    /// parameter wins, then the CSRF state check, then the exchange.
    /// Nothing is sent to the token endpoint unless both checks pass.
    pub async fn handle_callback(
        &self,
        query: &CallbackQuery,
        cookie_state: Option<&str>,
    ) -> Result<()> {
        if let Some(error) = &query.error {
            tracing::warn!(error = %error, "Spotify reported an authorization error");
            return Err(AppError::Provider(error.clone()));
        }

        if !state_matches(query.state.as_deref(), cookie_state) {
            return Err(AppError::StateMismatch);
        }

        let code = query.code.as_deref().unwrap_or_default();
        let response = self.client.exchange_code(code, &self.redirect_uri).await?;
        self.store_token(response).await;

        tracing::info!("Authorization code exchanged, token stored");
        Ok(())
    }

    // ─── Cached Projections ──────────────────────────────────────────────────

    /// Cached profile projection, if present and live.
    ///
    /// A record without an id is treated as absent, so a degenerate
    /// entry can never satisfy `ensure_user`.
    pub fn current_user(&self) -> Option<StoredUser> {
        self.user_cache
            .get(&USER_KEY)
            .filter(|user| !user.id.is_empty())
    }

    /// Project and cache a raw profile payload.
    pub fn store_user(&self, profile: UserProfile) {
        self.user_cache.insert(USER_KEY, profile.into());
    }

    /// Fetch the profile with the current token and cache the projection.
    async fn fetch_user_profile(&self) -> Result<()> {
        let token = self.ensure_token().await?;
        let profile = self.client.get_profile(&token).await?;
        self.store_user(profile);
        Ok(())
    }

    /// Get the user's profile, fetching it from Spotify only when the
    /// cached projection is absent or expired.
    pub async fn ensure_user(&self) -> Result<StoredUser> {
        if let Some(user) = self.current_user() {
            return Ok(user);
        }

        self.fetch_user_profile().await?;

        self.current_user()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile empty after fetch")))
    }

    /// Get every followed artist, fetching all pages from Spotify only
    /// when the cached projection is absent or expired.
    pub async fn ensure_followings(&self) -> Result<Vec<FollowedArtist>> {
        if let Some(artists) = self.followings_cache.get(&FOLLOWINGS_KEY) {
            return Ok(artists);
        }

        let artists = self.fetch_followings().await?;
        self.followings_cache.insert(FOLLOWINGS_KEY, artists.clone());
        Ok(artists)
    }

    /// Walk the cursor pages of the followings endpoint.
    async fn fetch_followings(&self) -> Result<Vec<FollowedArtist>> {
        let token = self.ensure_token().await?;

        let mut artists: Vec<FollowedArtist> = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page = self
                .client
                .get_followed_artists(&token, after.as_deref())
                .await?;

            let page_len = page.items.len();
            artists.extend(page.items.into_iter().map(FollowedArtist::from));

            // An empty page with a cursor would otherwise loop forever.
            after = page.cursors.after.filter(|cursor| !cursor.is_empty());
            if after.is_none() || page_len == 0 {
                break;
            }
        }

        tracing::debug!(count = artists.len(), "Followed artists fetched");
        Ok(artists)
    }
}

/// Authorization redirect: where to send the browser, plus the nonce
/// that goes into the state cookie.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub url: String,
    pub state: String,
}

/// Query parameters Spotify sends to the callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Generate the CSRF state nonce: 16 hex characters from 8 CSPRNG bytes.
fn generate_state() -> Result<String> {
    let mut bytes = [0u8; 8];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;
    Ok(hex::encode(bytes))
}

/// Constant-time comparison of the callback state with the cookie nonce.
/// Absent or empty values never match, including absent-vs-absent.
fn state_matches(callback_state: Option<&str>, cookie_state: Option<&str>) -> bool {
    let (Some(callback), Some(cookie)) = (callback_state, cookie_state) else {
        return false;
    };
    if callback.is_empty() || cookie.is_empty() {
        return false;
    }
    callback.as_bytes().ct_eq(cookie.as_bytes()).into()
}
