// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cached projection tests: the profile and followings are fetched from
//! Spotify once and then served from the bounded cache.

use spotify_followings::services::CallbackQuery;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{test_service, token_response};

fn profile_body() -> serde_json::Value {
    serde_json::json!({
        "display_name": "Roland",
        "href": "https://api.spotify.com/v1/users/roland",
        "id": "roland",
        "images": [{"url": "https://i.scdn.co/image/roland", "height": 300, "width": 300}],
        "country": "US",
        "product": "premium"
    })
}

fn artist(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "href": format!("https://api.spotify.com/v1/artists/{}", id),
        "genres": ["indie rock"],
        "images": [{"url": format!("https://i.scdn.co/image/{}", id)}],
        "followers": {"href": null, "total": 42},
        "type": "artist"
    })
}

#[tokio::test]
async fn profile_is_fetched_once_then_served_from_cache() {
    let server = MockServer::start().await;

    // Resource requests carry `{token_type} {access_token}`.
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer at_live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let service = test_service(&server.uri());
    service
        .store_token(token_response("at_live", 3600, Some("rt")))
        .await;

    let first = service.ensure_user().await.expect("fetch should work");
    let second = service.ensure_user().await.expect("cache should serve");

    assert_eq!(first, second);
    assert_eq!(first.id, "roland");
    assert_eq!(first.display_name, "Roland");
    assert_eq!(
        first.image_url.as_deref(),
        Some("https://i.scdn.co/image/roland")
    );
}

#[tokio::test]
async fn profile_request_never_carries_client_credential() {
    let server = MockServer::start().await;

    // A Basic credential on the resource leg would match this mock.
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", format!("Basic {}", common::TEST_BASIC_AUTH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer at_live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let service = test_service(&server.uri());
    service
        .store_token(token_response("at_live", 3600, Some("rt")))
        .await;

    service.ensure_user().await.expect("fetch should work");
}

#[tokio::test]
async fn profile_without_images_projects_no_image_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": null,
            "href": "https://api.spotify.com/v1/users/quiet",
            "id": "quiet",
            "images": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = test_service(&server.uri());
    service
        .store_token(token_response("at_live", 3600, Some("rt")))
        .await;

    let user = service.ensure_user().await.unwrap();
    assert_eq!(user.image_url, None);
    // Null display name falls back to the id.
    assert_eq!(user.display_name, "quiet");
}

#[tokio::test]
async fn followings_walk_every_cursor_page_once() {
    let server = MockServer::start().await;

    // Page 1: no `after` parameter, cursor points at a2.
    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "artists": {
                "items": [artist("a1", "First"), artist("a2", "Second")],
                "cursors": {"after": "a2"},
                "total": 3,
                "limit": 50
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Page 2: requested with after=a2, final page.
    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("after", "a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "artists": {
                "items": [artist("a3", "Third")],
                "cursors": {"after": null},
                "total": 3,
                "limit": 50
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = test_service(&server.uri());
    service
        .store_token(token_response("at_live", 3600, Some("rt")))
        .await;

    let artists = service.ensure_followings().await.expect("fetch should work");

    let names: Vec<&str> = artists.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
    assert_eq!(artists[0].followers, 42);
    assert_eq!(artists[0].genres, ["indie rock"]);

    // Second call is served from the cache; the expect(1) mocks verify
    // no further requests on drop.
    let cached = service.ensure_followings().await.unwrap();
    assert_eq!(cached.len(), 3);
}

#[tokio::test]
async fn end_to_end_login_then_single_profile_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "at_live",
            "token_type": "Bearer",
            "scope": "user-read-email user-read-private user-follow-read",
            "expires_in": 3600,
            "refresh_token": "rt_live"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer at_live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let service = test_service(&server.uri());

    // 1. Before login, nothing is usable
    assert_eq!(
        service.ensure_user().await.unwrap_err().status(),
        "invalid_token"
    );
    assert!(service.current_user().is_none());

    // 2. Complete the callback
    let query = CallbackQuery {
        code: Some("the-code".to_string()),
        state: Some("abcd1234abcd1234".to_string()),
        error: None,
    };
    service
        .handle_callback(&query, Some("abcd1234abcd1234"))
        .await
        .expect("callback should succeed");

    // 3. Two reads, one upstream fetch
    let user = service.ensure_user().await.expect("fetch should work");
    assert_eq!(user.id, "roland");
    let again = service.ensure_user().await.unwrap();
    assert_eq!(again, user);
}
