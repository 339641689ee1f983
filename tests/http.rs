use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fb_resolver::error::LookupError;
use fb_resolver::handler::{AppState, build_router};
use fb_resolver::lookup::{Credentials, Lookup, LookupPayload};
use fb_resolver::overrides::OverrideTable;
use fb_resolver::resolver::{Resolver, ResolverConfig};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Stub lookup that knows exactly one profile.
struct OneProfile;

#[async_trait]
impl Lookup for OneProfile {
    async fn lookup(
        &self,
        profile_url: &str,
        _credentials: &Credentials,
    ) -> Result<LookupPayload, LookupError> {
        match profile_url {
            "https://www.facebook.com/zuck" => Ok(LookupPayload::found("100000000004")),
            "https://www.facebook.com/broken" => {
                Err(LookupError::Other("upstream closed connection".to_string()))
            }
            _ => Ok(LookupPayload::empty()),
        }
    }
}

fn app(dev_mode_enabled: bool) -> axum::Router {
    let config = ResolverConfig {
        app_id: "app".to_string(),
        app_secret: "secret".to_string(),
        dev_mode_enabled,
    };
    let resolver = Resolver::new(Arc::new(OneProfile), config, Some(OverrideTable::builtin()));
    build_router(AppState {
        resolver: Arc::new(resolver),
    })
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_healthcheck() {
    let (status, body) = get(app(false), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_missing_input() {
    for uri in ["/api/fb-id", "/api/fb-id?input=", "/api/fb-id?input=%20%20"] {
        let (status, body) = get(app(false), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body, json!({"error": "MISSING_INPUT"}));
    }
}

#[tokio::test]
async fn test_numeric_input() {
    let (status, body) = get(app(false), "/api/fb-id?input=100047085038525").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100047085038525"}));
}

#[tokio::test]
async fn test_profile_php_url() {
    let uri = "/api/fb-id?input=https%3A%2F%2Fwww.facebook.com%2Fprofile.php%3Fid%3D100012345678";
    let (status, body) = get(app(false), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100012345678"}));
}

#[tokio::test]
async fn test_resolved_via_lookup() {
    let (status, body) = get(app(false), "/api/fb-id?input=%40zuck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100000000004"}));
}

#[tokio::test]
async fn test_not_found() {
    let (status, body) = get(app(false), "/api/fb-id?input=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "NOT_FOUND"}));
}

#[tokio::test]
async fn test_lookup_failure_does_not_leak_details() {
    let (status, body) = get(app(false), "/api/fb-id?input=broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "RESOLUTION_FAILED"}));
}

#[tokio::test]
async fn test_dev_mode_overrides() {
    let (status, body) = get(app(true), "/api/fb-id?input=TheQbanguy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100047085038525"}));

    let (status, _) = get(app(false), "/api/fb-id?input=TheQbanguy").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_input_uses_first_value() {
    let (status, body) = get(app(false), "/api/fb-id?input=100047085038525&input=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100047085038525"}));

    let (status, body) = get(app(false), "/api/fb-id?input=&input=100047085038525").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "MISSING_INPUT"}));
}

#[tokio::test]
async fn test_share_link_input() {
    // input=share.php?u=https://facebook.com/zuck, encoded once for the share
    // link and once more for the query string
    let uri = "/api/fb-id?input=share.php%3Fu%3Dhttps%253A%252F%252Ffacebook.com%252Fzuck";
    let (status, body) = get(app(false), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100000000004"}));
}

#[tokio::test]
async fn test_mobile_url_input() {
    let uri = "/api/fb-id?input=https%3A%2F%2Fm.facebook.com%2Fzuck%2F";
    let (status, body) = get(app(false), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "100000000004"}));
}
