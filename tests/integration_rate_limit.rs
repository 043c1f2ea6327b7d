mod common;

use std::net::SocketAddr;

use academy::academy_config::RateLimitConfig;
use academy::router::init_router;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use common::{body_json, test_state};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn setup_test_app_with_rate_limit(pool: PgPool, config: RateLimitConfig) -> Router {
    init_router(test_state(pool, config))
}

/// One auth request and two general requests per client before throttling.
fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        general_per_second: 1,
        general_burst_size: 2,
        auth_per_second: 1,
        auth_burst_size: 1,
        trust_proxy_headers: false,
        cleanup_interval_secs: 60,
    }
}

fn peer(addr: &str) -> ConnectInfo<SocketAddr> {
    ConnectInfo(addr.parse().unwrap())
}

fn login_request(peer_addr: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .extension(peer(peer_addr));
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    builder
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": "test@example.com",
                "password": "password123"
            }))
            .unwrap(),
        ))
        .unwrap()
}

fn classes_request(peer_addr: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/classes")
        .extension(peer(peer_addr))
        .body(Body::empty())
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_rate_limit_exceeded(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let response = app
        .clone()
        .oneshot(login_request("192.168.1.100:50000", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(login_request("192.168.1.100:50001", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Too many requests from this IP, please try again later."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forwarded_for_is_ignored_by_default(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let response = app
        .clone()
        .oneshot(login_request("198.51.100.7:40000", Some("10.0.0.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    for i in 2..20 {
        let forwarded = format!("10.0.0.{i}");
        let response = app
            .clone()
            .oneshot(login_request("198.51.100.7:40000", Some(&forwarded)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_is_per_peer(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let response = app
        .clone()
        .oneshot(login_request("10.0.0.1:1234", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(login_request("10.0.0.2:1234", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_trusted_proxy_keys_on_forwarded_for(pool: PgPool) {
    let config = RateLimitConfig {
        trust_proxy_headers: true,
        ..strict_rate_limit_config()
    };
    let app = setup_test_app_with_rate_limit(pool, config);

    let response = app
        .clone()
        .oneshot(login_request("127.0.0.1:8080", Some("203.0.113.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(login_request("127.0.0.1:8080", Some("203.0.113.2")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(login_request("127.0.0.1:8080", Some("203.0.113.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_general_rate_limit_exceeded(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(classes_request("172.16.0.5:3000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(classes_request("172.16.0.5:3000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_is_not_rate_limited(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    for _ in 0..5 {
        let request = Request::builder()
            .uri("/health")
            .extension(peer("172.16.0.9:3000"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_disabled_rate_limit(pool: PgPool) {
    let config = RateLimitConfig {
        enabled: false,
        ..strict_rate_limit_config()
    };
    let app = setup_test_app_with_rate_limit(pool, config);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(login_request("192.168.1.1:1000", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
