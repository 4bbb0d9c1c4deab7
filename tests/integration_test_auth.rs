mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{cookie_value, parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let app = TestApp::new().await;

    let (status, _) = app.send("POST", "/api/v1/auth/register", None,
        Some(json!({"email": "short@example.com", "password": "1234567"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/api/v1/auth/register", None,
        Some(json!({"email": "not-an-email", "password": "long-enough-password"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, user) = app.send("POST", "/api/v1/auth/register", None,
        Some(json!({"email": " Host@Example.com ", "password": "long-enough-password", "display_name": "Host"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "host@example.com");
    assert!(user.get("password_hash").is_none());

    let (status, _) = app.send("POST", "/api/v1/auth/register", None,
        Some(json!({"email": "HOST@example.com", "password": "another-password"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Login is case-insensitive on email
    let auth = app.login("HOST@EXAMPLE.COM", "long-enough-password").await;
    assert!(!auth.csrf_token.is_empty());

    let (status, _) = app.send("POST", "/api/v1/auth/login", None,
        Some(json!({"email": "host@example.com", "password": "wrong-password"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_host_routes_require_session_and_csrf() {
    let app = TestApp::new().await;
    let auth = app.host().await;

    let (status, body) = app.send("GET", "/api/v1/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));

    // Cookie without CSRF header on a mutation
    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "No CSRF"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(response).await, json!({"error": "Missing CSRF token"}));

    let (status, body) = app.send("POST", "/api/v1/events", Some(&common::AuthHeaders {
        access_token: auth.access_token.clone(),
        csrf_token: "not-the-issued-token".into(),
    }), Some(json!({"name": "Wrong CSRF"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "CSRF token mismatch"}));

    // Reads only need the cookie
    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = app.send("GET", "/api/v1/events", Some(&common::AuthHeaders {
        access_token: "garbage".into(),
        csrf_token: auth.csrf_token.clone(),
    }), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotation_and_logout() {
    let app = TestApp::new().await;
    app.send("POST", "/api/v1/auth/register", None,
        Some(json!({"email": "rotate@example.com", "password": "long-enough-password"}))).await;

    let login = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"email": "rotate@example.com", "password": "long-enough-password"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let refresh_token = cookie_value(&login, "refresh_token").expect("No refresh_token cookie");

    let refresh = |token: String| {
        let router = app.router.clone();
        async move {
            router.oneshot(
                Request::builder().method("POST").uri("/api/v1/auth/refresh")
                    .header(header::COOKIE, format!("refresh_token={}", token))
                    .body(Body::empty()).unwrap()
            ).await.unwrap()
        }
    };

    let rotated = refresh(refresh_token.clone()).await;
    assert_eq!(rotated.status(), StatusCode::OK);
    let new_refresh = cookie_value(&rotated, "refresh_token").expect("No rotated refresh_token");
    assert_ne!(new_refresh, refresh_token);
    let body = parse_body(rotated).await;
    assert_eq!(body["user"]["email"], "rotate@example.com");

    // A rotated token is single use
    let replay = refresh(refresh_token).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    let next = refresh(new_refresh).await;
    assert_eq!(next.status(), StatusCode::OK);

    // Logout revokes a fresh session
    let auth_login = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"email": "rotate@example.com", "password": "long-enough-password"}).to_string())).unwrap()
    ).await.unwrap();
    let session_refresh = cookie_value(&auth_login, "refresh_token").unwrap();

    let logout = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/logout")
            .header(header::COOKIE, format!("refresh_token={}", session_refresh))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(logout.status(), StatusCode::OK);

    assert_eq!(refresh(session_refresh).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookies_even_when_revocation_fails() {
    let app = TestApp::new().await;
    app.send("POST", "/api/v1/auth/register", None,
        Some(json!({"email": "offline@example.com", "password": "long-enough-password"}))).await;

    let login = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"email": "offline@example.com", "password": "long-enough-password"}).to_string())).unwrap()
    ).await.unwrap();
    let refresh_token = cookie_value(&login, "refresh_token").unwrap();

    // Store goes away; revocation cannot succeed
    app.pool.close().await;

    let logout = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/logout")
            .header(header::COOKIE, format!("refresh_token={}", refresh_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(logout.status(), StatusCode::OK);
    assert_eq!(cookie_value(&logout, "refresh_token").as_deref(), Some(""));
}
