mod helpers;

use axum::http::StatusCode;
use helpers::auth::{bearer, expired_token, foreign_token, hs256_confusion_token, valid_token};
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_missing_authorization_is_401() {
    let app = setup_test_app();

    let response = app.client().get("/images").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHENTICATED");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_401() {
    let app = setup_test_app();

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer   ", "token abc"] {
        let response = app
            .client()
            .get("/images")
            .add_header("Authorization", value)
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{}", value);
    }
}

#[tokio::test]
async fn test_failed_verification_is_403() {
    let app = setup_test_app();

    let tokens = [
        expired_token(),
        foreign_token(),
        hs256_confusion_token(),
        "not.a.jwt".to_string(),
    ];

    for token in tokens {
        let response = app
            .client()
            .get("/images")
            .add_header("Authorization", bearer(&token))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(response.json::<Value>()["code"], "FORBIDDEN");
    }
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_valid_token_is_accepted() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/images")
        .add_header("Authorization", bearer(&valid_token()))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), serde_json::json!([]));
}

#[tokio::test]
async fn test_authorization_checked_before_lookup() {
    let app = setup_test_app();

    let response = app.client().get("/images/missing").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.lookups(), 0);

    let response = app
        .client()
        .delete("/images/missing")
        .add_header("Authorization", bearer(&expired_token()))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(app.store.lookups(), 0);
    assert_eq!(app.images.total_calls(), 0);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = setup_test_app();

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "You got Resource API v1!"
    );

    for path in ["/health", "/health/ready", "/api/openapi.json"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let app = setup_test_app();

    let response = app.client().get("/nowhere").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "trace-me")
        .await;

    assert_eq!(response.header("x-request-id"), "trace-me");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");

    let response = app.client().get("/images").await;
    assert!(response.headers().get("x-request-id").is_some());
}
