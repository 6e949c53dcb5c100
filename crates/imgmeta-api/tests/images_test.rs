mod helpers;

use axum::http::StatusCode;
use helpers::auth::{bearer, valid_token};
use helpers::{setup_test_app, TestApp};
use serde_json::{json, Value};

async fn create(app: &TestApp, body: Value) -> axum_test::TestResponse {
    app.client()
        .post("/images")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&body)
        .await
}

async fn get_image(app: &TestApp, id: &str) -> axum_test::TestResponse {
    app.client()
        .get(&format!("/images/{}", id))
        .add_header("Authorization", bearer(&valid_token()))
        .await
}

fn sunset() -> Value {
    json!({
        "data": "aGVsbG8=",
        "contentType": "image/png",
        "description": "sunset"
    })
}

#[tokio::test]
async fn test_create_read_delete_roundtrip() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");

    let response = create(&app, sunset()).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.header("location"), "/images/img123");

    let body: Value = response.json();
    assert_eq!(body["id"], "img123");
    assert_eq!(body["imageUrl"], "https://store/img123");
    assert_eq!(body["description"], "sunset");
    assert!(body["location"].is_null());
    assert!(body.get("imgId").is_none());
    assert!(body.get("createdAt").is_some());
    assert!(body.get("updatedAt").is_some());

    let response = get_image(&app, "img123").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["imageUrl"], "https://store/img123");

    let response = app
        .client()
        .delete("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(app.images.deleted_ids(), ["img123"]);

    let response = get_image(&app, "img123").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_without_authorization_touches_nothing() {
    let app = setup_test_app();

    let response = app.client().post("/images").json(&sunset()).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHENTICATED");
    assert_eq!(app.images.total_calls(), 0);
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_create_with_invalid_base64_touches_nothing() {
    let app = setup_test_app();

    for data in ["not base64!", "aGVsbG8", "", "aGVs*G8="] {
        let response = create(
            &app,
            json!({ "data": data, "contentType": "image/png" }),
        )
        .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", data);
        assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    }

    assert_eq!(app.images.total_calls(), 0);
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_create_with_disallowed_content_type() {
    let app = setup_test_app();

    let response = create(
        &app,
        json!({ "data": "aGVsbG8=", "contentType": "application/pdf" }),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.images.total_calls(), 0);
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_create_with_malformed_body() {
    let app = setup_test_app();

    let response = create(&app, json!({ "contentType": "image/png" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    assert_eq!(app.images.total_calls(), 0);
}

#[tokio::test]
async fn test_create_trims_free_text() {
    let app = setup_test_app();

    let response = create(
        &app,
        json!({
            "data": "aGVsbG8=",
            "contentType": "image/png",
            "description": "  sunset  ",
            "location": " Kalmar "
        }),
    )
    .await;

    let body: Value = response.json();
    assert_eq!(body["description"], "sunset");
    assert_eq!(body["location"], "Kalmar");
}

#[tokio::test]
async fn test_remote_create_failure_leaves_no_record() {
    let app = setup_test_app();
    app.images.fail_creates();

    let response = create(&app, sunset()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "UPSTREAM_ERROR");
    assert_eq!(app.images.create_calls(), 1);
    assert_eq!(app.store.len().await, 0);
}

#[tokio::test]
async fn test_duplicate_remote_id_is_internal_error() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    app.images.respond_with("img123", "https://store/img123");

    assert_eq!(create(&app, sunset()).await.status_code(), StatusCode::CREATED);
    let response = create(&app, sunset()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "INTERNAL_ERROR");
    assert_eq!(app.images.create_calls(), 2);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_malformed_remote_url_is_internal_error() {
    let app = setup_test_app();
    app.images.respond_with("img123", "not-a-url");

    let response = create(&app, sunset()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "INTERNAL_ERROR");
    assert_eq!(app.store.len().await, 0);
}

#[tokio::test]
async fn test_remote_delete_failure_keeps_record() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;
    app.images.fail_deletes();

    let response = app
        .client()
        .delete("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "UPSTREAM_ERROR");
    assert_eq!(get_image(&app, "img123").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_metadata_removal_failure_is_internal_error() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;
    app.store.fail_removes();

    let response = app
        .client()
        .delete("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "INTERNAL_ERROR");
    assert_eq!(app.images.deleted_ids(), ["img123"]);
}

#[tokio::test]
async fn test_unknown_id_is_404_for_every_method() {
    let app = setup_test_app();
    let auth = bearer(&valid_token());
    let client = app.client();

    let responses = [
        client
            .get("/images/missing")
            .add_header("Authorization", auth.clone())
            .await,
        client
            .put("/images/missing")
            .add_header("Authorization", auth.clone())
            .json(&json!({ "description": "x" }))
            .await,
        client
            .patch("/images/missing")
            .add_header("Authorization", auth.clone())
            .json(&json!({ "description": "x" }))
            .await,
        client
            .delete("/images/missing")
            .add_header("Authorization", auth.clone())
            .await,
    ];

    for response in responses {
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
    }
    assert_eq!(app.images.total_calls(), 0);
}

#[tokio::test]
async fn test_unknown_id_wins_over_invalid_body() {
    let app = setup_test_app();

    let response = app
        .client()
        .put("/images/missing")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "data": "%%%" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_resolved_once_per_request() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;
    let before = app.store.lookups();

    get_image(&app, "img123").await;

    assert_eq!(app.store.lookups() - before, 1);
}

#[tokio::test]
async fn test_identical_values_keep_updated_at() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(
        &app,
        json!({
            "data": "aGVsbG8=",
            "contentType": "image/png",
            "description": "sunset",
            "location": "Kalmar"
        }),
    )
    .await;
    let original: Value = get_image(&app, "img123").await.json();

    let response = app
        .client()
        .patch("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "description": "sunset", "location": "Kalmar" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app
        .client()
        .put("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "description": " sunset ", "location": "Kalmar" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let after: Value = get_image(&app, "img123").await.json();
    assert_eq!(after["updatedAt"], original["updatedAt"]);
    assert_eq!(after, original);
}

#[tokio::test]
async fn test_changed_value_moves_updated_at() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;
    let original: Value = get_image(&app, "img123").await.json();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    app.client()
        .patch("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "description": "dawn" }))
        .await;

    let after: Value = get_image(&app, "img123").await.json();
    assert_eq!(after["description"], "dawn");
    assert_ne!(after["updatedAt"], original["updatedAt"]);
    assert_eq!(after["createdAt"], original["createdAt"]);
    assert_eq!(after["imageUrl"], original["imageUrl"]);
}

#[tokio::test]
async fn test_patch_changes_only_present_fields() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;

    app.client()
        .patch("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "location": "Kalmar" }))
        .await;

    let body: Value = get_image(&app, "img123").await.json();
    assert_eq!(body["description"], "sunset");
    assert_eq!(body["location"], "Kalmar");
}

#[tokio::test]
async fn test_put_replaces_both_fields() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;

    let response = app
        .client()
        .put("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "location": "Kalmar" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let body: Value = get_image(&app, "img123").await.json();
    assert!(body["description"].is_null());
    assert_eq!(body["location"], "Kalmar");
    assert_eq!(app.images.create_calls(), 1);
}

#[tokio::test]
async fn test_put_with_invalid_data_is_rejected() {
    let app = setup_test_app();
    app.images.respond_with("img123", "https://store/img123");
    create(&app, sunset()).await;

    let response = app
        .client()
        .put("/images/img123")
        .add_header("Authorization", bearer(&valid_token()))
        .json(&json!({ "data": "%%%", "description": "changed" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = get_image(&app, "img123").await.json();
    assert_eq!(body["description"], "sunset");
}

#[tokio::test]
async fn test_list_returns_public_views() {
    let app = setup_test_app();
    create(&app, sunset()).await;
    create(&app, sunset()).await;

    let response = app
        .client()
        .get("/images")
        .add_header("Authorization", bearer(&valid_token()))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item.get("id").is_some());
        assert!(item.get("imgId").is_none());
    }
}

#[tokio::test]
async fn test_oversized_body_is_rejected_before_upload() {
    let app = helpers::setup_test_app_with(helpers::test_config_with(&[("MAX_PAYLOAD_MB", "1")]));
    let data = "AAAA".repeat(512 * 1024);

    let response = create(&app, json!({ "data": data, "contentType": "image/png" })).await;

    assert!(
        matches!(
            response.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE | StatusCode::BAD_REQUEST
        ),
        "{}",
        response.status_code()
    );
    assert_eq!(app.images.total_calls(), 0);
    assert_eq!(app.store.calls(), 0);
}
