mod common;

use axum::http::StatusCode;
use common::{TestApp, bearer, error_code};
use serde_json::json;

fn interval(work: i64) -> serde_json::Value {
    json!({ "name": "Custom", "workDuration": work, "breakDuration": 5 })
}

#[tokio::test]
async fn work_duration_boundaries() {
    let app = TestApp::new();
    let token = app.register("bounds@b.com").await;
    let auth = bearer(&token);
    let headers = [("authorization", auth.as_str())];

    for work in [1, 180] {
        let (status, body) = app.post("/api/custom-intervals", &headers, interval(work)).await;
        assert_eq!(status, StatusCode::CREATED, "workDuration {}", work);
        assert_eq!(body["sessionMode"], "study");
        assert_eq!(body["isActive"], true);
        assert_eq!(body["usageCount"], 0);
    }

    for work in [0, 181] {
        let (status, body) = app.post("/api/custom-intervals", &headers, interval(work)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "workDuration {}", work);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn blank_names_and_long_breaks_are_rejected() {
    let app = TestApp::new();
    let token = app.register("names@b.com").await;
    let auth = bearer(&token);
    let headers = [("authorization", auth.as_str())];

    let (status, _) = app
        .post(
            "/api/custom-intervals",
            &headers,
            json!({ "name": "   ", "workDuration": 25, "breakDuration": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/custom-intervals",
            &headers,
            json!({ "name": "Long break", "workDuration": 25, "breakDuration": 61 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn name_length_is_counted_after_trimming() {
    let app = TestApp::new();
    let token = app.register("padded@b.com").await;
    let auth = bearer(&token);
    let headers = [("authorization", auth.as_str())];

    let fifty = "n".repeat(50);
    let (status, body) = app
        .post(
            "/api/custom-intervals",
            &headers,
            json!({ "name": format!(" {}  ", fifty), "workDuration": 25, "breakDuration": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], fifty);

    let (status, body) = app
        .post(
            "/api/custom-intervals",
            &headers,
            json!({ "name": "n".repeat(51), "workDuration": 25, "breakDuration": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_use_and_delete() {
    let app = TestApp::new();
    let token = app.register("crud@b.com").await;
    let auth = bearer(&token);
    let headers = [("authorization", auth.as_str())];

    let (_, created) = app.post("/api/custom-intervals", &headers, interval(40)).await;
    let uri = format!("/api/custom-intervals/{}", created["id"].as_str().unwrap());

    let (status, updated) = app
        .put(&uri, &headers, json!({ "name": "  Renamed  ", "breakDuration": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["workDuration"], 40);
    assert_eq!(updated["breakDuration"], 0);

    let (status, used) = app
        .send("POST", &format!("{}/use", uri), &headers, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(used["usageCount"], 1);
    assert!(used["lastUsedAt"].is_string());

    let (_, listed) = app.get("/api/custom-intervals", &headers).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&uri, &headers).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = app.delete(&uri, &headers).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn intervals_are_private_and_ids_are_checked() {
    let app = TestApp::new();
    let owner = app.register("owner@b.com").await;
    let owner_auth = bearer(&owner);
    let (_, created) = app
        .post(
            "/api/custom-intervals",
            &[("authorization", owner_auth.as_str())],
            interval(25),
        )
        .await;
    let uri = format!("/api/custom-intervals/{}", created["id"].as_str().unwrap());

    let other = app.register("other@b.com").await;
    let other_auth = bearer(&other);
    let headers = [("authorization", other_auth.as_str())];

    let (status, _) = app.put(&uri, &headers, json!({ "name": "Mine now" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = app.get("/api/custom-intervals", &headers).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, body) = app.delete("/api/custom-intervals/not-a-uuid", &headers).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}
