use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use super::harness::{TestHarness, decode_json, get_request, header_value, json_request};
use crate::{PERSISTENCE_HEADER, SOURCE_HEADER};

#[tokio::test]
async fn health_answers_ok() {
    let harness = TestHarness::setup();
    let response = harness
        .router
        .clone()
        .oneshot(get_request("/health"))
        .await
        .expect("health response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read health body");
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn list_returns_dual_alias_records() {
    let harness = TestHarness::setup();
    let response = harness
        .router
        .clone()
        .oneshot(get_request("/api/profiles"))
        .await
        .expect("list response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(response.headers(), SOURCE_HEADER),
        Some("backend")
    );
    let payload: Vec<Value> = decode_json(response).await;
    assert_eq!(payload.len(), 3);
    assert_eq!(payload[0]["id"], 1);
    assert_eq!(payload[0]["braSize"], "32C");
    assert_eq!(payload[0]["bra_size"], "32C");
    assert_eq!(payload[0]["traits"], "idol;actress");
    assert_eq!(payload[0]["isFictional"], 1);
}

#[tokio::test]
async fn create_then_get_then_delete_on_local_store() {
    let harness = TestHarness::setup_local();

    let created = harness
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/profiles",
            json!({
                "name": "Ruby Hoshino",
                "bra_size": "30B",
                "measurement_1": 31,
                "waist": "22",
                "hips": 32,
                "traits": "idol;twin",
                "isFictional": true,
                "instagram_url": "ruby_hoshino"
            }),
        ))
        .await
        .expect("create response");
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(
        header_value(created.headers(), PERSISTENCE_HEADER),
        Some("backend")
    );
    let created: Value = decode_json(created).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["braSize"], "30B");
    assert_eq!(created["bust"], 31.0);
    assert_eq!(created["measurement_2"], 22.0);
    assert_eq!(created["instagram"], "ruby_hoshino");
    assert_eq!(created["instagram_url"], "ruby_hoshino");

    let fetched = harness
        .router
        .clone()
        .oneshot(get_request("/api/profiles/1"))
        .await
        .expect("get response");
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = decode_json(fetched).await;
    assert_eq!(fetched["name"], "Ruby Hoshino");
    assert_eq!(fetched["traits"], "idol;twin");

    let deleted = harness
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/profiles/1")
                .body(Body::empty())
                .expect("delete request"),
        )
        .await
        .expect("delete response");
    assert_eq!(deleted.status(), StatusCode::OK);
    let deleted: Value = decode_json(deleted).await;
    assert_eq!(deleted["deleted"], true);
    assert_eq!(deleted["persisted"], "backend");

    let listed = harness
        .router
        .clone()
        .oneshot(get_request("/api/profiles"))
        .await
        .expect("list response");
    let listed: Vec<Value> = decode_json(listed).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let harness = TestHarness::setup();
    let response = harness
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profiles/2",
            json!({ "name": "Kana Arima", "hairColor": "Red" }),
        ))
        .await
        .expect("update response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["id"], 2);
    assert_eq!(payload["hairColor"], "Red");
    assert!(payload.get("braSize").is_none());
    assert!(payload.get("traits").is_none());
}

#[tokio::test]
async fn blank_name_is_rejected_with_payload() {
    let harness = TestHarness::setup();
    let response = harness
        .router
        .clone()
        .oneshot(json_request("POST", "/api/profiles", json!({ "name": "  " })))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "VALIDATION_FAILED");
    assert_eq!(payload["operation"], "profiles.create");
    assert!(payload["trace_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let harness = TestHarness::setup();
    let response = harness
        .router
        .clone()
        .oneshot(get_request("/api/profiles/42"))
        .await
        .expect("get response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "NOT_FOUND");
    assert_eq!(payload["id"], "42");
}

#[tokio::test]
async fn offline_backend_writes_report_cache_persistence() {
    let harness = TestHarness::setup_offline();

    let created = harness
        .router
        .clone()
        .oneshot(json_request("POST", "/api/profiles", json!({ "name": "Akane" })))
        .await
        .expect("create response");
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(
        header_value(created.headers(), PERSISTENCE_HEADER),
        Some("cache")
    );

    let listed = harness
        .router
        .clone()
        .oneshot(get_request("/api/profiles"))
        .await
        .expect("list response");
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(header_value(listed.headers(), SOURCE_HEADER), Some("cache"));
    let listed: Vec<Value> = decode_json(listed).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Akane");
}
