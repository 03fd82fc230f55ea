//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use orbital::store::{seed, InMemoryStore, MetadataStore};
use orbital::{api::create_router, AppState, DocumentStore};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

async fn seeded_state() -> AppState {
    let store = InMemoryStore::new();
    seed::seed_metadata(&store).await.unwrap();
    AppState::new(DocumentStore::Memory(store))
}

async fn create_test_app() -> Router {
    create_router(seeded_state().await)
}

fn empty_app() -> Router {
    create_router(AppState::new(DocumentStore::Memory(InMemoryStore::new())))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

fn meeting_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Monthly meetup",
        "startTime": "2026-11-18T18:00:00Z",
        "endTime": "2026-11-18T20:00:00Z",
        "eventStatus": "EventScheduled",
        "eventAttendanceMode": "OfflineEventAttendanceMode"
    })
}

// == Metadata Read Tests ==

#[tokio::test]
async fn test_event_statuses_endpoint() {
    let app = create_test_app().await;

    let response = send(&app, "GET", "/api/metadata/eventStatuses", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let statuses = json.as_array().unwrap();
    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses[0]["value"], "EventScheduled");
    assert_eq!(statuses[0]["type"], "EventStatusType");

    let rescheduled = statuses
        .iter()
        .find(|s| s["value"] == "EventRescheduled")
        .unwrap();
    assert_eq!(rescheduled["requiresPreviousStartDate"], true);
}

#[tokio::test]
async fn test_attendance_modes_endpoint() {
    let app = create_test_app().await;

    let response = send(&app, "GET", "/api/metadata/attendanceModes", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    let values: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["value"].as_str().unwrap())
        .collect();
    assert_eq!(
        values,
        vec![
            "OfflineEventAttendanceMode",
            "OnlineEventAttendanceMode",
            "MixedEventAttendanceMode"
        ]
    );
}

#[tokio::test]
async fn test_empty_category_returns_empty_list() {
    let app = empty_app();

    for _ in 0..2 {
        let response = send(&app, "GET", "/api/metadata/eventStatuses", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_to_json(response.into_body()).await, json!([]));
    }

    // The empty result is cached like any other
    let response = send(&app, "GET", "/stats", None, None).await;
    let stats = body_to_json(response.into_body()).await;
    assert_eq!(stats["store_fetches"], 1);
    assert_eq!(stats["hits"], 1);
}

#[tokio::test]
async fn test_repeated_reads_served_from_cache() {
    let app = create_test_app().await;

    for _ in 0..3 {
        let response = send(&app, "GET", "/api/metadata/attendanceModes", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app, "GET", "/stats", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_to_json(response.into_body()).await;
    assert_eq!(stats["store_fetches"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["hits"], 2);
    assert_eq!(stats["cached_keys"], 1);
}

// == Metadata Admin Tests ==

#[tokio::test]
async fn test_metadata_crud_flow() {
    let app = create_test_app().await;

    // Create
    let body = json!({"type": "CustomType", "value": "Alpha", "displayName": "Alpha"});
    let response = send(&app, "POST", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = location(&response);
    let created = body_to_json(response.into_body()).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(location, format!("/api/metadata/CustomType/{}", id));

    let response = send(&app, "GET", "/api/metadata/CustomType", None, None).await;
    let items = body_to_json(response.into_body()).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["isActive"], true);

    // Update
    let body = json!({"id": id, "type": "CustomType", "value": "Beta", "displayName": "Beta"});
    let response = send(&app, "PUT", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/api/metadata/CustomType", None, None).await;
    let items = body_to_json(response.into_body()).await;
    assert_eq!(items[0]["value"], "Beta");

    // Delete
    let uri = format!("/api/metadata/CustomType/{}", id);
    let response = send(&app, "DELETE", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/api/metadata/CustomType", None, None).await;
    assert_eq!(body_to_json(response.into_body()).await, json!([]));

    let response = send(&app, "DELETE", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_metadata_missing_fields() {
    let app = create_test_app().await;

    let body = json!({"value": "test-value"});
    let response = send(&app, "POST", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Type and Value are required");
}

#[tokio::test]
async fn test_create_metadata_duplicate_value_conflicts() {
    let app = create_test_app().await;

    let body = json!({"type": "EventStatusType", "value": "EventScheduled"});
    let response = send(&app, "POST", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_metadata_rejects_unroutable_type() {
    let state = seeded_state().await;
    let app = create_router(state.clone());

    let body = json!({"type": "Bad\nType", "value": "x"});
    let response = send(&app, "POST", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Rejected before anything was written
    let stored = state.metadata.store().query_by_type("Bad\nType").await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_update_metadata_to_taken_value_conflicts() {
    let app = create_test_app().await;

    let response = send(&app, "GET", "/api/metadata/EventStatusType", None, None).await;
    let statuses = body_to_json(response.into_body()).await;
    let cancelled = statuses
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["value"] == "EventCancelled")
        .unwrap()
        .clone();

    let mut renamed = cancelled.clone();
    renamed["value"] = json!("EventScheduled");
    let response = send(&app, "PUT", "/api/metadata", Some(renamed), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "GET", "/api/metadata/EventStatusType", None, None).await;
    let statuses = body_to_json(response.into_body()).await;
    let scheduled = statuses
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["value"] == "EventScheduled")
        .count();
    assert_eq!(scheduled, 1);
}

#[tokio::test]
async fn test_update_metadata_validation() {
    let app = create_test_app().await;

    let body = json!({"type": "EventStatusType", "value": "EventScheduled"});
    let response = send(&app, "PUT", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Id and Type are required");

    let body = json!({"id": "any", "type": "EventStatusType", "value": "Event Scheduled!"});
    let response = send(&app, "PUT", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({"id": "missing", "type": "EventStatusType", "value": "EventGone"});
    let response = send(&app, "PUT", "/api/metadata", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_endpoint() {
    let app = create_test_app().await;

    send(&app, "GET", "/api/metadata/eventStatuses", None, None).await;
    send(&app, "GET", "/api/metadata/attendanceModes", None, None).await;

    let response = send(
        &app,
        "POST",
        "/api/metadata/refresh?type=EventStatusType",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stats = body_to_json(send(&app, "GET", "/stats", None, None).await.into_body()).await;
    assert_eq!(stats["cached_keys"], 1);
    assert_eq!(stats["invalidations"], 1);

    let response = send(&app, "POST", "/api/metadata/refresh", None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stats = body_to_json(send(&app, "GET", "/stats", None, None).await.into_body()).await;
    assert_eq!(stats["cached_keys"], 0);
}

// == Admin Guard Tests ==

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = create_router(seeded_state().await.with_admin_token("s3cret"));
    let body = json!({"type": "CustomType", "value": "Alpha"});

    let response = send(&app, "POST", "/api/metadata", Some(body.clone()), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());

    let response = send(&app, "POST", "/api/metadata", Some(body.clone()), Some("wrong")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "POST", "/api/metadata", Some(body), Some("s3cret")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reads stay public
    let response = send(&app, "GET", "/api/metadata/CustomType", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == Meeting Tests ==

#[tokio::test]
async fn test_meeting_crud_flow() {
    let app = create_test_app().await;

    let response = send(&app, "POST", "/api/meetings", Some(meeting_body("Rust Night")), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = location(&response);
    let created = body_to_json(response.into_body()).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(location, format!("/api/meetings/{}", id));
    assert_eq!(created["type"], "meeting");

    let response = send(&app, "GET", &location, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["title"], "Rust Night");

    let mut changed = meeting_body("Rust Night (moved)");
    changed["eventStatus"] = json!("EventRescheduled");
    changed["previousStartDate"] = json!("2026-11-11T18:00:00Z");
    let response = send(&app, "PUT", &location, Some(changed), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_to_json(response.into_body()).await;
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["eventStatus"], "EventRescheduled");

    let response = send(&app, "GET", "/api/meetings", None, None).await;
    let meetings = body_to_json(response.into_body()).await;
    assert_eq!(meetings.as_array().unwrap().len(), 1);
    assert_eq!(meetings[0]["title"], "Rust Night (moved)");
}

#[tokio::test]
async fn test_meeting_validation() {
    let app = create_test_app().await;

    let mut backwards = meeting_body("Backwards");
    backwards["endTime"] = json!("2026-11-18T17:00:00Z");
    let response = send(&app, "POST", "/api/meetings", Some(backwards), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "End time must be after start time");

    let mut unknown = meeting_body("Unknown Status");
    unknown["eventStatus"] = json!("EventMaybe");
    let response = send(&app, "POST", "/api/meetings", Some(unknown), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut untitled = meeting_body("");
    untitled["title"] = json!("");
    let response = send(&app, "POST", "/api/meetings", Some(untitled), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/meetings", None, None).await;
    assert_eq!(body_to_json(response.into_body()).await, json!([]));
}

#[tokio::test]
async fn test_update_missing_meeting() {
    let app = create_test_app().await;

    let response = send(
        &app,
        "PUT",
        "/api/meetings/nonexistent",
        Some(meeting_body("Ghost")),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seeded_meetings_listed_in_start_order() {
    let state = seeded_state().await;
    seed::seed_meetings(&state.meetings).await.unwrap();
    let app = create_router(state);

    let response = send(&app, "GET", "/api/meetings", None, None).await;
    let meetings = body_to_json(response.into_body()).await;
    let meetings = meetings.as_array().unwrap();
    assert_eq!(meetings.len(), 10);

    let starts: Vec<&str> = meetings
        .iter()
        .map(|m| m["startTime"].as_str().unwrap())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

// == Operational Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = empty_app();

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
