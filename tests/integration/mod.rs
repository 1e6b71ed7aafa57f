//! Integration tests for the CRUD services.
//!
//! Each test builds a fresh router around its own store and drives it
//! through `tower::ServiceExt::oneshot`, so no network or shared state is
//! involved. Run with: cargo test --test integration

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use crud_api::api::{create_router, ApiOptions, AppState};
use crud_api::model::{HealthRecord, User};
use crud_api::store::Store;

/// Router for the health record service with its seed data.
fn records_app() -> (Router, AppState<HealthRecord>) {
    let state = AppState::new(Store::<HealthRecord>::seeded(), ApiOptions::default());
    (create_router(state.clone()), state)
}

/// Router for the user service: envelope responses and permissive CORS.
fn users_app() -> (Router, AppState<User>) {
    let options = ApiOptions {
        envelope: true,
        cors: true,
    };
    let state = AppState::new(Store::<User>::seeded(), options);
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn patient(name: &str, age: i64) -> Value {
    json!({
        "patient_name": name,
        "age": age,
        "diagnosis": "Checkup",
        "treatment": "None"
    })
}

#[tokio::test]
async fn health_reports_healthy() {
    let (app, _) = records_app();

    let response = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"status": "healthy", "message": "records API is running"})
    );
}

#[tokio::test]
async fn list_returns_seed_records_in_order() {
    let (app, _) = records_app();

    let response = send(&app, Method::GET, "/api/v1/records", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([
            {
                "id": 1,
                "patient_name": "John Doe",
                "age": 35,
                "diagnosis": "Flu",
                "treatment": "Rest and fluids"
            },
            {
                "id": 2,
                "patient_name": "Jane Smith",
                "age": 28,
                "diagnosis": "Sprained Ankle",
                "treatment": "Ice and elevation"
            }
        ])
    );
}

#[tokio::test]
async fn create_then_get_returns_same_record() {
    let (app, _) = records_app();

    let response = send(&app, Method::POST, "/api/v1/records", Some(patient("X", 40))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["id"], 3);

    let response = send(&app, Method::GET, "/api/v1/records/3", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, created);
}

#[tokio::test]
async fn ids_keep_increasing_across_deletes() {
    let (app, state) = records_app();

    let first = json_body(send(&app, Method::POST, "/api/v1/records", Some(patient("X", 1))).await).await;
    assert_eq!(first["id"], 3);

    let response = send(&app, Method::DELETE, "/api/v1/records/3", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let second = json_body(send(&app, Method::POST, "/api/v1/records", Some(patient("Y", 2))).await).await;
    assert_eq!(second["id"], 4);
    assert_eq!(state.store.next_id(), Some(5));
}

#[tokio::test]
async fn client_supplied_id_is_ignored_on_create() {
    let (app, _) = records_app();

    let mut body = patient("X", 10);
    body["id"] = json!(99);

    let created = json_body(send(&app, Method::POST, "/api/v1/records", Some(body)).await).await;
    assert_eq!(created["id"], 3);
}

#[tokio::test]
async fn non_integer_id_is_rejected_before_lookup() {
    let (app, _) = records_app();

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method, "/api/v1/records/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Invalid ID format"}));
    }

    let response = send(&app, Method::PUT, "/api/v1/records/abc", Some(patient("X", 1))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "Invalid ID format"}));
}

#[tokio::test]
async fn empty_create_is_rejected_and_changes_nothing() {
    let (app, state) = records_app();

    let response = send(&app, Method::POST, "/api/v1/records", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "patient_name is required"})
    );

    assert_eq!(state.store.len(), 2);
    assert_eq!(state.store.next_id(), Some(3));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (app, state) = records_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/records")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"patient_name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
    assert_eq!(state.store.next_id(), Some(3));
}

#[tokio::test]
async fn array_bodies_are_not_positional_records() {
    let (app, state) = records_app();
    let before = state.store.list();

    let response = send(&app, Method::POST, "/api/v1/records", Some(json!(["Arr", 5, "Flu"]))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "request body must be a JSON object"})
    );

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/records/1",
        Some(json!(["Arr", 7, "Cold", "Tea"])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.store.next_id(), Some(3));
    assert_eq!(state.store.list(), before);
}

#[tokio::test]
async fn age_bounds_are_enforced() {
    let (app, _) = records_app();

    let response = send(&app, Method::POST, "/api/v1/records", Some(patient("Old", 151))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "age must be between 0 and 150"})
    );

    let response = send(&app, Method::POST, "/api/v1/records", Some(patient("Newborn", 0))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["age"], 0);
}

#[tokio::test]
async fn update_replaces_record_and_keeps_id() {
    let (app, _) = records_app();

    let mut body = patient("John Doe", 36);
    body["id"] = json!(42);

    let response = send(&app, Method::PUT, "/api/v1/records/1", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "id": 1,
            "patient_name": "John Doe",
            "age": 36,
            "diagnosis": "Checkup",
            "treatment": "None"
        })
    );

    let listed = json_body(send(&app, Method::GET, "/api/v1/records", None).await).await;
    assert_eq!(listed[0]["id"], 1);
    assert_eq!(listed[0]["age"], 36);
    assert_eq!(listed[1]["id"], 2);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let (app, state) = records_app();
    let before = state.store.list();

    let response = send(&app, Method::PUT, "/api/v1/records/999", Some(patient("Z", 5))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({"error": "Record not found"}));
    assert_eq!(state.store.list(), before);
}

#[tokio::test]
async fn delete_removes_record() {
    let (app, state) = records_app();

    let response = send(&app, Method::DELETE, "/api/v1/records/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Record deleted successfully"})
    );
    assert_eq!(state.store.len(), 1);

    let response = send(&app, Method::GET, "/api/v1/records/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::DELETE, "/api/v1/records/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_list_is_wrapped_with_count() {
    let (app, _) = users_app();

    let response = send(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(
        json_body(response).await,
        json!({
            "data": [
                {"id": 1, "name": "Alice Johnson", "email": "alice@example.com"},
                {"id": 2, "name": "Bob Smith", "email": "bob@example.com"}
            ],
            "count": 2
        })
    );
}

#[tokio::test]
async fn users_detail_and_create_are_wrapped() {
    let (app, _) = users_app();

    let response = send(&app, Method::GET, "/api/v1/users/2", None).await;
    assert_eq!(
        json_body(response).await,
        json!({"data": {"id": 2, "name": "Bob Smith", "email": "bob@example.com"}})
    );

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"name": "Cara", "email": "cara@example.com"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        json_body(response).await,
        json!({"data": {"id": 3, "name": "Cara", "email": "cara@example.com"}})
    );
}

#[tokio::test]
async fn users_validation_and_not_found() {
    let (app, _) = users_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"name": "Cara", "email": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "email is required"}));

    let response = send(&app, Method::DELETE, "/api/v1/users/7", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({"error": "User not found"}));
}

#[tokio::test]
async fn preflight_is_short_circuited_with_204() {
    let (app, state) = users_app();

    let response = send(&app, Method::OPTIONS, "/api/v1/users/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    assert_eq!(state.store.len(), 2);
}

#[tokio::test]
async fn preflight_on_unknown_path_is_still_204() {
    let (app, _) = users_app();

    let response = send(&app, Method::OPTIONS, "/nope", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Origin, Content-Type, Accept, Authorization"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn users_update_is_wrapped_and_keeps_id() {
    let (app, state) = users_app();

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/users/1",
        Some(json!({"id": 9, "name": "Alice Cooper", "email": "alice@cooper.test"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"data": {"id": 1, "name": "Alice Cooper", "email": "alice@cooper.test"}})
    );

    assert_eq!(state.store.get(1).unwrap().name, "Alice Cooper");
    assert!(state.store.get(9).is_err());
    assert_eq!(state.store.len(), 2);
}

#[tokio::test]
async fn records_service_sends_no_cors_headers() {
    let (app, _) = records_app();

    let response = send(&app, Method::GET, "/api/v1/records", None).await;
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn concurrent_creates_assign_unique_ids() {
    let (app, state) = records_app();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let response =
                    send(&app, Method::POST, "/api/v1/records", Some(patient("P", i))).await;
                json_body(response).await["id"].as_i64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort_unstable();

    assert_eq!(ids, (3..23).collect::<Vec<i64>>());
    assert_eq!(state.store.len(), 22);
}
