//! End-to-end API tests against the in-memory backend.
//!
//! The router is exercised directly through `tower::ServiceExt::oneshot`,
//! so these cover the full request path: id parsing, body validation,
//! storage delegation, and response shapes.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use folio::http::{router, AppState};
use folio::storage::MemoryStorage;

fn app() -> Router {
    router(AppState::new(Arc::new(MemoryStorage::new())))
}

/// Send one request and decode the JSON body (204s decode to `Null`).
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn project_body() -> Value {
    json!({
        "title": "Folio",
        "description": "Portfolio backend",
        "image_url": "https://example.com/cover.png",
        "tags": ["rust", "axum"],
        "project_url": "https://example.com"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Server is running!");
}

#[tokio::test]
async fn contact_submission_roundtrip() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact",
        Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true, "id": 1 }));

    let (status, body) = send(&app, Method::GET, "/api/contact", None).await;
    assert_eq!(status, StatusCode::OK);
    let contacts = body.as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["name"], "Ana");
    assert_eq!(contacts[0]["email"], "ana@x.com");
    assert_eq!(contacts[0]["subject"], Value::Null);
    assert!(contacts[0]["created_at"].is_string());
}

#[tokio::test]
async fn contact_missing_fields_are_itemized() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/contact", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid contact data");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "message"]);
}

#[tokio::test]
async fn contact_rejects_bad_email() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact",
        Some(json!({ "name": "Ana", "email": "not-an-email", "message": "hi" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["field"], "email");
}

#[tokio::test]
async fn non_numeric_project_id_is_rejected_before_lookup() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/projects/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid project ID");
}

#[tokio::test]
async fn project_crud_flow() {
    let app = app();

    let (status, created) =
        send(&app, Method::POST, "/api/projects", Some(project_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "Folio");
    assert_eq!(created["tags"], json!(["rust", "axum"]));
    assert_eq!(created["github_url"], Value::Null);
    assert!(created["created_at"].is_string());

    let (status, listed) = send(&app, Method::GET, "/api/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, fetched) = send(&app, Method::GET, "/api/projects/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // Patch only the title; everything else must survive untouched.
    let (status, patched) = send(
        &app,
        Method::PATCH,
        "/api/projects/1",
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Renamed");
    assert_eq!(patched["description"], created["description"]);
    assert_eq!(patched["tags"], created["tags"]);
    assert_eq!(patched["image_url"], created["image_url"]);
    assert_eq!(patched["project_url"], created["project_url"]);
    assert_eq!(patched["created_at"], created["created_at"]);

    let (status, body) = send(&app, Method::DELETE, "/api/projects/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::DELETE, "/api/projects/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (status, _) = send(&app, Method::GET, "/api/projects/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_create_rejects_missing_fields() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(json!({ "title": "only a title" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid project data");
    assert_eq!(body["details"][0]["field"], "description");
}

#[tokio::test]
async fn patch_nonexistent_project_is_not_found() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/projects/999",
        Some(json!({ "title": "ghost" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn delete_nonexistent_project_is_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::DELETE, "/api/projects/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn testimonials_list_sorted_by_display_order() {
    let app = app();

    let testimonial = |order: Option<i32>| {
        let mut body = json!({
            "name": "Ana",
            "role": "CTO",
            "company": "Acme",
            "quote": "Great work"
        });
        if let Some(order) = order {
            body["display_order"] = json!(order);
        }
        body
    };

    // First defaults to 1, second pins 1 explicitly, third defaults to 3.
    for order in [None, Some(1), None] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/testimonials",
            Some(testimonial(order)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/testimonials", None).await;
    assert_eq!(status, StatusCode::OK);

    let orders: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["display_order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 1, 3]);
    assert!(orders.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn testimonial_crud_mirrors_projects() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/testimonials",
        Some(json!({
            "name": "Ana",
            "role": "CTO",
            "company": "Acme",
            "quote": "Great work",
            "display_order": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["display_order"], 5);

    let (status, patched) = send(
        &app,
        Method::PATCH,
        "/api/testimonials/1",
        Some(json!({ "display_order": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["display_order"], 2);
    assert_eq!(patched["quote"], created["quote"]);

    let (status, body) = send(&app, Method::GET, "/api/testimonials/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid testimonial ID");

    let (status, _) = send(&app, Method::DELETE, "/api/testimonials/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/testimonials/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_body_fields_are_ignored() {
    let app = app();
    let mut body = project_body();
    body["unexpected"] = json!("field");

    let (status, _) = send(&app, Method::POST, "/api/projects", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
}
