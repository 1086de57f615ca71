//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! The API clients point at an unroutable address, so these tests cover the
//! paths that must keep working when the remote API is down.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use billing_frontend::config::BillingApiSettings;
use billing_frontend::services::bill::BillBuilder;
use billing_frontend::services::catalog::CatalogClient;
use billing_frontend::services::draft_store::{KeyValueStore, MemoryStore};
use billing_frontend::services::invoices::InvoiceClient;
use billing_frontend::startup::build_router;
use billing_frontend::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_state() -> AppState {
    let settings = BillingApiSettings {
        url: "http://127.0.0.1:9/api".to_string(),
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    AppState::new(
        Arc::new(CatalogClient::new(settings.clone())),
        Arc::new(InvoiceClient::new(settings)),
        BillBuilder::restore(store),
    )
}

#[tokio::test]
async fn health_check_works() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_page_renders() {
    let app = build_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn bill_page_renders_while_the_api_is_down() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bill")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let html = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(html.contains("Failed to load items"));
}

#[tokio::test]
async fn adding_a_line_without_a_selection_redirects_with_a_message() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bill/lines")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("quantity=2"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert!(location.starts_with("/bill?toast="));
}

#[tokio::test]
async fn customer_name_round_trips_through_the_draft() {
    let state = test_state();

    let response = build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bill/customer")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("customer_name=Ravi"))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/bill")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let html = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(html.contains("Ravi"));
}

#[tokio::test]
async fn draft_pdf_downloads_even_with_an_empty_bill() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bill/export.pdf")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert!(body.starts_with(b"%PDF"));
}
