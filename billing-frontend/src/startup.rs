use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use billing_core::middleware::tracing::request_id_middleware;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::{health_check, index},
    bill::{
        add_line, clear_bill, clear_selection, download_draft_pdf, generate_bill_page,
        print_draft, remove_line, select_item, set_customer_name, submit_bill,
    },
    invoices::{
        all_bills_page, delete_invoice, download_invoice_pdf, invoice_detail_page, print_invoice,
    },
    items::{add_item_page, all_items_page, create_item, delete_item, update_item},
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/items/new", get(add_item_page))
        .route("/items", get(all_items_page).post(create_item))
        .route("/items/:id/update", post(update_item))
        .route("/items/:id/delete", post(delete_item))
        .route("/bill", get(generate_bill_page))
        .route("/bill/customer", post(set_customer_name))
        .route("/bill/select", post(select_item))
        .route("/bill/selection/clear", post(clear_selection))
        .route("/bill/lines", post(add_line))
        .route("/bill/lines/:index/delete", post(remove_line))
        .route("/bill/clear", post(clear_bill))
        .route("/bill/submit", post(submit_bill))
        .route("/bill/export.pdf", get(download_draft_pdf))
        .route("/bill/print", get(print_draft))
        .route("/invoices", get(all_bills_page))
        .route("/invoices/:id", get(invoice_detail_page))
        .route("/invoices/:id/delete", post(delete_invoice))
        .route("/invoices/:id/export.pdf", get(download_invoice_pdf))
        .route("/invoices/:id/print", get(print_invoice))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
