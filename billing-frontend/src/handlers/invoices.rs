use crate::handlers::bill::PrintTemplate;
use crate::handlers::toast::{redirect_with_toast, ToastParams};
use crate::models::Invoice;
use crate::services::renderer::{self, BillDocument};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect},
};
use billing_core::error::AppError;

pub struct BillCard {
    pub id: String,
    pub number: usize,
    pub customer_name: String,
    pub date: String,
    pub time: String,
    pub item_count: usize,
    pub total: String,
}

#[derive(Template)]
#[template(path = "all_bills.html")]
pub struct AllBillsTemplate {
    pub bills: Vec<BillCard>,
    pub error: Option<String>,
    pub toast: Option<String>,
}

fn bill_cards(invoices: &[Invoice]) -> Vec<BillCard> {
    let count = invoices.len();
    invoices
        .iter()
        .enumerate()
        .map(|(index, invoice)| BillCard {
            id: invoice.id.clone(),
            // Display numbering counts down from the newest entry.
            number: count - index,
            customer_name: invoice.customer_name.clone(),
            date: invoice.created_at.format("%d/%m/%Y").to_string(),
            time: invoice.created_at.format("%H:%M:%S").to_string(),
            item_count: invoice.items.len(),
            total: renderer::format_total(invoice.total_amount()),
        })
        .collect()
}

pub async fn all_bills_page(
    State(state): State<AppState>,
    Query(params): Query<ToastParams>,
) -> impl IntoResponse {
    match state.invoices.list_invoices().await {
        Ok(invoices) => AllBillsTemplate {
            bills: bill_cards(&invoices),
            error: None,
            toast: params.toast,
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to load invoices");
            AllBillsTemplate {
                bills: Vec::new(),
                error: Some("Failed to load invoices. Please try again.".to_string()),
                toast: params.toast,
            }
        }
    }
}

#[derive(Template)]
#[template(path = "invoice_detail.html")]
pub struct InvoiceDetailTemplate {
    pub id: String,
    pub doc: renderer::DocumentLayout,
    pub toast: Option<String>,
}

async fn lookup_invoice(state: &AppState, id: &str) -> Result<Invoice, AppError> {
    state
        .invoices
        .find_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("invoice {} not found", id)))
}

pub async fn invoice_detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ToastParams>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = lookup_invoice(&state, &id).await?;
    Ok(InvoiceDetailTemplate {
        id: invoice.id.clone(),
        doc: renderer::layout(&BillDocument::from_invoice(&invoice)),
        toast: params.toast,
    })
}

pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    match state.invoices.delete_invoice(&id).await {
        Ok(()) => redirect_with_toast("/invoices", "Invoice deleted successfully"),
        Err(e) => {
            tracing::error!(invoice_id = %id, error = %e, "invoice delete failed");
            redirect_with_toast("/invoices", "Failed to delete invoice")
        }
    }
}

pub async fn download_invoice_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = lookup_invoice(&state, &id).await?;
    let bytes = renderer::render_pdf(&BillDocument::from_invoice(&invoice))?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                renderer::export_file_name(Some(&invoice.id))
            ),
        ),
    ];
    Ok((headers, bytes))
}

pub async fn print_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = lookup_invoice(&state, &id).await?;
    Ok(PrintTemplate {
        doc: renderer::layout(&BillDocument::from_invoice(&invoice)),
    })
}
