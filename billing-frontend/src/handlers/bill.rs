use crate::handlers::items::parse_optional_decimal;
use crate::handlers::toast::redirect_with_toast;
use crate::models::{CatalogItem, LineItem};
use crate::services::bill::BillError;
use crate::services::renderer::{self, BillDocument};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect},
    Form,
};
use billing_core::error::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

pub struct SearchRow {
    pub id: String,
    pub name: String,
    pub price_label: String,
}

pub struct LineRow {
    pub index: usize,
    pub name: String,
    pub mrp: String,
    pub quantity: String,
    pub price: String,
    pub special: bool,
    pub total: String,
}

fn search_row(item: &CatalogItem) -> SearchRow {
    SearchRow {
        id: item.id.clone(),
        name: item.name.clone(),
        price_label: format!("{} per {}", renderer::format_money(item.price), item.unit),
    }
}

fn line_row(index: usize, line: &LineItem) -> LineRow {
    LineRow {
        index,
        name: line.name.clone(),
        mrp: line
            .mrp
            .map(renderer::format_money)
            .unwrap_or_else(|| "-".to_string()),
        quantity: format!("{} {}", line.quantity, line.unit),
        price: renderer::format_money(line.price),
        special: line.is_special_price,
        total: renderer::format_total(line.total),
    }
}

#[derive(Template)]
#[template(path = "generate_bill.html")]
pub struct GenerateBillTemplate {
    pub customer_name: String,
    pub search: String,
    pub results: Vec<SearchRow>,
    pub selection: Option<SearchRow>,
    pub lines: Vec<LineRow>,
    pub total: String,
    pub toast: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct BillPageParams {
    pub q: Option<String>,
    pub toast: Option<String>,
}

pub async fn generate_bill_page(
    State(state): State<AppState>,
    Query(params): Query<BillPageParams>,
) -> impl IntoResponse {
    // Refresh the catalog so search sees current items; the page still
    // renders when the API is unreachable.
    let error = match state.catalog.list_items().await {
        Ok(_) => None,
        Err(e) => {
            tracing::error!(error = %e, "failed to load items");
            Some("Failed to load items. Please try again.".to_string())
        }
    };

    let bill = state.bill.lock().await;
    let search = params.q.unwrap_or_default();
    let results = if bill.selection().is_none() {
        state.catalog.search(&search).iter().map(search_row).collect()
    } else {
        Vec::new()
    };

    GenerateBillTemplate {
        customer_name: bill.draft().customer_name.clone(),
        search,
        results,
        selection: bill.selection().map(search_row),
        lines: bill
            .draft()
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| line_row(i, line))
            .collect(),
        total: renderer::format_total(bill.total_amount()),
        toast: params.toast,
        error,
    }
}

#[derive(Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub customer_name: String,
}

pub async fn set_customer_name(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Redirect {
    state.bill.lock().await.set_customer_name(&form.customer_name);
    Redirect::to("/bill")
}

#[derive(Deserialize)]
pub struct SelectForm {
    pub item_id: String,
}

pub async fn select_item(
    State(state): State<AppState>,
    Form(form): Form<SelectForm>,
) -> Redirect {
    match state.catalog.cached_item(&form.item_id) {
        Some(item) => {
            state.bill.lock().await.select_item(item);
            Redirect::to("/bill")
        }
        None => redirect_with_toast("/bill", "Item not found. Try searching again."),
    }
}

pub async fn clear_selection(State(state): State<AppState>) -> Redirect {
    state.bill.lock().await.clear_selection();
    Redirect::to("/bill")
}

#[derive(Deserialize)]
pub struct AddLineForm {
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub special_price: String,
}

pub async fn add_line(State(state): State<AppState>, Form(form): Form<AddLineForm>) -> Redirect {
    let quantity = match form.quantity.trim().parse::<Decimal>() {
        Ok(quantity) => quantity,
        Err(_) => return redirect_with_toast("/bill", &BillError::InvalidQuantity.to_string()),
    };
    let special_price =
        match parse_optional_decimal(&form.special_price, "Please enter a valid price.") {
            Ok(value) => value,
            Err(message) => return redirect_with_toast("/bill", &message),
        };

    match state.bill.lock().await.add_line_item(quantity, special_price) {
        Ok(_) => redirect_with_toast("/bill", "Item added to bill!"),
        Err(e) => redirect_with_toast("/bill", &e.to_string()),
    }
}

pub async fn remove_line(State(state): State<AppState>, Path(index): Path<usize>) -> Redirect {
    match state.bill.lock().await.remove_line_item(index) {
        Ok(_) => redirect_with_toast("/bill", "Item removed from bill!"),
        Err(e) => redirect_with_toast("/bill", &e.to_string()),
    }
}

pub async fn clear_bill(State(state): State<AppState>) -> Redirect {
    state.bill.lock().await.clear();
    redirect_with_toast("/bill", "New invoice started!")
}

pub async fn submit_bill(State(state): State<AppState>) -> Redirect {
    let (customer_name, lines) = {
        let bill = state.bill.lock().await;
        match bill.submission() {
            Ok((name, lines)) => (name, lines.to_vec()),
            Err(e) => return redirect_with_toast("/bill", &e.to_string()),
        }
    };

    match state.invoices.create_invoice(&customer_name, &lines).await {
        // The draft intentionally stays after a successful submission;
        // "New invoice" is the explicit clearing action.
        Ok(_) => redirect_with_toast("/bill", "Invoice created successfully!"),
        Err(e) => {
            tracing::error!(error = %e, "invoice submission failed");
            redirect_with_toast("/bill", "Failed to create invoice.")
        }
    }
}

pub async fn download_draft_pdf(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let document = {
        let bill = state.bill.lock().await;
        BillDocument::from_draft(bill.draft(), Utc::now())
    };
    let bytes = renderer::render_pdf(&document)?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                renderer::export_file_name(None)
            ),
        ),
    ];
    Ok((headers, bytes))
}

#[derive(Template)]
#[template(path = "print.html")]
pub struct PrintTemplate {
    pub doc: renderer::DocumentLayout,
}

pub async fn print_draft(State(state): State<AppState>) -> impl IntoResponse {
    let document = {
        let bill = state.bill.lock().await;
        BillDocument::from_draft(bill.draft(), Utc::now())
    };
    PrintTemplate {
        doc: renderer::layout(&document),
    }
}
