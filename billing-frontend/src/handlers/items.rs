use crate::handlers::toast::{redirect_with_toast, ToastParams};
use crate::models::{CatalogItem, ItemUpdate, NewItem, Unit};
use crate::services::renderer::format_money;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Form,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

#[derive(Template)]
#[template(path = "add_item.html")]
pub struct AddItemTemplate {
    pub units: Vec<&'static str>,
    pub toast: Option<String>,
}

pub async fn add_item_page(Query(params): Query<ToastParams>) -> impl IntoResponse {
    AddItemTemplate {
        units: Unit::ALL.iter().map(|u| u.as_str()).collect(),
        toast: params.toast,
    }
}

#[derive(Deserialize)]
pub struct AddItemForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub mrp: String,
    #[serde(default)]
    pub unit: String,
}

/// Textual form fields become typed values here or the request is rejected;
/// nothing downstream ever sees an unparsed string.
fn parse_new_item(form: &AddItemForm) -> Result<NewItem, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Please enter item name, price, and select unit.".to_string());
    }
    let price: Decimal = form
        .price
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid price.".to_string())?;
    if price < Decimal::ZERO {
        return Err("Please enter a valid price.".to_string());
    }
    let mrp = parse_optional_decimal(&form.mrp, "Please enter a valid MRP.")?;
    let unit: Unit = form
        .unit
        .trim()
        .parse()
        .map_err(|_| "Please select a unit.".to_string())?;

    Ok(NewItem {
        name: name.to_string(),
        price,
        mrp,
        unit,
    })
}

pub(crate) fn parse_optional_decimal(raw: &str, message: &str) -> Result<Option<Decimal>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Decimal = trimmed.parse().map_err(|_| message.to_string())?;
    if value < Decimal::ZERO {
        return Err(message.to_string());
    }
    Ok(Some(value))
}

pub async fn create_item(
    State(state): State<AppState>,
    Form(form): Form<AddItemForm>,
) -> Redirect {
    let input = match parse_new_item(&form) {
        Ok(input) => input,
        Err(message) => return redirect_with_toast("/items/new", &message),
    };
    if let Err(e) = input.validate() {
        tracing::warn!(error = %e, "rejected item payload");
        return redirect_with_toast(
            "/items/new",
            "Please enter item name, price, and select unit.",
        );
    }

    match state.catalog.create_item(&input).await {
        Ok(_) => redirect_with_toast("/items/new", "Item added!"),
        Err(e) => {
            tracing::error!(error = %e, "item create failed");
            redirect_with_toast("/items/new", "Failed to add item. Please try again.")
        }
    }
}

pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub price_label: String,
    pub mrp_label: Option<String>,
}

fn item_row(item: &CatalogItem) -> ItemRow {
    ItemRow {
        id: item.id.clone(),
        name: item.name.clone(),
        price_label: format!("{} / {}", format_money(item.price), item.unit),
        mrp_label: item.mrp.map(|m| format!("(MRP: {})", format_money(m))),
    }
}

#[derive(Template)]
#[template(path = "all_items.html")]
pub struct AllItemsTemplate {
    pub items: Vec<ItemRow>,
    pub error: Option<String>,
    pub toast: Option<String>,
}

pub async fn all_items_page(
    State(state): State<AppState>,
    Query(params): Query<ToastParams>,
) -> impl IntoResponse {
    match state.catalog.list_items().await {
        Ok(items) => AllItemsTemplate {
            items: items.iter().map(item_row).collect(),
            error: None,
            toast: params.toast,
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to load items");
            AllItemsTemplate {
                items: Vec::new(),
                error: Some("Failed to load items. Please try again.".to_string()),
                toast: params.toast,
            }
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateItemForm {
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub mrp: String,
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<UpdateItemForm>,
) -> Redirect {
    let price = match parse_optional_decimal(&form.price, "Please enter a valid price.") {
        Ok(value) => value,
        Err(message) => return redirect_with_toast("/items", &message),
    };
    let mrp = match parse_optional_decimal(&form.mrp, "Please enter a valid MRP.") {
        Ok(value) => value,
        Err(message) => return redirect_with_toast("/items", &message),
    };

    let update = ItemUpdate { price, mrp };
    if update.is_empty() {
        return redirect_with_toast("/items", "Enter a new price or MRP first.");
    }

    match state.catalog.update_item(&id, &update).await {
        Ok(_) => redirect_with_toast("/items", "Item updated!"),
        Err(e) => {
            tracing::error!(item_id = %id, error = %e, "item update failed");
            redirect_with_toast("/items", "Failed to update item. Please try again.")
        }
    }
}

pub async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    match state.catalog.delete_item(&id).await {
        Ok(()) => redirect_with_toast("/items", "Item deleted!"),
        Err(e) => {
            tracing::error!(item_id = %id, error = %e, "item delete failed");
            redirect_with_toast("/items", "Failed to delete item. Please try again.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, mrp: &str, unit: &str) -> AddItemForm {
        AddItemForm {
            name: name.to_string(),
            price: price.to_string(),
            mrp: mrp.to_string(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(parse_new_item(&form("  ", "10", "", "kg")).is_err());
    }

    #[test]
    fn textual_price_never_reaches_the_model() {
        assert!(parse_new_item(&form("Rice", "ten", "", "kg")).is_err());
        assert!(parse_new_item(&form("Rice", "-5", "", "kg")).is_err());
    }

    #[test]
    fn empty_mrp_means_absent() {
        let item = parse_new_item(&form("Rice", "52.5", "", "kg")).expect("valid form");
        assert_eq!(item.mrp, None);
    }

    #[test]
    fn devanagari_units_parse() {
        let item = parse_new_item(&form("Atta", "350", "400", "बोरा")).expect("valid form");
        assert_eq!(item.unit, Unit::Sack);
    }
}
