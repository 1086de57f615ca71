//! Draft bill and invoice models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::{CatalogItem, Unit};

/// One bill line, frozen at the moment the operator added it.
///
/// Name, unit and MRP are copied out of the catalog item so later catalog
/// edits never alter a bill that already references the item. `total` is
/// computed once here and stored; it is the source of truth afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub unit: Unit,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    /// Effective unit price: the catalog price or an operator override.
    pub price: Decimal,
    pub quantity: Decimal,
    pub is_special_price: bool,
    pub total: Decimal,
}

impl LineItem {
    /// Snapshot a catalog item into a bill line.
    pub fn snapshot(
        item: &CatalogItem,
        quantity: Decimal,
        override_price: Option<Decimal>,
    ) -> Self {
        let price = override_price.unwrap_or(item.price);
        Self {
            name: item.name.clone(),
            unit: item.unit,
            mrp: item.mrp,
            price,
            quantity,
            is_special_price: override_price.is_some(),
            total: price * quantity,
        }
    }
}

/// The in-progress bill. Owned by this device only; the server never sees it
/// until submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftBill {
    pub customer_name: String,
    pub lines: Vec<LineItem>,
}

impl DraftBill {
    /// Sum of the stored line totals. Recomputed on every call.
    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(|line| line.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A persisted invoice as the remote API returns it. Immutable apart from
/// deletion; the grand total is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|line| line.total).sum()
    }
}
