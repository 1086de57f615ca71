//! Draft bill assembly.
//!
//! Holds the operator's in-progress bill: the active catalog selection, the
//! accumulated line items and the customer name. Every mutation is mirrored
//! synchronously into the injected [`KeyValueStore`] under two fixed keys so
//! the draft survives a restart.

use crate::models::{CatalogItem, DraftBill, LineItem};
use crate::services::draft_store::KeyValueStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

pub const DRAFT_ITEMS_KEY: &str = "draft.items";
pub const DRAFT_CUSTOMER_KEY: &str = "draft.customer";

/// Operator-facing validation failures. Rendered as transient messages,
/// never as HTTP faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillError {
    #[error("Please select an item first")]
    NoItemSelected,
    #[error("Please enter a valid quantity")]
    InvalidQuantity,
    #[error("No such line on the bill")]
    LineOutOfRange,
    #[error("Please enter customer name")]
    MissingCustomerName,
}

pub struct BillBuilder {
    store: Arc<dyn KeyValueStore>,
    selection: Option<CatalogItem>,
    draft: DraftBill,
}

impl BillBuilder {
    /// Restores the draft from the store. Missing or unparseable records
    /// yield an empty draft; nothing is surfaced to the operator.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let customer_name = store.get(DRAFT_CUSTOMER_KEY).unwrap_or_default();
        let lines: Vec<LineItem> = store
            .get(DRAFT_ITEMS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            store,
            selection: None,
            draft: DraftBill {
                customer_name,
                lines,
            },
        }
    }

    pub fn draft(&self) -> &DraftBill {
        &self.draft
    }

    pub fn selection(&self) -> Option<&CatalogItem> {
        self.selection.as_ref()
    }

    /// Sets the active selection, replacing any previous one. The quantity
    /// and override inputs belong to the form, so there is nothing else to
    /// reset here.
    pub fn select_item(&mut self, item: CatalogItem) {
        self.selection = Some(item);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn set_customer_name(&mut self, name: &str) {
        self.draft.customer_name = name.to_string();
        self.persist_customer();
    }

    /// Appends a snapshot of the current selection. Requires an active
    /// selection and a positive quantity; on failure nothing is mutated and
    /// nothing is written to the store.
    pub fn add_line_item(
        &mut self,
        quantity: Decimal,
        override_price: Option<Decimal>,
    ) -> Result<LineItem, BillError> {
        let item = self.selection.as_ref().ok_or(BillError::NoItemSelected)?;
        if quantity <= Decimal::ZERO {
            return Err(BillError::InvalidQuantity);
        }

        let line = LineItem::snapshot(item, quantity, override_price);
        self.draft.lines.push(line.clone());
        self.selection = None;
        self.persist_lines();
        Ok(line)
    }

    /// Removes the line at `index`, preserving the order of the rest.
    pub fn remove_line_item(&mut self, index: usize) -> Result<LineItem, BillError> {
        if index >= self.draft.lines.len() {
            return Err(BillError::LineOutOfRange);
        }
        let removed = self.draft.lines.remove(index);
        self.persist_lines();
        Ok(removed)
    }

    /// Sum of the stored line totals, recomputed on every call.
    pub fn total_amount(&self) -> Decimal {
        self.draft.total_amount()
    }

    /// Empties the draft and discards the persisted snapshot.
    pub fn clear(&mut self) {
        self.draft = DraftBill::default();
        self.selection = None;
        if let Err(e) = self.store.remove(DRAFT_ITEMS_KEY) {
            tracing::warn!(error = %e, "failed to discard persisted line items");
        }
        if let Err(e) = self.store.remove(DRAFT_CUSTOMER_KEY) {
            tracing::warn!(error = %e, "failed to discard persisted customer name");
        }
    }

    /// Checks the draft is submittable and returns the trimmed customer
    /// name with the lines to send.
    pub fn submission(&self) -> Result<(String, &[LineItem]), BillError> {
        let name = self.draft.customer_name.trim();
        if name.is_empty() {
            return Err(BillError::MissingCustomerName);
        }
        Ok((name.to_string(), &self.draft.lines))
    }

    // The draft is a mirror of operator input already held in memory; a
    // failed write must not abort an interactive edit.
    fn persist_lines(&self) {
        match serde_json::to_string(&self.draft.lines) {
            Ok(raw) => {
                if let Err(e) = self.store.set(DRAFT_ITEMS_KEY, &raw) {
                    tracing::warn!(error = %e, "failed to persist draft line items");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize draft line items");
            }
        }
    }

    fn persist_customer(&self) {
        if let Err(e) = self
            .store
            .set(DRAFT_CUSTOMER_KEY, &self.draft.customer_name)
        {
            tracing::warn!(error = %e, "failed to persist customer name");
        }
    }
}
