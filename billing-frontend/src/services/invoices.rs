//! Invoice API client for billing-frontend.

use crate::config::BillingApiSettings;
use crate::models::{Invoice, LineItem};
use billing_core::error::AppError;
use reqwest::Client;
use std::sync::RwLock;

/// Client for the remote invoice collection. Invoices are immutable on the
/// server apart from deletion; the cached list is a read-only mirror that is
/// replaced on fetch and pruned on delete.
pub struct InvoiceClient {
    client: Client,
    settings: BillingApiSettings,
    cache: RwLock<Vec<Invoice>>,
}

/// The `POST /invoices` body. Kept as a standalone function so the wire
/// shape is testable without a server.
pub fn invoice_payload(customer_name: &str, items: &[LineItem]) -> serde_json::Value {
    serde_json::json!({
        "customerName": customer_name,
        "items": items,
    })
}

impl InvoiceClient {
    pub fn new(settings: BillingApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Fetch all invoices, newest first, and refresh the cached list.
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let url = format!("{}/invoices", self.settings.url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to fetch invoices");
            AppError::BadGateway(format!("invoice list request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "invoice list returned status {}",
                response.status()
            )));
        }

        let mut invoices: Vec<Invoice> = response.json().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "invoice list body unreadable");
            AppError::BadGateway(format!("invoice list body unreadable: {}", e))
        })?;

        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        *self.write_cache() = invoices.clone();

        Ok(invoices)
    }

    /// Submit a finished draft as a new invoice.
    pub async fn create_invoice(
        &self,
        customer_name: &str,
        items: &[LineItem],
    ) -> Result<Invoice, AppError> {
        let url = format!("{}/invoices", self.settings.url);
        let body = invoice_payload(customer_name, items);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "failed to create invoice");
                AppError::BadGateway(format!("invoice create request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "invoice create returned status {}",
                response.status()
            )));
        }

        let created: Invoice = response.json().await.map_err(|e| {
            AppError::BadGateway(format!("invoice create body unreadable: {}", e))
        })?;

        tracing::info!(
            invoice_id = %created.id,
            customer = %created.customer_name,
            lines = created.items.len(),
            "invoice created"
        );

        Ok(created)
    }

    /// Delete by id. On success exactly that id is removed from the cached
    /// list, without a re-fetch.
    pub async fn delete_invoice(&self, id: &str) -> Result<(), AppError> {
        let url = format!("{}/invoices/{}", self.settings.url, id);

        let response = self.client.delete(&url).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to delete invoice");
            AppError::BadGateway(format!("invoice delete request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "invoice delete returned status {}",
                response.status()
            )));
        }

        tracing::info!(invoice_id = %id, "invoice deleted");
        self.remove_cached(id);

        Ok(())
    }

    /// Locate an invoice in the cached list, falling back to a fetch when
    /// the cache is cold. The API has no single-invoice endpoint.
    pub async fn find_invoice(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        if let Some(found) = self.cached_invoice(id) {
            return Ok(Some(found));
        }
        let invoices = self.list_invoices().await?;
        Ok(invoices.into_iter().find(|inv| inv.id == id))
    }

    pub fn cached_invoices(&self) -> Vec<Invoice> {
        self.read_cache().clone()
    }

    pub fn cached_invoice(&self, id: &str) -> Option<Invoice> {
        self.read_cache().iter().find(|inv| inv.id == id).cloned()
    }

    pub fn remove_cached(&self, id: &str) {
        self.write_cache().retain(|inv| inv.id != id);
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Vec<Invoice>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Invoice>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }
}
