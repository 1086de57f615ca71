pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::{bill::BillBuilder, catalog::CatalogClient, invoices::InvoiceClient};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state: the remote-API clients and the operator's
/// draft bill.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub invoices: Arc<InvoiceClient>,
    pub bill: Arc<Mutex<BillBuilder>>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogClient>,
        invoices: Arc<InvoiceClient>,
        bill: BillBuilder,
    ) -> Self {
        Self {
            catalog,
            invoices,
            bill: Arc::new(Mutex::new(bill)),
        }
    }
}
