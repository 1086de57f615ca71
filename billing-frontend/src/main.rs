use billing_core::observability::logging::init_tracing;
use billing_frontend::config::get_configuration;
use billing_frontend::services::bill::BillBuilder;
use billing_frontend::services::catalog::CatalogClient;
use billing_frontend::services::draft_store::{FileStore, KeyValueStore};
use billing_frontend::services::invoices::InvoiceClient;
use billing_frontend::startup::build_router;
use billing_frontend::AppState;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("billing-frontend", "info");

    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(configuration.draft.path.clone()));
    let bill = BillBuilder::restore(store);
    let catalog = Arc::new(CatalogClient::new(configuration.billing_api.clone()));
    let invoices = Arc::new(InvoiceClient::new(configuration.billing_api.clone()));

    let app = build_router(AppState::new(catalog, invoices, bill));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting billing-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
