//! Catalog API client for billing-frontend.

use crate::config::BillingApiSettings;
use crate::models::{CatalogItem, ItemUpdate, NewItem};
use billing_core::error::AppError;
use reqwest::Client;
use std::sync::RwLock;

/// Client for the remote item collection. Keeps the last fetched list so
/// search and selection work without another round-trip.
pub struct CatalogClient {
    client: Client,
    settings: BillingApiSettings,
    cache: RwLock<Vec<CatalogItem>>,
}

impl CatalogClient {
    pub fn new(settings: BillingApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            cache: RwLock::new(Vec::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    /// Fetch all items, sorted alphabetically case-insensitively, and
    /// refresh the cached list.
    pub async fn list_items(&self) -> Result<Vec<CatalogItem>, AppError> {
        let url = format!("{}/items", self.settings.url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to fetch items");
            AppError::BadGateway(format!("item list request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "item list returned status {}",
                response.status()
            )));
        }

        let mut items: Vec<CatalogItem> = response.json().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "item list body unreadable");
            AppError::BadGateway(format!("item list body unreadable: {}", e))
        })?;

        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        *self.write_cache() = items.clone();

        Ok(items)
    }

    /// Create an item. The server assigns the id; the created item is
    /// appended to the cached list in sorted position.
    pub async fn create_item(&self, input: &NewItem) -> Result<CatalogItem, AppError> {
        let url = format!("{}/items", self.settings.url);

        let response = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "failed to create item");
                AppError::BadGateway(format!("item create request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "item create returned status {}",
                response.status()
            )));
        }

        let created: CatalogItem = response.json().await.map_err(|e| {
            AppError::BadGateway(format!("item create body unreadable: {}", e))
        })?;

        tracing::info!(item_id = %created.id, name = %created.name, "item created");

        let mut cache = self.write_cache();
        cache.push(created.clone());
        cache.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(created)
    }

    /// Partial update of price and/or MRP. The server leaves omitted fields
    /// unchanged; the cached entry mirrors the server's response.
    pub async fn update_item(
        &self,
        id: &str,
        update: &ItemUpdate,
    ) -> Result<CatalogItem, AppError> {
        let url = format!("{}/items/{}", self.settings.url, id);

        let response = self
            .client
            .put(&url)
            .json(update)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "failed to update item");
                AppError::BadGateway(format!("item update request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "item update returned status {}",
                response.status()
            )));
        }

        let updated: CatalogItem = response.json().await.map_err(|e| {
            AppError::BadGateway(format!("item update body unreadable: {}", e))
        })?;

        tracing::info!(item_id = %updated.id, "item updated");

        let mut cache = self.write_cache();
        if let Some(entry) = cache.iter_mut().find(|i| i.id == updated.id) {
            *entry = updated.clone();
        }

        Ok(updated)
    }

    /// Delete by id. On success the entry is dropped from the cached list
    /// without a re-fetch.
    pub async fn delete_item(&self, id: &str) -> Result<(), AppError> {
        let url = format!("{}/items/{}", self.settings.url, id);

        let response = self.client.delete(&url).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to delete item");
            AppError::BadGateway(format!("item delete request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "item delete returned status {}",
                response.status()
            )));
        }

        tracing::info!(item_id = %id, "item deleted");
        self.write_cache().retain(|item| item.id != id);

        Ok(())
    }

    pub fn cached_items(&self) -> Vec<CatalogItem> {
        self.read_cache().clone()
    }

    pub fn cached_item(&self, id: &str) -> Option<CatalogItem> {
        self.read_cache().iter().find(|i| i.id == id).cloned()
    }

    /// Case-insensitive substring search over the cached list.
    pub fn search(&self, term: &str) -> Vec<CatalogItem> {
        rank_items(&self.read_cache(), term)
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Vec<CatalogItem>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Vec<CatalogItem>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Filter and rank items for the search box: names starting with the term
/// come before names merely containing it, alphabetical within each group.
pub fn rank_items(items: &[CatalogItem], term: &str) -> Vec<CatalogItem> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut starts: Vec<CatalogItem> = Vec::new();
    let mut contains: Vec<CatalogItem> = Vec::new();
    for item in items {
        let name = item.name.to_lowercase();
        if name.starts_with(&needle) {
            starts.push(item.clone());
        } else if name.contains(&needle) {
            contains.push(item.clone());
        }
    }

    starts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    contains.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    starts.extend(contains);
    starts
}
