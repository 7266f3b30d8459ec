//! Catalog synchronization against the sweets API.
//! Owns the in-memory item collection and every operation that touches it.
//! Mutations reconcile either by one full refetch (create, update, restock)
//! or by a single-item local patch (delete, purchase); fetch replaces the
//! collection wholesale.

use tracing::{debug, warn};

use super::filter::SweetFilter;
use super::item::{sweets_from_values, Sweet, SweetDraft};
use crate::envelope;
use crate::error::{ApiError, ApiResult};
use crate::transport::ApiTransport;

const FETCH_FAILED: &str = "Failed to load sweets";
const FALLBACK_ERROR: &str = "An unexpected error occurred";
const CREATE_OK: &str = "Sweet added successfully!";
const UPDATE_OK: &str = "Sweet updated successfully!";
const DELETE_OK: &str = "Sweet deleted successfully";
const RESTOCK_OK: &str = "Stock updated successfully!";
const PURCHASE_OK: &str = "Purchase successful!";
const RESTOCK_INVALID: &str = "Quantity must be greater than 0";

pub struct CatalogSync {
    transport: ApiTransport,
    items: Vec<Sweet>,
    is_loading: bool,
    last_error: Option<String>,
}

impl CatalogSync {
    pub fn new(transport: ApiTransport) -> Self {
        Self {
            transport,
            items: Vec::new(),
            is_loading: false,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[Sweet] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the catalog with a fresh server snapshot. An empty filter
    /// hits the listing endpoint, anything else the search endpoint with
    /// only the present fields. Failures leave the collection untouched and
    /// record an error for the caller; there is no automatic retry.
    ///
    /// No staleness fence: a slow response landing after a newer one still
    /// replaces the catalog. Callers serialize operations.
    pub async fn fetch(&mut self, filter: &SweetFilter) {
        self.is_loading = true;
        self.last_error = None;
        let result = if filter.is_empty() {
            self.transport.get_json("sweets", &[]).await
        } else {
            self.transport.get_json("sweets/search", &filter.query_pairs()).await
        };
        match result {
            Ok(body) => {
                let (values, shape) = envelope::decode_items(&body);
                self.items = sweets_from_values(values);
                debug!(
                    target: "catalog",
                    "catalog replaced: {} items ({:?})",
                    self.items.len(),
                    shape
                );
            }
            Err(e) => {
                warn!(target: "catalog", "fetch failed: {}", e);
                self.last_error = Some(
                    e.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| FETCH_FAILED.to_string()),
                );
            }
        }
        self.is_loading = false;
    }

    /// Create an item. The server assigns the id, so success reconciles via
    /// one full listing fetch rather than a local insert.
    pub async fn create(&mut self, draft: &SweetDraft) -> ApiResult<String> {
        self.is_loading = true;
        let out = match self.transport.post_json("sweets", draft).await {
            Ok(body) => {
                let message = envelope::server_message(&body).unwrap_or_else(|| CREATE_OK.to_string());
                self.fetch(&SweetFilter::default()).await;
                Ok(message)
            }
            Err(e) => Err(mutation_error(e)),
        };
        self.is_loading = false;
        out
    }

    pub async fn update(&mut self, id: i64, draft: &SweetDraft) -> ApiResult<String> {
        self.is_loading = true;
        let out = match self.transport.put_json(&format!("sweets/{}", id), draft).await {
            Ok(body) => {
                let message = envelope::server_message(&body).unwrap_or_else(|| UPDATE_OK.to_string());
                self.fetch(&SweetFilter::default()).await;
                Ok(message)
            }
            Err(e) => Err(mutation_error(e)),
        };
        self.is_loading = false;
        out
    }

    /// Delete an item. Success reconciles locally by removing the matching
    /// id; no refetch. Failure leaves the collection as it was.
    pub async fn delete(&mut self, id: i64) -> ApiResult<String> {
        self.is_loading = true;
        let out = match self.transport.delete(&format!("sweets/{}", id)).await {
            Ok(body) => {
                let message = envelope::server_message(&body).unwrap_or_else(|| DELETE_OK.to_string());
                self.items.retain(|s| s.id != id);
                Ok(message)
            }
            Err(e) => Err(mutation_error(e)),
        };
        self.is_loading = false;
        out
    }

    /// Restock by a positive delta, sent as a query parameter. A zero delta
    /// is rejected here, before any network call.
    pub async fn restock(&mut self, id: i64, quantity: u32) -> ApiResult<String> {
        if quantity == 0 {
            return Err(ApiError::validation(RESTOCK_INVALID));
        }
        self.is_loading = true;
        let path = format!("sweets/{}/restock", id);
        let query = [("quantity", quantity.to_string())];
        let out = match self.transport.post_query(&path, &query).await {
            Ok(body) => {
                let message = envelope::server_message(&body).unwrap_or_else(|| RESTOCK_OK.to_string());
                self.fetch(&SweetFilter::default()).await;
                Ok(message)
            }
            Err(e) => Err(mutation_error(e)),
        };
        self.is_loading = false;
        out
    }

    /// Purchase one unit. The decrement is applied only after the server
    /// confirms, clamped at zero; no refetch, no rollback path, and no
    /// loading-flag traffic at the collection granularity.
    pub async fn purchase(&mut self, id: i64) -> ApiResult<String> {
        match self.transport.post_query(&format!("sweets/{}/purchase", id), &[]).await {
            Ok(body) => {
                let message = envelope::server_message(&body).unwrap_or_else(|| PURCHASE_OK.to_string());
                if let Some(item) = self.items.iter_mut().find(|s| s.id == id) {
                    item.quantity = item.quantity.saturating_sub(1);
                }
                Ok(message)
            }
            Err(e) => Err(mutation_error(e)),
        }
    }

    /// Fetch a single item outside the catalog lifecycle; no collection
    /// mutation and no loading flag.
    pub async fn fetch_one(&self, id: i64) -> ApiResult<Sweet> {
        let body = self
            .transport
            .get_json(&format!("sweets/{}", id), &[])
            .await
            .map_err(mutation_error)?;
        let payload = envelope::decode_item(&body)
            .ok_or_else(|| ApiError::shape(format!("no item payload for id {}", id)))?;
        serde_json::from_value(payload.clone())
            .map_err(|e| ApiError::shape(format!("malformed item payload: {}", e)))
    }
}

/// Failure text chain for mutations: the server's message, else the raw
/// transport description, else a final generic fallback.
fn mutation_error(err: ApiError) -> ApiError {
    let msg = err
        .server_message()
        .map(str::to_string)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let raw = err.message().to_string();
            if raw.is_empty() {
                FALLBACK_ERROR.to_string()
            } else {
                raw
            }
        });
    err.with_message(msg)
}
