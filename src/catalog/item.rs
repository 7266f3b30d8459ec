//! Catalog item types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One catalog entry as the server reports it. The id is server-assigned
/// and stable; the client never invents one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
}

/// Item fields for create and update; the server assigns and keeps the id.
#[derive(Debug, Clone, Serialize)]
pub struct SweetDraft {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
}

/// Decode raw item values, skipping entries that do not deserialize. The
/// skip is logged so a lossy response stays visible in diagnostics.
pub fn sweets_from_values(values: Vec<Value>) -> Vec<Sweet> {
    values
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<Sweet>(v) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(target: "catalog", "skipping malformed catalog entry: {}", e);
                None
            }
        })
        .collect()
}
