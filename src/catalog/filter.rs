//! Transient fetch filter: exists only for the duration of one fetch call.

/// Query descriptor for a catalog fetch. A blank `query` string counts as
/// absent, so a filter built from empty form fields still routes to the
/// plain listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweetFilter {
    pub query: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SweetFilter {
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Pairs for the search endpoint: present fields only, under the
    /// service's parameter names.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.query.as_deref() {
            if !q.trim().is_empty() {
                pairs.push(("query", q.to_string()));
            }
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs
    }
}
