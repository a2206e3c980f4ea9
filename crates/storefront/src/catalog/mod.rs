//! Catalog URL parameters: filters, sort order, cursor pagination and
//! variant selection.
//!
//! Everything here is a pure function of the query string and API data so
//! the collection, search and product routes stay thin.

pub mod filters;
pub mod pagination;
pub mod sort;
pub mod variants;

use std::collections::HashSet;
use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use url::form_urlencoded;

use crate::shopify::Product;

pub use filters::{AppliedFilter, FilterGroup, FilterOption, PriceRange, parse_filters};
pub use pagination::{PageLinks, pagination_variables};
pub use sort::{SortOption, SortParam};
pub use variants::{OptionGroup, OptionValue};

/// Most recommendations shown under a product.
pub const MAX_RECOMMENDATIONS: usize = 12;

/// Ordered query-string pairs, with `URLSearchParams`-like editing.
///
/// Repeated keys are kept in order; filters rely on that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Parse a raw (still percent-encoded) query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self(
            form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// All pairs, in order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-blank value for `key`, trimmed.
    #[must_use]
    pub fn get_trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether the exact pair is present.
    #[must_use]
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.0.iter().any(|(k, v)| k == key && v == value)
    }

    /// Whether any pair has `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Append a pair.
    pub fn append(&mut self, key: &str, value: &str) {
        self.0.push((key.to_string(), value.to_string()));
    }

    /// Replace every `key` with a single pair at the first occurrence's
    /// position (or at the end).
    pub fn set(&mut self, key: &str, value: &str) {
        match self.0.iter().position(|(k, _)| k == key) {
            Some(index) => {
                let mut seen = false;
                self.0.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
                if let Some(pair) = self.0.get_mut(index) {
                    pair.1 = value.to_string();
                }
            }
            None => self.append(key, value),
        }
    }

    /// Remove every pair with `key`.
    pub fn delete(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    /// Remove exactly the `(key, value)` pairs.
    pub fn delete_pair(&mut self, key: &str, value: &str) {
        self.0.retain(|(k, v)| !(k == key && v == value));
    }

    /// Remove every pair whose key starts with `prefix`.
    pub fn delete_prefixed(&mut self, prefix: &str) {
        self.0.retain(|(k, _)| !k.starts_with(prefix));
    }

    /// Encode back into a query string (no leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// `path` with this query appended, omitting an empty `?`.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        if self.0.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.uri.query().map(Self::parse).unwrap_or_default())
    }
}

/// Combine product recommendations with the best-selling fallback list.
///
/// Deduplicates by id (first occurrence wins), drops the product being
/// viewed, and caps the result at [`MAX_RECOMMENDATIONS`].
#[must_use]
pub fn merge_recommendations(
    recommended: Vec<Product>,
    additional: Vec<Product>,
    current_id: &str,
) -> Vec<Product> {
    let mut seen = HashSet::new();
    recommended
        .into_iter()
        .chain(additional)
        .filter(|p| p.id != current_id && seen.insert(p.id.clone()))
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": format!("gid://shopify/Product/{id}"),
            "handle": format!("p{id}"),
            "title": format!("Product {id}")
        }))
        .unwrap()
    }

    #[test]
    fn test_query_params_round_trip_encoding() {
        let params = QueryParams::parse("filter.productVendor=%22ACME%22&q=snow+board");
        assert_eq!(params.get("filter.productVendor"), Some("\"ACME\""));
        assert_eq!(params.get("q"), Some("snow board"));
        assert_eq!(
            params.to_query_string(),
            "filter.productVendor=%22ACME%22&q=snow+board"
        );
    }

    #[test]
    fn test_set_replaces_all_in_place() {
        let mut params = QueryParams::parse("a=1&sort=x&b=2&sort=y");
        params.set("sort", "newest");
        assert_eq!(params.to_query_string(), "a=1&sort=newest&b=2");
        params.set("c", "3");
        assert_eq!(params.to_query_string(), "a=1&sort=newest&b=2&c=3");
    }

    #[test]
    fn test_delete_pair_and_prefix() {
        let mut params = QueryParams::parse("f.a=1&f.a=2&f.b=3&x=4");
        params.delete_pair("f.a", "1");
        assert_eq!(params.to_query_string(), "f.a=2&f.b=3&x=4");
        params.delete_prefixed("f.");
        assert_eq!(params.href("/collections/all"), "/collections/all?x=4");
        params.delete("x");
        assert_eq!(params.href("/collections/all"), "/collections/all");
    }

    #[test]
    fn test_merge_recommendations() {
        let recommended = vec![product("1"), product("2"), product("3")];
        let additional: Vec<Product> = (2..20).map(|i| product(&i.to_string())).collect();
        let merged = merge_recommendations(recommended, additional, "gid://shopify/Product/3");

        assert_eq!(merged.len(), MAX_RECOMMENDATIONS);
        assert_eq!(merged[0].id, "gid://shopify/Product/1");
        assert_eq!(merged[1].id, "gid://shopify/Product/2");
        assert!(merged.iter().all(|p| p.id != "gid://shopify/Product/3"));
        let unique: HashSet<_> = merged.iter().map(|p| &p.id).collect();
        assert_eq!(unique.len(), merged.len());
    }
}
