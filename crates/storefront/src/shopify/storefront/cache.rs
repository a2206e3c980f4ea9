//! Response cache for read-only Storefront API queries.
//!
//! Entries are raw response bodies keyed by operation name plus serialized
//! variables. Each entry carries its own TTL, chosen by the caller's
//! [`CachePolicy`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

/// How long a query result may be served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never cached (carts, customers, mutations).
    NoStore,
    /// Short-lived catalog data (products, collections, search).
    Short,
    /// Slow-moving data (layout, menus, policies, sitemap).
    Long,
}

impl CachePolicy {
    /// Time-to-live for this policy, or `None` for [`CachePolicy::NoStore`].
    #[must_use]
    pub const fn ttl(self) -> Option<Duration> {
        match self {
            Self::NoStore => None,
            Self::Short => Some(Duration::from_secs(60)),
            Self::Long => Some(Duration::from_secs(3600)),
        }
    }
}

/// A cached response body and the TTL it was stored with.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub body: Arc<str>,
    pub ttl: Duration,
}

/// Per-entry expiry driven by [`CachedResponse::ttl`].
struct PolicyExpiry;

impl Expiry<String, CachedResponse> for PolicyExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Build the response cache.
pub fn build(max_capacity: u64) -> Cache<String, CachedResponse> {
    Cache::builder()
        .max_capacity(max_capacity)
        .expire_after(PolicyExpiry)
        .build()
}

/// Cache key for an operation and its serialized variables.
pub fn key(operation_name: &str, variables_json: &str) -> String {
    format!("{operation_name}:{variables_json}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_ttls() {
        assert_eq!(CachePolicy::NoStore.ttl(), None);
        assert_eq!(CachePolicy::Short.ttl(), Some(Duration::from_secs(60)));
        assert_eq!(CachePolicy::Long.ttl(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_key_includes_variables() {
        assert_eq!(key("Product", r#"{"handle":"a"}"#), r#"Product:{"handle":"a"}"#);
        assert_ne!(
            key("Product", r#"{"handle":"a"}"#),
            key("Product", r#"{"handle":"b"}"#)
        );
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache = build(10);
        let entry = CachedResponse {
            body: Arc::from(r#"{"data":{}}"#),
            ttl: Duration::from_secs(60),
        };
        cache.insert("Layout:{}".to_string(), entry).await;
        let hit = cache.get("Layout:{}").await;
        assert_eq!(hit.map(|e| e.body.to_string()), Some(r#"{"data":{}}"#.to_string()));
    }
}
