//! Shopify Storefront API client implementation.
//!
//! Sends hand-written `graphql_client` operations over `reqwest` 0.13.
//! Read-only catalog queries are cached by [`CachePolicy`]; carts and
//! customers are never cached.

mod cache;
mod cart;
mod catalog;
mod customer;
pub mod queries;

use std::sync::Arc;

use demo_store_core::Locale;
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::StorefrontApiConfig;
use crate::shopify::{GraphQLError, ShopifyError};

pub use cache::CachePolicy;
pub use catalog::{CollectionArgs, FOOTER_MENU_HANDLE, HEADER_MENU_HANDLE, PolicyKind};
use cache::CachedResponse;

/// Header carrying the public Storefront API token.
const PUBLIC_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";
/// Header carrying the private (server-side) Storefront API token.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Buyer context for the `@inContext` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InContext {
    /// ISO country code (`CA`).
    pub country: String,
    /// ISO language code (`FR`).
    pub language: String,
}

impl From<&Locale> for InContext {
    fn from(locale: &Locale) -> Self {
        Self {
            country: locale.country.clone(),
            language: locale.language.clone(),
        }
    }
}

impl Default for InContext {
    fn default() -> Self {
        Self::from(&Locale::default())
    }
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; all clones share the HTTP connection pool and the
/// response cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    token_header: &'static str,
    access_token: String,
    cache: Cache<String, CachedResponse>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &StorefrontApiConfig) -> Self {
        let (token_header, access_token) = config.private_token.as_ref().map_or_else(
            || (PUBLIC_TOKEN_HEADER, config.public_token.clone()),
            |private| (PRIVATE_TOKEN_HEADER, private.expose_secret().to_string()),
        );

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                token_header,
                access_token,
                cache: cache::build(config.cache_capacity),
            }),
        }
    }

    /// Execute an operation, serving it from cache when `policy` allows.
    #[instrument(skip(self, variables), fields(operation = tracing::field::Empty))]
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        policy: CachePolicy,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let body = Q::build_query(variables);
        tracing::Span::current().record("operation", body.operation_name);

        let Some(ttl) = policy.ttl() else {
            let text = self.send(&body).await?;
            return decode::<Q::ResponseData>(&text);
        };

        let key = cache::key(body.operation_name, &serde_json::to_string(&body.variables)?);
        if let Some(hit) = self.inner.cache.get(&key).await {
            debug!("Cache hit");
            return decode::<Q::ResponseData>(&hit.body);
        }

        let text = self.send(&body).await?;
        let data = decode::<Q::ResponseData>(&text)?;
        self.inner
            .cache
            .insert(
                key,
                CachedResponse {
                    body: Arc::from(text),
                    ttl,
                },
            )
            .await;
        Ok(data)
    }

    /// POST a query body and return the raw response text.
    async fn send<V: Serialize>(
        &self,
        body: &graphql_client::QueryBody<V>,
    ) -> Result<String, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(self.inner.token_header, &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&text, 500),
                "Storefront API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                truncate(&text, 200)
            )));
        }

        Ok(text)
    }
}

/// Decode a GraphQL response body into its data, surfacing `errors`.
fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ShopifyError> {
    let response: Response<T> = serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(text, 500),
            "Failed to parse Storefront API response"
        );
        ShopifyError::Parse(e)
    })?;

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        debug!(errors = ?errors, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(GraphQLError::from).collect(),
        ));
    }

    response
        .data
        .ok_or_else(|| ShopifyError::message("No data in response"))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Unwrap a mutation payload, turning user errors into [`ShopifyError::UserError`].
fn mutation_result<P>(
    payload: Option<P>,
    user_errors: impl FnOnce(&P) -> &[crate::shopify::UserError],
    operation: &str,
) -> Result<P, ShopifyError> {
    let payload =
        payload.ok_or_else(|| ShopifyError::message(format!("{operation} returned no payload")))?;
    if let Some(err) = ShopifyError::from_user_errors(user_errors(&payload)) {
        return Err(err);
    }
    Ok(payload)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Data {
        shop: Shop,
    }

    #[derive(Debug, serde::Deserialize)]
    struct Shop {
        name: String,
    }

    #[test]
    fn test_in_context_from_locale() {
        let ctx = InContext::from(&Locale::new("fr", "ca"));
        assert_eq!(ctx.country, "CA");
        assert_eq!(ctx.language, "FR");
        assert_eq!(InContext::default().country, "US");
    }

    #[test]
    fn test_decode_data() {
        let data: Data = decode(r#"{"data":{"shop":{"name":"Hydrogen"}}}"#).unwrap();
        assert_eq!(data.shop.name, "Hydrogen");
    }

    #[test]
    fn test_decode_errors_take_precedence() {
        let err = decode::<Data>(
            r#"{"data":null,"errors":[{"message":"Throttled","path":["shop",0],"locations":[{"line":2,"column":3}]}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Throttled path: shop.0 at line 2:3"
        );
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode::<Data>(r#"{"data":null}"#).unwrap_err();
        assert!(matches!(err, ShopifyError::GraphQL(_)));
        assert!(err.to_string().contains("No data in response"));
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode::<Data>("<html>").unwrap_err();
        assert!(matches!(err, ShopifyError::Parse(_)));
    }

    #[test]
    fn test_mutation_result_user_errors() {
        let payload = Some(vec![crate::shopify::UserError {
            field: None,
            message: "Unidentified customer".to_string(),
            code: Some("UNIDENTIFIED_CUSTOMER".to_string()),
        }]);
        let err = mutation_result(payload, Vec::as_slice, "customerAccessTokenCreate").unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(ref m) if m == "Unidentified customer"));

        let err = mutation_result::<Vec<crate::shopify::UserError>>(None, Vec::as_slice, "cartCreate")
            .unwrap_err();
        assert!(err.to_string().contains("cartCreate returned no payload"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("héllo", 2), "hé");
    }
}
