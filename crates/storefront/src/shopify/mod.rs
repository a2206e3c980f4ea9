//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` by hand: static
//!   documents composed from shared fragments, serde types for variables and
//!   response data
//! - The Storefront API is the source of truth; nothing is stored locally
//! - Catalog reads are cached in memory via `moka` with per-entry TTLs
//!   (see [`CachePolicy`]); cart and customer operations are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use demo_store_storefront::shopify::{InContext, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.storefront_api);
//! let ctx = InContext::from(&locale);
//!
//! let product = client.product("snowboard", &[], &ctx).await?;
//! let cart = client.cart_create(input, &ctx).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::{
    CachePolicy, CollectionArgs, FOOTER_MENU_HANDLE, HEADER_MENU_HANDLE, InContext, PolicyKind,
    StorefrontClient, queries,
};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the Storefront API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from a mutation (e.g., invalid input, bad credentials).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// Build a `GraphQL` error carrying a single message.
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            ..GraphQLError::default()
        }])
    }

    /// Collapse a mutation's user errors into a single `UserError`.
    ///
    /// Returns `None` when the list is empty.
    pub(crate) fn from_user_errors(errors: &[UserError]) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        Some(Self::UserError(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        ))
    }
}

/// A GraphQL error from a Storefront API response, flattened for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphQLError {
    pub message: String,
    /// Dotted response path (`collection.products.0`).
    pub path: Option<String>,
    /// First source location as `(line, column)`.
    pub location: Option<(i64, i64)>,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        let path = error.path.filter(|p| !p.is_empty()).map(|fragments| {
            fragments
                .into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(key) => key,
                    graphql_client::PathFragment::Index(i) => i.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        });
        Self {
            message: error.message,
            path,
            location: error
                .locations
                .and_then(|locations| {
                    locations
                        .first()
                        .map(|l| (i64::from(l.line), i64::from(l.column)))
                }),
        }
    }
}

impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        if !self.message.is_empty() {
            f.write_str(&self.message)?;
            sep = " ";
        }
        if let Some(path) = &self.path {
            write!(f, "{sep}path: {path}")?;
            sep = " ";
        }
        if let Some((line, column)) = self.location {
            write!(f, "{sep}at line {line}:{column}")?;
            sep = " ";
        }
        if sep.is_empty() {
            f.write_str("(no details)")?;
        }
        Ok(())
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_graphql_errors_join() {
        let err = ShopifyError::GraphQL(vec![
            GraphQLError {
                message: "Field not found".to_string(),
                ..GraphQLError::default()
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                ..GraphQLError::default()
            },
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_from_response_error() {
        let raw: graphql_client::Error = serde_json::from_value(serde_json::json!({
            "message": "",
            "locations": [{"line": 5, "column": 10}],
            "path": ["collection", 0]
        }))
        .unwrap_or_else(|e| panic!("invalid error fixture: {e}"));
        let error = GraphQLError::from(raw);
        assert_eq!(error.path.as_deref(), Some("collection.0"));
        assert_eq!(error.location, Some((5, 10)));
        assert_eq!(error.to_string(), "path: collection.0 at line 5:10");
        assert_eq!(GraphQLError::default().to_string(), "(no details)");
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_from_user_errors_joins_messages() {
        let errors = vec![
            UserError {
                field: Some(vec!["input".to_string(), "email".to_string()]),
                message: "Email has already been taken".to_string(),
                code: Some("TAKEN".to_string()),
            },
            UserError {
                field: None,
                message: "Password is too short".to_string(),
                code: None,
            },
        ];
        let err = ShopifyError::from_user_errors(&errors);
        assert!(matches!(
            err,
            Some(ShopifyError::UserError(ref msg))
                if msg == "Email has already been taken; Password is too short"
        ));
        assert!(ShopifyError::from_user_errors(&[]).is_none());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
