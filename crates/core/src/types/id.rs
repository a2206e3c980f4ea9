//! Storefront API global IDs.
//!
//! The Storefront API identifies every node with a global ID of the form
//! `gid://shopify/<Resource>/<id>`, optionally followed by a query string
//! (orders carry `?key=...`). Routes expose only the trailing numeric id, so
//! this module converts between the two forms.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a [`ShopifyGid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The string does not start with `gid://shopify/`.
    #[error("global id must start with {GID_PREFIX}")]
    MissingPrefix,
    /// The resource segment is not one the storefront knows about.
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
    /// The id segment is empty or not numeric.
    #[error("invalid id segment: {0:?}")]
    InvalidId(String),
}

/// Resource types addressed by the storefront routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Product,
    ProductVariant,
    Collection,
    Customer,
    MailingAddress,
    Order,
    Cart,
    Article,
    Blog,
    Page,
    ShopPolicy,
}

impl ResourceType {
    /// The resource name used inside a global ID.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::ProductVariant => "ProductVariant",
            Self::Collection => "Collection",
            Self::Customer => "Customer",
            Self::MailingAddress => "MailingAddress",
            Self::Order => "Order",
            Self::Cart => "Cart",
            Self::Article => "Article",
            Self::Blog => "Blog",
            Self::Page => "Page",
            Self::ShopPolicy => "ShopPolicy",
        }
    }
}

impl FromStr for ResourceType {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Product" => Self::Product,
            "ProductVariant" => Self::ProductVariant,
            "Collection" => Self::Collection,
            "Customer" => Self::Customer,
            "MailingAddress" => Self::MailingAddress,
            "Order" => Self::Order,
            "Cart" => Self::Cart,
            "Article" => Self::Article,
            "Blog" => Self::Blog,
            "Page" => Self::Page,
            "ShopPolicy" => Self::ShopPolicy,
            other => return Err(GidError::UnknownResource(other.to_string())),
        })
    }
}

/// A parsed Storefront API global ID.
///
/// ```
/// use demo_store_core::{ResourceType, ShopifyGid};
///
/// let gid: ShopifyGid = "gid://shopify/Order/42?key=abc".parse().unwrap();
/// assert_eq!(gid.resource(), ResourceType::Order);
/// assert_eq!(gid.id(), "42");
/// assert_eq!(gid.query(), Some("key=abc"));
/// assert_eq!(gid.to_string(), "gid://shopify/Order/42?key=abc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShopifyGid {
    resource: ResourceType,
    id: String,
    query: Option<String>,
}

impl ShopifyGid {
    /// Build a global ID from a resource type and a numeric id segment.
    ///
    /// # Errors
    ///
    /// Returns [`GidError::InvalidId`] if `id` is empty or not all digits.
    pub fn new(resource: ResourceType, id: &str) -> Result<Self, GidError> {
        validate_id(resource, id)?;
        Ok(Self {
            resource,
            id: id.to_string(),
            query: None,
        })
    }

    /// Attach a query string (without the leading `?`).
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    /// The resource type.
    #[must_use]
    pub const fn resource(&self) -> ResourceType {
        self.resource
    }

    /// The trailing id segment (numeric for everything but carts).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

fn validate_id(resource: ResourceType, id: &str) -> Result<(), GidError> {
    // Cart ids are opaque tokens; everything else is a legacy numeric id.
    let valid = !id.is_empty()
        && (resource == ResourceType::Cart || id.bytes().all(|b| b.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(GidError::InvalidId(id.to_string()))
    }
}

impl FromStr for ShopifyGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(GID_PREFIX).ok_or(GidError::MissingPrefix)?;
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        let (resource, id) = path
            .split_once('/')
            .ok_or_else(|| GidError::InvalidId(String::new()))?;
        let resource: ResourceType = resource.parse()?;
        let gid = Self::new(resource, id)?;
        Ok(match query {
            Some(q) => gid.with_query(q),
            None => gid,
        })
    }
}

impl TryFrom<String> for ShopifyGid {
    type Error = GidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShopifyGid> for String {
    fn from(gid: ShopifyGid) -> Self {
        gid.to_string()
    }
}

impl fmt::Display for ShopifyGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GID_PREFIX}{}/{}", self.resource.as_str(), self.id)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Extract the trailing numeric id from a global ID string.
///
/// Falls back to the input when it is not a global ID, which lets routes
/// accept either form.
#[must_use]
pub fn legacy_id(gid: &str) -> &str {
    let without_query = gid.split('?').next().unwrap_or(gid);
    if without_query.starts_with(GID_PREFIX) {
        without_query.rsplit('/').next().unwrap_or(without_query)
    } else {
        without_query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customer_gid() {
        let gid: ShopifyGid = "gid://shopify/Customer/123456".parse().unwrap();
        assert_eq!(gid.resource(), ResourceType::Customer);
        assert_eq!(gid.id(), "123456");
        assert_eq!(gid.query(), None);
    }

    #[test]
    fn test_new_builds_reset_target() {
        let gid = ShopifyGid::new(ResourceType::Customer, "987").unwrap();
        assert_eq!(gid.to_string(), "gid://shopify/Customer/987");
    }

    #[test]
    fn test_order_with_key_roundtrip() {
        let gid = ShopifyGid::new(ResourceType::Order, "5001")
            .unwrap()
            .with_query("key=abc123");
        let rendered = gid.to_string();
        assert_eq!(rendered, "gid://shopify/Order/5001?key=abc123");
        assert_eq!(rendered.parse::<ShopifyGid>().unwrap(), gid);
    }

    #[test]
    fn test_empty_query_is_dropped() {
        let gid = ShopifyGid::new(ResourceType::Order, "1")
            .unwrap()
            .with_query("");
        assert_eq!(gid.to_string(), "gid://shopify/Order/1");
    }

    #[test]
    fn test_rejects_non_numeric_ids() {
        assert_eq!(
            ShopifyGid::new(ResourceType::Order, "12a"),
            Err(GidError::InvalidId("12a".to_string()))
        );
        assert!(ShopifyGid::new(ResourceType::Customer, "").is_err());
    }

    #[test]
    fn test_cart_ids_are_opaque() {
        let gid: ShopifyGid = "gid://shopify/Cart/c1-abcdef?key=xyz".parse().unwrap();
        assert_eq!(gid.resource(), ResourceType::Cart);
        assert_eq!(gid.id(), "c1-abcdef");
    }

    #[test]
    fn test_rejects_bad_prefix_and_resource() {
        assert_eq!(
            "shopify/Product/1".parse::<ShopifyGid>(),
            Err(GidError::MissingPrefix)
        );
        assert_eq!(
            "gid://shopify/Widget/1".parse::<ShopifyGid>(),
            Err(GidError::UnknownResource("Widget".to_string()))
        );
    }

    #[test]
    fn test_legacy_id() {
        assert_eq!(legacy_id("gid://shopify/Order/42?key=abc"), "42");
        assert_eq!(legacy_id("gid://shopify/MailingAddress/7"), "7");
        assert_eq!(legacy_id("42"), "42");
    }

    #[test]
    fn test_serde_uses_string_form() {
        let gid = ShopifyGid::new(ResourceType::Product, "9").unwrap();
        let json = serde_json::to_string(&gid).unwrap();
        assert_eq!(json, "\"gid://shopify/Product/9\"");
        let back: ShopifyGid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gid);
    }
}
