//! Session-related types.
//!
//! Types stored in the session for cart and customer state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shopify::CustomerAccessToken;

/// Session-stored customer credentials.
///
/// The Storefront API's customer access token, plus its expiry as returned
/// by `customerAccessTokenCreate` (RFC 3339).
#[derive(Clone, Serialize, Deserialize)]
pub struct CustomerSession {
    pub access_token: String,
    pub expires_at: String,
}

impl CustomerSession {
    /// Whether the token has expired at `now`.
    ///
    /// An unparseable expiry is treated as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .map_or(true, |expires_at| expires_at.with_timezone(&Utc) <= now)
    }

    /// Whether the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl From<CustomerAccessToken> for CustomerSession {
    fn from(token: CustomerAccessToken) -> Self {
        Self {
            access_token: token.access_token,
            expires_at: token.expires_at,
        }
    }
}

impl fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerSession")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Session keys.
pub mod keys {
    /// Key for the serialized [`super::CustomerSession`].
    pub const CUSTOMER_ACCESS_TOKEN: &str = "customer_access_token";

    /// Key for the Storefront API cart id.
    pub const CART_ID: &str = "cart_id";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: &str) -> CustomerSession {
        CustomerSession {
            access_token: "tok".to_string(),
            expires_at: expires_at.to_string(),
        }
    }

    #[test]
    fn test_expiry() {
        let now = DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default();
        assert!(!session("2024-06-02T00:00:00Z").is_expired_at(now));
        assert!(session("2024-05-31T23:59:59Z").is_expired_at(now));
        assert!(session("not a date").is_expired_at(now));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", session("2024-06-02T00:00:00Z"));
        assert!(!debug.contains("tok\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
