//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod locale;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{GidError, ResourceType, ShopifyGid, legacy_id};
pub use locale::{Locale, LocaleError};
pub use price::{CurrencyCode, Price, PriceError};
pub use status::*;
