//! Domain models for storefront.
//!
//! The storefront owns no database; the only local state is what lives in
//! the signed session.

pub mod session;

pub use session::{CustomerSession, keys as session_keys};
