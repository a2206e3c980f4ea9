//! Demo Store Core - Shared types library.
//!
//! This crate provides common types used across the storefront components:
//! - `storefront` - Server-rendered storefront over the Storefront API
//! - `integration-tests` - End-to-end tests against a fake Storefront API
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe wrappers for global IDs, prices, emails, locales and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
