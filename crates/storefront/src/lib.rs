//! Demo store storefront library.
//!
//! A server-rendered storefront over the Shopify Storefront API. The binary
//! in `main.rs` wires tracing and Sentry around [`app`]; integration tests
//! drive the same router against a fake API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod menu;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seo;
pub mod shopify;
pub mod state;

use axum::{Router, body::Body, http::Request, middleware::from_fn};
use tower::Layer;
use tower_http::{normalize_path::NormalizePathLayer, services::ServeDir, trace::TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
        locale = tracing::field::Empty,
    )
}

/// Build the full storefront service.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so
/// the auth rate limiter can fall back to the peer address.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    let site = routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .with_state(state);
    let site = NormalizePathLayer::trim_trailing_slash().layer(site);

    // The locale prefix is stripped before `site` routes the request.
    Router::new()
        .fallback_service(site)
        .layer(from_fn(i18n::locale_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
