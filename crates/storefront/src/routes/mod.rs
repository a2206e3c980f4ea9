//! HTTP route handlers for the storefront.
//!
//! Every route below is also served under a market prefix such as
//! `/fr-ca/products`; [`crate::i18n::locale_middleware`] strips the prefix
//! before routing.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Home page
//! GET  /fragments/home/hero/{handle}      - Deferred hero (HTMX)
//! GET  /fragments/home/featured-collections - Deferred collections (HTMX)
//! GET  /fragments/footer                  - Deferred footer menu (HTMX)
//! GET  /health                            - Health check
//!
//! # Catalog
//! GET  /products                          - All products, paginated
//! GET  /products/{handle}                 - Product detail
//! GET  /products/{handle}/recommendations - Recommendations fragment
//! GET  /collections                       - Collection listing
//! GET  /collections/all                   - 301 to /products
//! GET  /collections/{handle}              - Filtered, sorted collection
//! GET  /search                            - Product search
//!
//! # Cart
//! GET  /cart                              - Cart page
//! POST /cart                              - Cart mutation (`cartAction`)
//! GET  /cart/count                        - Count badge fragment
//! GET  /cart/checkout                     - Redirect to checkout
//!
//! # Content
//! GET  /journal                           - Journal articles
//! GET  /journal/{handle}                  - Article
//! GET  /pages/{handle}                    - Page
//! GET  /policies                          - Policy list
//! GET  /policies/{handle}                 - Policy
//!
//! # Customer auth (POSTs rate limited)
//! GET|POST /account/login
//! GET|POST /account/register
//! GET|POST /account/recover
//! GET|POST /account/reset/{id}/{token}
//! GET|POST /account/activate/{id}/{token}
//! GET|POST /account/logout
//!
//! # Account (requires a customer token)
//! GET      /account                       - Overview
//! GET|POST /account/edit                  - Profile
//! GET|POST /account/address/{id}          - Address form (`add` for new)
//! GET      /account/orders/{id}           - Order detail
//!
//! # API and crawlers
//! GET  /api/countries                     - Supported markets (JSON)
//! GET  /api/products                      - Product cards fragment
//! GET  /featured-products                 - Featured items fragment
//! GET  /robots.txt
//! GET  /sitemap.xml
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod blog;
pub mod cart;
pub mod collections;
pub mod home;
pub mod layout;
pub mod pages;
pub mod products;
pub mod search;
pub mod sitemap;
pub mod views;

use axum::{
    Router,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::error::AppError;
use crate::i18n;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// A 302 redirect.
pub fn found(url: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response()
}

/// A 301 redirect.
pub fn moved_permanently(url: &str) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(LOCATION, url.to_string())]).into_response()
}

/// Whether `path` is a same-origin path safe to redirect to.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// Liveness check. Does not call the Storefront API.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("No route matches this path".to_string())
}

/// Home page and its deferred fragments.
pub fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/fragments/home/hero/{handle}", get(home::hero))
        .route(
            "/fragments/home/featured-collections",
            get(home::featured_collections),
        )
        .route("/fragments/footer", get(layout::footer))
        .route("/featured-products", get(home::featured_items))
}

/// Product, collection and search routes.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route(
            "/products/{handle}/recommendations",
            get(products::recommendations),
        )
        .route("/collections", get(collections::index))
        .route("/collections/all", get(collections::all))
        .route("/collections/{handle}", get(collections::show))
        .route("/search", get(search::search))
}

/// Cart routes.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::update))
        .route("/count", get(cart::count))
        .route("/checkout", get(cart::checkout))
}

/// Journal, pages and policies.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/journal", get(blog::index))
        .route("/journal/{handle}", get(blog::article))
        .route("/pages/{handle}", get(pages::page))
        .route("/policies", get(pages::policies))
        .route("/policies/{handle}", get(pages::policy))
}

/// Customer auth routes. Form posts share one per-IP rate limiter.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/recover", post(auth::recover))
        .route("/reset/{id}/{token}", post(auth::reset))
        .route("/activate/{id}/{token}", post(auth::activate))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/recover", get(auth::recover_page))
        .route("/reset/{id}/{token}", get(auth::reset_page))
        .route("/activate/{id}/{token}", get(auth::activate_page))
        .route("/logout", get(auth::logout).post(auth::logout))
        .merge(limited)
}

/// Signed-in customer routes.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/edit", get(account::edit_page).post(account::edit))
        .route("/address/{id}", get(account::address_page).post(account::address))
        .route("/orders/{id}", get(account::order))
        .merge(auth_routes())
}

/// JSON and fragment API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(i18n::countries))
        .route("/products", get(api::products))
}

/// Create the storefront router. Unmatched paths render the 404 page.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(home_routes())
        .merge(catalog_routes())
        .merge(content_routes())
        .nest("/cart", cart_routes())
        .nest("/account", account_routes())
        .nest("/api", api_routes())
        .route("/robots.txt", get(sitemap::robots))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/health", get(health))
        .fallback(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/"));
        assert!(is_local_path("/cart?x=1"));
        assert!(!is_local_path("//evil.example.com"));
        assert!(!is_local_path("/\\evil.example.com"));
        assert!(!is_local_path("https://evil.example.com"));
        assert!(!is_local_path(""));
    }

    #[test]
    fn test_redirect_helpers() {
        let response = found("/products");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/products");

        let response = moved_permanently("/products");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/products");
    }
}
