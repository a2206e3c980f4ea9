//! `robots.txt` and `sitemap.xml`.

use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::seo::canonical_url;
use crate::shopify::{InContext, SitemapEntry};
use crate::state::AppState;

/// Paths crawlers are asked to skip.
const DISALLOWED: [&str; 4] = ["/cart", "/account", "/search", "/checkout"];

fn robots_body(base_url: &str) -> String {
    let mut body = String::from("User-agent: *\n");
    for path in DISALLOWED {
        body.push_str("Disallow: ");
        body.push_str(path);
        body.push('\n');
    }
    body.push('\n');
    body.push_str(&format!("Sitemap: {}\n", canonical_url(base_url, "/sitemap.xml")));
    body
}

/// `GET /robots.txt`
pub async fn robots(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_body(&state.config().base_url),
    )
        .into_response()
}

/// One `<url>` element.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<String>,
    pub image: Option<SitemapImage>,
}

#[derive(Debug, Clone)]
pub struct SitemapImage {
    pub loc: String,
    pub title: Option<String>,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub urls: Vec<SitemapUrl>,
}

fn sitemap_urls(base_url: &str, prefix: &str, entries: &[SitemapEntry], with_images: bool) -> Vec<SitemapUrl> {
    entries
        .iter()
        .map(|entry| SitemapUrl {
            loc: canonical_url(base_url, &format!("{prefix}/{}", entry.handle)),
            lastmod: entry.updated_at.clone(),
            image: entry
                .featured_image
                .as_ref()
                .filter(|_| with_images)
                .map(|image| SitemapImage {
                    loc: image.url.clone(),
                    title: entry.title.clone(),
                }),
        })
        .collect()
}

/// `GET /sitemap.xml`
///
/// Products (with their featured image), collections and pages, in the
/// default market.
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> Result<Response> {
    let data = state
        .storefront()
        .sitemap_resources(&InContext::default())
        .await?;
    let base_url = &state.config().base_url;

    let urls = std::iter::once(SitemapUrl {
        loc: canonical_url(base_url, "/"),
        lastmod: None,
        image: None,
    })
    .chain(sitemap_urls(base_url, "/products", &data.products.nodes, true))
    .chain(sitemap_urls(base_url, "/collections", &data.collections.nodes, false))
    .chain(sitemap_urls(base_url, "/pages", &data.pages.nodes, false))
    .collect();

    let body = SitemapTemplate { urls }
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render sitemap: {e}")))?;
    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        body,
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_body() {
        let body = robots_body("https://shop.example.com");
        assert!(body.starts_with("User-agent: *\n"));
        for path in DISALLOWED {
            assert!(body.contains(&format!("Disallow: {path}\n")));
        }
        assert!(body.ends_with("Sitemap: https://shop.example.com/sitemap.xml\n"));
    }

    #[test]
    fn test_sitemap_renders_escaped_entries() {
        let entries: Vec<SitemapEntry> = serde_json::from_value(serde_json::json!([
            {
                "handle": "board",
                "updatedAt": "2024-01-02T03:04:05Z",
                "title": "Board & Bindings",
                "featuredImage": {"url": "https://cdn.shopify.com/board.jpg?v=1&width=800"}
            }
        ]))
        .unwrap();
        let urls = sitemap_urls("https://shop.example.com", "/products", &entries, true);
        assert_eq!(urls[0].loc, "https://shop.example.com/products/board");

        let xml = SitemapTemplate { urls }.render().unwrap();
        assert!(xml.contains("<loc>https://shop.example.com/products/board</loc>"));
        assert!(xml.contains("<lastmod>2024-01-02T03:04:05Z</lastmod>"));
        assert!(xml.contains("<image:title>Board &#38; Bindings</image:title>"));
        assert!(xml.contains("v=1&#38;width=800"));
        assert!(!xml.contains(" & "));
    }
}
