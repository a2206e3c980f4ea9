//! Menu parsing.
//!
//! Menus come back from the API with absolute URLs on the store's domains.
//! Internal links are rewritten to storefront paths (with the locale
//! prefix); anything else opens in a new tab.

use url::Url;

use crate::i18n::RequestLocale;
use crate::shopify::MenuItem;

/// A menu link ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub title: String,
    pub to: String,
    pub target: &'static str,
    pub is_external: bool,
    pub items: Vec<MenuLink>,
}

/// Hosts that count as "this store".
#[derive(Debug, Clone)]
pub struct MenuContext<'a> {
    pub store_domain: &'a str,
    pub primary_domain_url: &'a str,
    pub locale: &'a RequestLocale,
}

/// Parse a menu's items, dropping entries without a URL or type.
#[must_use]
pub fn parse_menu(items: &[MenuItem], ctx: &MenuContext<'_>) -> Vec<MenuLink> {
    items.iter().filter_map(|item| parse_item(item, ctx)).collect()
}

fn parse_item(item: &MenuItem, ctx: &MenuContext<'_>) -> Option<MenuLink> {
    let (Some(raw_url), Some(kind)) = (item.url.as_deref(), item.kind.as_deref()) else {
        tracing::warn!(title = %item.title, "Invalid menu item");
        return None;
    };
    let url = Url::parse(raw_url).ok()?;
    let host = url.host_str().unwrap_or_default();

    let primary_host = Url::parse(ctx.primary_domain_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    let is_internal = host == ctx.store_domain || primary_host.as_deref() == Some(host);

    let (to, target) = if is_internal {
        (ctx.locale.path(&path_for_type(kind, url.path())), "_self")
    } else {
        (raw_url.to_string(), "_blank")
    };

    Some(MenuLink {
        title: item.title.clone(),
        to,
        target,
        is_external: !is_internal,
        items: parse_menu(&item.items, ctx),
    })
}

/// Storefront path for a menu resource type and the API URL's path.
fn path_for_type(kind: &str, pathname: &str) -> String {
    let mut parts: Vec<&str> = pathname.split('/').collect();
    let handle = parts.pop().unwrap_or_default();

    match kind {
        "FRONTPAGE" => "/".to_string(),
        "ARTICLE" => {
            let blog = parts.pop().unwrap_or_default();
            format!("/{blog}/{handle}/")
        }
        "COLLECTIONS" => "/collections".to_string(),
        "SEARCH" => "/search".to_string(),
        "CATALOG" => "/products".to_string(),
        "COLLECTION" => format!("/collections/{handle}"),
        "PRODUCT" => format!("/products/{handle}"),
        "PAGE" => format!("/pages/{handle}"),
        "SHOP_POLICY" => format!("/policies/{handle}"),
        _ => format!("/{handle}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::i18n::strip_locale_prefix;

    fn item(title: &str, kind: &str, url: &str) -> serde_json::Value {
        json!({"id": title, "title": title, "type": kind, "url": url, "items": []})
    }

    fn parse(items: serde_json::Value, locale: &RequestLocale) -> Vec<MenuLink> {
        let items: Vec<MenuItem> = serde_json::from_value(items).unwrap();
        parse_menu(
            &items,
            &MenuContext {
                store_domain: "hydrogen.myshopify.com",
                primary_domain_url: "https://shop.example.com",
                locale,
            },
        )
    }

    #[test]
    fn test_internal_paths_by_type() {
        let links = parse(
            json!([
                item("Home", "FRONTPAGE", "https://shop.example.com/"),
                item("Skis", "COLLECTION", "https://hydrogen.myshopify.com/collections/skis"),
                item("All", "COLLECTIONS", "https://shop.example.com/collections"),
                item("Board", "PRODUCT", "https://shop.example.com/products/board"),
                item("About", "PAGE", "https://shop.example.com/pages/about"),
                item("Journal", "BLOG", "https://shop.example.com/blogs/journal"),
                item("Post", "ARTICLE", "https://shop.example.com/blogs/journal/hello"),
                item("Catalog", "CATALOG", "https://shop.example.com/collections/all"),
                item("Search", "SEARCH", "https://shop.example.com/search"),
                item("Privacy", "SHOP_POLICY", "https://shop.example.com/policies/privacy-policy"),
                item("Custom", "HTTP", "https://shop.example.com/pages/custom")
            ]),
            &RequestLocale::default(),
        );
        let paths: Vec<&str> = links.iter().map(|l| l.to.as_str()).collect();
        assert_eq!(
            paths,
            [
                "/",
                "/collections/skis",
                "/collections",
                "/products/board",
                "/pages/about",
                "/journal",
                "/journal/hello/",
                "/products",
                "/search",
                "/policies/privacy-policy",
                "/custom"
            ]
        );
        assert!(links.iter().all(|l| l.target == "_self" && !l.is_external));
    }

    #[test]
    fn test_external_and_invalid_items() {
        let links = parse(
            json!([
                item("Instagram", "HTTP", "https://instagram.com/hydrogen"),
                {"id": "x", "title": "Broken", "type": null, "url": "https://shop.example.com/x"},
                {"id": "y", "title": "No URL", "type": "PAGE", "url": null}
            ]),
            &RequestLocale::default(),
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].to, "https://instagram.com/hydrogen");
        assert_eq!(links[0].target, "_blank");
        assert!(links[0].is_external);
    }

    #[test]
    fn test_locale_prefix_and_nesting() {
        let (locale, _) = strip_locale_prefix("/fr-ca").unwrap();
        let links = parse(
            json!([{
                "id": "shop", "title": "Shop", "type": "CATALOG",
                "url": "https://shop.example.com/collections/all",
                "items": [item("Skis", "COLLECTION", "https://shop.example.com/collections/skis")]
            }]),
            &locale,
        );
        assert_eq!(links[0].to, "/fr-ca/products");
        assert_eq!(links[0].items[0].to, "/fr-ca/collections/skis");
    }
}
