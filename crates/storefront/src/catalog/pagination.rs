//! Cursor pagination from the `cursor` and `direction` parameters.

use super::QueryParams;
use crate::shopify::PageInfo;
use crate::shopify::queries::PaginationVariables;

/// Products per page on collection, all-products and search pages.
pub const PRODUCTS_PAGE_SIZE: i64 = 8;
/// Collections per page on the collections index.
pub const COLLECTIONS_PAGE_SIZE: i64 = 4;
/// Articles per page on the journal.
pub const ARTICLES_PAGE_SIZE: i64 = 8;

/// Connection arguments for the requested page.
///
/// `direction=previous` pages backwards from `cursor`; anything else pages
/// forwards.
#[must_use]
pub fn pagination_variables(params: &QueryParams, page_by: i64) -> PaginationVariables {
    let cursor = params.get_trimmed("cursor").map(String::from);
    if params.get("direction") == Some("previous") {
        PaginationVariables {
            last: Some(page_by),
            start_cursor: cursor,
            ..PaginationVariables::default()
        }
    } else {
        PaginationVariables {
            first: Some(page_by),
            end_cursor: cursor,
            ..PaginationVariables::default()
        }
    }
}

/// Previous/next page links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    /// Build links that keep every other parameter.
    #[must_use]
    pub fn new(page_info: &PageInfo, params: &QueryParams, path: &str) -> Self {
        let link = |cursor: Option<&String>, direction: &str| {
            let cursor = cursor?;
            let mut next = params.clone();
            next.set("cursor", cursor);
            next.set("direction", direction);
            Some(next.href(path))
        };

        Self {
            previous: page_info
                .has_previous_page
                .then(|| link(page_info.start_cursor.as_ref(), "previous"))
                .flatten(),
            next: page_info
                .has_next_page
                .then(|| link(page_info.end_cursor.as_ref(), "next"))
                .flatten(),
        }
    }

    /// Whether any link exists.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_info(prev: bool, next: bool) -> PageInfo {
        PageInfo {
            has_next_page: next,
            has_previous_page: prev,
            start_cursor: Some("start".to_string()),
            end_cursor: Some("end".to_string()),
        }
    }

    #[test]
    fn test_forward_by_default() {
        let vars = pagination_variables(&QueryParams::parse("cursor=abc"), 8);
        assert_eq!(vars.first, Some(8));
        assert_eq!(vars.end_cursor.as_deref(), Some("abc"));
        assert_eq!(vars.last, None);

        let vars = pagination_variables(&QueryParams::default(), 4);
        assert_eq!(vars.first, Some(4));
        assert_eq!(vars.end_cursor, None);
    }

    #[test]
    fn test_previous_direction() {
        let vars = pagination_variables(&QueryParams::parse("cursor=abc&direction=previous"), 8);
        assert_eq!(vars.last, Some(8));
        assert_eq!(vars.start_cursor.as_deref(), Some("abc"));
        assert_eq!(vars.first, None);
    }

    #[test]
    fn test_links_keep_params() {
        let params = QueryParams::parse("q=snow&cursor=old&direction=next");
        let links = PageLinks::new(&page_info(true, true), &params, "/search");
        assert_eq!(
            links.next.as_deref(),
            Some("/search?q=snow&cursor=end&direction=next")
        );
        assert_eq!(
            links.previous.as_deref(),
            Some("/search?q=snow&cursor=start&direction=previous")
        );
    }

    #[test]
    fn test_links_only_when_pages_exist() {
        let links = PageLinks::new(&page_info(false, false), &QueryParams::default(), "/products");
        assert!(links.is_empty());
        let links = PageLinks::new(&page_info(false, true), &QueryParams::default(), "/products");
        assert!(links.previous.is_none());
        assert_eq!(links.next.as_deref(), Some("/products?cursor=end&direction=next"));
    }
}
