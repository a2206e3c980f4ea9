//! The `sort` parameter on collection pages.

use super::QueryParams;
use crate::shopify::ProductCollectionSortKeys;

/// Sort orders offered on collection pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortParam {
    PriceHighLow,
    PriceLowHigh,
    BestSelling,
    Newest,
    Featured,
    /// Anything unrecognized, including no `sort` at all.
    #[default]
    Relevance,
}

impl SortParam {
    /// Options listed in the sort menu, in display order.
    pub const MENU: [Self; 5] = [
        Self::Featured,
        Self::PriceLowHigh,
        Self::PriceHighLow,
        Self::BestSelling,
        Self::Newest,
    ];

    /// Parse the `sort` query value.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("price-high-low") => Self::PriceHighLow,
            Some("price-low-high") => Self::PriceLowHigh,
            Some("best-selling") => Self::BestSelling,
            Some("newest") => Self::Newest,
            Some("featured") => Self::Featured,
            _ => Self::Relevance,
        }
    }

    /// The `sort` query value.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::PriceHighLow => "price-high-low",
            Self::PriceLowHigh => "price-low-high",
            Self::BestSelling => "best-selling",
            Self::Newest => "newest",
            Self::Featured => "featured",
            Self::Relevance => "relevance",
        }
    }

    /// API sort key and `reverse` flag.
    #[must_use]
    pub const fn sort_key(self) -> (ProductCollectionSortKeys, bool) {
        match self {
            Self::PriceHighLow => (ProductCollectionSortKeys::Price, true),
            Self::PriceLowHigh => (ProductCollectionSortKeys::Price, false),
            Self::BestSelling => (ProductCollectionSortKeys::BestSelling, false),
            Self::Newest => (ProductCollectionSortKeys::Created, true),
            Self::Featured => (ProductCollectionSortKeys::Manual, false),
            Self::Relevance => (ProductCollectionSortKeys::Relevance, false),
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceHighLow => "Price: High - Low",
            Self::PriceLowHigh => "Price: Low - High",
            Self::BestSelling => "Best Selling",
            Self::Newest => "Newest",
            Self::Featured | Self::Relevance => "Featured",
        }
    }

    /// Link to the listing in this order, back on its first page.
    #[must_use]
    pub fn link(self, params: &QueryParams, path: &str) -> String {
        let mut next = params.clone();
        next.set("sort", self.param());
        next.delete("cursor");
        next.delete("direction");
        next.href(path)
    }
}

/// A sort menu entry.
#[derive(Debug, Clone)]
pub struct SortOption {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// The sort menu for the current request.
#[must_use]
pub fn sort_options(current: SortParam, params: &QueryParams, path: &str) -> Vec<SortOption> {
    SortParam::MENU
        .iter()
        .map(|&option| SortOption {
            label: option.label(),
            href: option.link(params, path),
            active: option == current
                || (option == SortParam::Featured && current == SortParam::Relevance),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_table() {
        let cases = [
            ("price-high-low", ProductCollectionSortKeys::Price, true),
            ("price-low-high", ProductCollectionSortKeys::Price, false),
            ("best-selling", ProductCollectionSortKeys::BestSelling, false),
            ("newest", ProductCollectionSortKeys::Created, true),
            ("featured", ProductCollectionSortKeys::Manual, false),
            ("bogus", ProductCollectionSortKeys::Relevance, false),
        ];
        for (param, key, reverse) in cases {
            assert_eq!(SortParam::from_param(Some(param)).sort_key(), (key, reverse), "{param}");
        }
        assert_eq!(SortParam::from_param(None), SortParam::Relevance);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SortParam::PriceLowHigh.label(), "Price: Low - High");
        assert_eq!(SortParam::BestSelling.label(), "Best Selling");
    }

    #[test]
    fn test_sort_link_drops_cursor() {
        let params = QueryParams::parse("filter.available=true&cursor=abc&direction=next&sort=newest");
        assert_eq!(
            SortParam::BestSelling.link(&params, "/collections/skis"),
            "/collections/skis?filter.available=true&sort=best-selling"
        );
    }

    #[test]
    fn test_menu_marks_featured_for_default() {
        let options = sort_options(SortParam::Relevance, &QueryParams::default(), "/c");
        assert_eq!(options.len(), 5);
        assert!(options[0].active);
        assert!(options.iter().skip(1).all(|o| !o.active));
    }
}
