//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use super::views::{CollectionCard, ImageView, ProductCard};
use super::{found, moved_permanently};
use crate::catalog::filters::{
    AppliedFilter, FilterGroup, PriceRange, applied_filters, clear_filters_link, filter_groups,
    parse_filters, price_range_link,
};
use crate::catalog::pagination::{COLLECTIONS_PAGE_SIZE, PRODUCTS_PAGE_SIZE};
use crate::catalog::{PageLinks, QueryParams, SortOption, SortParam, pagination_variables, sort};
use crate::error::Result;
use crate::filters;
use crate::seo::{PageSeo, collection_json_ld};
use crate::shopify::CollectionArgs;
use crate::state::AppState;

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub shell: Shell,
    pub collections: Vec<CollectionCard>,
    pub pages: PageLinks,
}

/// Collection header data for templates.
#[derive(Debug, Clone)]
pub struct CollectionView {
    pub title: String,
    pub description: String,
    pub image: Option<ImageView>,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub shell: Shell,
    pub collection: CollectionView,
    pub products: Vec<ProductCard>,
    pub pages: PageLinks,
    pub filters: Vec<FilterGroup>,
    pub applied: Vec<AppliedFilter>,
    pub clear_href: String,
    pub sort_options: Vec<SortOption>,
    pub sort_label: &'static str,
    pub price: PriceRange,
    /// The collection path the price form submits to.
    pub action: String,
    /// Non-price params carried through the price form.
    pub hidden_params: Vec<(String, String)>,
}

/// `GET /collections`
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageRequest,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let variables = pagination_variables(&params, COLLECTIONS_PAGE_SIZE);
    let (layout, collections) = tokio::try_join!(
        page.layout(&state),
        state.storefront().collections(variables, page.ctx()),
    )?;

    let seo = PageSeo::new(
        "All Collections",
        "All the store collections",
        page.canonical(&state, "/collections"),
    );
    Ok(CollectionsIndexTemplate {
        collections: CollectionCard::list(&collections.nodes, &page.locale),
        pages: PageLinks::new(&collections.page_info, &params, &page.link("/collections")),
        shell: page.shell(&state, &layout, seo),
    })
}

/// `GET /collections/all`
pub async fn all(page: PageRequest) -> Response {
    moved_permanently(&page.link("/products"))
}

/// Parse an optional price bound from the price form.
fn price_bound(params: &QueryParams, key: &str) -> Option<f64> {
    params
        .get_trimmed(key)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// `GET /collections/{handle}`
///
/// A submitted price form (`minPrice`/`maxPrice`) is folded into the
/// `filter.price` parameter with a redirect.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageRequest,
    Path(handle): Path<String>,
    params: QueryParams,
) -> Result<Response> {
    let path = page.link(&format!("/collections/{handle}"));

    if params.has("minPrice") || params.has("maxPrice") {
        let min = price_bound(&params, "minPrice");
        let max = price_bound(&params, "maxPrice");
        let mut rest = params.clone();
        rest.delete("minPrice");
        rest.delete("maxPrice");
        return Ok(found(&price_range_link(min, max, &rest, &path)));
    }

    let requested = parse_filters(&params);
    let sort_param = SortParam::from_param(params.get("sort"));
    let (sort_key, reverse) = sort_param.sort_key();
    let args = CollectionArgs {
        filters: requested.iter().map(|f| f.to_json()).collect(),
        sort_key,
        reverse,
        page: pagination_variables(&params, PRODUCTS_PAGE_SIZE),
    };

    let (layout, collection) = tokio::try_join!(
        page.layout(&state),
        state.storefront().collection(&handle, args, page.ctx()),
    )?;

    let canonical = page.canonical(&state, &format!("/collections/{handle}"));
    let seo_meta = collection.seo.clone().unwrap_or_default();
    let seo = PageSeo::new(
        seo_meta.title.unwrap_or_else(|| collection.title.clone()),
        seo_meta
            .description
            .as_deref()
            .unwrap_or(&collection.description),
        canonical.clone(),
    )
    .with_json_ld(&collection_json_ld(&collection, &canonical, |product| {
        page.canonical(&state, &format!("/products/{}", product.handle))
    }));

    let available = &collection.products.filters;
    let hidden_params = params
        .pairs()
        .iter()
        .filter(|(k, _)| k != "filter.price" && k != "cursor" && k != "direction")
        .cloned()
        .collect();

    Ok(CollectionShowTemplate {
        collection: CollectionView {
            title: collection.title.clone(),
            description: collection.description.clone(),
            image: collection
                .image
                .as_ref()
                .map(|image| ImageView::hero(image, &collection.title)),
        },
        products: ProductCard::list(&collection.products.nodes, &page.locale),
        pages: PageLinks::new(&collection.products.page_info, &params, &path),
        filters: filter_groups(available, &params, &path),
        applied: applied_filters(&requested, available, &params, &path, page.locale.currency),
        clear_href: clear_filters_link(&params, &path),
        sort_options: sort::sort_options(sort_param, &params, &path),
        sort_label: sort_param.label(),
        price: PriceRange::from_filters(&requested),
        hidden_params,
        action: path,
        shell: page.shell(&state, &layout, seo),
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_bound() {
        let params = QueryParams::parse("minPrice=10&maxPrice=&bad=x");
        assert_eq!(price_bound(&params, "minPrice"), Some(10.0));
        assert_eq!(price_bound(&params, "maxPrice"), None);
        assert_eq!(price_bound(&QueryParams::parse("minPrice=-5"), "minPrice"), None);
        assert_eq!(price_bound(&QueryParams::parse("minPrice=abc"), "minPrice"), None);
    }
}
