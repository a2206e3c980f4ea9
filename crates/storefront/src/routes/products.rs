//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::found;
use super::layout::{PageRequest, Shell};
use super::views::{ImageView, ProductCard};
use crate::catalog::variants::{option_groups, selected_options, variant_url};
use crate::catalog::{
    MAX_RECOMMENDATIONS, OptionGroup, PageLinks, QueryParams, merge_recommendations,
    pagination::PRODUCTS_PAGE_SIZE, pagination_variables,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::RequestLocale;
use crate::seo::{self, PageSeo, breadcrumbs_json_ld, product_json_ld};
use crate::shopify::{Product, ShopPolicy};
use crate::state::AppState;

/// A shop policy summarized under the product description.
#[derive(Debug, Clone)]
pub struct PolicySummary {
    pub title: String,
    pub excerpt: String,
    pub href: String,
}

impl PolicySummary {
    fn new(policy: &ShopPolicy, locale: &RequestLocale) -> Self {
        Self {
            title: policy.title.clone(),
            excerpt: seo::meta_description(&policy.body),
            href: locale.path(&format!("/policies/{}", policy.handle)),
        }
    }
}

/// Product detail data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub title: String,
    pub vendor: String,
    pub description_html: String,
    pub image: Option<ImageView>,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub variant_id: Option<String>,
    pub variant_title: Option<String>,
    pub available: bool,
    pub options: Vec<OptionGroup>,
    pub shipping_policy: Option<PolicySummary>,
    pub refund_policy: Option<PolicySummary>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shell: Shell,
    pub products: Vec<ProductCard>,
    pub pages: PageLinks,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub shell: Shell,
    pub product: ProductView,
    /// Where the add-to-cart form returns.
    pub cart_href: String,
    pub recommendations_src: String,
}

/// Recommendations fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub title: &'static str,
    pub products: Vec<ProductCard>,
}

/// `GET /products`
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageRequest,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let variables = pagination_variables(&params, PRODUCTS_PAGE_SIZE);
    let (layout, products) = tokio::try_join!(
        page.layout(&state),
        state.storefront().all_products(variables, page.ctx()),
    )?;

    let seo = PageSeo::new(
        "All Products",
        "All the store products",
        page.canonical(&state, "/products"),
    );
    Ok(ProductsIndexTemplate {
        products: ProductCard::list(&products.nodes, &page.locale),
        pages: PageLinks::new(&products.page_info, &params, &page.link("/products")),
        shell: page.shell(&state, &layout, seo),
    })
}

/// `GET /products/{handle}`
///
/// The query string selects the variant. Without a matching variant the
/// visitor is redirected to the first variant's options.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageRequest,
    Path(handle): Path<String>,
    params: QueryParams,
) -> Result<Response> {
    let ctx = page.ctx();
    let selected = selected_options(&params);
    let (layout, data, variants) = tokio::try_join!(
        page.layout(&state),
        state.storefront().product(&handle, &selected, ctx),
        state.storefront().product_variants(&handle, ctx),
    )?;
    let product = data
        .product
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {handle}")))?;
    let path = page.link(&format!("/products/{handle}"));

    let Some(variant) = product.selected_variant.as_ref() else {
        let first = product
            .variants
            .nodes
            .first()
            .ok_or_else(|| AppError::NotFound(format!("Product has no variants: {handle}")))?;
        return Ok(found(&variant_url(&path, first)));
    };

    let canonical = page.canonical(&state, &format!("/products/{handle}"));
    let seo_meta = product.seo.clone().unwrap_or_default();
    let seo = PageSeo::new(
        seo_meta.title.unwrap_or_else(|| product.title.clone()),
        seo_meta
            .description
            .as_deref()
            .unwrap_or(&product.description),
        canonical.clone(),
    )
    .with_json_ld(&product_json_ld(&product, &canonical))
    .with_json_ld(&breadcrumbs_json_ld(&[
        ("Products", page.canonical(&state, "/products")),
        (product.title.as_str(), canonical.clone()),
    ]));

    let view = ProductView {
        title: product.title.clone(),
        vendor: product.vendor.clone(),
        description_html: product.description_html.clone(),
        image: product
            .card_image()
            .map(|image| ImageView::hero(image, &product.title)),
        price: variant.price.display(),
        compare_at_price: variant
            .is_on_sale()
            .then(|| variant.compare_at_price.as_ref().map(|p| p.display()))
            .flatten(),
        variant_id: Some(variant.id.clone()),
        variant_title: (variant.title != "Default Title").then(|| variant.title.clone()),
        available: variant.available_for_sale,
        options: option_groups(&product.options, &variants, &params, &path),
        shipping_policy: data
            .shop
            .shipping_policy
            .as_ref()
            .map(|p| PolicySummary::new(p, &page.locale)),
        refund_policy: data
            .shop
            .refund_policy
            .as_ref()
            .map(|p| PolicySummary::new(p, &page.locale)),
    };

    Ok(ProductShowTemplate {
        product: view,
        cart_href: page.link("/cart"),
        recommendations_src: page.link(&format!("/products/{handle}/recommendations")),
        shell: page.shell(&state, &layout, seo),
    }
    .into_response())
}

/// `GET /products/{handle}/recommendations`
#[instrument(skip(state, locale))]
pub async fn recommendations(
    State(state): State<AppState>,
    locale: RequestLocale,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let ctx = locale.in_context();
    let data = state.storefront().product(&handle, &[], &ctx).await?;
    let product: Product = data
        .product
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {handle}")))?;

    let count = i64::try_from(MAX_RECOMMENDATIONS).unwrap_or(12);
    let recs = state
        .storefront()
        .product_recommendations(&product.id, count, &ctx)
        .await?;
    let products = merge_recommendations(
        recs.recommended.unwrap_or_default(),
        recs.additional.nodes,
        &product.id,
    );

    Ok(ProductGridTemplate {
        title: "You may also like",
        products: ProductCard::list(&products, &locale),
    })
}
