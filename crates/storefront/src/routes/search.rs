//! Search route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use super::views::ProductCard;
use crate::catalog::pagination::PRODUCTS_PAGE_SIZE;
use crate::catalog::{PageLinks, QueryParams, pagination_variables};
use crate::error::Result;
use crate::filters;
use crate::seo::PageSeo;
use crate::state::AppState;

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub shell: Shell,
    pub term: String,
    pub action: String,
    pub products: Vec<ProductCard>,
    pub pages: PageLinks,
    /// Fragment loaded when there is nothing to show.
    pub featured_src: String,
}

/// `GET /search?q=`
#[instrument(skip(state, page, params))]
pub async fn search(
    State(state): State<AppState>,
    page: PageRequest,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let term = params.get_trimmed("q").unwrap_or_default().to_string();
    let ctx = page.ctx();

    let (layout, results) = if term.is_empty() {
        (page.layout(&state).await?, None)
    } else {
        let variables = pagination_variables(&params, PRODUCTS_PAGE_SIZE);
        let (layout, results) = tokio::try_join!(
            page.layout(&state),
            state.storefront().search(&term, variables, ctx),
        )?;
        (layout, Some(results))
    };

    tracing::debug!(term = %term, results = results.as_ref().map_or(0, |r| r.nodes.len()), "Search");

    let path = page.link("/search");
    let (products, pages) = results.map_or_else(
        || (Vec::new(), PageLinks::default()),
        |r| {
            (
                ProductCard::list(&r.nodes, &page.locale),
                PageLinks::new(&r.page_info, &params, &path),
            )
        },
    );

    let seo = PageSeo::new("Search", "", page.canonical(&state, "/search"));
    Ok(SearchTemplate {
        term,
        products,
        pages,
        action: path,
        featured_src: page.link("/featured-products"),
        shell: page.shell(&state, &layout, seo),
    })
}
