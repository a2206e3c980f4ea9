//! JSON and fragment endpoints under `/api/`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::views::ProductCard;
use crate::catalog::QueryParams;
use crate::error::Result;
use crate::i18n::RequestLocale;
use crate::state::AppState;

/// Cards returned when `count` is absent or unparseable.
const DEFAULT_COUNT: i64 = 4;
/// Most cards a single request may ask for.
const MAX_COUNT: i64 = 24;

/// Product cards fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_cards.html")]
pub struct ProductCardsTemplate {
    pub products: Vec<ProductCard>,
}

/// Arguments of `/api/products`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProductsQuery {
    query: Option<String>,
    count: i64,
    sort_key: Option<String>,
    reverse: bool,
}

impl ProductsQuery {
    fn from_params(params: &QueryParams) -> Self {
        let count = params
            .get_trimmed("count")
            .and_then(|c| c.parse::<i64>().ok())
            .filter(|c| *c > 0)
            .map_or(DEFAULT_COUNT, |c| c.min(MAX_COUNT));
        Self {
            query: params.get_trimmed("query").map(String::from),
            count,
            sort_key: params
                .get_trimmed("sortKey")
                .filter(|k| k.chars().all(|c| c.is_ascii_uppercase() || c == '_'))
                .map(String::from),
            reverse: params.get("reverse") == Some("true"),
        }
    }
}

/// `GET /api/products?query=&count=&sortKey=&reverse=`
#[instrument(skip(state, locale))]
pub async fn products(
    State(state): State<AppState>,
    locale: RequestLocale,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let args = ProductsQuery::from_params(&params);
    let products = state
        .storefront()
        .api_products(
            args.query,
            args.count,
            args.sort_key,
            args.reverse,
            &locale.in_context(),
        )
        .await?;
    Ok(ProductCardsTemplate {
        products: ProductCard::list(&products, &locale),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_query_defaults() {
        let args = ProductsQuery::from_params(&QueryParams::default());
        assert_eq!(args.count, DEFAULT_COUNT);
        assert_eq!(args.query, None);
        assert!(!args.reverse);
    }

    #[test]
    fn test_products_query_clamps_count() {
        let args = ProductsQuery::from_params(&QueryParams::parse("count=100&sortKey=BEST_SELLING&reverse=true"));
        assert_eq!(args.count, MAX_COUNT);
        assert_eq!(args.sort_key.as_deref(), Some("BEST_SELLING"));
        assert!(args.reverse);

        let args = ProductsQuery::from_params(&QueryParams::parse("count=-1&sortKey=price%20desc"));
        assert_eq!(args.count, DEFAULT_COUNT);
        assert_eq!(args.sort_key, None);
    }
}
