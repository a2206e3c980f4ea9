//! Test harness for the storefront.
//!
//! Each test starts a fake Storefront API that answers by `operationName`
//! with canned `data`, then starts the real storefront router pointed at it
//! through the `STOREFRONT_API_URL` override.
//!
//! ```rust,ignore
//! let api = FakeApi::new().respond("Layout", layout_data());
//! let app = TestApp::spawn(&api).await;
//! let resp = app.client.get(app.url("/robots.txt")).send().await?;
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, routing::post};
use demo_store_storefront::config::{SentryConfig, StorefrontApiConfig, StorefrontConfig};
use demo_store_storefront::state::AppState;
use reqwest::redirect::Policy;
use secrecy::SecretString;
use serde_json::{Value, json};

/// A request the fake API received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation_name: String,
    pub variables: Value,
}

#[derive(Default)]
struct FakeApiInner {
    responses: HashMap<String, Value>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Canned Storefront API keyed by operation name.
///
/// Unknown operations answer with a GraphQL error.
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<FakeApiInner>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default().respond("Layout", layout_data())
    }

    /// Answer `operation` with `{"data": data}`.
    #[must_use]
    pub fn respond(mut self, operation: &str, data: Value) -> Self {
        Arc::get_mut(&mut self.inner)
            .expect("FakeApi is configured before it is started")
            .responses
            .insert(operation.to_string(), data);
        self
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().expect("requests lock").clone()
    }

    /// Requests for one operation.
    #[must_use]
    pub fn requests_for(&self, operation: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.operation_name == operation)
            .collect()
    }

    async fn serve(self) -> String {
        let router = Router::new()
            .route("/graphql.json", post(graphql))
            .with_state(self);
        let addr = spawn_router(router).await;
        format!("http://{addr}/graphql.json")
    }
}

async fn graphql(State(api): State<FakeApi>, Json(body): Json<Value>) -> Json<Value> {
    let operation_name = body["operationName"].as_str().unwrap_or_default().to_string();
    api.inner
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            operation_name: operation_name.clone(),
            variables: body["variables"].clone(),
        });

    Json(api.inner.responses.get(&operation_name).map_or_else(
        || json!({"errors": [{"message": format!("No fake response for {operation_name}")}]}),
        |data| json!({"data": data}),
    ))
}

async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("test server");
    });
    addr
}

/// A running storefront plus a cookie-keeping client that does not follow
/// redirects.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the fake API and a storefront wired to it.
    pub async fn spawn(api: &FakeApi) -> Self {
        let endpoint = api.clone().serve().await;

        let mut storefront_api = StorefrontApiConfig::new("demo-store.myshopify.com", "public-token");
        storefront_api.api_url = Some(endpoint);
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://shop.test".to_string(),
            session_secret: SecretString::from("kL9#mQ2$vX7@nR4&wT6*zY1!pB8^cF3%"),
            storefront_api,
            sentry: SentryConfig::default(),
        };

        let addr = spawn_router(demo_store_storefront::app(AppState::new(config))).await;
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("build client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// `Layout` data with a one-item header menu.
#[must_use]
pub fn layout_data() -> Value {
    json!({
        "shop": {
            "id": "gid://shopify/Shop/1",
            "name": "Demo Store",
            "description": "Boards and bindings",
            "primaryDomain": {"url": "https://shop.test"}
        },
        "headerMenu": {
            "id": "gid://shopify/Menu/1",
            "items": [{
                "id": "gid://shopify/MenuItem/1",
                "title": "Collections",
                "type": "CATALOG",
                "url": "https://demo-store.myshopify.com/collections",
                "items": []
            }]
        },
        "footerMenu": null
    })
}

/// `Product` data for a handle that does not exist.
#[must_use]
pub fn missing_product_data() -> Value {
    json!({
        "product": null,
        "shop": {
            "name": "Demo Store",
            "primaryDomain": {"url": "https://shop.test"},
            "shippingPolicy": null,
            "refundPolicy": null
        }
    })
}

/// A `ProductVariantFields` node for the `Board` product in one size.
#[must_use]
pub fn board_variant(size: &str) -> Value {
    json!({
        "id": format!("gid://shopify/ProductVariant/{size}"),
        "title": size,
        "availableForSale": true,
        "sku": null,
        "price": {"amount": "499.0", "currencyCode": "USD"},
        "compareAtPrice": null,
        "selectedOptions": [{"name": "Size", "value": size}],
        "image": null,
        "product": {"handle": "board", "title": "Board"}
    })
}

/// `Product` data for `board`, with `selected` as the variant matching the
/// requested options.
#[must_use]
pub fn board_product_data(selected: Option<&str>) -> Value {
    json!({
        "product": {
            "id": "gid://shopify/Product/1",
            "handle": "board",
            "title": "Board",
            "vendor": "ACME",
            "description": "An all-mountain board.",
            "descriptionHtml": "<p>An all-mountain board.</p>",
            "publishedAt": "2024-01-02T03:04:05Z",
            "options": [{"name": "Size", "values": ["154", "158"]}],
            "selectedVariant": selected.map(board_variant),
            "featuredImage": null,
            "variants": {"nodes": [board_variant("154")]},
            "seo": {"title": null, "description": null}
        },
        "shop": {
            "name": "Demo Store",
            "primaryDomain": {"url": "https://shop.test"},
            "shippingPolicy": null,
            "refundPolicy": null
        }
    })
}

/// `ProductVariants` data for `board`.
#[must_use]
pub fn board_variants_data() -> Value {
    json!({"product": {"variants": {"nodes": [board_variant("154"), board_variant("158")]}}})
}

/// `CollectionDetails` data for an empty `skis` collection.
#[must_use]
pub fn collection_data() -> Value {
    json!({
        "collection": {
            "id": "gid://shopify/Collection/5",
            "handle": "skis",
            "title": "Skis",
            "description": "Everything for the slopes.",
            "seo": null,
            "image": null,
            "products": {
                "filters": [],
                "nodes": [],
                "pageInfo": {"hasNextPage": false, "hasPreviousPage": false}
            }
        }
    })
}

/// A `CartFields` node with no lines.
#[must_use]
pub fn cart(id: &str, total_quantity: i64) -> Value {
    json!({
        "id": id,
        "checkoutUrl": "https://demo-store.myshopify.com/cart/c/checkout",
        "totalQuantity": total_quantity,
        "note": null,
        "buyerIdentity": {"countryCode": "CA", "email": null},
        "lines": {"nodes": []},
        "cost": {
            "subtotalAmount": {"amount": "998.0", "currencyCode": "CAD"},
            "totalAmount": {"amount": "998.0", "currencyCode": "CAD"},
            "totalTaxAmount": null
        },
        "discountCodes": []
    })
}

/// A successful cart mutation payload.
#[must_use]
pub fn cart_mutation_data(id: &str, total_quantity: i64) -> Value {
    json!({"result": {"cart": cart(id, total_quantity), "userErrors": []}})
}

/// `customerAccessTokenCreate` data issuing `token`.
#[must_use]
pub fn access_token_data(token: &str) -> Value {
    json!({"result": {
        "customerAccessToken": {"accessToken": token, "expiresAt": "2099-01-01T00:00:00Z"},
        "userErrors": []
    }})
}

/// `CustomerDetails` data for a customer without addresses or orders.
#[must_use]
pub fn customer_data() -> Value {
    json!({
        "customer": {
            "id": "gid://shopify/Customer/7",
            "firstName": "Robin",
            "lastName": "Rider",
            "email": "rider@example.com",
            "phone": null,
            "defaultAddress": null,
            "addresses": {"nodes": []},
            "orders": {"nodes": []}
        }
    })
}
