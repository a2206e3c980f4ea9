//! End-to-end storefront behavior against the fake Storefront API.

#![allow(clippy::unwrap_used)]

use demo_store_integration_tests::{
    FakeApi, TestApp, access_token_data, board_product_data, board_variants_data,
    cart_mutation_data, collection_data, customer_data, missing_product_data,
};
use reqwest::{StatusCode, header::LOCATION};
use serde_json::json;

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()[LOCATION].to_str().unwrap()
}

async fn sign_in(app: &TestApp) {
    let resp = app
        .client
        .post(app.url("/account/login"))
        .form(&[("email", "rider@example.com"), ("password", "correct-horse")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let api = FakeApi::new()
        .respond("Product", missing_product_data())
        .respond("ProductVariants", json!({"product": null}));
    let app = TestApp::spawn(&api).await;

    let resp = app
        .client
        .get(app.url("/products/no-such-board"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("404"));
}

#[tokio::test]
async fn test_locale_prefix_sets_in_context_country() {
    let api = FakeApi::new()
        .respond("Product", missing_product_data())
        .respond("ProductVariants", json!({"product": null}));
    let app = TestApp::spawn(&api).await;

    let resp = app
        .client
        .get(app.url("/en-ca/products/no-such-board"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let product = api.requests_for("Product");
    assert_eq!(product.len(), 1);
    assert_eq!(product[0].variables["country"], "CA");
    assert_eq!(product[0].variables["language"], "EN");
    assert_eq!(product[0].variables["handle"], "no-such-board");
}

#[tokio::test]
async fn test_unprefixed_request_uses_default_market() {
    let api = FakeApi::new()
        .respond("Product", missing_product_data())
        .respond("ProductVariants", json!({"product": null}));
    let app = TestApp::spawn(&api).await;

    app.client
        .get(app.url("/products/no-such-board"))
        .send()
        .await
        .unwrap();

    let product = api.requests_for("Product");
    assert_eq!(product[0].variables["country"], "US");
}

#[tokio::test]
async fn test_collections_all_moves_to_products() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app.client.get(app.url("/collections/all")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&resp), "/products");

    let resp = app
        .client
        .get(app.url("/fr-ca/collections/all"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&resp), "/fr-ca/products");
}

#[tokio::test]
async fn test_robots_txt() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app.client.get(app.url("/robots.txt")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.starts_with("User-agent: *"));
    for path in ["/cart", "/account", "/search", "/checkout"] {
        assert!(body.contains(&format!("Disallow: {path}\n")), "missing {path}");
    }
    assert!(body.contains("Sitemap: http://shop.test/sitemap.xml"));
}

#[tokio::test]
async fn test_unknown_cart_action_is_400() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app
        .client
        .post(app.url("/cart"))
        .form(&[("cartAction", "LinesExplode")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("LinesExplode cart action is not defined"));
}

#[tokio::test]
async fn test_account_requires_login() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app.client.get(app.url("/account")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/account/login");

    let resp = app.client.get(app.url("/en-gb/account")).send().await.unwrap();
    assert_eq!(location(&resp), "/en-gb/account/login");
}

#[tokio::test]
async fn test_login_with_missing_fields_is_400() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app
        .client
        .post(app.url("/account/login"))
        .form(&[("email", "rider@example.com")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Please provide both an email and a password."));
    assert!(body.contains("rider@example.com"));
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_400() {
    let api = FakeApi::new().respond(
        "customerAccessTokenCreate",
        json!({"result": {
            "customerAccessToken": null,
            "userErrors": [{"field": ["input"], "message": "Unidentified customer", "code": "UNIDENTIFIED_CUSTOMER"}]
        }}),
    );
    let app = TestApp::spawn(&api).await;
    let resp = app
        .client
        .post(app.url("/account/login"))
        .form(&[("email", "rider@example.com"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Sorry. We did not recognize either your email or password.")
    );
}

#[tokio::test]
async fn test_login_stores_token_and_redirects() {
    let api = FakeApi::new().respond(
        "customerAccessTokenCreate",
        json!({"result": {
            "customerAccessToken": {"accessToken": "token-123", "expiresAt": "2099-01-01T00:00:00Z"},
            "userErrors": []
        }}),
    );
    let app = TestApp::spawn(&api).await;
    let resp = app
        .client
        .post(app.url("/account/login"))
        .form(&[("email", "rider@example.com"), ("password", "correct-horse")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/account");

    let sent = api.requests_for("customerAccessTokenCreate");
    assert_eq!(sent[0].variables["input"]["email"], "rider@example.com");

    // The session now carries the token, so the login page bounces.
    let resp = app.client.get(app.url("/account/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/account");
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app
        .client
        .get(app.url("/robots.txt"))
        .header("x-request-id", "trace-abc")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-abc");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    let csp = resp.headers()["content-security-policy"].to_str().unwrap();
    assert!(csp.contains("script-src 'self' 'nonce-"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app.client.get(app.url("/no/such/page")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_without_selection_redirects_to_first_variant() {
    let api = FakeApi::new()
        .respond("Product", board_product_data(None))
        .respond("ProductVariants", board_variants_data());
    let app = TestApp::spawn(&api).await;

    let resp = app.client.get(app.url("/products/board")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/products/board?Size=154");

    let resp = app
        .client
        .get(app.url("/fr-ca/products/board"))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/fr-ca/products/board?Size=154");
}

#[tokio::test]
async fn test_product_with_selected_variant_renders() {
    let api = FakeApi::new()
        .respond("Product", board_product_data(Some("158")))
        .respond("ProductVariants", board_variants_data());
    let app = TestApp::spawn(&api).await;

    let resp = app
        .client
        .get(app.url("/products/board?Size=158"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Board"));
    assert!(body.contains("gid://shopify/ProductVariant/158"));
    assert!(body.contains("/products/board/recommendations"));

    let product = api.requests_for("Product");
    assert_eq!(
        product[0].variables["selectedOptions"],
        json!([{"name": "Size", "value": "158"}])
    );
}

#[tokio::test]
async fn test_collection_sends_filters_and_sort() {
    let api = FakeApi::new().respond("CollectionDetails", collection_data());
    let app = TestApp::spawn(&api).await;

    let resp = app
        .client
        .get(app.url(
            "/collections/skis?filter.productVendor=%22ACME%22&sort=price-high-low",
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Skis"));

    let sent = api.requests_for("CollectionDetails");
    assert_eq!(sent.len(), 1);
    let variables = &sent[0].variables;
    assert_eq!(variables["handle"], "skis");
    assert_eq!(variables["filters"], json!([{"productVendor": "ACME"}]));
    assert_eq!(variables["sortKey"], "PRICE");
    assert_eq!(variables["reverse"], true);
}

#[tokio::test]
async fn test_collection_price_form_redirects_to_price_filter() {
    let api = FakeApi::new().respond("CollectionDetails", collection_data());
    let app = TestApp::spawn(&api).await;

    let resp = app
        .client
        .get(app.url("/collections/skis?minPrice=10&maxPrice=50&sort=newest"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        "/collections/skis?sort=newest&filter.price=%7B%22max%22%3A50%2C%22min%22%3A10%7D"
    );
    assert!(api.requests_for("CollectionDetails").is_empty());
}

#[tokio::test]
async fn test_lines_add_creates_cart_and_updates_count() {
    let cart_id = "gid://shopify/Cart/c1?key=k1";
    let api = FakeApi::new()
        .respond("cartCreate", cart_mutation_data(cart_id, 2))
        .respond("cartLinesAdd", cart_mutation_data(cart_id, 3))
        .respond("CartQuery", json!({"cart": demo_store_integration_tests::cart(cart_id, 2)}));
    let app = TestApp::spawn(&api).await;

    let resp = app
        .client
        .post(app.url("/en-ca/cart"))
        .form(&[
            ("cartAction", "LinesAdd"),
            ("variantId", "gid://shopify/ProductVariant/154"),
            ("quantity", "2"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/en-ca/cart");

    let created = api.requests_for("cartCreate");
    assert_eq!(created.len(), 1);
    let input = &created[0].variables["input"];
    assert_eq!(input["buyerIdentity"]["countryCode"], "CA");
    assert_eq!(input["lines"][0]["merchandiseId"], "gid://shopify/ProductVariant/154");
    assert_eq!(input["lines"][0]["quantity"], 2);

    let resp = app.client.get(app.url("/en-ca/cart/count")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains(r#"aria-label="2 items""#));
    assert_eq!(api.requests_for("CartQuery")[0].variables["cartId"], cart_id);

    // The stored cart is reused for the next add.
    app.client
        .post(app.url("/en-ca/cart"))
        .form(&[("cartAction", "LinesAdd"), ("variantId", "gid://shopify/ProductVariant/158")])
        .send()
        .await
        .unwrap();
    assert_eq!(api.requests_for("cartCreate").len(), 1);
    assert_eq!(api.requests_for("cartLinesAdd")[0].variables["cartId"], cart_id);

    let resp = app.client.get(app.url("/en-ca/cart/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "https://demo-store.myshopify.com/cart/c/checkout");
}

#[tokio::test]
async fn test_country_switch_without_redirect_lands_on_market_cart() {
    let app = TestApp::spawn(&FakeApi::new()).await;
    let resp = app
        .client
        .post(app.url("/fr-ca/cart"))
        .form(&[("cartAction", "BuyerIdentityUpdate"), ("countryCode", "ca")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/fr-ca/cart");

    let resp = app
        .client
        .post(app.url("/fr-ca/cart"))
        .form(&[("cartAction", "BuyerIdentityUpdate"), ("countryCode", "US")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/cart");
}

#[tokio::test]
async fn test_signed_in_account_renders_profile() {
    let api = FakeApi::new()
        .respond("customerAccessTokenCreate", access_token_data("token-123"))
        .respond("CustomerDetails", customer_data());
    let app = TestApp::spawn(&api).await;
    sign_in(&app).await;

    let resp = app.client.get(app.url("/account")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Welcome, Robin."));
    assert!(body.contains("rider@example.com"));

    let sent = api.requests_for("CustomerDetails");
    assert_eq!(sent[0].variables["customerAccessToken"], "token-123");
}

#[tokio::test]
async fn test_rejected_token_signs_out() {
    let api = FakeApi::new()
        .respond("customerAccessTokenCreate", access_token_data("revoked"))
        .respond("CustomerDetails", json!({"customer": null}));
    let app = TestApp::spawn(&api).await;
    sign_in(&app).await;

    let resp = app.client.get(app.url("/account")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/account/login");

    // The session no longer holds the token, so the login form renders.
    let resp = app.client.get(app.url("/account/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(api.requests_for("CustomerDetails").len(), 1);
}
