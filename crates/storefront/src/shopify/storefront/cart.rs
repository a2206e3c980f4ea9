//! Cart operations (never cached - mutable state).

use tracing::instrument;

use super::queries::{
    CartBuyerIdentityUpdate, CartBuyerIdentityVariables, CartCreate, CartCreateVariables,
    CartDiscountCodesUpdate, CartDiscountCodesVariables, CartInput, CartLinesAdd,
    CartLinesAddVariables, CartLinesRemove, CartLinesRemoveVariables, CartLinesUpdate,
    CartLinesUpdateVariables, CartMutationData, CartQuery, CartVariables,
};
use super::{CachePolicy, InContext, StorefrontClient, mutation_result};
use crate::shopify::ShopifyError;
use crate::shopify::types::{Cart, CartBuyerIdentityInput, CartLineInput, CartLineUpdateInput};

/// Extract the cart from a mutation response.
fn into_cart(data: CartMutationData, operation: &str) -> Result<Cart, ShopifyError> {
    mutation_result(data.result, |p| p.user_errors.as_slice(), operation)?
        .cart
        .ok_or_else(|| ShopifyError::message(format!("{operation} returned no cart")))
}

impl StorefrontClient {
    /// Get a cart by id; `None` when the cart no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn cart(&self, cart_id: &str, ctx: &InContext) -> Result<Option<Cart>, ShopifyError> {
        let data = self
            .execute::<CartQuery>(
                CartVariables {
                    ctx: ctx.clone(),
                    cart_id: cart_id.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        Ok(data.cart)
    }

    /// Create a cart with initial lines and buyer identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, input))]
    pub async fn cart_create(
        &self,
        input: CartInput,
        ctx: &InContext,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CartCreate>(
                CartCreateVariables {
                    ctx: ctx.clone(),
                    input,
                },
                CachePolicy::NoStore,
            )
            .await?;
        into_cart(data, "cartCreate")
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn cart_lines_add(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
        ctx: &InContext,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CartLinesAdd>(
                CartLinesAddVariables {
                    ctx: ctx.clone(),
                    cart_id: cart_id.to_string(),
                    lines,
                },
                CachePolicy::NoStore,
            )
            .await?;
        into_cart(data, "cartLinesAdd")
    }

    /// Update cart line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn cart_lines_update(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
        ctx: &InContext,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CartLinesUpdate>(
                CartLinesUpdateVariables {
                    ctx: ctx.clone(),
                    cart_id: cart_id.to_string(),
                    lines,
                },
                CachePolicy::NoStore,
            )
            .await?;
        into_cart(data, "cartLinesUpdate")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn cart_lines_remove(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
        ctx: &InContext,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CartLinesRemove>(
                CartLinesRemoveVariables {
                    ctx: ctx.clone(),
                    cart_id: cart_id.to_string(),
                    line_ids,
                },
                CachePolicy::NoStore,
            )
            .await?;
        into_cart(data, "cartLinesRemove")
    }

    /// Replace the cart's discount codes (an empty list clears them).
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn cart_discount_codes_update(
        &self,
        cart_id: &str,
        discount_codes: Vec<String>,
        ctx: &InContext,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CartDiscountCodesUpdate>(
                CartDiscountCodesVariables {
                    ctx: ctx.clone(),
                    cart_id: cart_id.to_string(),
                    discount_codes,
                },
                CachePolicy::NoStore,
            )
            .await?;
        into_cart(data, "cartDiscountCodesUpdate")
    }

    /// Update the cart's buyer identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, buyer_identity), fields(cart_id = %cart_id))]
    pub async fn cart_buyer_identity_update(
        &self,
        cart_id: &str,
        buyer_identity: CartBuyerIdentityInput,
        ctx: &InContext,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CartBuyerIdentityUpdate>(
                CartBuyerIdentityVariables {
                    ctx: ctx.clone(),
                    cart_id: cart_id.to_string(),
                    buyer_identity,
                },
                CachePolicy::NoStore,
            )
            .await?;
        into_cart(data, "cartBuyerIdentityUpdate")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_into_cart_user_errors() {
        let data: CartMutationData = serde_json::from_value(serde_json::json!({
            "result": {
                "cart": null,
                "userErrors": [{"field": ["lines"], "message": "Merchandise is out of stock", "code": "INVALID"}]
            }
        }))
        .unwrap();
        let err = into_cart(data, "cartLinesAdd").unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(ref m) if m == "Merchandise is out of stock"));
    }

    #[test]
    fn test_into_cart_missing_cart() {
        let data: CartMutationData =
            serde_json::from_value(serde_json::json!({"result": {"cart": null, "userErrors": []}}))
                .unwrap();
        let err = into_cart(data, "cartCreate").unwrap_err();
        assert!(err.to_string().contains("cartCreate returned no cart"));
    }
}
