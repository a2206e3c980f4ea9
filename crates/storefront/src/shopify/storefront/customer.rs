//! Customer account operations (never cached).
//!
//! Classic customer accounts: credentials are exchanged for a customer access
//! token which the storefront keeps in the session and passes to every
//! customer query and mutation.

use demo_store_core::{ResourceType, ShopifyGid};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::queries::{
    CustomerAccessTokenCreate, CustomerAccessTokenCreateInput, CustomerAccessTokenCreateVariables,
    CustomerAccessTokenDelete, CustomerAccessTokenDeleteVariables, CustomerActivate,
    CustomerActivateInput, CustomerActivateVariables, CustomerAddressCreate,
    CustomerAddressCreateVariables, CustomerAddressDelete, CustomerAddressDeleteVariables,
    CustomerAddressUpdate, CustomerAddressUpdateVariables, CustomerCreate, CustomerCreateVariables,
    CustomerDefaultAddressUpdate, CustomerDefaultAddressUpdateVariables, CustomerOrder,
    CustomerOrderVariables, CustomerPayload, CustomerQuery, CustomerRecover,
    CustomerRecoverVariables, CustomerReset, CustomerResetInput, CustomerResetVariables,
    CustomerUpdate, CustomerUpdateVariables, CustomerVariables,
};
use super::{CachePolicy, InContext, StorefrontClient, mutation_result};
use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Customer, CustomerAccessToken, CustomerCreateInput, CustomerUpdateInput, MailingAddressInput,
    Order,
};

fn expect_token(payload: CustomerPayload, operation: &str) -> Result<CustomerAccessToken, ShopifyError> {
    payload
        .customer_access_token
        .ok_or_else(|| ShopifyError::message(format!("{operation} returned no access token")))
}

impl StorefrontClient {
    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange email and password for a customer access token.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] for bad credentials, or an error if
    /// the API request fails.
    #[instrument(skip(self, password))]
    pub async fn customer_access_token_create(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let data = self
            .execute::<CustomerAccessTokenCreate>(
                CustomerAccessTokenCreateVariables {
                    input: CustomerAccessTokenCreateInput {
                        email: email.to_string(),
                        password: password.expose_secret().to_string(),
                    },
                },
                CachePolicy::NoStore,
            )
            .await?;
        let payload = mutation_result(data.result, |p| p.user_errors.as_slice(), "customerAccessTokenCreate")?;
        expect_token(payload, "customerAccessTokenCreate")
    }

    /// Revoke a customer access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or user errors are returned.
    #[instrument(skip(self, access_token))]
    pub async fn customer_access_token_delete(
        &self,
        access_token: &str,
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerAccessTokenDelete>(
                CustomerAccessTokenDeleteVariables {
                    customer_access_token: access_token.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        mutation_result(data.result, |p| p.user_errors.as_slice(), "customerAccessTokenDelete")?;
        Ok(())
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] if the email is taken or the input
    /// is invalid, or an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn customer_create(&self, input: CustomerCreateInput) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerCreate>(CustomerCreateVariables { input }, CachePolicy::NoStore)
            .await?;
        let payload = mutation_result(data.result, |p| p.user_errors.as_slice(), "customerCreate")?;
        if payload.customer.is_none() {
            return Err(ShopifyError::message("customerCreate returned no customer"));
        }
        Ok(())
    }

    /// Send a password recovery email.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or user errors are returned.
    #[instrument(skip(self))]
    pub async fn customer_recover(&self, email: &str) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerRecover>(
                CustomerRecoverVariables {
                    email: email.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        mutation_result(data.result, |p| p.user_errors.as_slice(), "customerRecover")?;
        Ok(())
    }

    /// Reset a password using the token from the recovery email.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] for an expired or invalid token, or
    /// an error if the API request fails.
    #[instrument(skip(self, reset_token, password), fields(customer_id = %customer_id))]
    pub async fn customer_reset(
        &self,
        customer_id: &ShopifyGid,
        reset_token: &str,
        password: &SecretString,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let data = self
            .execute::<CustomerReset>(
                CustomerResetVariables {
                    id: customer_id.to_string(),
                    input: CustomerResetInput {
                        reset_token: reset_token.to_string(),
                        password: password.expose_secret().to_string(),
                    },
                },
                CachePolicy::NoStore,
            )
            .await?;
        let payload = mutation_result(data.result, |p| p.user_errors.as_slice(), "customerReset")?;
        expect_token(payload, "customerReset")
    }

    /// Activate an invited account and set its password.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] for an expired or invalid token, or
    /// an error if the API request fails.
    #[instrument(skip(self, activation_token, password), fields(customer_id = %customer_id))]
    pub async fn customer_activate(
        &self,
        customer_id: &ShopifyGid,
        activation_token: &str,
        password: &SecretString,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let data = self
            .execute::<CustomerActivate>(
                CustomerActivateVariables {
                    id: customer_id.to_string(),
                    input: CustomerActivateInput {
                        activation_token: activation_token.to_string(),
                        password: password.expose_secret().to_string(),
                    },
                },
                CachePolicy::NoStore,
            )
            .await?;
        let payload = mutation_result(data.result, |p| p.user_errors.as_slice(), "customerActivate")?;
        expect_token(payload, "customerActivate")
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// The customer behind an access token; `None` if the token is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, access_token))]
    pub async fn customer(
        &self,
        access_token: &str,
        ctx: &InContext,
    ) -> Result<Option<Customer>, ShopifyError> {
        let data = self
            .execute::<CustomerQuery>(
                CustomerVariables {
                    ctx: ctx.clone(),
                    customer_access_token: access_token.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        Ok(data.customer)
    }

    /// Update profile fields. Returns the rotated access token when the
    /// password changed.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] for invalid input, or an error if
    /// the API request fails.
    #[instrument(skip(self, access_token, input))]
    pub async fn customer_update(
        &self,
        access_token: &str,
        input: CustomerUpdateInput,
    ) -> Result<Option<CustomerAccessToken>, ShopifyError> {
        let data = self
            .execute::<CustomerUpdate>(
                CustomerUpdateVariables {
                    customer_access_token: access_token.to_string(),
                    customer: input,
                },
                CachePolicy::NoStore,
            )
            .await?;
        let payload = mutation_result(data.result, |p| p.user_errors.as_slice(), "customerUpdate")?;
        Ok(payload.customer_access_token)
    }

    /// An order by global id (including its `?key=` query).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the order does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn customer_order(
        &self,
        order_id: &ShopifyGid,
        ctx: &InContext,
    ) -> Result<Order, ShopifyError> {
        debug_assert_eq!(order_id.resource(), ResourceType::Order);
        let data = self
            .execute::<CustomerOrder>(
                CustomerOrderVariables {
                    ctx: ctx.clone(),
                    order_id: order_id.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        data.node
            .ok_or_else(|| ShopifyError::NotFound(format!("Order not found: {order_id}")))
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Create an address; returns its global id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] for invalid input, or an error if
    /// the API request fails.
    #[instrument(skip(self, access_token, address))]
    pub async fn customer_address_create(
        &self,
        access_token: &str,
        address: MailingAddressInput,
    ) -> Result<String, ShopifyError> {
        let data = self
            .execute::<CustomerAddressCreate>(
                CustomerAddressCreateVariables {
                    customer_access_token: access_token.to_string(),
                    address,
                },
                CachePolicy::NoStore,
            )
            .await?;
        let payload = mutation_result(data.result, |p| p.user_errors.as_slice(), "customerAddressCreate")?;
        payload
            .customer_address
            .map(|a| a.id)
            .ok_or_else(|| ShopifyError::message("customerAddressCreate returned no address"))
    }

    /// Replace an address.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserError`] for invalid input, or an error if
    /// the API request fails.
    #[instrument(skip(self, access_token, address))]
    pub async fn customer_address_update(
        &self,
        access_token: &str,
        address_id: &str,
        address: MailingAddressInput,
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerAddressUpdate>(
                CustomerAddressUpdateVariables {
                    customer_access_token: access_token.to_string(),
                    id: address_id.to_string(),
                    address,
                },
                CachePolicy::NoStore,
            )
            .await?;
        mutation_result(data.result, |p| p.user_errors.as_slice(), "customerAddressUpdate")?;
        Ok(())
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or user errors are returned.
    #[instrument(skip(self, access_token))]
    pub async fn customer_address_delete(
        &self,
        access_token: &str,
        address_id: &str,
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerAddressDelete>(
                CustomerAddressDeleteVariables {
                    customer_access_token: access_token.to_string(),
                    id: address_id.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        mutation_result(data.result, |p| p.user_errors.as_slice(), "customerAddressDelete")?;
        Ok(())
    }

    /// Make an address the customer's default.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or user errors are returned.
    #[instrument(skip(self, access_token))]
    pub async fn customer_default_address_update(
        &self,
        access_token: &str,
        address_id: &str,
    ) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerDefaultAddressUpdate>(
                CustomerDefaultAddressUpdateVariables {
                    customer_access_token: access_token.to_string(),
                    address_id: address_id.to_string(),
                },
                CachePolicy::NoStore,
            )
            .await?;
        mutation_result(data.result, |p| p.user_errors.as_slice(), "customerDefaultAddressUpdate")?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_token_missing() {
        let err = expect_token(CustomerPayload::default(), "customerReset").unwrap_err();
        assert!(err.to_string().contains("customerReset returned no access token"));
    }
}
