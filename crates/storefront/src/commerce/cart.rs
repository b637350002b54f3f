//! Cart resource gateway.
//!
//! The server owns the cart; these calls mutate it and the membership
//! mirror reconciles afterwards. Quantity semantics (minimum 1, decrement
//! below 1 is a no-op) are enforced upstream, never here.

use reqwest::Method;
use tracing::instrument;

use saffron_core::{ProductId, VariantId};

use super::types::CartEntry;
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// Add a variant to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(product_id = %product_id, variant_id = %variant_id))]
    pub async fn cart_add(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<ApiOk<()>, CommerceError> {
        self.send_expect_message(
            Method::POST,
            "/cart",
            auth,
            Some(serde_json::json!({
                "productId": product_id,
                "variantId": variant_id,
                "quantity": quantity,
            })),
        )
        .await
    }

    /// Fetch the full cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn cart_list(&self, auth: Option<&str>) -> Result<ApiOk<Vec<CartEntry>>, CommerceError> {
        self.send(Method::GET, "/cart", auth, None).await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(product_id = %product_id, variant_id = %variant_id))]
    pub async fn cart_update(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<ApiOk<()>, CommerceError> {
        self.send_expect_message(
            Method::PATCH,
            "/cart",
            auth,
            Some(serde_json::json!({
                "productId": product_id,
                "variantId": variant_id,
                "quantity": quantity,
            })),
        )
        .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(product_id = %product_id, variant_id = %variant_id))]
    pub async fn cart_remove(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
        variant_id: &VariantId,
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!(
            "/cart/{}/{}",
            urlencoding::encode(product_id.as_str()),
            urlencoding::encode(variant_id.as_str())
        );
        self.send_expect_message(Method::DELETE, &path, auth, None)
            .await
    }
}
