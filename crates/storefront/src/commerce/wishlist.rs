//! Wishlist resource gateway.

use reqwest::Method;
use tracing::instrument;

use saffron_core::ProductId;

use super::types::WishlistEntry;
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// Add a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(product_id = %product_id))]
    pub async fn wishlist_add(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!("/wishlist/{}", urlencoding::encode(product_id.as_str()));
        self.send_expect_message(Method::POST, &path, auth, None)
            .await
    }

    /// Fetch the full wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn wishlist_list(
        &self,
        auth: Option<&str>,
    ) -> Result<ApiOk<Vec<WishlistEntry>>, CommerceError> {
        self.send(Method::GET, "/wishlist", auth, None).await
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(product_id = %product_id))]
    pub async fn wishlist_remove(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!("/wishlist/{}", urlencoding::encode(product_id.as_str()));
        self.send_expect_message(Method::DELETE, &path, auth, None)
            .await
    }
}
