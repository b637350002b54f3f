//! Reviews resource gateway.

use reqwest::Method;
use tracing::instrument;

use saffron_core::ProductId;

use super::types::Review;
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// List reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(product_id = %product_id))]
    pub async fn reviews_list(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
    ) -> Result<ApiOk<Vec<Review>>, CommerceError> {
        let path = format!(
            "/products/{}/reviews",
            urlencoding::encode(product_id.as_str())
        );
        self.send(Method::GET, &path, auth, None).await
    }

    /// Submit a review for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth, comment), fields(product_id = %product_id, rating))]
    pub async fn review_submit(
        &self,
        auth: Option<&str>,
        product_id: &ProductId,
        rating: u8,
        comment: &str,
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!(
            "/products/{}/reviews",
            urlencoding::encode(product_id.as_str())
        );
        self.send_expect_message(
            Method::POST,
            &path,
            auth,
            Some(serde_json::json!({
                "rating": rating,
                "comment": comment,
            })),
        )
        .await
    }
}
