//! Payments resource gateway.
//!
//! Signature verification lives server-side at the commerce API; this
//! gateway only forwards what the Razorpay widget handed back.

use reqwest::Method;
use tracing::instrument;

use super::types::VerifyPaymentRequest;
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// Verify a gateway payment against the order it belongs to.
    ///
    /// Only a success here confirms the order; on failure the order stays
    /// in whatever state the server assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or verification is rejected.
    #[instrument(skip(self, auth, request), fields(order_id = %request.order_id))]
    pub async fn payment_verify(
        &self,
        auth: Option<&str>,
        request: &VerifyPaymentRequest,
    ) -> Result<ApiOk<()>, CommerceError> {
        self.send_expect_message(
            Method::POST,
            "/payments/verify",
            auth,
            Some(serde_json::to_value(request)?),
        )
        .await
    }
}
