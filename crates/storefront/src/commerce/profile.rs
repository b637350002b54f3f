//! Profile resource gateway.
//!
//! Checkout writes the shipping address here before creating an order, so
//! the profile carries whatever address the shopper last checked out with.

use reqwest::Method;
use tracing::instrument;

use super::types::{ProfileUpdate, UserProfile};
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// Fetch the shopper's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn profile_get(&self, auth: Option<&str>) -> Result<ApiOk<UserProfile>, CommerceError> {
        self.send(Method::GET, "/profile", auth, None).await
    }

    /// Update profile fields; unset fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth, update))]
    pub async fn profile_update(
        &self,
        auth: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<ApiOk<UserProfile>, CommerceError> {
        self.send(
            Method::PUT,
            "/profile",
            auth,
            Some(serde_json::to_value(update)?),
        )
        .await
    }
}
