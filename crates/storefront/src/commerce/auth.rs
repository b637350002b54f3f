//! Auth resource gateway.
//!
//! Login and registration exchange credentials for a bearer token; the
//! session layer owns the token from then on. These are the only calls
//! that never attach one.

use reqwest::Method;
use tracing::instrument;

use super::types::AuthSession;
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn auth_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiOk<AuthSession>, CommerceError> {
        self.send(
            Method::POST,
            "/auth/login",
            None,
            Some(serde_json::json!({
                "email": email,
                "password": password,
            })),
        )
        .await
    }

    /// Register a new account and receive a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn auth_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<ApiOk<AuthSession>, CommerceError> {
        self.send(
            Method::POST,
            "/auth/register",
            None,
            Some(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            })),
        )
        .await
    }
}
