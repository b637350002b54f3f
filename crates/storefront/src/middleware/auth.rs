//! Authentication extractors.
//!
//! The commerce API issues a bearer token at login; the session owns it from
//! then on. These extractors read it back out for gateway calls. A missing
//! token is not a blocking precondition for read endpoints (`OptionalAuth`);
//! protected endpoints use `RequireAuth` and answer 401 themselves rather
//! than waiting for the server-side 401.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentShopper, session_keys};

/// The authenticated shopper plus the bearer token gateway calls attach.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub shopper: CurrentShopper,
    pub token: String,
}

impl AuthContext {
    /// The token in the `Option<&str>` shape gateways take.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        Some(self.token.as_str())
    }
}

/// Extractor that requires a logged-in shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(auth): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.shopper.name)
/// }
/// ```
pub struct RequireAuth(pub AuthContext);

/// Error returned when authentication is required but absent.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "success": false,
                "message": "Please sign in to continue.",
            })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let shopper: CurrentShopper = session
            .get(session_keys::CURRENT_SHOPPER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        let token: String = session
            .get(session_keys::AUTH_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(AuthContext { shopper, token }))
    }
}

/// Extractor that optionally gets the current shopper.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in - catalog reads work anonymously.
pub struct OptionalAuth(pub Option<AuthContext>);

impl OptionalAuth {
    /// The token in the `Option<&str>` shape gateways take.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.0.as_ref().map(|auth| auth.token.as_str())
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        let shopper = session
            .get::<CurrentShopper>(session_keys::CURRENT_SHOPPER)
            .await
            .ok()
            .flatten();
        let token = session
            .get::<String>(session_keys::AUTH_TOKEN)
            .await
            .ok()
            .flatten();

        Ok(Self(match (shopper, token) {
            (Some(shopper), Some(token)) => Some(AuthContext { shopper, token }),
            _ => None,
        }))
    }
}

/// Helper to store the shopper and token in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_shopper(
    session: &Session,
    shopper: &CurrentShopper,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_SHOPPER, shopper)
        .await?;
    session.insert(session_keys::AUTH_TOKEN, token).await
}

/// Helper to clear the shopper, token, and everything derived from them
/// (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_shopper(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
