//! Account route handlers: profile read and update.
//!
//! These routes require authentication.

use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::ShippingAddressForm;
use crate::commerce::types::{ProfileUpdate, ShippingAddress, UserProfile};
use crate::middleware::RequireAuth;
use crate::models::{CurrentShopper, session_keys};
use crate::state::AppState;

use super::Notify;

/// Profile display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub shopping_address: Option<ShippingAddress>,
}

impl From<UserProfile> for ProfileView {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            shopping_address: profile.shopping_address,
        }
    }
}

/// Profile update body; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub shopping_address: Option<ShippingAddressForm>,
}

/// Profile page data.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> axum::Json<Notify<ProfileView>> {
    match state.commerce().profile_get(auth.bearer()).await {
        Ok(ok) => Notify::data(ProfileView::from(ok.data)),
        Err(e) => {
            tracing::error!("Failed to fetch profile: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Update the profile. An included shipping address is validated whole, the
/// same rule checkout applies.
#[instrument(skip(state, session, auth, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(form): Json<ProfileForm>,
) -> axum::Json<Notify<ProfileView>> {
    let shopping_address = match &form.shopping_address {
        Some(address_form) => match address_form.validate() {
            Ok(address) => Some(address),
            Err(errors) => {
                return Notify::invalid("Please fill in all shipping address fields.", errors);
            }
        },
        None => None,
    };

    let update = ProfileUpdate {
        name: form.name.clone(),
        phone: form.phone.clone(),
        shopping_address,
    };

    match state.commerce().profile_update(auth.bearer(), &update).await {
        Ok(ok) => {
            // Keep the session identity in step with the profile.
            let shopper = CurrentShopper {
                id: ok.data.id.clone(),
                name: ok.data.name.clone(),
                email: ok.data.email.clone(),
            };
            if let Err(e) = session.insert(session_keys::CURRENT_SHOPPER, &shopper).await {
                tracing::error!("Failed to refresh session shopper: {e}");
            }

            let message = ok.notification("Profile updated.");
            Notify::ok(message, ProfileView::from(ok.data))
        }
        Err(e) => {
            tracing::error!("Failed to update profile: {e}");
            Notify::fail(e.notification())
        }
    }
}
