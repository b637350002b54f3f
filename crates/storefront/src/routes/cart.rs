//! Cart route handlers.
//!
//! Every mutation follows the mirror discipline: mark the toggle in flight,
//! call the gateway, and only commit the local flag once the server
//! confirms. A failure aborts the toggle and the flag stays where it was.

use axum::extract::{Json, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use saffron_core::{ProductId, VariantId};

use crate::commerce::conversions::{CartSummaryView, convert_cart};
use crate::error::add_breadcrumb;
use crate::middleware::RequireAuth;
use crate::mirror::ToggleKind;
use crate::state::AppState;

use super::{Notify, load_mirror, save_mirror};

/// Default toasts when the server sends no message of its own.
const ADDED_TO_CART: &str = "Added to cart.";
const CART_UPDATED: &str = "Cart updated.";
const REMOVED_FROM_CART: &str = "Removed from cart.";

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: Option<u32>,
}

/// Quantity-update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub variant_id: VariantId,
}

/// Cart contents. Also reconciles the mirror's cart flags from the fresh
/// server list, which is the only place stale flags get cleaned up.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> axum::Json<Notify<CartSummaryView>> {
    match state.commerce().cart_list(auth.bearer()).await {
        Ok(ok) => {
            let mut mirror = load_mirror(&session).await;
            let members: Vec<ProductId> =
                ok.data.iter().map(|entry| entry.product.id.clone()).collect();
            mirror.apply_cart(&members);
            save_mirror(&session, &mirror).await;

            Notify::data(convert_cart(ok.data, chrono::Utc::now()))
        }
        Err(e) => {
            tracing::error!("Failed to fetch cart: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Add a variant to the cart.
#[instrument(skip(state, session, auth, request))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<AddToCartRequest>,
) -> axum::Json<Notify<serde_json::Value>> {
    let quantity = request.quantity.unwrap_or(1).max(1);

    let mut mirror = load_mirror(&session).await;
    if let Err(e) = mirror.begin_toggle(&request.product_id, ToggleKind::Cart) {
        return Notify::fail(e.to_string());
    }
    save_mirror(&session, &mirror).await;

    add_breadcrumb(
        "cart",
        "Adding item to cart",
        Some(&[("product_id", request.product_id.as_str())]),
    );

    let result = state
        .commerce()
        .cart_add(auth.bearer(), &request.product_id, &request.variant_id, quantity)
        .await;

    match result {
        Ok(ok) => {
            mirror.commit(&request.product_id, ToggleKind::Cart, true);
            save_mirror(&session, &mirror).await;
            Notify::message(ok.notification(ADDED_TO_CART))
        }
        Err(e) => {
            mirror.abort(&request.product_id, ToggleKind::Cart);
            save_mirror(&session, &mirror).await;
            tracing::error!("Failed to add item to cart: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Set a cart line's quantity.
///
/// Quantity 0 (a decrement below 1) is a no-op, not a removal: nothing is
/// sent to the server and the cart is returned unchanged.
#[instrument(skip(state, session, auth, request))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<UpdateCartRequest>,
) -> axum::Json<Notify<serde_json::Value>> {
    if request.quantity < 1 {
        return Notify::message("Quantity stays at 1; remove the item instead.");
    }

    let mut mirror = load_mirror(&session).await;
    if let Err(e) = mirror.begin_toggle(&request.product_id, ToggleKind::Cart) {
        return Notify::fail(e.to_string());
    }
    save_mirror(&session, &mirror).await;

    let result = state
        .commerce()
        .cart_update(
            auth.bearer(),
            &request.product_id,
            &request.variant_id,
            request.quantity,
        )
        .await;

    match result {
        Ok(ok) => {
            // Still in the cart; the quantity changed, not the membership.
            mirror.commit(&request.product_id, ToggleKind::Cart, true);
            save_mirror(&session, &mirror).await;
            Notify::message(ok.notification(CART_UPDATED))
        }
        Err(e) => {
            mirror.abort(&request.product_id, ToggleKind::Cart);
            save_mirror(&session, &mirror).await;
            tracing::error!("Failed to update cart: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Remove a cart line.
#[instrument(skip(state, session, auth, request))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<RemoveFromCartRequest>,
) -> axum::Json<Notify<serde_json::Value>> {
    let mut mirror = load_mirror(&session).await;
    if let Err(e) = mirror.begin_toggle(&request.product_id, ToggleKind::Cart) {
        return Notify::fail(e.to_string());
    }
    save_mirror(&session, &mirror).await;

    let result = state
        .commerce()
        .cart_remove(auth.bearer(), &request.product_id, &request.variant_id)
        .await;

    match result {
        Ok(ok) => {
            mirror.commit(&request.product_id, ToggleKind::Cart, false);
            save_mirror(&session, &mirror).await;
            Notify::message(ok.notification(REMOVED_FROM_CART))
        }
        Err(e) => {
            mirror.abort(&request.product_id, ToggleKind::Cart);
            save_mirror(&session, &mirror).await;
            tracing::error!("Failed to remove from cart: {e}");
            Notify::fail(e.notification())
        }
    }
}
