//! Wishlist route handlers.
//!
//! Same mirror discipline as the cart, with one extra rule: when a remove
//! fails, the wishlist is refetched and the mirror reconciled from server
//! truth - the item's absence (or presence) is reflected only via that
//! refetch, never by blind local removal.

use axum::extract::{Json, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use saffron_core::ProductId;

use crate::commerce::conversions::{ProductView, convert_product};
use crate::middleware::RequireAuth;
use crate::mirror::{MembershipMirror, ToggleKind};
use crate::state::AppState;

use super::{Notify, load_mirror, save_mirror};

const ADDED_TO_WISHLIST: &str = "Added to wishlist.";
const REMOVED_FROM_WISHLIST: &str = "Removed from wishlist.";

/// Wishlist toggle request body.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

/// Wishlist contents. Reconciles the mirror's wishlist flags from the fresh
/// server list.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> axum::Json<Notify<Vec<ProductView>>> {
    match state.commerce().wishlist_list(auth.bearer()).await {
        Ok(ok) => {
            let mut mirror = load_mirror(&session).await;
            let members: Vec<ProductId> =
                ok.data.iter().map(|entry| entry.product.id.clone()).collect();
            mirror.apply_wishlist(&members);
            save_mirror(&session, &mirror).await;

            let now = chrono::Utc::now();
            let views = ok
                .data
                .into_iter()
                .map(|entry| {
                    let mut view = convert_product(entry.product, now);
                    (view.in_cart, view.in_wishlist) = mirror.membership(&view.id);
                    view
                })
                .collect();
            Notify::data(views)
        }
        Err(e) => {
            tracing::error!("Failed to fetch wishlist: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Add a product to the wishlist.
#[instrument(skip(state, session, auth, request))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<WishlistRequest>,
) -> axum::Json<Notify<serde_json::Value>> {
    let mut mirror = load_mirror(&session).await;
    if let Err(e) = mirror.begin_toggle(&request.product_id, ToggleKind::Wishlist) {
        return Notify::fail(e.to_string());
    }
    save_mirror(&session, &mirror).await;

    let result = state
        .commerce()
        .wishlist_add(auth.bearer(), &request.product_id)
        .await;

    match result {
        Ok(ok) => {
            mirror.commit(&request.product_id, ToggleKind::Wishlist, true);
            save_mirror(&session, &mirror).await;
            Notify::message(ok.notification(ADDED_TO_WISHLIST))
        }
        Err(e) => {
            mirror.abort(&request.product_id, ToggleKind::Wishlist);
            save_mirror(&session, &mirror).await;
            tracing::error!("Failed to add to wishlist: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Remove a product from the wishlist.
#[instrument(skip(state, session, auth, request))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<WishlistRequest>,
) -> axum::Json<Notify<serde_json::Value>> {
    let mut mirror = load_mirror(&session).await;
    if let Err(e) = mirror.begin_toggle(&request.product_id, ToggleKind::Wishlist) {
        return Notify::fail(e.to_string());
    }
    save_mirror(&session, &mirror).await;

    let result = state
        .commerce()
        .wishlist_remove(auth.bearer(), &request.product_id)
        .await;

    match result {
        Ok(ok) => {
            mirror.commit(&request.product_id, ToggleKind::Wishlist, false);
            save_mirror(&session, &mirror).await;
            Notify::message(ok.notification(REMOVED_FROM_WISHLIST))
        }
        Err(e) => {
            mirror.abort(&request.product_id, ToggleKind::Wishlist);
            // The server rejected the removal (the item may already be gone
            // there). Refetch and reconcile rather than guessing locally.
            refetch_and_reconcile(&state, auth.bearer(), &mut mirror).await;
            save_mirror(&session, &mirror).await;
            tracing::error!("Failed to remove from wishlist: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Best-effort wishlist refetch; on a second failure the mirror is left at
/// its pre-toggle state, which is still consistent with the rules.
async fn refetch_and_reconcile(
    state: &AppState,
    auth: Option<&str>,
    mirror: &mut MembershipMirror,
) {
    match state.commerce().wishlist_list(auth).await {
        Ok(ok) => {
            let members: Vec<ProductId> =
                ok.data.iter().map(|entry| entry.product.id.clone()).collect();
            mirror.apply_wishlist(&members);
        }
        Err(e) => {
            tracing::warn!("Wishlist refetch after failed remove also failed: {e}");
        }
    }
}
