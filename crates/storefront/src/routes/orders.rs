//! Order history and lifecycle action handlers.
//!
//! The last-fetched order list rides in the session; lifecycle actions
//! validate against it client-side (zero mutation calls on violation),
//! trigger the server transition, and on success update the local copy
//! optimistically instead of refetching.

use axum::extract::{Json, Path, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use saffron_core::{OrderId, OrderStatus, ProductId};

use crate::checkout::FieldError;
use crate::commerce::CommerceError;
use crate::commerce::conversions::{OrderView, convert_order, convert_orders};
use crate::commerce::types::{ReturnLine, TrackingInfo};
use crate::middleware::{AuthContext, RequireAuth};
use crate::models::session_keys;
use crate::state::AppState;

use super::Notify;

const TRACKING_UNAVAILABLE: &str = "Tracking is not yet available for this order.";

/// One requested line of a return/exchange.
#[derive(Debug, Deserialize)]
pub struct ReturnLineForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Return/exchange request body.
#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub products: Vec<ReturnLineForm>,
}

/// Validate a return/exchange against the order's original lines.
///
/// Rules: reason non-empty, at least one line, every requested quantity in
/// `1..=original`. Violations are rejected here, before any network call.
fn validate_return_request(
    order: &OrderView,
    form: &ReturnForm,
) -> Result<Vec<ReturnLine>, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.reason.trim().is_empty() {
        errors.push(FieldError {
            field: "reason",
            message: "reason is required".to_string(),
        });
    }
    if form.products.is_empty() {
        errors.push(FieldError {
            field: "products",
            message: "select at least one product".to_string(),
        });
    }

    let mut lines = Vec::new();
    for line in &form.products {
        match order.ordered_quantity(&line.product_id) {
            None => errors.push(FieldError {
                field: "products",
                message: format!("product {} is not part of this order", line.product_id),
            }),
            Some(ordered) if line.quantity < 1 || line.quantity > ordered => {
                errors.push(FieldError {
                    field: "products",
                    message: format!(
                        "quantity for {} must be between 1 and {ordered}",
                        line.product_id
                    ),
                });
            }
            Some(_) => lines.push(ReturnLine {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            }),
        }
    }

    if errors.is_empty() { Ok(lines) } else { Err(errors) }
}

// =============================================================================
// Session-held order list
// =============================================================================

async fn load_orders(session: &Session) -> Vec<OrderView> {
    session
        .get::<Vec<OrderView>>(session_keys::ORDERS_VIEW)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn save_orders(session: &Session, orders: &[OrderView]) {
    if let Err(e) = session.insert(session_keys::ORDERS_VIEW, orders).await {
        tracing::error!("Failed to save order list to session: {e}");
    }
}

/// The order as currently shown: the session copy when present, fetched
/// (and remembered) otherwise.
async fn local_order(
    state: &AppState,
    session: &Session,
    auth: &AuthContext,
    id: &OrderId,
) -> Result<OrderView, CommerceError> {
    let mut orders = load_orders(session).await;
    if let Some(order) = orders.iter().find(|o| &o.id == id) {
        return Ok(order.clone());
    }

    let view = convert_order(state.commerce().order_get(auth.bearer(), id).await?.data);
    orders.push(view.clone());
    save_orders(session, &orders).await;
    Ok(view)
}

/// Write one order's new status back into the session copy.
async fn apply_local_status(session: &Session, id: &OrderId, status: OrderStatus) {
    let mut orders = load_orders(session).await;
    if let Some(order) = orders.iter_mut().find(|o| &o.id == id) {
        order.apply_status(status);
        save_orders(session, &orders).await;
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Open orders.
#[instrument(skip(state, session, auth))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> axum::Json<Notify<Vec<OrderView>>> {
    match state.commerce().orders_mine(auth.bearer()).await {
        Ok(ok) => {
            let orders = convert_orders(ok.data);
            save_orders(&session, &orders).await;
            Notify::data(orders)
        }
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Full order history.
#[instrument(skip(state, session, auth))]
pub async fn history(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> axum::Json<Notify<Vec<OrderView>>> {
    match state.commerce().orders_history(auth.bearer()).await {
        Ok(ok) => {
            let orders = convert_orders(ok.data);
            save_orders(&session, &orders).await;
            Notify::data(orders)
        }
        Err(e) => {
            tracing::error!("Failed to fetch order history: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Order detail.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
) -> axum::Json<Notify<OrderView>> {
    match local_order(&state, &session, &auth, &id).await {
        Ok(order) => Notify::data(order),
        Err(e) => {
            tracing::error!("Failed to fetch order {id}: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Order confirmation view, keyed by the new order id.
#[instrument(skip(state, auth))]
pub async fn confirmation(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
) -> axum::Json<Notify<OrderView>> {
    match state.commerce().order_get(auth.bearer(), &id).await {
        Ok(ok) => Notify::data(convert_order(ok.data)),
        Err(e) => {
            tracing::error!("Failed to fetch order confirmation {id}: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Cancel an order. Offered only while the status is Pending or Confirmed;
/// once it leaves those states the action simply is not there to repeat.
#[instrument(skip(state, session, auth))]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
) -> axum::Json<Notify<OrderView>> {
    let order = match local_order(&state, &session, &auth, &id).await {
        Ok(order) => order,
        Err(e) => return Notify::fail(e.notification()),
    };

    if !order.can_cancel {
        return Notify::fail("This order can no longer be cancelled.");
    }

    match state.commerce().order_cancel(auth.bearer(), &id).await {
        Ok(ok) => {
            apply_local_status(&session, &id, OrderStatus::after_cancel()).await;
            let mut updated = order;
            updated.apply_status(OrderStatus::after_cancel());
            Notify::ok(ok.notification("Order cancelled."), updated)
        }
        Err(e) => {
            tracing::error!("Failed to cancel order {id}: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Request a return for a delivered order.
#[instrument(skip(state, session, auth, form))]
pub async fn request_return(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
    Json(form): Json<ReturnForm>,
) -> axum::Json<Notify<OrderView>> {
    submit_return_or_exchange(&state, &session, &auth, &id, &form, ReturnAction::Return).await
}

/// Request an exchange for a delivered order.
#[instrument(skip(state, session, auth, form))]
pub async fn request_exchange(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
    Json(form): Json<ReturnForm>,
) -> axum::Json<Notify<OrderView>> {
    submit_return_or_exchange(&state, &session, &auth, &id, &form, ReturnAction::Exchange).await
}

#[derive(Clone, Copy)]
enum ReturnAction {
    Return,
    Exchange,
}

async fn submit_return_or_exchange(
    state: &AppState,
    session: &Session,
    auth: &AuthContext,
    id: &OrderId,
    form: &ReturnForm,
    action: ReturnAction,
) -> axum::Json<Notify<OrderView>> {
    let order = match local_order(state, session, auth, id).await {
        Ok(order) => order,
        Err(e) => return Notify::fail(e.notification()),
    };

    if !order.can_return_or_exchange {
        return Notify::fail("Only delivered orders can be returned or exchanged.");
    }

    let lines = match validate_return_request(&order, form) {
        Ok(lines) => lines,
        Err(errors) => return Notify::invalid("Please check your request.", errors),
    };

    let reason = form.reason.trim();
    let (result, new_status, default_message) = match action {
        ReturnAction::Return => (
            state
                .commerce()
                .order_return(auth.bearer(), id, reason, &lines)
                .await,
            OrderStatus::after_return(),
            "Return requested.",
        ),
        ReturnAction::Exchange => (
            state
                .commerce()
                .order_exchange(auth.bearer(), id, reason, &lines)
                .await,
            OrderStatus::after_exchange(),
            "Exchange requested.",
        ),
    };

    match result {
        Ok(ok) => {
            apply_local_status(session, id, new_status.clone()).await;
            let mut updated = order;
            updated.apply_status(new_status);
            Notify::ok(ok.notification(default_message), updated)
        }
        Err(e) => {
            tracing::error!("Return/exchange failed for order {id}: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Carrier tracking. A failed or empty response means "not yet available",
/// never an alarm.
#[instrument(skip(state, auth))]
pub async fn track(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
) -> axum::Json<Notify<TrackingInfo>> {
    match state.commerce().order_track(auth.bearer(), &id).await {
        Ok(Some(tracking)) => Notify::data(tracking),
        Ok(None) => Notify::message(TRACKING_UNAVAILABLE),
        Err(e) => {
            tracing::debug!("Tracking fetch failed for order {id}: {e}");
            Notify::message(TRACKING_UNAVAILABLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commerce::types::{Order, OrderLine, ShippingAddress, UserDetails};
    use saffron_core::PaymentMethod;

    fn delivered_order() -> OrderView {
        convert_order(Order {
            id: OrderId::new("o1"),
            products: vec![OrderLine {
                product_id: ProductId::new("p1"),
                name: Some("Masala Chai".to_string()),
                image: None,
                quantity: 3,
                price: Some("100.00".to_string()),
                discount: None,
                tax: None,
            }],
            shipping_address: ShippingAddress::default(),
            user_details: UserDetails::default(),
            payment_method: PaymentMethod::CashOnDelivery,
            order_status: OrderStatus::Delivered,
            shipping_status: saffron_core::ShippingStatus::Delivered,
            total: None,
            razorpay_order_id: None,
            created_at: None,
        })
    }

    fn form(reason: &str, quantity: u32) -> ReturnForm {
        ReturnForm {
            reason: reason.to_string(),
            products: vec![ReturnLineForm {
                product_id: ProductId::new("p1"),
                quantity,
            }],
        }
    }

    #[test]
    fn test_valid_return_request() {
        let lines = validate_return_request(&delivered_order(), &form("damaged in transit", 2))
            .expect("valid request");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().expect("line").quantity, 2);
    }

    #[test]
    fn test_quantity_above_ordered_rejected() {
        // Ordered 3, requesting 5.
        let errors = validate_return_request(&delivered_order(), &form("damaged", 5))
            .expect_err("over-quantity must be rejected");
        assert!(errors.iter().any(|e| e.field == "products"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let errors = validate_return_request(&delivered_order(), &form("damaged", 0))
            .expect_err("zero quantity must be rejected");
        assert!(errors.iter().any(|e| e.field == "products"));
    }

    #[test]
    fn test_full_quantity_allowed() {
        assert!(validate_return_request(&delivered_order(), &form("damaged", 3)).is_ok());
    }

    #[test]
    fn test_blank_reason_rejected() {
        let errors = validate_return_request(&delivered_order(), &form("   ", 1))
            .expect_err("blank reason must be rejected");
        assert!(errors.iter().any(|e| e.field == "reason"));
    }

    #[test]
    fn test_no_lines_rejected() {
        let empty = ReturnForm {
            reason: "damaged".to_string(),
            products: Vec::new(),
        };
        let errors = validate_return_request(&delivered_order(), &empty)
            .expect_err("empty line list must be rejected");
        assert!(errors.iter().any(|e| e.field == "products"));
    }

    #[test]
    fn test_unknown_product_rejected() {
        let unknown = ReturnForm {
            reason: "damaged".to_string(),
            products: vec![ReturnLineForm {
                product_id: ProductId::new("p9"),
                quantity: 1,
            }],
        };
        let errors = validate_return_request(&delivered_order(), &unknown)
            .expect_err("unknown product must be rejected");
        assert!(errors.iter().any(|e| e.field == "products"));
    }
}
