//! Checkout route handlers.
//!
//! `POST /checkout` runs the strict orchestration sequence; a per-session
//! in-flight marker rejects a second submit while one is running. The two
//! Razorpay callbacks are separate endpoints so widget failure and
//! verification failure surface as distinct notifications.

use axum::extract::{Json, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use saffron_core::PaymentMethod;

use crate::checkout::{
    self, CheckoutError, CheckoutOutcome, CheckoutSummary, PaymentCallback, ShippingAddressForm,
};
use crate::error::add_breadcrumb;
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::state::AppState;

use super::Notify;

/// Checkout submission body: the address fields plus the payment method.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(flatten)]
    pub shipping: ShippingAddressForm,
    pub payment_method: PaymentMethod,
}

/// Widget failure callback body; whatever the gateway reported is logged,
/// never shown verbatim to the shopper.
#[derive(Debug, Deserialize)]
pub struct PaymentFailure {
    #[serde(default)]
    pub reason: Option<String>,
}

async fn checkout_in_flight(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::CHECKOUT_IN_FLIGHT)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

async fn set_checkout_in_flight(session: &Session, value: bool) {
    if let Err(e) = session.insert(session_keys::CHECKOUT_IN_FLIGHT, value).await {
        tracing::error!("Failed to update checkout in-flight marker: {e}");
    }
}

/// Checkout page data: profile-prefilled address plus fresh cart rows.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> axum::Json<Notify<CheckoutSummary>> {
    match checkout::summary(state.commerce(), auth.bearer()).await {
        Ok(summary) => Notify::data(summary),
        Err(e) => {
            tracing::error!("Failed to load checkout: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Place the order.
#[instrument(skip(state, session, auth, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(form): Json<CheckoutForm>,
) -> axum::Json<Notify<CheckoutOutcome>> {
    if checkout_in_flight(&session).await {
        return Notify::fail("Your order is already being placed.");
    }
    set_checkout_in_flight(&session, true).await;

    add_breadcrumb(
        "checkout",
        "Checkout submitted",
        Some(&[("payment_method", &form.payment_method.to_string())]),
    );

    let result = checkout::submit(
        state.commerce(),
        auth.bearer(),
        &form.shipping,
        form.payment_method,
        &state.config().razorpay.key_id,
    )
    .await;

    // Submit becomes available again whatever happened; there is no retry
    // loop to protect here.
    set_checkout_in_flight(&session, false).await;

    match result {
        Ok(outcome) => {
            let message = match &outcome {
                CheckoutOutcome::Confirmed { .. } => "Order placed successfully.",
                CheckoutOutcome::AwaitingPayment(_) => "Order created; complete the payment.",
            };
            Notify::ok(message, outcome)
        }
        Err(CheckoutError::Validation(errors)) => Notify::invalid(
            CheckoutError::Validation(errors.clone()).notification(),
            errors,
        ),
        Err(e) => {
            tracing::error!("Checkout failed: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Razorpay widget success callback: verify, then confirm.
#[instrument(skip(state, auth, callback))]
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(callback): Json<PaymentCallback>,
) -> axum::Json<Notify<serde_json::Value>> {
    match checkout::verify_payment(state.commerce(), auth.bearer(), &callback).await {
        Ok(redirect) => Notify::ok(
            "Payment verified. Your order is confirmed.",
            serde_json::json!({ "redirect": redirect }),
        ),
        Err(e) => {
            tracing::error!("Payment verification failed: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Razorpay widget failure callback.
///
/// Distinct from verification failure: the widget never handed us a
/// payment, so there is nothing to verify. The order stays in whatever
/// state the server assigned; no retry, no rollback.
#[instrument(skip(failure))]
pub async fn payment_failed(
    Json(failure): Json<PaymentFailure>,
) -> axum::Json<Notify<serde_json::Value>> {
    tracing::warn!(
        reason = failure.reason.as_deref().unwrap_or("unspecified"),
        "Payment widget reported failure"
    );
    Notify::fail("Payment was not completed. Your order has not been confirmed.")
}
