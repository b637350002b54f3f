//! Checkout orchestration.
//!
//! The flow is a strict sequence: profile fetch, fresh cart fetch, local
//! validation, unconditional address write-back, order creation, then the
//! payment branch. Validation failures abort before the first network call;
//! a network failure aborts at its step and nothing earlier is rolled back
//! (a profile update that already landed stays landed).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use saffron_core::{OrderId, PaymentMethod};

use crate::commerce::conversions::{CartSummaryView, convert_cart};
use crate::commerce::types::{
    CreateOrderLine, CreateOrderRequest, ProfileUpdate, ShippingAddress, UserDetails,
    VerifyPaymentRequest,
};
use crate::commerce::{CommerceClient, CommerceError};

/// Raw shipping-address fields as submitted; may be empty until validated.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShippingAddressForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

impl ShippingAddressForm {
    /// Pre-populate from the profile's saved address, when there is one.
    #[must_use]
    pub fn from_saved(saved: Option<&ShippingAddress>) -> Self {
        saved.map_or_else(Self::default, |a| Self {
            name: a.name.clone(),
            address: a.address.clone(),
            phone: a.phone.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            pincode: a.pincode.clone(),
        })
    }

    /// Validate that every field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per missing field, for inline display.
    pub fn validate(&self) -> Result<ShippingAddress, Vec<FieldError>> {
        let mut errors = Vec::new();
        let fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("phone", &self.phone),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                errors.push(FieldError::required(field));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ShippingAddress {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
        })
    }
}

/// An inline, field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} is required"),
        }
    }
}

/// The step at which a checkout attempt failed, for the notification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    ProfileFetch,
    CartFetch,
    ProfileSave,
    OrderCreate,
    Verify,
}

impl CheckoutStep {
    const fn describe(self) -> &'static str {
        match self {
            Self::ProfileFetch => "loading your profile",
            Self::CartFetch => "loading your cart",
            Self::ProfileSave => "saving your address",
            Self::OrderCreate => "placing your order",
            Self::Verify => "verifying your payment",
        }
    }
}

/// Checkout failure modes; each maps to a shopper-visible notification.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Local validation failed; no network call was made.
    #[error("shipping address is incomplete")]
    Validation(Vec<FieldError>),

    /// The freshly-fetched cart had no lines to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A gateway order was requested but the creation response carried no
    /// gateway order id.
    #[error("order {0} has no gateway order id")]
    MissingGatewayOrder(OrderId),

    /// A commerce API call failed at the named step.
    #[error("checkout failed while {}: {source}", step.describe())]
    Commerce {
        step: CheckoutStep,
        source: CommerceError,
    },
}

impl CheckoutError {
    /// The notification text to surface to the shopper.
    #[must_use]
    pub fn notification(&self) -> String {
        match self {
            Self::Validation(_) => "Please fill in all shipping address fields.".to_string(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::MissingGatewayOrder(_) => {
                "We could not start the payment. Please try again.".to_string()
            }
            Self::Commerce { step, source } => {
                format!("We hit a problem {}: {}", step.describe(), source.notification())
            }
        }
    }

}

fn at_step(step: CheckoutStep) -> impl FnOnce(CommerceError) -> CheckoutError {
    move |source| CheckoutError::Commerce { step, source }
}

/// Everything the checkout page needs to render.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSummary {
    pub form: ShippingAddressForm,
    pub cart: CartSummaryView,
}

/// Parameters the browser hands the Razorpay widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RazorpayCheckout {
    /// Our order id, echoed back on verification.
    pub order_id: OrderId,
    /// The gateway's order id from order creation.
    pub gateway_order_id: String,
    /// Razorpay public key id.
    pub key_id: String,
    /// Order total in minor currency units (paise).
    pub amount_minor: i64,
    pub currency: &'static str,
    pub prefill: RazorpayPrefill,
}

/// Buyer fields the widget is opened with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RazorpayPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Outcome of a submitted checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CheckoutOutcome {
    /// COD: order creation was final.
    #[serde(rename_all = "camelCase")]
    Confirmed { order_id: OrderId, redirect: String },
    /// Razorpay: the widget must run and verification must succeed.
    AwaitingPayment(RazorpayCheckout),
}

/// The redirect target for a confirmed order.
#[must_use]
pub fn confirmation_path(order_id: &OrderId) -> String {
    format!("/order-confirmation/{order_id}")
}

/// Load the checkout page data: profile-prefilled address plus a fresh cart.
///
/// # Errors
///
/// Returns a [`CheckoutError::Commerce`] naming the failed step.
pub async fn summary(
    client: &CommerceClient,
    auth: Option<&str>,
) -> Result<CheckoutSummary, CheckoutError> {
    let profile = client
        .profile_get(auth)
        .await
        .map_err(at_step(CheckoutStep::ProfileFetch))?
        .data;

    let entries = client
        .cart_list(auth)
        .await
        .map_err(at_step(CheckoutStep::CartFetch))?
        .data;

    Ok(CheckoutSummary {
        form: ShippingAddressForm::from_saved(profile.shopping_address.as_ref()),
        cart: convert_cart(entries, chrono::Utc::now()),
    })
}

/// Submit a checkout: validate, write the address back, create the order,
/// and branch on the payment method.
///
/// # Errors
///
/// Returns [`CheckoutError::Validation`] before any network call when a
/// shipping field is empty; otherwise the error of the step that failed.
pub async fn submit(
    client: &CommerceClient,
    auth: Option<&str>,
    form: &ShippingAddressForm,
    payment_method: PaymentMethod,
    razorpay_key_id: &str,
) -> Result<CheckoutOutcome, CheckoutError> {
    // Step 3 first: nothing leaves this process until the address is whole.
    let shipping_address = form.validate().map_err(CheckoutError::Validation)?;

    let profile = client
        .profile_get(auth)
        .await
        .map_err(at_step(CheckoutStep::ProfileFetch))?
        .data;

    let entries = client
        .cart_list(auth)
        .await
        .map_err(at_step(CheckoutStep::CartFetch))?
        .data;
    if entries.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    // Step 4: unconditional write-back, even when the address is unchanged.
    client
        .profile_update(
            auth,
            &ProfileUpdate {
                shopping_address: Some(shipping_address.clone()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .map_err(at_step(CheckoutStep::ProfileSave))?;

    let user_details = UserDetails {
        name: profile.name.clone(),
        email: profile.email.clone(),
        phone: shipping_address.phone.clone(),
    };

    let lines: Vec<CreateOrderLine> = entries
        .iter()
        .map(|entry| CreateOrderLine {
            product_id: entry.product.id.clone(),
            variant_id: entry.variant_id.clone(),
            quantity: entry.quantity.max(1),
            // Not separately computed at this layer.
            discount: "0".to_string(),
            tax: "0".to_string(),
        })
        .collect();

    let order = client
        .order_create(
            auth,
            &CreateOrderRequest {
                products: lines,
                shipping_address: shipping_address.clone(),
                payment_method,
                user_details: user_details.clone(),
            },
        )
        .await
        .map_err(at_step(CheckoutStep::OrderCreate))?
        .data;

    match payment_method {
        PaymentMethod::CashOnDelivery => Ok(CheckoutOutcome::Confirmed {
            redirect: confirmation_path(&order.id),
            order_id: order.id,
        }),
        PaymentMethod::Razorpay => {
            let Some(gateway_order_id) = order.razorpay_order_id.clone() else {
                return Err(CheckoutError::MissingGatewayOrder(order.id));
            };

            let total = crate::commerce::conversions::convert_order(order.clone()).total;

            Ok(CheckoutOutcome::AwaitingPayment(RazorpayCheckout {
                order_id: order.id,
                gateway_order_id,
                key_id: razorpay_key_id.to_string(),
                amount_minor: total.minor_units(),
                currency: "INR",
                prefill: RazorpayPrefill {
                    name: user_details.name,
                    email: user_details.email,
                    contact: user_details.phone,
                },
            }))
        }
    }
}

/// What the Razorpay widget hands back on success.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub order_id: OrderId,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Verify a gateway payment; only success confirms the order.
///
/// On failure the order stays in whatever state the server assigned - no
/// local retry, no rollback.
///
/// # Errors
///
/// Returns the verification step's error.
pub async fn verify_payment(
    client: &CommerceClient,
    auth: Option<&str>,
    callback: &PaymentCallback,
) -> Result<String, CheckoutError> {
    client
        .payment_verify(
            auth,
            &VerifyPaymentRequest {
                order_id: callback.order_id.clone(),
                razorpay_order_id: callback.razorpay_order_id.clone(),
                razorpay_payment_id: callback.razorpay_payment_id.clone(),
                razorpay_signature: callback.razorpay_signature.clone(),
                address_snapshot: None,
            },
        )
        .await
        .map_err(at_step(CheckoutStep::Verify))?;

    Ok(confirmation_path(&callback.order_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> ShippingAddressForm {
        ShippingAddressForm {
            name: "Asha Rao".to_string(),
            address: "14 Lake View Road".to_string(),
            phone: "9876543210".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    #[test]
    fn test_complete_form_validates() {
        let address = complete_form().validate().expect("complete form");
        assert_eq!(address.pincode, "560001");
    }

    #[test]
    fn test_empty_pincode_rejected_with_field_error() {
        let mut form = complete_form();
        form.pincode = String::new();
        let errors = form.validate().expect_err("pincode missing");
        assert_eq!(errors.len(), 1);
        let error = errors.first().expect("one error");
        assert_eq!(error.field, "pincode");
        assert_eq!(error.message, "pincode is required");
    }

    #[test]
    fn test_whitespace_only_field_counts_as_empty() {
        let mut form = complete_form();
        form.city = "   ".to_string();
        let errors = form.validate().expect_err("city missing");
        assert_eq!(errors.first().expect("one error").field, "city");
    }

    #[test]
    fn test_every_missing_field_reported() {
        let errors = ShippingAddressForm::default()
            .validate()
            .expect_err("all fields missing");
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["name", "address", "phone", "city", "state", "pincode"]
        );
    }

    #[test]
    fn test_validated_fields_are_trimmed() {
        let mut form = complete_form();
        form.name = "  Asha Rao  ".to_string();
        let address = form.validate().expect("complete form");
        assert_eq!(address.name, "Asha Rao");
    }

    #[test]
    fn test_form_prefills_from_saved_address() {
        let saved = ShippingAddress {
            name: "Asha Rao".to_string(),
            address: "14 Lake View Road".to_string(),
            phone: "9876543210".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        };
        let form = ShippingAddressForm::from_saved(Some(&saved));
        assert_eq!(form.city, "Bengaluru");

        let blank = ShippingAddressForm::from_saved(None);
        assert!(blank.name.is_empty());
    }

    #[test]
    fn test_confirmation_path() {
        assert_eq!(
            confirmation_path(&OrderId::new("o42")),
            "/order-confirmation/o42"
        );
    }

    #[test]
    fn test_validation_notification_text() {
        let err = CheckoutError::Validation(vec![FieldError::required("pincode")]);
        assert_eq!(
            err.notification(),
            "Please fill in all shipping address fields."
        );
    }
}
