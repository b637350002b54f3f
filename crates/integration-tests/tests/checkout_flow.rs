//! End-to-end checkout flows against the fake commerce API.

use serde_json::{Value, json};

use saffron_integration_tests::{
    FakeState, GATEWAY_ORDER_ID, TestHarness, wire_cart_entry, wire_product,
};

fn complete_checkout_body(payment_method: &str) -> Value {
    json!({
        "name": "Asha Rao",
        "address": "14 Lake View Road",
        "phone": "9876543210",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pincode": "560001",
        "payment_method": payment_method
    })
}

fn seed_with_cart() -> FakeState {
    let mut seed = FakeState::seeded();
    let product = wire_product("p1", "Masala Chai", "v1", "100.00");
    seed.cart = vec![wire_cart_entry(&product, "v1", 2)];
    seed
}

async fn submit_checkout(harness: &TestHarness, payment_method: &str) -> Value {
    harness
        .client
        .post(harness.url("/checkout"))
        .json(&complete_checkout_body(payment_method))
        .send()
        .await
        .expect("checkout request")
        .json()
        .await
        .expect("checkout body")
}

#[tokio::test]
async fn cod_checkout_confirms_without_gateway() {
    let harness = TestHarness::start(seed_with_cart()).await;
    harness.login().await;

    let response = submit_checkout(&harness, "COD").await;

    assert_eq!(response["success"], json!(true), "checkout failed: {response}");
    let outcome = &response["data"];
    assert_eq!(outcome["kind"], json!("confirmed"));
    assert_eq!(outcome["orderId"], json!("o1"));
    assert_eq!(outcome["redirect"], json!("/order-confirmation/o1"));
    // No gateway widget parameters on the COD path.
    assert!(outcome.get("gatewayOrderId").is_none());

    // The order carried the cart lines with zero discount/tax defaults.
    let created = harness
        .commerce
        .lock()
        .expect("fake state lock")
        .last_order_create
        .clone()
        .expect("order was created");
    assert_eq!(created["paymentMethod"], json!("COD"));
    assert_eq!(created["products"][0]["productId"], json!("p1"));
    assert_eq!(created["products"][0]["quantity"], json!(2));
    assert_eq!(created["products"][0]["discount"], json!("0"));
    assert_eq!(created["products"][0]["tax"], json!("0"));
    assert_eq!(created["shippingAddress"]["pincode"], json!("560001"));

    // Payment verification never ran.
    assert_eq!(harness.count_recorded("POST /payments/verify"), 0);
}

#[tokio::test]
async fn checkout_saves_address_before_creating_order() {
    let harness = TestHarness::start(seed_with_cart()).await;
    harness.login().await;

    let response = submit_checkout(&harness, "COD").await;
    assert_eq!(response["success"], json!(true));

    let recorded = harness.recorded();
    let profile_save = recorded
        .iter()
        .position(|r| r == "PUT /profile")
        .expect("profile was saved");
    let order_create = recorded
        .iter()
        .position(|r| r == "POST /orders")
        .expect("order was created");
    assert!(
        profile_save < order_create,
        "address write-back must precede order creation: {recorded:?}"
    );
}

#[tokio::test]
async fn razorpay_checkout_verifies_with_exact_gateway_values() {
    let harness = TestHarness::start(seed_with_cart()).await;
    harness.login().await;

    let response = submit_checkout(&harness, "Razorpay").await;

    assert_eq!(response["success"], json!(true), "checkout failed: {response}");
    let outcome = &response["data"];
    assert_eq!(outcome["kind"], json!("awaitingPayment"));
    assert_eq!(outcome["gatewayOrderId"], json!(GATEWAY_ORDER_ID));
    assert_eq!(outcome["keyId"], json!("rzp_test_4fJ9aQ2mX8bL1c"));
    // 2 x 100.00 in paise.
    assert_eq!(outcome["amountMinor"], json!(20000));
    assert_eq!(outcome["currency"], json!("INR"));
    assert_eq!(outcome["prefill"]["email"], json!("asha@example.net"));

    // Widget success: verify with exactly the widget's three values plus
    // the known order id.
    let verify_response: Value = harness
        .client
        .post(harness.url("/checkout/verify"))
        .json(&json!({
            "order_id": "o1",
            "razorpay_order_id": GATEWAY_ORDER_ID,
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "sig_1"
        }))
        .send()
        .await
        .expect("verify request")
        .json()
        .await
        .expect("verify body");

    assert_eq!(verify_response["success"], json!(true));
    assert_eq!(
        verify_response["data"]["redirect"],
        json!("/order-confirmation/o1")
    );

    let verified = harness
        .commerce
        .lock()
        .expect("fake state lock")
        .last_verify
        .clone()
        .expect("verify was called");
    assert_eq!(
        verified,
        json!({
            "orderId": "o1",
            "razorpayOrderId": GATEWAY_ORDER_ID,
            "razorpayPaymentId": "pay_1",
            "razorpaySignature": "sig_1"
        })
    );
}

#[tokio::test]
async fn empty_pincode_aborts_with_zero_network_calls() {
    let harness = TestHarness::start(seed_with_cart()).await;
    harness.login().await;

    let before = harness.request_count();

    let mut body = complete_checkout_body("COD");
    body["pincode"] = json!("");
    let response: Value = harness
        .client
        .post(harness.url("/checkout"))
        .json(&body)
        .send()
        .await
        .expect("checkout request")
        .json()
        .await
        .expect("checkout body");

    assert_eq!(response["success"], json!(false));
    let errors = response["errors"].as_array().expect("field errors");
    assert!(
        errors.iter().any(|e| e["field"] == json!("pincode")),
        "expected an inline pincode error: {errors:?}"
    );

    assert_eq!(
        harness.request_count(),
        before,
        "validation failure must not issue any network call"
    );
}

#[tokio::test]
async fn widget_failure_surfaces_distinctly_and_leaves_order_alone() {
    let harness = TestHarness::start(seed_with_cart()).await;
    harness.login().await;

    let response = submit_checkout(&harness, "Razorpay").await;
    assert_eq!(response["success"], json!(true));

    let failure: Value = harness
        .client
        .post(harness.url("/checkout/payment-failed"))
        .json(&json!({"reason": "payment_cancelled"}))
        .send()
        .await
        .expect("failure callback")
        .json()
        .await
        .expect("failure body");

    assert_eq!(failure["success"], json!(false));
    assert_eq!(
        failure["message"],
        json!("Payment was not completed. Your order has not been confirmed.")
    );
    // No verification was attempted and the order was not touched again.
    assert_eq!(harness.count_recorded("POST /payments/verify"), 0);
}
