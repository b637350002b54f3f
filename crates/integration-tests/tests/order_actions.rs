//! Order lifecycle actions against the fake commerce API.

use serde_json::{Value, json};

use saffron_integration_tests::{FakeState, TestHarness, wire_order};

fn seed_with_order(status: &str) -> FakeState {
    let mut seed = FakeState::seeded();
    seed.orders = vec![wire_order("o1", "p1", 3, "100.00", status)];
    seed
}

/// Fetch `/orders` so the session holds the local list the actions work on.
async fn fetch_orders(harness: &TestHarness) -> Value {
    harness
        .client
        .get(harness.url("/orders"))
        .send()
        .await
        .expect("orders request")
        .json()
        .await
        .expect("orders body")
}

#[tokio::test]
async fn cancel_updates_local_status_without_refetch() {
    let harness = TestHarness::start(seed_with_order("Pending")).await;
    harness.login().await;

    let orders = fetch_orders(&harness).await;
    assert_eq!(orders["data"][0]["can_cancel"], json!(true));

    let fetches_before = harness.count_recorded("GET /orders/o1");

    let response: Value = harness
        .client
        .post(harness.url("/orders/o1/cancel"))
        .send()
        .await
        .expect("cancel request")
        .json()
        .await
        .expect("cancel body");

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["message"], json!("Order cancelled successfully."));
    assert_eq!(response["data"]["status"], json!("Cancelled"));
    assert_eq!(response["data"]["can_cancel"], json!(false));

    // Optimistic local update: the order itself was not refetched.
    assert_eq!(harness.count_recorded("GET /orders/o1"), fetches_before);
    assert_eq!(harness.count_recorded("POST /orders/o1/cancel"), 1);
}

#[tokio::test]
async fn cancel_is_not_offered_twice() {
    let harness = TestHarness::start(seed_with_order("Pending")).await;
    harness.login().await;
    fetch_orders(&harness).await;

    let first: Value = harness
        .client
        .post(harness.url("/orders/o1/cancel"))
        .send()
        .await
        .expect("cancel request")
        .json()
        .await
        .expect("cancel body");
    assert_eq!(first["success"], json!(true));

    // The status left Pending/Confirmed, so the action is refused locally.
    let second: Value = harness
        .client
        .post(harness.url("/orders/o1/cancel"))
        .send()
        .await
        .expect("second cancel request")
        .json()
        .await
        .expect("second cancel body");

    assert_eq!(second["success"], json!(false));
    assert_eq!(
        second["message"],
        json!("This order can no longer be cancelled.")
    );
    assert_eq!(harness.count_recorded("POST /orders/o1/cancel"), 1);
}

#[tokio::test]
async fn cancel_refused_for_delivered_order() {
    let harness = TestHarness::start(seed_with_order("Delivered")).await;
    harness.login().await;
    fetch_orders(&harness).await;

    let response: Value = harness
        .client
        .post(harness.url("/orders/o1/cancel"))
        .send()
        .await
        .expect("cancel request")
        .json()
        .await
        .expect("cancel body");

    assert_eq!(response["success"], json!(false));
    assert_eq!(harness.count_recorded("POST /orders/o1/cancel"), 0);
}

#[tokio::test]
async fn return_over_ordered_quantity_rejected_before_submission() {
    let harness = TestHarness::start(seed_with_order("Delivered")).await;
    harness.login().await;
    fetch_orders(&harness).await;

    // Ordered 3, requesting 5.
    let response: Value = harness
        .client
        .post(harness.url("/orders/o1/return"))
        .json(&json!({
            "reason": "damaged in transit",
            "products": [{"product_id": "p1", "quantity": 5}]
        }))
        .send()
        .await
        .expect("return request")
        .json()
        .await
        .expect("return body");

    assert_eq!(response["success"], json!(false));
    assert!(response["errors"].as_array().is_some_and(|e| !e.is_empty()));
    assert_eq!(harness.count_recorded("POST /orders/o1/return"), 0);
}

#[tokio::test]
async fn return_with_blank_reason_rejected_before_submission() {
    let harness = TestHarness::start(seed_with_order("Delivered")).await;
    harness.login().await;
    fetch_orders(&harness).await;

    let response: Value = harness
        .client
        .post(harness.url("/orders/o1/return"))
        .json(&json!({
            "reason": "   ",
            "products": [{"product_id": "p1", "quantity": 1}]
        }))
        .send()
        .await
        .expect("return request")
        .json()
        .await
        .expect("return body");

    assert_eq!(response["success"], json!(false));
    assert_eq!(harness.count_recorded("POST /orders/o1/return"), 0);
}

#[tokio::test]
async fn valid_return_transitions_status_optimistically() {
    let harness = TestHarness::start(seed_with_order("Delivered")).await;
    harness.login().await;
    fetch_orders(&harness).await;

    let response: Value = harness
        .client
        .post(harness.url("/orders/o1/return"))
        .json(&json!({
            "reason": "damaged in transit",
            "products": [{"product_id": "p1", "quantity": 2}]
        }))
        .send()
        .await
        .expect("return request")
        .json()
        .await
        .expect("return body");

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["data"]["status"], json!("Return Requested"));
    assert_eq!(response["data"]["can_return_or_exchange"], json!(false));
    assert_eq!(harness.count_recorded("POST /orders/o1/return"), 1);
}

#[tokio::test]
async fn valid_exchange_transitions_status() {
    let harness = TestHarness::start(seed_with_order("Delivered")).await;
    harness.login().await;
    fetch_orders(&harness).await;

    let response: Value = harness
        .client
        .post(harness.url("/orders/o1/exchange"))
        .json(&json!({
            "reason": "wrong size",
            "products": [{"product_id": "p1", "quantity": 3}]
        }))
        .send()
        .await
        .expect("exchange request")
        .json()
        .await
        .expect("exchange body");

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["data"]["status"], json!("Exchange Requested"));
    assert_eq!(harness.count_recorded("POST /orders/o1/exchange"), 1);
}

#[tokio::test]
async fn missing_tracking_is_not_an_error() {
    let harness = TestHarness::start(seed_with_order("Shipped")).await;
    harness.login().await;

    let response: Value = harness
        .client
        .get(harness.url("/orders/o1/track"))
        .send()
        .await
        .expect("track request")
        .json()
        .await
        .expect("track body");

    // "Not yet available", surfaced calmly as a successful response.
    assert_eq!(response["success"], json!(true));
    assert_eq!(
        response["message"],
        json!("Tracking is not yet available for this order.")
    );
    assert!(response.get("data").is_none());
}
