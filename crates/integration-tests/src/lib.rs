//! Test support: a fake commerce API plus a running storefront.
//!
//! The fake is a real axum router bound to an ephemeral port. It serves
//! scripted state, records every request it sees (so tests can assert
//! "zero network calls"), and keeps the last order-creation and
//! payment-verification bodies for exact-argument assertions.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};

use saffron_storefront::config::{CommerceApiConfig, RazorpayConfig, StorefrontConfig};
use saffron_storefront::state::AppState;

/// The bearer token the fake auth endpoint issues.
pub const TEST_TOKEN: &str = "tok_1";

/// Gateway order id the fake embeds in Razorpay order creations.
pub const GATEWAY_ORDER_ID: &str = "go_1";

/// Shared handle on the fake's scripted state.
pub type Shared = Arc<Mutex<FakeState>>;

/// Scripted state behind the fake commerce API.
#[derive(Debug, Default)]
pub struct FakeState {
    /// Every request seen, as `"METHOD /path"`.
    pub requests: Vec<String>,
    /// Wire products served by `/products`.
    pub products: Vec<Value>,
    /// Wire cart entries served by `/cart`.
    pub cart: Vec<Value>,
    /// Wire wishlist entries served by `/wishlist`.
    pub wishlist: Vec<Value>,
    /// Wire orders served by `/orders`.
    pub orders: Vec<Value>,
    /// Wire profile served by `/profile`.
    pub profile: Value,
    /// Body of the last `POST /orders`.
    pub last_order_create: Option<Value>,
    /// Body of the last `POST /payments/verify`.
    pub last_verify: Option<Value>,
}

impl FakeState {
    /// A state seeded with a profile and one product.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            products: vec![wire_product("p1", "Masala Chai", "v1", "100.00")],
            profile: wire_profile(),
            ..Self::default()
        }
    }

    fn count(&self, needle: &str) -> usize {
        self.requests.iter().filter(|r| r.as_str() == needle).count()
    }
}

// =============================================================================
// Wire builders
// =============================================================================

/// A wire product with one variant.
#[must_use]
pub fn wire_product(id: &str, name: &str, variant_id: &str, price: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": "Loose leaf blend",
        "images": [{"url": format!("https://img/{id}.jpg"), "sequence": 1}],
        "variants": [{
            "_id": variant_id,
            "price": price,
            "stock": 25,
            "weight": "250g",
            "sku": format!("SKU-{id}")
        }],
        "category": "c1"
    })
}

/// A wire cart entry for a product.
#[must_use]
pub fn wire_cart_entry(product: &Value, variant_id: &str, quantity: u32) -> Value {
    json!({
        "product": product,
        "variantId": variant_id,
        "quantity": quantity
    })
}

/// A wire wishlist entry for a product.
#[must_use]
pub fn wire_wishlist_entry(product: &Value) -> Value {
    json!({ "product": product })
}

/// A wire order with one line.
#[must_use]
pub fn wire_order(id: &str, product_id: &str, quantity: u32, price: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "products": [{
            "productId": product_id,
            "name": "Masala Chai",
            "quantity": quantity,
            "price": price
        }],
        "shippingAddress": wire_address(),
        "userDetails": {"name": "Asha Rao", "email": "asha@example.net", "phone": "9876543210"},
        "paymentMethod": "COD",
        "orderStatus": status,
        "shippingStatus": "Processing",
        "total": price
    })
}

/// The complete shipping address used across tests.
#[must_use]
pub fn wire_address() -> Value {
    json!({
        "name": "Asha Rao",
        "address": "14 Lake View Road",
        "phone": "9876543210",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pincode": "560001"
    })
}

fn wire_profile() -> Value {
    json!({
        "_id": "u1",
        "name": "Asha Rao",
        "email": "asha@example.net",
        "phone": "9876543210",
        "shoppingAddress": wire_address()
    })
}

// =============================================================================
// Fake commerce API
// =============================================================================

fn ok(message: &str, data: Value) -> Json<Value> {
    Json(json!({"success": true, "message": message, "data": data}))
}

fn ok_message(message: &str) -> Json<Value> {
    Json(json!({"success": true, "message": message}))
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "message": message})),
    )
        .into_response()
}

fn authed(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Unauthorized"})),
    )
        .into_response()
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    {
        let mut state = state.lock().expect("fake state lock");
        state
            .requests
            .push(format!("{} {}", request.method(), request.uri().path()));
    }
    next.run(request).await
}

async fn login(State(state): State<Shared>, Json(_body): Json<Value>) -> Json<Value> {
    let profile = state.lock().expect("fake state lock").profile.clone();
    ok(
        "Login successful.",
        json!({"token": TEST_TOKEN, "user": profile}),
    )
}

async fn get_profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let profile = state.lock().expect("fake state lock").profile.clone();
    ok("", profile).into_response()
}

async fn put_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let mut locked = state.lock().expect("fake state lock");
    if let Some(address) = body.get("shoppingAddress") {
        locked.profile["shoppingAddress"] = address.clone();
    }
    ok("Address saved.", locked.profile.clone()).into_response()
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let cart = state.lock().expect("fake state lock").cart.clone();
    ok("", Value::Array(cart)).into_response()
}

async fn post_cart(headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    ok_message("Item added to cart.").into_response()
}

async fn patch_cart(headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    ok_message("Cart updated.").into_response()
}

async fn delete_cart_line(
    headers: HeaderMap,
    Path((_product_id, _variant_id)): Path<(String, String)>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    ok_message("Item removed from cart.").into_response()
}

async fn get_wishlist(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let wishlist = state.lock().expect("fake state lock").wishlist.clone();
    ok("", Value::Array(wishlist)).into_response()
}

async fn post_wishlist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let mut locked = state.lock().expect("fake state lock");
    let product = locked
        .products
        .iter()
        .find(|p| p["_id"] == product_id.as_str())
        .cloned();
    match product {
        Some(product) => {
            locked.wishlist.push(wire_wishlist_entry(&product));
            ok_message("Saved to your wishlist.").into_response()
        }
        None => not_found("No such product"),
    }
}

async fn delete_wishlist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let mut locked = state.lock().expect("fake state lock");
    let before = locked.wishlist.len();
    locked
        .wishlist
        .retain(|entry| entry["product"]["_id"] != product_id.as_str());
    if locked.wishlist.len() == before {
        not_found("Item not in wishlist")
    } else {
        ok_message("Removed from wishlist.").into_response()
    }
}

async fn get_products(State(state): State<Shared>) -> Json<Value> {
    let products = state.lock().expect("fake state lock").products.clone();
    ok("", Value::Array(products))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let product = state
        .lock()
        .expect("fake state lock")
        .products
        .iter()
        .find(|p| p["_id"] == id.as_str())
        .cloned();
    match product {
        Some(product) => ok("", product).into_response(),
        None => not_found("No such product"),
    }
}

async fn get_categories() -> Json<Value> {
    ok("", json!([]))
}

/// Total of the fake's cart in major units, for order amounts.
#[allow(clippy::cast_precision_loss)] // test fixture amounts are tiny
fn cart_total(cart: &[Value]) -> f64 {
    cart.iter()
        .map(|entry| {
            let quantity = entry["quantity"].as_u64().unwrap_or(1);
            let price = entry["product"]["variants"][0]["price"]
                .as_str()
                .and_then(|p| p.parse::<f64>().ok())
                .unwrap_or(0.0);
            price * quantity as f64
        })
        .sum()
}

async fn post_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let mut locked = state.lock().expect("fake state lock");
    locked.last_order_create = Some(body.clone());

    let id = format!("o{}", locked.orders.len() + 1);
    let total = format!("{:.2}", cart_total(&locked.cart));
    let razorpay = body["paymentMethod"] == "Razorpay";

    // Echo the requested lines, priced from the cart.
    let products: Vec<Value> = body["products"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|line| {
            let price = locked
                .cart
                .iter()
                .find(|entry| entry["product"]["_id"] == line["productId"])
                .and_then(|entry| entry["product"]["variants"][0]["price"].as_str())
                .unwrap_or("0");
            json!({
                "productId": line["productId"],
                "quantity": line["quantity"],
                "price": price
            })
        })
        .collect();

    let mut order = json!({
        "_id": id,
        "products": products,
        "shippingAddress": body["shippingAddress"],
        "userDetails": body["userDetails"],
        "paymentMethod": body["paymentMethod"],
        "orderStatus": "Pending",
        "shippingStatus": "Processing",
        "total": total
    });
    if razorpay {
        order["razorpayOrderId"] = json!(GATEWAY_ORDER_ID);
    }

    locked.orders.push(order.clone());
    ok("Order placed.", order).into_response()
}

async fn get_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let orders = state.lock().expect("fake state lock").orders.clone();
    ok("", Value::Array(orders)).into_response()
}

async fn get_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    let order = state
        .lock()
        .expect("fake state lock")
        .orders
        .iter()
        .find(|o| o["_id"] == id.as_str())
        .cloned();
    match order {
        Some(order) => ok("", order).into_response(),
        None => not_found("No such order"),
    }
}

fn transition_order(state: &Shared, id: &str, status: &str) -> bool {
    let mut locked = state.lock().expect("fake state lock");
    for order in &mut locked.orders {
        if order["_id"] == id {
            order["orderStatus"] = json!(status);
            return true;
        }
    }
    false
}

async fn cancel_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    if transition_order(&state, &id, "Cancelled") {
        ok_message("Order cancelled successfully.").into_response()
    } else {
        not_found("No such order")
    }
}

async fn return_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(_body): Json<Value>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    if transition_order(&state, &id, "Return Requested") {
        ok_message("Return request submitted.").into_response()
    } else {
        not_found("No such order")
    }
}

async fn exchange_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(_body): Json<Value>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    if transition_order(&state, &id, "Exchange Requested") {
        ok_message("Exchange request submitted.").into_response()
    } else {
        not_found("No such order")
    }
}

async fn track_order(headers: HeaderMap) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    // No carrier data yet: success, message, no payload.
    ok_message("Tracking not available yet.").into_response()
}

async fn verify_payment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authed(&headers) {
        return unauthorized();
    }
    state.lock().expect("fake state lock").last_verify = Some(body);
    ok_message("Payment verified successfully.").into_response()
}

fn fake_commerce_router(state: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/profile", get(get_profile).put(put_profile))
        .route("/cart", get(get_cart).post(post_cart).patch(patch_cart))
        .route("/cart/{product_id}/{variant_id}", axum::routing::delete(delete_cart_line))
        .route("/wishlist", get(get_wishlist))
        .route(
            "/wishlist/{product_id}",
            post(post_wishlist).delete(delete_wishlist),
        )
        .route("/products", get(get_products))
        .route("/products/{id}", get(get_product))
        .route("/categories", get(get_categories))
        .route("/orders", get(get_orders).post(post_orders))
        .route("/orders/history", get(get_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/cancel", post(cancel_order))
        .route("/orders/{id}/return", post(return_order))
        .route("/orders/{id}/exchange", post(exchange_order))
        .route("/orders/{id}/track", get(track_order))
        .route("/payments/verify", post(verify_payment))
        .layer(axum::middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

// =============================================================================
// Harness
// =============================================================================

/// A running fake commerce API plus a running storefront pointed at it.
pub struct TestHarness {
    /// Cookie-holding client talking to the storefront.
    pub client: reqwest::Client,
    /// Base URL of the storefront.
    pub storefront_url: String,
    /// Handle on the fake's scripted state.
    pub commerce: Shared,
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

impl TestHarness {
    /// Boot both servers with the given fake state.
    pub async fn start(seed: FakeState) -> Self {
        let commerce: Shared = Arc::new(Mutex::new(seed));
        let commerce_addr = serve(fake_commerce_router(commerce.clone())).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            base_url: "http://storefront.test".to_string(),
            session_secret: SecretString::from("kT9#mW2xQ7!pL4vR8zN3@jF6bH1cY5dG"),
            commerce: CommerceApiConfig {
                base_url: format!("http://{commerce_addr}"),
                request_timeout_secs: 5,
            },
            razorpay: RazorpayConfig {
                key_id: "rzp_test_4fJ9aQ2mX8bL1c".to_string(),
            },
            sentry_dsn: None,
        };

        let state = AppState::new(config).expect("app state");
        let storefront_addr = serve(saffron_storefront::app(state)).await;

        // The rate limiters key on proxy headers; a fixed forwarded IP keeps
        // every test request attributable.
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            reqwest::header::HeaderValue::from_static("198.51.100.7"),
        );

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("reqwest client");

        Self {
            client,
            storefront_url: format!("http://{storefront_addr}"),
            commerce,
        }
    }

    /// Absolute storefront URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Establish a logged-in session.
    pub async fn login(&self) {
        let response: Value = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({"email": "asha@example.net", "password": "chai-and-biscuits"}))
            .send()
            .await
            .expect("login request")
            .json()
            .await
            .expect("login body");
        assert_eq!(response["success"], json!(true), "login failed: {response}");
    }

    /// Number of requests the fake has seen so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.commerce.lock().expect("fake state lock").requests.len()
    }

    /// How many times the fake saw exactly `"METHOD /path"`.
    #[must_use]
    pub fn count_recorded(&self, needle: &str) -> usize {
        self.commerce.lock().expect("fake state lock").count(needle)
    }

    /// All recorded requests.
    #[must_use]
    pub fn recorded(&self) -> Vec<String> {
        self.commerce.lock().expect("fake state lock").requests.clone()
    }
}
