//! Orders resource gateway.
//!
//! Orders are immutable once created except for the status fields the
//! server transitions; these calls only trigger transitions and read the
//! result. Return/exchange validation (reason, quantity bounds) happens
//! upstream in the route layer.

use reqwest::Method;
use tracing::instrument;

use saffron_core::OrderId;

use super::types::{CreateOrderRequest, Order, ReturnLine, TrackingInfo};
use super::{ApiOk, CommerceClient, CommerceError};

impl CommerceClient {
    /// Create an order from the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth, request))]
    pub async fn order_create(
        &self,
        auth: Option<&str>,
        request: &CreateOrderRequest,
    ) -> Result<ApiOk<Order>, CommerceError> {
        self.send(
            Method::POST,
            "/orders",
            auth,
            Some(serde_json::to_value(request)?),
        )
        .await
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request fails.
    #[instrument(skip(self, auth), fields(order_id = %order_id))]
    pub async fn order_get(
        &self,
        auth: Option<&str>,
        order_id: &OrderId,
    ) -> Result<ApiOk<Order>, CommerceError> {
        let path = format!("/orders/{}", urlencoding::encode(order_id.as_str()));
        self.send(Method::GET, &path, auth, None).await
    }

    /// List the shopper's open orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn orders_mine(&self, auth: Option<&str>) -> Result<ApiOk<Vec<Order>>, CommerceError> {
        self.send(Method::GET, "/orders", auth, None).await
    }

    /// List the shopper's full order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth))]
    pub async fn orders_history(
        &self,
        auth: Option<&str>,
    ) -> Result<ApiOk<Vec<Order>>, CommerceError> {
        self.send(Method::GET, "/orders/history", auth, None).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(order_id = %order_id))]
    pub async fn order_cancel(
        &self,
        auth: Option<&str>,
        order_id: &OrderId,
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!("/orders/{}/cancel", urlencoding::encode(order_id.as_str()));
        self.send_expect_message(Method::POST, &path, auth, None)
            .await
    }

    /// Request a return for a delivered order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth, lines), fields(order_id = %order_id))]
    pub async fn order_return(
        &self,
        auth: Option<&str>,
        order_id: &OrderId,
        reason: &str,
        lines: &[ReturnLine],
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!("/orders/{}/return", urlencoding::encode(order_id.as_str()));
        self.send_expect_message(
            Method::POST,
            &path,
            auth,
            Some(serde_json::json!({
                "reason": reason,
                "products": lines,
            })),
        )
        .await
    }

    /// Request an exchange for a delivered order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth, lines), fields(order_id = %order_id))]
    pub async fn order_exchange(
        &self,
        auth: Option<&str>,
        order_id: &OrderId,
        reason: &str,
        lines: &[ReturnLine],
    ) -> Result<ApiOk<()>, CommerceError> {
        let path = format!(
            "/orders/{}/exchange",
            urlencoding::encode(order_id.as_str())
        );
        self.send_expect_message(
            Method::POST,
            &path,
            auth,
            Some(serde_json::json!({
                "reason": reason,
                "products": lines,
            })),
        )
        .await
    }

    /// Fetch carrier tracking data for an order.
    ///
    /// An empty body is a normal outcome ("not yet available") and comes
    /// back as `Ok(None)`; callers treat failures the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, auth), fields(order_id = %order_id))]
    pub async fn order_track(
        &self,
        auth: Option<&str>,
        order_id: &OrderId,
    ) -> Result<Option<TrackingInfo>, CommerceError> {
        let path = format!("/orders/{}/track", urlencoding::encode(order_id.as_str()));
        match self.send::<TrackingInfo>(Method::GET, &path, auth, None).await {
            Ok(ok) => Ok(Some(ok.data)),
            Err(CommerceError::MissingData(_)) => Ok(None),
            Err(other) => Err(other),
        }
    }
}
