//! Backend access for orders.
//!
//! The [`OrderGateway`] trait uses explicit `Pin<Box<dyn Future>>` returns so
//! features can hold it as `Arc<dyn OrderGateway>` and swap the HTTP adapter
//! for the in-memory one in tests.

use crate::session::AccessToken;
use crate::types::{Order, TransactionId};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub mod http;
pub mod memory;

pub use http::HttpOrderGateway;
pub use memory::InMemoryOrderGateway;

/// Boxed future returned by gateway calls
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

/// Errors from order backend calls
///
/// `Clone` so failures can travel inside actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend has no order with this id for the current user
    #[error("Order not found: {0}")]
    NotFound(TransactionId),

    /// The token was rejected (401 or 403)
    #[error("Unauthorized: access token rejected")]
    Unauthorized,

    /// Any other non-success status
    #[error("Backend returned status {0}")]
    Status(u16),

    /// The request never produced a response
    #[error("Transport failed: {0}")]
    Transport(String),

    /// The response body was not a valid order payload
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Read access to the customer's orders
pub trait OrderGateway: Send + Sync {
    /// Fetches one order
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the backend has no such order,
    /// [`GatewayError::Unauthorized`] when the token is rejected, and
    /// transport, status or decode errors otherwise.
    fn fetch_order<'a>(
        &'a self,
        token: &'a AccessToken,
        transaction_id: &'a TransactionId,
    ) -> GatewayFuture<'a, Order>;

    /// Lists every order of the signed-in customer
    ///
    /// # Errors
    ///
    /// Same as [`OrderGateway::fetch_order`], minus `NotFound`.
    fn list_orders<'a>(&'a self, token: &'a AccessToken) -> GatewayFuture<'a, Vec<Order>>;
}

/// Single-order payload: bare or wrapped as `{"order": {...}}`
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderEnvelope {
    Wrapped { order: Order },
    Bare(Order),
}

/// Order-list payload: bare array or wrapped as `{"orders": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum OrdersEnvelope {
    Wrapped { orders: Vec<Order> },
    Bare(Vec<Order>),
}

/// Decodes a single-order response body
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] when the body matches neither shape.
pub fn decode_order(body: &[u8]) -> Result<Order, GatewayError> {
    match serde_json::from_slice::<OrderEnvelope>(body) {
        Ok(OrderEnvelope::Wrapped { order } | OrderEnvelope::Bare(order)) => Ok(order),
        Err(error) => Err(GatewayError::Decode(error.to_string())),
    }
}

/// Decodes an order-list response body
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] when the body matches neither shape.
pub fn decode_orders(body: &[u8]) -> Result<Vec<Order>, GatewayError> {
    match serde_json::from_slice::<OrdersEnvelope>(body) {
        Ok(OrdersEnvelope::Wrapped { orders } | OrdersEnvelope::Bare(orders)) => Ok(orders),
        Err(error) => Err(GatewayError::Decode(error.to_string())),
    }
}
