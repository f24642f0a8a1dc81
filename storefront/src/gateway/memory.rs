//! In-memory order gateway for tests and the offline demo.

use super::{GatewayError, GatewayFuture, OrderGateway};
use crate::session::AccessToken;
use crate::types::{Money, Order, TransactionId};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Order gateway over a shared in-memory map
///
/// Clones share the same orders, failure switch and call counter.
#[derive(Clone, Debug, Default)]
pub struct InMemoryOrderGateway {
    orders: Arc<RwLock<HashMap<TransactionId, Order>>>,
    failure: Arc<RwLock<Option<GatewayError>>>,
    required_token: Option<AccessToken>,
    latency: Option<std::time::Duration>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryOrderGateway {
    /// Empty gateway accepting any token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway preloaded with `orders`
    #[must_use]
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let map = orders
            .into_iter()
            .map(|order| (order.transaction_id.clone(), order))
            .collect();
        Self {
            orders: Arc::new(RwLock::new(map)),
            ..Self::default()
        }
    }

    /// Rejects every call whose token differs from `token`
    #[must_use]
    pub fn requiring_token(mut self, token: AccessToken) -> Self {
        self.required_token = Some(token);
        self
    }

    /// Delays every call by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds or replaces an order
    pub async fn insert(&self, order: Order) {
        self.orders
            .write()
            .await
            .insert(order.transaction_id.clone(), order);
    }

    /// Makes every following call fail with `error` until [`Self::recover`]
    pub async fn fail_with(&self, error: GatewayError) {
        *self.failure.write().await = Some(error);
    }

    /// Clears a failure set by [`Self::fail_with`]
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    /// Number of calls made so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn admit(&self, token: &AccessToken) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }
        match &self.required_token {
            Some(required) if required != token => Err(GatewayError::Unauthorized),
            _ => Ok(()),
        }
    }
}

impl OrderGateway for InMemoryOrderGateway {
    fn fetch_order<'a>(
        &'a self,
        token: &'a AccessToken,
        transaction_id: &'a TransactionId,
    ) -> GatewayFuture<'a, Order> {
        Box::pin(async move {
            self.admit(token).await?;
            self.orders
                .read()
                .await
                .get(transaction_id)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(transaction_id.clone()))
        })
    }

    fn list_orders<'a>(&'a self, token: &'a AccessToken) -> GatewayFuture<'a, Vec<Order>> {
        Box::pin(async move {
            self.admit(token).await?;
            Ok(self.orders.read().await.values().cloned().collect())
        })
    }
}

/// Demo orders, one per stage plus an unrecognised status, issued before `now`
#[must_use]
pub fn sample_orders(now: DateTime<Utc>) -> Vec<Order> {
    let order = |id: &str, status: &str, age: Duration, cents: i64| Order {
        transaction_id: TransactionId::new(id),
        status: status.to_string(),
        date_issued: now - age,
        amount: Money::from_cents(cents),
        full_name: "Ana Torres".to_string(),
        address_line_1: "Av. Arequipa 123".to_string(),
        address_line_2: "Lima, Peru".to_string(),
    };

    vec![
        order("TX1", "enviado", Duration::days(3), 12050),
        order("TX2", "no_procesado", Duration::minutes(5), 4500),
        order("TX3", "procesado", Duration::hours(20), 8999),
        order("TX4", "entregada", Duration::days(40), 3600),
        order("TX5", "cancelado", Duration::days(400), 1000),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storefront_core::environment::Clock;
    use storefront_testing::test_clock;

    fn gateway() -> InMemoryOrderGateway {
        InMemoryOrderGateway::with_orders(sample_orders(test_clock().now()))
    }

    #[tokio::test]
    async fn fetches_known_and_reports_missing() {
        let gateway = gateway();
        let token = AccessToken::new("t");

        let order = gateway.fetch_order(&token, &TransactionId::new("TX3")).await.unwrap();
        assert_eq!(order.status, "procesado");

        let missing = TransactionId::new("TX404");
        assert_eq!(
            gateway.fetch_order(&token, &missing).await,
            Err(GatewayError::NotFound(missing))
        );
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn enforces_required_token() {
        let gateway = gateway().requiring_token(AccessToken::new("good"));

        let rejected = gateway.list_orders(&AccessToken::new("bad")).await;
        assert_eq!(rejected, Err(GatewayError::Unauthorized));

        let listed = gateway.list_orders(&AccessToken::new("good")).await.unwrap();
        assert_eq!(listed.len(), 5);
    }

    #[tokio::test]
    async fn failure_switch_is_shared_between_clones() {
        let gateway = gateway();
        let clone = gateway.clone();
        let token = AccessToken::new("t");

        gateway.fail_with(GatewayError::Status(503)).await;
        assert_eq!(clone.list_orders(&token).await, Err(GatewayError::Status(503)));

        gateway.recover().await;
        assert!(clone.list_orders(&token).await.is_ok());
        assert_eq!(gateway.calls(), 2);
    }
}
