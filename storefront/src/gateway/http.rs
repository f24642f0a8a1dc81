//! HTTP adapter for the order backend.

use super::{GatewayError, GatewayFuture, OrderGateway, decode_order, decode_orders};
use crate::session::AccessToken;
use crate::types::{Order, TransactionId};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Order gateway backed by the storefront REST API
///
/// - `GET {base}/orders/{transaction_id}` for one order (id percent-encoded)
/// - `GET {base}/orders` for the customer's history
#[derive(Clone, Debug)]
pub struct HttpOrderGateway {
    client: Client,
    base_url: String,
}

impl HttpOrderGateway {
    /// Creates a gateway for `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn order_url(&self, transaction_id: &TransactionId) -> String {
        format!(
            "{}/orders/{}",
            self.base_url,
            urlencoding::encode(transaction_id.as_str())
        )
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }

    async fn get(&self, url: &str, token: &AccessToken) -> Result<(StatusCode, Vec<u8>), GatewayError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "Order backend responded");

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok((status, body.to_vec()))
    }
}

/// Maps non-success statuses; `None` means the body should be decoded
fn classify(status: StatusCode, transaction_id: Option<&TransactionId>) -> Option<GatewayError> {
    match status {
        s if s.is_success() => None,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(GatewayError::Unauthorized),
        StatusCode::NOT_FOUND => Some(
            transaction_id.map_or(GatewayError::Status(404), |id| GatewayError::NotFound(id.clone())),
        ),
        other => Some(GatewayError::Status(other.as_u16())),
    }
}

impl OrderGateway for HttpOrderGateway {
    fn fetch_order<'a>(
        &'a self,
        token: &'a AccessToken,
        transaction_id: &'a TransactionId,
    ) -> GatewayFuture<'a, Order> {
        Box::pin(async move {
            let (status, body) = self.get(&self.order_url(transaction_id), token).await?;
            if let Some(error) = classify(status, Some(transaction_id)) {
                return Err(error);
            }
            decode_order(&body)
        })
    }

    fn list_orders<'a>(&'a self, token: &'a AccessToken) -> GatewayFuture<'a, Vec<Order>> {
        Box::pin(async move {
            let (status, body) = self.get(&self.orders_url(), token).await?;
            if let Some(error) = classify(status, None) {
                return Err(error);
            }
            decode_orders(&body)
        })
    }
}
