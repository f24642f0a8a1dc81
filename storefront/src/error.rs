//! Error types for order projection and view resolution.

use crate::types::TransactionId;
use thiserror::Error;

/// Errors raised while projecting an order for display
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// The order's status tag is not one of the four known stages.
    ///
    /// Rendered as an indeterminate progress bar, never as a failure.
    #[error("Unknown order status: {status:?}")]
    UnknownStage {
        /// The raw tag received from the backend
        status: String,
    },
}

/// Why an order view cannot be rendered from the current state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Nobody is signed in; the caller must redirect to the landing page.
    #[error("Access denied: sign-in required")]
    AccessDenied,

    /// No order is available yet (never requested, still loading, missing or failed).
    #[error("Order not loaded{}", id_suffix(.transaction_id))]
    OrderNotLoaded {
        /// The requested order, when one has been requested
        transaction_id: Option<TransactionId>,
    },
}

fn id_suffix(transaction_id: &Option<TransactionId>) -> String {
    transaction_id
        .as_ref()
        .map(|id| format!(": {id}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let unknown = ProjectionError::UnknownStage {
            status: "cancelado".to_string(),
        };
        assert_eq!(unknown.to_string(), r#"Unknown order status: "cancelado""#);

        let pending = ViewError::OrderNotLoaded {
            transaction_id: Some(TransactionId::new("TX1")),
        };
        assert_eq!(pending.to_string(), "Order not loaded: TX1");

        let idle = ViewError::OrderNotLoaded { transaction_id: None };
        assert_eq!(idle.to_string(), "Order not loaded");
    }
}
