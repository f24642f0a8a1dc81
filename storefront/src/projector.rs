//! Order status projection
//!
//! Turns a backend [`Order`] into the flat [`DisplayModel`] the order views
//! bind to. The projection is a read-side transform: it borrows the order and
//! never changes it.

use crate::error::ProjectionError;
use crate::relative_time;
use crate::status::{OrderStage, ProgressStep, progress_steps};
use crate::types::Order;
use serde::Serialize;
use std::sync::Arc;
use storefront_core::environment::Clock;

/// Display-ready summary of one order
///
/// Serializes with camelCase keys for template binding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayModel {
    /// Purchase identifier
    pub transaction_id: String,
    /// Recipient name
    pub full_name: String,
    /// Order total, e.g. `$120.50`
    pub formatted_amount: String,
    /// Human label for the status (raw tag when unrecognised)
    pub status_label: String,
    /// Time since the order was issued, e.g. `3 days ago`
    pub elapsed_time_text: String,
    /// First shipping address line
    pub address_line_1: String,
    /// Second shipping address line
    pub address_line_2: String,
    /// Filled share of the progress bar; `None` renders an indeterminate bar
    pub progress_fraction: Option<f64>,
    /// Ordinal stage 0–3; `None` when the status is unrecognised
    pub stage: Option<u8>,
    /// The four labelled steps under the bar
    pub steps: [ProgressStep; 4],
}

impl DisplayModel {
    /// `true` when the order's status could not be mapped to a stage
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        self.stage.is_none()
    }
}

/// Projects orders into display models
///
/// Holds only a clock, used for the elapsed-time text.
#[derive(Clone)]
pub struct OrderStatusProjector {
    clock: Arc<dyn Clock>,
}

impl OrderStatusProjector {
    /// Creates a projector reading "now" from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Maps the order's status tag to its progress stage
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::UnknownStage`] when the tag is not one of
    /// `no_procesado`, `procesado`, `enviado`, `entregada`.
    pub fn compute_stage(order: &Order) -> Result<OrderStage, ProjectionError> {
        crate::status::compute_stage(order).ok_or_else(|| ProjectionError::UnknownStage {
            status: order.status.clone(),
        })
    }

    /// `(stage * 2 + 1) / 8` for the given stage
    #[must_use]
    pub fn progress_fraction(stage: OrderStage) -> f64 {
        stage.progress_fraction()
    }

    /// Builds the display model for `order`
    ///
    /// An unknown status does not fail the projection: the model carries no
    /// stage and no fraction, the raw tag becomes the label, and only the
    /// first step is active.
    #[must_use]
    pub fn render_summary(&self, order: &Order) -> DisplayModel {
        let stage = match Self::compute_stage(order) {
            Ok(stage) => Some(stage),
            Err(error) => {
                tracing::warn!(
                    transaction_id = %order.transaction_id,
                    error = %error,
                    "Rendering indeterminate progress"
                );
                None
            },
        };

        let status_label = stage.map_or_else(|| order.status.clone(), |s| s.label().to_string());

        DisplayModel {
            transaction_id: order.transaction_id.to_string(),
            full_name: order.full_name.clone(),
            formatted_amount: order.amount.to_string(),
            status_label,
            elapsed_time_text: relative_time::from_now(order.date_issued, self.clock.now()),
            address_line_1: order.address_line_1.clone(),
            address_line_2: order.address_line_2.clone(),
            progress_fraction: stage.map(OrderStage::progress_fraction),
            stage: stage.map(OrderStage::index),
            steps: progress_steps(stage),
        }
    }
}

impl std::fmt::Debug for OrderStatusProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStatusProjector")
            .field("now", &self.clock.now())
            .finish()
    }
}
