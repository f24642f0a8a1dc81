//! Shipment progress stages.
//!
//! The backend advances an order through four tags. The storefront shows them
//! as a four-step progress bar; this module is the single place that knows
//! which tag maps to which step.

use crate::types::Order;
use serde::Serialize;

/// Ordinal shipment-progress stage
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum OrderStage {
    /// Order placed, not yet processed (`no_procesado`)
    Placed = 0,
    /// Being prepared (`procesado`)
    Processing = 1,
    /// Handed to the carrier (`enviado`)
    Shipped = 2,
    /// Delivered to the customer (`entregada`)
    Delivered = 3,
}

/// Backend status tag → stage. Exact, case-sensitive matches only.
const STAGE_TABLE: [(&str, OrderStage); 4] = [
    ("no_procesado", OrderStage::Placed),
    ("procesado", OrderStage::Processing),
    ("enviado", OrderStage::Shipped),
    ("entregada", OrderStage::Delivered),
];

impl OrderStage {
    /// All stages in progress order
    pub const ALL: [Self; 4] = [Self::Placed, Self::Processing, Self::Shipped, Self::Delivered];

    /// Looks up the stage for a backend status tag
    ///
    /// No trimming or case folding: `"PROCESADO"` and `" enviado"` are unknown.
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        STAGE_TABLE
            .iter()
            .find(|(tag, _)| *tag == status)
            .map(|(_, stage)| *stage)
    }

    /// Stage for an ordinal in `0..=3`
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Placed),
            1 => Some(Self::Processing),
            2 => Some(Self::Shipped),
            3 => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Ordinal of this stage (0–3)
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The backend tag that maps to this stage
    #[must_use]
    pub const fn status_tag(self) -> &'static str {
        STAGE_TABLE[self as usize].0
    }

    /// Label shown under this stage's step of the progress bar
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Placed => "Pedido realizado",
            Self::Processing => "Procesando",
            Self::Shipped => "Enviado",
            Self::Delivered => "Entregado",
        }
    }

    /// Filled share of the progress bar for this stage
    #[must_use]
    pub fn progress_fraction(self) -> f64 {
        progress_fraction(self.index())
    }
}

impl From<OrderStage> for u8 {
    fn from(stage: OrderStage) -> Self {
        stage.index()
    }
}

/// Stage of an order, or `None` when its status tag is not recognised
#[must_use]
pub fn compute_stage(order: &Order) -> Option<OrderStage> {
    OrderStage::from_status(&order.status)
}

/// `(stage * 2 + 1) / 8`
///
/// Centers the bar's edge inside the stage's quarter: 0.125, 0.375, 0.625, 0.875.
#[must_use]
pub fn progress_fraction(stage: u8) -> f64 {
    (f64::from(stage) * 2.0 + 1.0) / 8.0
}

/// One labelled step under the progress bar
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgressStep {
    /// Step caption
    pub label: &'static str,
    /// Whether the step is highlighted
    pub active: bool,
}

/// The four progress steps for a stage
///
/// The first step is always highlighted. Step `i > 0` is highlighted once the
/// order has moved past stage `i - 1`. An unknown stage highlights only the
/// first step.
#[must_use]
pub fn progress_steps(stage: Option<OrderStage>) -> [ProgressStep; 4] {
    OrderStage::ALL.map(|step| {
        let active = match (step, stage) {
            (OrderStage::Placed, _) => true,
            (_, None) => false,
            (step, Some(current)) => current >= step,
        };
        ProgressStep {
            label: step.label(),
            active,
        }
    })
}
