//! # Storefront
//!
//! Read-side of the storefront's order pages.
//!
//! The backend owns orders and advances them through four status tags. This
//! crate fetches them, maps each tag to a progress stage and projects the
//! order into a [`DisplayModel`] for the order detail and payments pages.
//!
//! - [`projector`]: stage lookup, progress fraction and display model
//! - [`detail`] / [`history`]: reducers for the two order pages
//! - [`gateway`]: backend access (HTTP and in-memory)
//! - [`route`]: the storefront URL table
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use storefront::{OrderStatusProjector, Order, Money, TransactionId};
//! use storefront_core::environment::SystemClock;
//!
//! let projector = OrderStatusProjector::new(Arc::new(SystemClock));
//! let order = Order {
//!     transaction_id: TransactionId::new("TX1"),
//!     status: "enviado".to_string(),
//!     date_issued: chrono::Utc::now(),
//!     amount: Money::from_cents(12050),
//!     full_name: "Ana Torres".to_string(),
//!     address_line_1: "Av. Arequipa 123".to_string(),
//!     address_line_2: "Lima".to_string(),
//! };
//!
//! let model = projector.render_summary(&order);
//! assert_eq!(model.stage, Some(2));
//! assert_eq!(model.progress_fraction, Some(0.625));
//! ```

pub mod config;
pub mod detail;
pub mod error;
pub mod gateway;
pub mod history;
pub mod projector;
pub mod relative_time;
pub mod route;
pub mod session;
pub mod status;
pub mod types;

pub use config::{ConfigError, StorefrontConfig};
pub use detail::{
    OrderDetailAction, OrderDetailEnvironment, OrderDetailReducer, OrderDetailState, OrderLoad,
    OrderView, guard_order, resolve_view,
};
pub use error::{ProjectionError, ViewError};
pub use gateway::{GatewayError, HttpOrderGateway, InMemoryOrderGateway, OrderGateway};
pub use history::{
    HistoryAction, HistoryEntry, HistoryEnvironment, HistoryLoad, HistoryReducer, HistoryState,
    HistoryView, resolve_history,
};
pub use projector::{DisplayModel, OrderStatusProjector};
pub use route::Route;
pub use session::{AccessToken, Session, SessionEvent};
pub use status::{OrderStage, ProgressStep};
pub use types::{Money, Order, TransactionId};
