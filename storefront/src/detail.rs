//! Order detail feature (`/dashboard/payment/:transaction_id`).
//!
//! Entering the view fetches the order through the gateway. Every fetch is
//! tagged with a request number; only the answer to the latest request is
//! accepted, and signing out invalidates anything still in flight. The
//! display model is derived on demand by [`resolve_view`] and never stored.

use crate::error::ViewError;
use crate::gateway::{GatewayError, OrderGateway};
use crate::projector::{DisplayModel, OrderStatusProjector};
use crate::route::Route;
use crate::session::{AccessToken, Session, SessionEvent};
use crate::types::{Order, TransactionId};
use std::sync::Arc;
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, smallvec};

/// Where the order fetch stands
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OrderLoad {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the backend
    Loading {
        /// The requested order
        transaction_id: TransactionId,
    },
    /// The order arrived
    Loaded(Order),
    /// The backend has no such order
    NotFound {
        /// The requested order
        transaction_id: TransactionId,
    },
    /// The fetch failed for another reason
    Failed {
        /// The requested order
        transaction_id: TransactionId,
        /// Human-readable cause
        reason: String,
    },
}

impl OrderLoad {
    /// The order id this load refers to, if any
    #[must_use]
    pub const fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            Self::Idle => None,
            Self::Loading { transaction_id }
            | Self::NotFound { transaction_id }
            | Self::Failed { transaction_id, .. } => Some(transaction_id),
            Self::Loaded(order) => Some(&order.transaction_id),
        }
    }

    /// `true` while a fetch is outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The loaded order, if any
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        match self {
            Self::Loaded(order) => Some(order),
            _ => None,
        }
    }

    fn awaits(&self, id: &TransactionId) -> bool {
        matches!(self, Self::Loading { transaction_id } if transaction_id == id)
    }
}

/// State of the order detail view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderDetailState {
    /// Who is looking
    pub session: Session,
    /// The order being shown
    pub order: OrderLoad,
    /// Id of the latest request; older responses are dropped
    pub request: u64,
}

impl OrderDetailState {
    /// Whether an answer to `request` for `transaction_id` is still wanted
    fn accepts(&self, request: u64, transaction_id: &TransactionId) -> bool {
        request == self.request && self.order.awaits(transaction_id)
    }

    /// State for a signed-in customer with nothing loaded
    #[must_use]
    pub fn signed_in(user: impl Into<String>, token: AccessToken) -> Self {
        Self {
            session: Session::authenticated(user, token),
            ..Self::default()
        }
    }
}

/// Inputs of the order detail feature
#[derive(Clone, Debug, PartialEq)]
pub enum OrderDetailAction {
    /// Sign-in or sign-out
    Session(SessionEvent),
    /// The view was opened for an order
    ViewEntered {
        /// Order to show
        transaction_id: TransactionId,
    },
    /// The backend returned the order
    OrderLoaded {
        /// Request this answers
        request: u64,
        /// The fetched order
        order: Order,
    },
    /// The backend call failed
    OrderLoadFailed {
        /// Request this answers
        request: u64,
        /// Order that was requested
        transaction_id: TransactionId,
        /// What went wrong
        error: GatewayError,
    },
}

/// Dependencies of the order detail feature
#[derive(Clone)]
pub struct OrderDetailEnvironment {
    /// Order backend
    pub gateway: Arc<dyn OrderGateway>,
}

impl OrderDetailEnvironment {
    /// Creates an environment around `gateway`
    #[must_use]
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self { gateway }
    }
}

/// Reducer for the order detail feature
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderDetailReducer;

impl OrderDetailReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch(
        env: &OrderDetailEnvironment,
        request: u64,
        token: AccessToken,
        transaction_id: TransactionId,
    ) -> Effect<OrderDetailAction> {
        let gateway = Arc::clone(&env.gateway);
        Effect::future(async move {
            let result = gateway.fetch_order(&token, &transaction_id).await;
            let action = match result {
                Ok(order) if order.transaction_id == transaction_id => {
                    OrderDetailAction::OrderLoaded { request, order }
                },
                Ok(order) => OrderDetailAction::OrderLoadFailed {
                    request,
                    error: GatewayError::Decode(format!(
                        "requested {transaction_id}, received {}",
                        order.transaction_id
                    )),
                    transaction_id,
                },
                Err(error) => OrderDetailAction::OrderLoadFailed {
                    request,
                    transaction_id,
                    error,
                },
            };
            Some(action)
        })
    }
}

impl Reducer for OrderDetailReducer {
    type State = OrderDetailState;
    type Action = OrderDetailAction;
    type Environment = OrderDetailEnvironment;

    fn reduce(
        &self,
        state: &mut OrderDetailState,
        action: OrderDetailAction,
        env: &OrderDetailEnvironment,
    ) -> SmallVec<[Effect<OrderDetailAction>; 4]> {
        match action {
            OrderDetailAction::Session(event) => {
                let signed_out = matches!(event, SessionEvent::SignedOut);
                state.session.apply(event);
                if signed_out {
                    state.order = OrderLoad::Idle;
                    state.request += 1;
                }
                smallvec![Effect::None]
            },

            OrderDetailAction::ViewEntered { transaction_id } => {
                let Some(token) = state.session.token().cloned() else {
                    tracing::debug!(%transaction_id, "Order view entered without a session");
                    return smallvec![Effect::None];
                };

                state.request += 1;
                let request = state.request;
                tracing::info!(%transaction_id, request, "Fetching order");
                state.order = OrderLoad::Loading {
                    transaction_id: transaction_id.clone(),
                };
                smallvec![Self::fetch(env, request, token, transaction_id)]
            },

            OrderDetailAction::OrderLoaded { request, order } => {
                if !state.accepts(request, &order.transaction_id) {
                    tracing::debug!(
                        transaction_id = %order.transaction_id,
                        request,
                        latest = state.request,
                        "Ignoring stale order"
                    );
                    return smallvec![Effect::None];
                }
                tracing::info!(transaction_id = %order.transaction_id, status = %order.status, "Order loaded");
                state.order = OrderLoad::Loaded(order);
                smallvec![Effect::None]
            },

            OrderDetailAction::OrderLoadFailed {
                request,
                transaction_id,
                error,
            } => {
                if !state.accepts(request, &transaction_id) {
                    tracing::debug!(%transaction_id, request, latest = state.request, "Ignoring stale failure");
                    return smallvec![Effect::None];
                }
                tracing::warn!(%transaction_id, error = %error, "Order fetch failed");
                state.order = match error {
                    GatewayError::NotFound(_) => OrderLoad::NotFound { transaction_id },
                    GatewayError::Unauthorized => {
                        state.session.apply(SessionEvent::SignedOut);
                        OrderLoad::Idle
                    },
                    other => OrderLoad::Failed {
                        transaction_id,
                        reason: other.to_string(),
                    },
                };
                smallvec![Effect::None]
            },
        }
    }
}

/// What the order detail page should render
#[derive(Clone, Debug, PartialEq)]
pub enum OrderView {
    /// Leave the page for this route
    Redirect(Route),
    /// Show a spinner
    Loading,
    /// Show "order not found"
    NotFound {
        /// The requested order
        transaction_id: TransactionId,
    },
    /// Show an error banner
    Failed {
        /// The requested order
        transaction_id: TransactionId,
        /// Human-readable cause
        reason: String,
    },
    /// Show the order
    Ready(DisplayModel),
}

/// The loaded order, when the view may show one
///
/// # Errors
///
/// - [`ViewError::AccessDenied`] when nobody is signed in
/// - [`ViewError::OrderNotLoaded`] when no order has arrived yet
pub fn guard_order(state: &OrderDetailState) -> Result<&Order, ViewError> {
    if !state.session.is_authenticated() {
        return Err(ViewError::AccessDenied);
    }
    state.order.order().ok_or_else(|| ViewError::OrderNotLoaded {
        transaction_id: state.order.transaction_id().cloned(),
    })
}

/// Decides what the page renders for `state`
///
/// Anonymous visitors are sent to the landing page.
#[must_use]
pub fn resolve_view(state: &OrderDetailState, projector: &OrderStatusProjector) -> OrderView {
    match guard_order(state) {
        Ok(order) => OrderView::Ready(projector.render_summary(order)),
        Err(ViewError::AccessDenied) => OrderView::Redirect(Route::Home),
        Err(ViewError::OrderNotLoaded { .. }) => match &state.order {
            OrderLoad::NotFound { transaction_id } => OrderView::NotFound {
                transaction_id: transaction_id.clone(),
            },
            OrderLoad::Failed {
                transaction_id,
                reason,
            } => OrderView::Failed {
                transaction_id: transaction_id.clone(),
                reason: reason.clone(),
            },
            OrderLoad::Idle | OrderLoad::Loading { .. } | OrderLoad::Loaded(_) => OrderView::Loading,
        },
    }
}
