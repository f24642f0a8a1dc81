//! Order history feature (`/dashboard/payments`).

use crate::gateway::{GatewayError, OrderGateway};
use crate::projector::{DisplayModel, OrderStatusProjector};
use crate::route::Route;
use crate::session::{AccessToken, Session, SessionEvent};
use crate::types::Order;
use std::sync::Arc;
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, smallvec};

/// Where the history fetch stands
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HistoryLoad {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the backend
    Loading,
    /// Orders as received
    Loaded(Vec<Order>),
    /// The fetch failed
    Failed {
        /// Human-readable cause
        reason: String,
    },
}

/// State of the payments list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryState {
    /// Who is looking
    pub session: Session,
    /// The fetched history
    pub orders: HistoryLoad,
    /// Id of the latest request; older responses are dropped
    pub request: u64,
}

impl HistoryState {
    /// State for a signed-in customer with nothing loaded
    #[must_use]
    pub fn signed_in(user: impl Into<String>, token: AccessToken) -> Self {
        Self {
            session: Session::authenticated(user, token),
            ..Self::default()
        }
    }
}

/// Inputs of the history feature
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryAction {
    /// Sign-in or sign-out
    Session(SessionEvent),
    /// The payments page was opened or refreshed
    HistoryRequested,
    /// The backend returned the list
    HistoryLoaded {
        /// Request this answers
        request: u64,
        /// The customer's orders
        orders: Vec<Order>,
    },
    /// The backend call failed
    HistoryLoadFailed {
        /// Request this answers
        request: u64,
        /// What went wrong
        error: GatewayError,
    },
}

/// Dependencies of the history feature
#[derive(Clone)]
pub struct HistoryEnvironment {
    /// Order backend
    pub gateway: Arc<dyn OrderGateway>,
}

impl HistoryEnvironment {
    /// Creates an environment around `gateway`
    #[must_use]
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self { gateway }
    }
}

/// Reducer for the history feature
#[derive(Clone, Copy, Debug, Default)]
pub struct HistoryReducer;

impl HistoryReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for HistoryReducer {
    type State = HistoryState;
    type Action = HistoryAction;
    type Environment = HistoryEnvironment;

    fn reduce(
        &self,
        state: &mut HistoryState,
        action: HistoryAction,
        env: &HistoryEnvironment,
    ) -> SmallVec<[Effect<HistoryAction>; 4]> {
        match action {
            HistoryAction::Session(event) => {
                let signed_out = matches!(event, SessionEvent::SignedOut);
                state.session.apply(event);
                if signed_out {
                    state.orders = HistoryLoad::Idle;
                    state.request += 1;
                }
                smallvec![Effect::None]
            },

            HistoryAction::HistoryRequested => {
                let Some(token) = state.session.token().cloned() else {
                    tracing::debug!("History requested without a session");
                    return smallvec![Effect::None];
                };

                state.request += 1;
                state.orders = HistoryLoad::Loading;
                let request = state.request;
                let gateway = Arc::clone(&env.gateway);
                tracing::info!(request, "Fetching order history");

                smallvec![Effect::future(async move {
                    let result = gateway.list_orders(&token).await;
                    Some(match result {
                        Ok(orders) => HistoryAction::HistoryLoaded { request, orders },
                        Err(error) => HistoryAction::HistoryLoadFailed { request, error },
                    })
                })]
            },

            HistoryAction::HistoryLoaded { request, orders } => {
                if request != state.request || state.orders != HistoryLoad::Loading {
                    tracing::debug!(request, latest = state.request, "Ignoring stale history");
                    return smallvec![Effect::None];
                }
                tracing::info!(request, count = orders.len(), "Order history loaded");
                state.orders = HistoryLoad::Loaded(orders);
                smallvec![Effect::None]
            },

            HistoryAction::HistoryLoadFailed { request, error } => {
                if request != state.request || state.orders != HistoryLoad::Loading {
                    tracing::debug!(request, latest = state.request, "Ignoring stale failure");
                    return smallvec![Effect::None];
                }
                tracing::warn!(request, error = %error, "Order history fetch failed");
                if error == GatewayError::Unauthorized {
                    state.session.apply(SessionEvent::SignedOut);
                    state.orders = HistoryLoad::Idle;
                } else {
                    state.orders = HistoryLoad::Failed {
                        reason: error.to_string(),
                    };
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// One row of the payments list
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Detail page of this order
    pub link: Route,
    /// Projected summary
    pub summary: DisplayModel,
}

/// What the payments page should render
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryView {
    /// Leave the page for this route
    Redirect(Route),
    /// Show a spinner
    Loading,
    /// Show an error banner
    Failed {
        /// Human-readable cause
        reason: String,
    },
    /// Show the rows, newest first
    Ready(Vec<HistoryEntry>),
}

/// Decides what the payments page renders for `state`
#[must_use]
pub fn resolve_history(state: &HistoryState, projector: &OrderStatusProjector) -> HistoryView {
    if !state.session.is_authenticated() {
        return HistoryView::Redirect(Route::Home);
    }
    match &state.orders {
        HistoryLoad::Idle | HistoryLoad::Loading => HistoryView::Loading,
        HistoryLoad::Failed { reason } => HistoryView::Failed {
            reason: reason.clone(),
        },
        HistoryLoad::Loaded(orders) => {
            let mut sorted: Vec<&Order> = orders.iter().collect();
            sorted.sort_by(|a, b| {
                b.date_issued
                    .cmp(&a.date_issued)
                    .then_with(|| a.transaction_id.as_str().cmp(b.transaction_id.as_str()))
            });
            HistoryView::Ready(
                sorted
                    .into_iter()
                    .map(|order| HistoryEntry {
                        link: Route::DashboardPayment {
                            transaction_id: order.transaction_id.clone(),
                        },
                        summary: projector.render_summary(order),
                    })
                    .collect(),
            )
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryOrderGateway;
    use crate::gateway::memory::sample_orders;
    use crate::types::TransactionId;
    use storefront_core::environment::Clock;
    use storefront_testing::{ReducerTest, assertions, test_clock};

    fn env() -> HistoryEnvironment {
        HistoryEnvironment::new(Arc::new(InMemoryOrderGateway::with_orders(sample_orders(
            test_clock().now(),
        ))))
    }

    fn signed_in() -> HistoryState {
        HistoryState::signed_in("ana", AccessToken::new("token"))
    }

    fn projector() -> OrderStatusProjector {
        OrderStatusProjector::new(Arc::new(test_clock()))
    }

    #[test]
    fn request_bumps_generation() {
        ReducerTest::new(HistoryReducer::new())
            .with_env(env())
            .given_state(signed_in())
            .when_action(HistoryAction::HistoryRequested)
            .when_action(HistoryAction::HistoryRequested)
            .then_state(|state| {
                assert_eq!(state.request, 2);
                assert_eq!(state.orders, HistoryLoad::Loading);
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn older_response_is_dropped() {
        ReducerTest::new(HistoryReducer::new())
            .with_env(env())
            .given_state(signed_in())
            .when_action(HistoryAction::HistoryRequested)
            .when_action(HistoryAction::HistoryRequested)
            .when_action(HistoryAction::HistoryLoaded {
                request: 1,
                orders: Vec::new(),
            })
            .then_state(|state| assert_eq!(state.orders, HistoryLoad::Loading))
            .run();
    }

    #[test]
    fn anonymous_request_redirects() {
        ReducerTest::new(HistoryReducer::new())
            .with_env(env())
            .given_state(HistoryState::default())
            .when_action(HistoryAction::HistoryRequested)
            .then_state(|state| {
                assert_eq!(state.request, 0);
                assert_eq!(
                    resolve_history(state, &projector()),
                    HistoryView::Redirect(Route::Home)
                );
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn failure_is_shown() {
        ReducerTest::new(HistoryReducer::new())
            .with_env(env())
            .given_state(signed_in())
            .when_action(HistoryAction::HistoryRequested)
            .when_action(HistoryAction::HistoryLoadFailed {
                request: 1,
                error: GatewayError::Transport("connection refused".to_string()),
            })
            .then_state(|state| {
                assert_eq!(
                    resolve_history(state, &projector()),
                    HistoryView::Failed {
                        reason: "Transport failed: connection refused".to_string()
                    }
                );
            })
            .run();
    }

    #[tokio::test]
    async fn rows_are_newest_first_and_link_to_detail() {
        let reducer = HistoryReducer::new();
        let env = env();
        let mut state = signed_in();

        let mut effects = reducer.reduce(&mut state, HistoryAction::HistoryRequested, &env);
        let Effect::Future(fetch) = effects.remove(0) else {
            panic!("expected a fetch");
        };
        let action = fetch.await.unwrap();
        reducer.reduce(&mut state, action, &env);

        let HistoryView::Ready(rows) = resolve_history(&state, &projector()) else {
            panic!("history should be ready");
        };
        let ids: Vec<&str> = rows.iter().map(|r| r.summary.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["TX2", "TX3", "TX1", "TX4", "TX5"]);
        assert_eq!(
            rows[0].link,
            Route::DashboardPayment {
                transaction_id: TransactionId::new("TX2")
            }
        );
        assert!(rows[4].summary.is_indeterminate());
        assert_eq!(rows[4].summary.elapsed_time_text, "a year ago");
    }
}
