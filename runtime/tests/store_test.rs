//! Integration tests for the Store runtime: reducer execution, effect
//! feedback, request-response waiting and shutdown.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;
use storefront_core::effect::Effect;
use storefront_core::environment::Clock;
use storefront_core::reducer::Reducer;
use storefront_core::{smallvec, SmallVec};
use storefront_runtime::{Store, StoreError};
use storefront_testing::{test_clock, FixedClock};

#[derive(Clone, Debug, Default)]
struct CartState {
    items: Vec<String>,
    last_sync: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
enum CartAction {
    Add(String),
    Sync,
    Synced,
    AddLater(String, u64),
    AddInOrder(Vec<String>),
    Ignore,
}

#[derive(Clone)]
struct CartReducer;

#[derive(Clone)]
struct CartEnvironment {
    clock: Arc<FixedClock>,
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut CartState,
        action: CartAction,
        env: &CartEnvironment,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        match action {
            CartAction::Add(item) => {
                state.items.push(item);
                smallvec![Effect::None]
            },
            CartAction::Sync => smallvec![Effect::future(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Some(CartAction::Synced)
            })],
            CartAction::Synced => {
                state.last_sync = Some(env.clock.now());
                smallvec![Effect::None]
            },
            CartAction::AddLater(item, ms) => smallvec![Effect::Delay {
                duration: Duration::from_millis(ms),
                action: Box::new(CartAction::Add(item)),
            }],
            CartAction::AddInOrder(items) => {
                let effects = items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| Effect::Delay {
                        // Later items get shorter delays; only sequencing keeps the order.
                        duration: Duration::from_millis(20_u64.saturating_sub(idx as u64 * 5)),
                        action: Box::new(CartAction::Add(item)),
                    })
                    .collect();
                smallvec![Effect::chain(effects)]
            },
            CartAction::Ignore => smallvec![Effect::future(async { None })],
        }
    }
}

fn store() -> Store<CartState, CartAction, CartEnvironment, CartReducer> {
    let env = CartEnvironment {
        clock: Arc::new(test_clock()),
    };
    Store::new(CartState::default(), CartReducer, env)
}

#[tokio::test]
async fn send_applies_reducer_before_returning() {
    let store = store();
    let _ = store.send(CartAction::Add("keyboard".into())).await.unwrap();

    let items = store.state(|s| s.items.clone()).await;
    assert_eq!(items, vec!["keyboard".to_string()]);
}

#[tokio::test]
async fn future_effect_feeds_action_back() {
    let store = store();
    let mut handle = store.send(CartAction::Sync).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let synced = store.state(|s| s.last_sync).await;
    assert_eq!(synced, Some(test_clock().now()));
    assert_eq!(store.pending_effects(), 0);
}

#[tokio::test]
async fn future_without_action_completes_quietly() {
    let store = store();
    let mut handle = store.send(CartAction::Ignore).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
    assert!(store.state(|s| s.items.is_empty()).await);
}

#[tokio::test]
async fn delay_effect_dispatches_after_duration() {
    let store = store();
    let mut handle = store
        .send(CartAction::AddLater("mouse".into(), 10))
        .await
        .unwrap();
    assert!(store.state(|s| s.items.is_empty()).await);

    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
    assert_eq!(store.state(|s| s.items.len()).await, 1);
}

#[tokio::test]
async fn sequential_effects_preserve_order() {
    let store = store();
    let mut handle = store
        .send(CartAction::AddInOrder(vec!["a".into(), "b".into(), "c".into()]))
        .await
        .unwrap();
    handle.wait_with_timeout(Duration::from_secs(2)).await.unwrap();

    let items = store.state(|s| s.items.clone()).await;
    assert_eq!(items, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn send_and_wait_for_returns_reduced_action() {
    let store = store();
    let action = store
        .send_and_wait_for(
            CartAction::Sync,
            |a| matches!(a, CartAction::Synced),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(action, CartAction::Synced);
    assert!(store.state(|s| s.last_sync.is_some()).await);
}

#[tokio::test]
async fn send_and_wait_for_times_out() {
    let store = store();
    let result = store
        .send_and_wait_for(
            CartAction::Add("cable".into()),
            |a| matches!(a, CartAction::Synced),
            Duration::from_millis(30),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn shutdown_rejects_new_actions() {
    let store = store();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.send(CartAction::Add("late".into())).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}

#[tokio::test]
async fn shutdown_times_out_with_slow_effects() {
    let store = store();
    let _ = store
        .send(CartAction::AddLater("slow".into(), 500))
        .await
        .unwrap();

    let result = store.shutdown(Duration::from_millis(20)).await;
    assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
}

#[tokio::test]
async fn clones_share_state() {
    let store = store();
    let other = store.clone();

    let _ = other.send(CartAction::Add("monitor".into())).await.unwrap();
    assert_eq!(store.state(|s| s.items.len()).await, 1);
}
