//! Storefront order pages - command-line demo
//!
//! Signs in, opens the order detail page for `STOREFRONT_TRANSACTION_ID` and
//! the payments list, and prints what each page would render.
//!
//! Without `STOREFRONT_API_URL` the sample in-memory backend is used.
//!
//! Run with: `RUST_LOG=debug cargo run --bin storefront`

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use storefront::gateway::memory::sample_orders;
use storefront::{
    AccessToken, HistoryAction, HistoryEnvironment, HistoryReducer, HistoryState, HistoryView,
    HttpOrderGateway, InMemoryOrderGateway, OrderDetailAction, OrderDetailEnvironment,
    OrderDetailReducer, OrderDetailState, OrderGateway, OrderStatusProjector, OrderView,
    SessionEvent, StorefrontConfig, resolve_history, resolve_view,
};
use storefront_core::environment::{Clock, SystemClock};
use storefront_runtime::Store;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = StorefrontConfig::from_env()?;
    let clock = Arc::new(SystemClock);

    let gateway: Arc<dyn OrderGateway> = match &config.api_url {
        Some(url) => {
            info!(%url, "Using HTTP order backend");
            Arc::new(HttpOrderGateway::new(url.clone(), config.fetch_timeout)?)
        },
        None => {
            info!("STOREFRONT_API_URL not set, using sample orders");
            Arc::new(InMemoryOrderGateway::with_orders(sample_orders(clock.now())))
        },
    };
    let token = config
        .api_token
        .clone()
        .unwrap_or_else(|| AccessToken::new("demo-token"));
    let projector = OrderStatusProjector::new(clock);
    let wait = config.fetch_timeout + Duration::from_secs(1);

    // Order detail page
    let detail = Store::new(
        OrderDetailState::default(),
        OrderDetailReducer::new(),
        OrderDetailEnvironment::new(Arc::clone(&gateway)),
    );
    detail
        .send(OrderDetailAction::Session(SessionEvent::SignedIn {
            user: "demo".to_string(),
            token: token.clone(),
        }))
        .await?;
    detail
        .send_and_wait_for(
            OrderDetailAction::ViewEntered {
                transaction_id: config.transaction_id.clone(),
            },
            |action| {
                matches!(
                    action,
                    OrderDetailAction::OrderLoaded { .. } | OrderDetailAction::OrderLoadFailed { .. }
                )
            },
            wait,
        )
        .await?;

    match detail.state(|state| resolve_view(state, &projector)).await {
        OrderView::Ready(model) => println!("{}", serde_json::to_string_pretty(&model)?),
        OrderView::NotFound { transaction_id } => warn!(%transaction_id, "Order not found"),
        OrderView::Failed {
            transaction_id,
            reason,
        } => warn!(%transaction_id, %reason, "Order could not be loaded"),
        OrderView::Redirect(route) => warn!(%route, "Redirected"),
        OrderView::Loading => warn!("Order still loading"),
    }

    // Payments list
    let history = Store::new(
        HistoryState::default(),
        HistoryReducer::new(),
        HistoryEnvironment::new(gateway),
    );
    history
        .send(HistoryAction::Session(SessionEvent::SignedIn {
            user: "demo".to_string(),
            token,
        }))
        .await?;
    history
        .send_and_wait_for(
            HistoryAction::HistoryRequested,
            |action| {
                matches!(
                    action,
                    HistoryAction::HistoryLoaded { .. } | HistoryAction::HistoryLoadFailed { .. }
                )
            },
            wait,
        )
        .await?;

    match history.state(|state| resolve_history(state, &projector)).await {
        HistoryView::Ready(rows) => {
            for row in rows {
                info!(
                    link = %row.link,
                    status = %row.summary.status_label,
                    amount = %row.summary.formatted_amount,
                    issued = %row.summary.elapsed_time_text,
                    "Payment"
                );
            }
        },
        HistoryView::Failed { reason } => warn!(%reason, "History could not be loaded"),
        HistoryView::Redirect(route) => warn!(%route, "Redirected"),
        HistoryView::Loading => warn!("History still loading"),
    }

    detail.shutdown(Duration::from_secs(5)).await?;
    history.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
