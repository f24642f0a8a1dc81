//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront reducer architecture.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Effect assertion helpers
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(OrderDetailReducer::new())
//!     .with_env(test_environment())
//!     .given_state(OrderDetailState::signed_in("ana"))
//!     .when_action(OrderDetailAction::ViewEntered { transaction_id })
//!     .then_state(|s| assert!(s.order.is_loading()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    use chrono::{DateTime, Utc};

    /// Parse an RFC 3339 timestamp for test fixtures
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not a valid RFC 3339 timestamp.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("test timestamp should be RFC 3339")
            .with_timezone(&Utc)
    }

    /// Install a test-friendly tracing subscriber (idempotent)
    ///
    /// Output is captured by the test harness and only shown for failing tests.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::timestamp;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
