//! # Ticket Booth Testing
//!
//! Testing utilities and helpers for the Ticket Booth reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use ticket_booth_testing::{mocks::InMemoryStorage, test_clock};
//! use ticket_booth_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_checkout_flow() {
//!     let storage = InMemoryStorage::new();
//!     let env = test_environment(storage.clone());
//!     let store = Store::new(StorefrontState::restore(&env.persistence), StorefrontReducer::new(), env);
//!
//!     store.send(StorefrontAction::Checkout(CheckoutAction::Begin)).await?;
//!     assert!(store.state(|s| s.checkout.is_reviewing()).await);
//! }
//! ```

use chrono::{DateTime, Utc};
use ticket_booth_core::environment::{Clock, KeyValueStorage, StorageError};


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, KeyValueStorage, StorageError, Utc};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_booth_testing::mocks::FixedClock;
    /// use ticket_booth_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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

    /// In-memory key-value storage
    ///
    /// Clones share the same contents, so a test can keep one handle while
    /// the environment owns another and inspect what was written. Raw values
    /// can be seeded directly to simulate corrupt or foreign records, and
    /// writes can be made to fail.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_booth_testing::mocks::InMemoryStorage;
    /// use ticket_booth_core::environment::KeyValueStorage;
    ///
    /// let storage = InMemoryStorage::new().with_entry("lb_cart_v1", "not json");
    /// assert_eq!(storage.raw("lb_cart_v1").as_deref(), Some("not json"));
    ///
    /// storage.fail_writes(true);
    /// assert!(storage.set("lb_cart_v1", "[]").is_err());
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryStorage {
        entries: Arc<Mutex<BTreeMap<String, String>>>,
        failing: Arc<AtomicBool>,
    }

    impl InMemoryStorage {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a raw value, bypassing any encoding
        #[must_use]
        pub fn with_entry(self, key: &str, raw: &str) -> Self {
            self.entries().insert(key.to_string(), raw.to_string());
            self
        }

        /// Make every subsequent `set` and `remove` fail (or succeed again)
        pub fn fail_writes(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// The raw value stored under `key`
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries().get(key).cloned()
        }

        /// All keys currently stored, in order
        #[must_use]
        pub fn keys(&self) -> Vec<String> {
            self.entries().keys().cloned().collect()
        }

        fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
            self.entries.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn check_writable(&self, key: &str) -> Result<(), StorageError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Write {
                    key: key.to_string(),
                    message: "writes disabled by test".to_string(),
                });
            }
            Ok(())
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check_writable(key)?;
            self.entries().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.check_writable(key)?;
            self.entries().remove(key);
            Ok(())
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    /// Route `tracing` output through the test harness
    ///
    /// Safe to call from every test; only the first call installs a subscriber.
    /// Honors `RUST_LOG`, defaulting to `debug`.
    pub fn init_test_tracing() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, InMemoryStorage};
