//! Typed, independently persisted slots.
//!
//! Three records survive a restart: the session identity, the cart and the
//! ticket ledger. Loading never fails: a missing, unreadable or corrupt
//! record yields the slot default. Saving reports failures so the caller can
//! log them, but in-memory state stays authoritative either way.

use crate::types::{CartItem, Ticket, UserSession};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use ticket_booth_core::environment::{KeyValueStorage, StorageError};

/// A named persisted record with a default value
pub trait Slot {
    /// Storage key
    const KEY: &'static str;

    /// Stored value; `Default` is what a missing or corrupt record loads as
    type Value: Serialize + DeserializeOwned + Default;
}

/// Session identity, `lb_user_v1`
#[derive(Debug, Clone, Copy)]
pub struct SessionSlot;

impl Slot for SessionSlot {
    const KEY: &'static str = "lb_user_v1";
    type Value = UserSession;
}

/// Cart lines, `lb_cart_v1`
#[derive(Debug, Clone, Copy)]
pub struct CartSlot;

impl Slot for CartSlot {
    const KEY: &'static str = "lb_cart_v1";
    type Value = Vec<CartItem>;
}

/// Issued tickets, `lb_tickets_v1`
#[derive(Debug, Clone, Copy)]
pub struct TicketSlot;

impl Slot for TicketSlot {
    const KEY: &'static str = "lb_tickets_v1";
    type Value = Vec<Ticket>;
}

/// Errors from saving a slot
#[derive(Error, Debug)]
pub enum PersistError {
    /// The value could not be encoded
    #[error("Failed to encode slot '{key}': {source}")]
    Encode {
        /// Slot key
        key: &'static str,
        /// Underlying encoder error
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend rejected the write
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reads and writes slots through a [`KeyValueStorage`] backend
#[derive(Clone)]
pub struct PersistedStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl PersistedStore {
    /// Creates a store over the given backend
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Loads a slot, falling back to its default
    #[must_use]
    pub fn load<S: Slot>(&self) -> S::Value {
        let raw = match self.storage.get(S::KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return S::Value::default(),
            Err(e) => {
                tracing::warn!(slot = S::KEY, error = %e, "Storage unreadable, using default");
                return S::Value::default();
            },
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(slot = S::KEY, error = %e, "Discarding corrupt record");
            S::Value::default()
        })
    }

    /// Serializes and writes a slot
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or the backend write fails.
    pub fn save<S: Slot>(&self, value: &S::Value) -> Result<(), PersistError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| PersistError::Encode { key: S::KEY, source })?;
        self.storage.set(S::KEY, &raw)?;
        tracing::trace!(slot = S::KEY, bytes = raw.len(), "Slot saved");
        Ok(())
    }

    /// Saves a slot and logs a failure instead of returning it
    pub fn save_or_log<S: Slot>(&self, value: &S::Value) {
        if let Err(e) = self.save::<S>(value) {
            tracing::error!(slot = S::KEY, error = %e, "Failed to persist slot");
        }
    }

    /// Writes the default into all three slots
    ///
    /// Every slot is attempted even if an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`PersistError`] encountered.
    pub fn wipe_session(&self) -> Result<(), PersistError> {
        let results = [
            self.save::<SessionSlot>(&UserSession::default()),
            self.save::<CartSlot>(&Vec::new()),
            self.save::<TicketSlot>(&Vec::new()),
        ];
        results.into_iter().collect()
    }
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::money::Money;
    use ticket_booth_testing::InMemoryStorage;

    fn item(title: &str, cents: u64) -> CartItem {
        CartItem {
            title: title.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            tier: "Standard".to_string(),
            price: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_missing_slots_load_defaults() {
        let store = PersistedStore::new(Arc::new(InMemoryStorage::new()));

        assert_eq!(store.load::<SessionSlot>(), UserSession::default());
        assert!(store.load::<CartSlot>().is_empty());
        assert!(store.load::<TicketSlot>().is_empty());
    }

    #[test]
    fn test_corrupt_records_load_defaults() {
        let storage = InMemoryStorage::new()
            .with_entry(CartSlot::KEY, "{not json")
            .with_entry(TicketSlot::KEY, "null")
            .with_entry(SessionSlot::KEY, "[1, 2, 3]");
        let store = PersistedStore::new(Arc::new(storage));

        assert!(store.load::<CartSlot>().is_empty());
        assert!(store.load::<TicketSlot>().is_empty());
        assert_eq!(store.load::<SessionSlot>(), UserSession::default());
    }

    #[test]
    fn test_save_then_load_reproduces_order() {
        let store = PersistedStore::new(Arc::new(InMemoryStorage::new()));
        let cart = vec![item("B", 1000), item("A", 2550), item("B", 1000)];

        store.save::<CartSlot>(&cart).unwrap();

        assert_eq!(store.load::<CartSlot>(), cart);
    }

    #[test]
    fn test_failed_write_is_reported() {
        let storage = InMemoryStorage::new();
        let store = PersistedStore::new(Arc::new(storage.clone()));
        storage.fail_writes(true);

        let result = store.save::<CartSlot>(&vec![item("A", 100)]);

        assert!(matches!(result, Err(PersistError::Storage(StorageError::Write { .. }))));
        assert_eq!(storage.raw(CartSlot::KEY), None);
    }

    #[test]
    fn test_wipe_session_writes_all_defaults() {
        let storage = InMemoryStorage::new();
        let store = PersistedStore::new(Arc::new(storage.clone()));
        store
            .save::<SessionSlot>(&UserSession {
                name: "ada".to_string(),
                surname: String::new(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();
        store.save::<CartSlot>(&vec![item("A", 100)]).unwrap();
        store.save::<TicketSlot>(&vec![item("B", 200).into()]).unwrap();

        store.wipe_session().unwrap();

        assert_eq!(storage.raw(CartSlot::KEY).as_deref(), Some("[]"));
        assert_eq!(storage.raw(TicketSlot::KEY).as_deref(), Some("[]"));
        assert_eq!(store.load::<SessionSlot>(), UserSession::default());
    }
}
