//! # Ticket Booth Storefront
//!
//! Client-side state of an event ticket storefront: the catalog fetched from
//! the backend, a persisted cart, the checkout and simulated payment flow,
//! the ledger of issued tickets, and a rotating review carousel.
//!
//! ## Architecture
//!
//! All state lives in one [`StorefrontState`] owned by a
//! [`Store`](ticket_booth_runtime::Store). User intents, backend responses
//! and timer ticks are [`StorefrontAction`]s, handled one at a time by the
//! [`StorefrontReducer`]. Backend calls and timers are described as effects
//! and run by the store; the cart, ledger and session identity are written
//! to their slots synchronously inside the reducer.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ticket_booth_runtime::Store;
//! use ticket_booth_storefront::{
//!     HttpBackend, PersistedStore, StorefrontAction, StorefrontEnvironment,
//!     StorefrontReducer, StorefrontState,
//! };
//! use ticket_booth_storefront::storage::FileStorage;
//! use ticket_booth_storefront::catalog::CatalogAction;
//!
//! let persistence = PersistedStore::new(Arc::new(FileStorage::new(".ticket-booth")?));
//! let env = StorefrontEnvironment::new(Arc::new(HttpBackend::new("http://localhost:8000")), persistence.clone());
//! let store = Store::new(StorefrontState::restore(&persistence), StorefrontReducer::new(), env);
//!
//! store.send(StorefrontAction::Catalog(CatalogAction::LoadFeatured)).await?;
//! ```

pub mod api;
pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod environment;
pub mod ledger;
pub mod money;
pub mod navigator;
pub mod notice;
pub mod persistence;
pub mod reducer;
pub mod selection;
pub mod session;
pub mod storage;
pub mod types;

pub use api::{ApiError, BackendApi, HttpBackend};
pub use config::{ConfigError, StorefrontConfig};
pub use environment::StorefrontEnvironment;
pub use money::{format_euro, Money};
pub use persistence::{PersistError, PersistedStore};
pub use reducer::{NavigationAction, StorefrontAction, StorefrontReducer, StorefrontState};
