//! Cart line items.
//!
//! The total is recomputed from the lines on every read, never cached.
//! Every mutation made through [`CartAction`] is written to the cart slot
//! before the reducer returns.

use crate::environment::StorefrontEnvironment;
use crate::money::Money;
use crate::notice::{notify, NoticeLevel};
use crate::persistence::{CartSlot, PersistedStore};
use crate::reducer::{Effects, StorefrontState};
use crate::types::CartItem;
use ticket_booth_core::{smallvec, SmallVec};

/// The live cart
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Restores a cart from persisted lines
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Appends a line; the price is taken as given
    pub fn add_item(&mut self, item: CartItem) {
        tracing::debug!(title = %item.title, price = %item.price, "Cart line added");
        self.items.push(item);
    }

    /// Removes every line
    pub fn clear(&mut self) {
        tracing::debug!(removed = self.items.len(), "Cart cleared");
        self.items.clear();
    }

    /// Lines in insertion order
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of the line prices
    #[must_use]
    pub fn total(&self) -> Money {
        Money::sum(self.items.iter().map(|item| item.price))
    }

    /// Number of lines
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn persist(&self, store: &PersistedStore) {
        store.save_or_log::<CartSlot>(&self.items);
    }
}

/// Cart actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartAction {
    /// Append a line as given
    Add {
        /// Line to append
        item: CartItem,
    },
    /// Empty the cart
    Clear,
}

pub(crate) fn reduce(
    state: &mut StorefrontState,
    action: CartAction,
    env: &StorefrontEnvironment,
) -> Effects {
    match action {
        CartAction::Add { item } => {
            add(state, item, env);
            SmallVec::new()
        },
        CartAction::Clear => {
            state.cart.clear();
            state.cart.persist(&env.persistence);
            smallvec![notify(state, env, NoticeLevel::Info, "Cart cleared.")]
        },
    }
}

/// Appends a line and persists the cart
pub(crate) fn add(state: &mut StorefrontState, item: CartItem, env: &StorefrontEnvironment) {
    state.cart.add_item(item);
    state.cart.persist(&env.persistence);
    metrics::counter!("storefront.cart.items_added").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cents: u64) -> CartItem {
        CartItem {
            title: "Concert".to_string(),
            price: Money::from_cents(cents),
            ..CartItem::default()
        }
    }

    #[test]
    fn test_total_follows_adds_and_clears() {
        let mut cart = CartState::default();
        assert_eq!(cart.total(), Money::ZERO);

        cart.add_item(line(1000));
        cart.add_item(line(2550));
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total().to_string(), "€35.50");

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);

        cart.add_item(line(500));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_duplicate_lines_are_kept() {
        let mut cart = CartState::default();
        cart.add_item(line(1000));
        cart.add_item(line(1000));

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.items()[0], cart.items()[1]);
    }

    #[test]
    fn test_free_tickets_count_but_cost_nothing() {
        let cart = CartState::from_items(vec![line(0), line(0)]);
        assert_eq!(cart.count(), 2);
        assert!(cart.total().is_zero());
    }
}
