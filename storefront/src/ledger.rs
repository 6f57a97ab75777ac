//! Issued tickets, append-only for the lifetime of a session.

use crate::money::Money;
use crate::persistence::{PersistedStore, TicketSlot};
use crate::types::{CartItem, Ticket};

/// Tickets issued on this client
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerState {
    tickets: Vec<Ticket>,
}

impl LedgerState {
    /// Restores a ledger from persisted tickets
    #[must_use]
    pub const fn from_tickets(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    /// Moves paid lines into the ledger, returning how many were issued
    pub fn append_all(&mut self, items: Vec<CartItem>) -> usize {
        let issued = items.len();
        self.tickets.extend(items.into_iter().map(Ticket::from));
        tracing::debug!(issued, total = self.tickets.len(), "Tickets appended to ledger");
        issued
    }

    /// Read-only view in issue order
    #[must_use]
    pub fn list(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Number of tickets
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Whether no ticket was issued yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// What all tickets cost together
    #[must_use]
    pub fn total_spent(&self) -> Money {
        Money::sum(self.tickets.iter().map(|ticket| ticket.price))
    }

    pub(crate) fn reset(&mut self) {
        self.tickets.clear();
    }

    pub(crate) fn persist(&self, store: &PersistedStore) {
        store.save_or_log::<TicketSlot>(&self.tickets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order_and_content() {
        let mut ledger = LedgerState::default();
        let first = CartItem {
            title: "A".to_string(),
            price: Money::from_cents(1000),
            ..CartItem::default()
        };
        let second = CartItem {
            title: "B".to_string(),
            price: Money::from_cents(500),
            ..CartItem::default()
        };

        assert_eq!(ledger.append_all(vec![first.clone()]), 1);
        assert_eq!(ledger.append_all(vec![second.clone(), first.clone()]), 2);

        let titles: Vec<_> = ledger.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "A"]);
        assert_eq!(ledger.list()[1], Ticket::from(second));
        assert_eq!(ledger.total_spent(), Money::from_cents(2500));
    }

    #[test]
    fn test_appending_nothing_is_harmless() {
        let mut ledger = LedgerState::default();
        assert_eq!(ledger.append_all(Vec::new()), 0);
        assert!(ledger.is_empty());
    }
}
