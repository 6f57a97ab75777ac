//! Property tests for cart totals and persisted cart and ledger reloads

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use std::sync::Arc;
use ticket_booth_storefront::cart::CartState;
use ticket_booth_storefront::ledger::LedgerState;
use ticket_booth_storefront::persistence::{CartSlot, TicketSlot};
use ticket_booth_storefront::types::{CartItem, Ticket};
use ticket_booth_storefront::{Money, PersistedStore};
use ticket_booth_testing::InMemoryStorage;

fn item() -> impl Strategy<Value = CartItem> {
    ("[A-Za-z ]{0,20}", "[A-Za-z]{0,8}", "[A-Za-z]{0,8}", "[A-Z]{0,6}", 0u64..50_000).prop_map(
        |(title, first_name, last_name, tier, cents)| CartItem {
            title,
            first_name,
            last_name,
            tier,
            price: Money::from_cents(cents),
        },
    )
}

#[derive(Clone, Debug)]
enum CartOp {
    Add(CartItem),
    Clear,
}

fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        4 => item().prop_map(CartOp::Add),
        1 => Just(CartOp::Clear),
    ]
}

proptest! {
    #[test]
    fn total_is_the_sum_of_line_prices(items in prop::collection::vec(item(), 0..30)) {
        let mut cart = CartState::default();
        for item in items.clone() {
            cart.add_item(item);
        }

        let expected: u64 = items.iter().map(|i| i.price.cents()).sum();
        prop_assert_eq!(cart.total(), Money::from_cents(expected));
        prop_assert_eq!(cart.count(), items.len());
        prop_assert_eq!(cart.is_empty(), items.is_empty());
    }

    #[test]
    fn count_and_total_follow_adds_since_the_last_clear(ops in prop::collection::vec(cart_op(), 0..40)) {
        let mut cart = CartState::default();
        let mut since_clear: Vec<CartItem> = Vec::new();

        for op in ops {
            match op {
                CartOp::Add(item) => {
                    since_clear.push(item.clone());
                    cart.add_item(item);
                },
                CartOp::Clear => {
                    since_clear.clear();
                    cart.clear();
                },
            }

            let expected: u64 = since_clear.iter().map(|i| i.price.cents()).sum();
            prop_assert_eq!(cart.count(), since_clear.len());
            prop_assert_eq!(cart.total(), Money::from_cents(expected));
            prop_assert_eq!(cart.items(), since_clear.as_slice());
        }
    }

    #[test]
    fn reloading_a_saved_ledger_changes_nothing(items in prop::collection::vec(item(), 0..10)) {
        let persistence = PersistedStore::new(Arc::new(InMemoryStorage::new()));
        let tickets: Vec<Ticket> = items.into_iter().map(Ticket::from).collect();
        persistence.save::<TicketSlot>(&tickets).unwrap();

        let first = LedgerState::from_tickets(persistence.load::<TicketSlot>());
        persistence.save::<TicketSlot>(&first.list().to_vec()).unwrap();
        let second = LedgerState::from_tickets(persistence.load::<TicketSlot>());

        prop_assert_eq!(first.list(), tickets.as_slice());
        prop_assert_eq!(&second, &first);
        let spent: u64 = tickets.iter().map(|t| t.price.cents()).sum();
        prop_assert_eq!(second.total_spent(), Money::from_cents(spent));
    }

    #[test]
    fn reloading_a_saved_cart_changes_nothing(items in prop::collection::vec(item(), 0..10)) {
        let persistence = PersistedStore::new(Arc::new(InMemoryStorage::new()));
        persistence.save::<CartSlot>(&items).unwrap();

        let first = persistence.load::<CartSlot>();
        persistence.save::<CartSlot>(&first).unwrap();
        let second = persistence.load::<CartSlot>();

        prop_assert_eq!(&first, &items);
        prop_assert_eq!(second, first);
    }

    #[test]
    fn euro_amounts_keep_their_cents(cents in 0u64..10_000_000) {
        let money = Money::from_cents(cents);
        prop_assert_eq!(Money::from_euros_f64(money.as_euros_f64()), Some(money));
    }
}

#[test]
fn test_corrupt_cart_loads_empty() {
    let storage = InMemoryStorage::new().with_entry("lb_cart_v1", "{not json");
    let persistence = PersistedStore::new(Arc::new(storage));
    assert!(persistence.load::<CartSlot>().is_empty());
}

#[test]
fn test_legacy_records_are_accepted() {
    let storage = InMemoryStorage::new().with_entry(
        "lb_cart_v1",
        r#"[{"title":"Jazz Night","name":null,"surname":"Turing","fascia":"VIP","price":"15.5"}]"#,
    );
    let persistence = PersistedStore::new(Arc::new(storage));
    let cart = CartState::from_items(persistence.load::<CartSlot>());

    assert_eq!(cart.count(), 1);
    assert_eq!(cart.items()[0].tier, "VIP");
    assert_eq!(cart.items()[0].first_name, "");
    assert_eq!(cart.total(), Money::from_cents(1550));
}
