//! Storefront binary
//!
//! Drives one purchase against a running backend: loads the featured
//! events, puts the first one in the cart, checks out, pays, and prints the
//! ticket ledger. Cart, tickets and session survive between runs in
//! `STOREFRONT_DATA_DIR`.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use ticket_booth_runtime::Store;
use ticket_booth_storefront::carousel::CarouselAction;
use ticket_booth_storefront::catalog::CatalogAction;
use ticket_booth_storefront::checkout::CheckoutAction;
use ticket_booth_storefront::navigator::Modal;
use ticket_booth_storefront::selection::SelectionAction;
use ticket_booth_storefront::storage::FileStorage;
use ticket_booth_storefront::types::{EventId, Review};
use ticket_booth_storefront::{
    format_euro, HttpBackend, NavigationAction, PersistedStore, StorefrontAction,
    StorefrontConfig, StorefrontEnvironment, StorefrontReducer, StorefrontState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

fn house_reviews() -> Vec<Review> {
    vec![
        Review {
            author: "Giulia".to_string(),
            rating: 5,
            text: "Booked two concert tickets in a minute. Flawless.".to_string(),
            avatar: "images/avatar-1.jpg".to_string(),
        },
        Review {
            author: "Marco".to_string(),
            rating: 4,
            text: "Great selection of events around town.".to_string(),
            avatar: "images/avatar-2.jpg".to_string(),
        },
        Review {
            author: "Sara".to_string(),
            rating: 5,
            text: "The assistant found me a jazz night for Saturday.".to_string(),
            avatar: "images/avatar-3.jpg".to_string(),
        },
    ]
}

type Storefront = Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

/// Puts one ticket for `event` in the cart, checks out and pays
async fn buy_and_pay(store: &Storefront, event: EventId, wait: Duration) -> anyhow::Result<()> {
    store
        .send(StorefrontAction::Selection(SelectionAction::Select { id: event }))
        .await?;
    store.send(StorefrontAction::Selection(SelectionAction::Buy)).await?;
    store
        .send(StorefrontAction::Selection(SelectionAction::Commit {
            first_name: String::new(),
            last_name: String::new(),
        }))
        .await?;

    store
        .send(StorefrontAction::Navigation(NavigationAction::Open(Modal::CheckoutSummary)))
        .await?;
    let total = store
        .state(|s| s.checkout.snapshot().map(|snapshot| snapshot.total()))
        .await;
    if let Some(total) = total {
        println!("Checkout total: {}", format_euro(total));
    }

    store
        .send(StorefrontAction::Navigation(NavigationAction::Open(Modal::Payment)))
        .await?;
    store
        .send_and_wait_for(
            StorefrontAction::Checkout(CheckoutAction::SubmitPayment),
            |a| matches!(a, StorefrontAction::Checkout(CheckoutAction::ConfirmationElapsed)),
            wait,
        )
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StorefrontConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("invalid storefront configuration")?;

    let storage = FileStorage::new(&config.data_dir)
        .with_context(|| format!("cannot open data directory {}", config.data_dir.display()))?;
    let persistence = PersistedStore::new(Arc::new(storage));
    let api = Arc::new(HttpBackend::new(config.api_base.clone()));
    let env = StorefrontEnvironment::from_config(&config, api, persistence.clone());

    let store = Store::new(
        StorefrontState::restore(&persistence),
        StorefrontReducer::new(),
        env,
    );

    tracing::info!(api_base = %config.api_base, "Storefront started");

    let (cart, tickets) = store.state(|s| (s.cart.count(), s.ledger.len())).await;
    println!("Restored {cart} cart item(s) and {tickets} ticket(s)");

    store
        .send(StorefrontAction::Carousel(CarouselAction::Init(house_reviews())))
        .await?;

    store
        .send_and_wait_for(
            StorefrontAction::Catalog(CatalogAction::LoadFeatured),
            |a| matches!(a, StorefrontAction::Catalog(CatalogAction::Loaded { .. })),
            BACKEND_TIMEOUT,
        )
        .await
        .context("backend did not answer the events request")?;

    let (featured, placeholder) = store
        .state(|s| {
            (
                s.catalog.visible().to_vec(),
                s.catalog.placeholder().map(str::to_string),
            )
        })
        .await;

    if let Some(placeholder) = placeholder {
        println!("{placeholder}");
    }
    for event in &featured {
        println!(
            "  {} | {} {} | {} | from {}",
            event.name,
            event.date,
            event.time,
            event.location,
            format_euro(event.min_price())
        );
    }

    if let Some(event) = featured.first() {
        buy_and_pay(&store, event.id.clone(), config.confirmation_delay + BACKEND_TIMEOUT).await?;
    }

    let (tickets, spent) = store
        .state(|s| (s.ledger.list().to_vec(), s.ledger.total_spent()))
        .await;
    println!("\nMy tickets ({}):", tickets.len());
    for ticket in &tickets {
        println!(
            "  {} | {} | {} | {}",
            ticket.title,
            ticket.tier,
            ticket.attendee(),
            format_euro(ticket.price)
        );
    }
    println!("Total spent: {}", format_euro(spent));

    store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
