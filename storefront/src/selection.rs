//! Event selection on the details page and the add-to-cart commit.

use crate::cart;
use crate::environment::StorefrontEnvironment;
use crate::money::Money;
use crate::navigator::{Modal, Page};
use crate::notice::{notify, NoticeLevel};
use crate::reducer::{Effects, StorefrontState};
use crate::types::{CartItem, Event, EventId, PriceTier, UserSession, UNSPECIFIED_TIER};
use ticket_booth_core::SmallVec;

/// The event and tier chosen on the details page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    event_id: EventId,
    title: String,
    tiers: Vec<PriceTier>,
    tier: usize,
}

impl Selection {
    /// Selects `event` with its first tier preselected
    #[must_use]
    pub fn for_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.name.clone(),
            tiers: event.tiers.clone(),
            tier: 0,
        }
    }

    /// Selected event
    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Selected event title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Index of the chosen tier
    #[must_use]
    pub const fn tier_index(&self) -> usize {
        self.tier
    }

    /// Chosen tier label, or "Not specified" when the event has no tiers
    #[must_use]
    pub fn tier_label(&self) -> &str {
        self.tiers.get(self.tier).map_or(UNSPECIFIED_TIER, |tier| tier.label.as_str())
    }

    /// Chosen tier price, zero when the event has no tiers
    #[must_use]
    pub fn price(&self) -> Money {
        self.tiers.get(self.tier).map_or(Money::ZERO, |tier| tier.price)
    }

    /// Chooses another tier; out-of-range indexes are ignored
    pub fn choose_tier(&mut self, index: usize) -> bool {
        if index < self.tiers.len() {
            self.tier = index;
            true
        } else {
            false
        }
    }

    /// Builds the cart line, filling blank names from the session
    #[must_use]
    pub fn to_cart_item(&self, first_name: &str, last_name: &str, session: &UserSession) -> CartItem {
        let or_session = |typed: &str, fallback: &str| {
            let typed = typed.trim();
            if typed.is_empty() { fallback.to_string() } else { typed.to_string() }
        };

        CartItem {
            title: self.title.clone(),
            first_name: or_session(first_name, &session.name),
            last_name: or_session(last_name, &session.surname),
            tier: self.tier_label().to_string(),
            price: self.price(),
        }
    }
}

/// Selection actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionAction {
    /// Open the details page of a cached event
    Select {
        /// Event to select
        id: EventId,
    },
    /// Choose a price tier of the selected event
    ChooseTier {
        /// Tier index
        index: usize,
    },
    /// Open the attendee form for the selected tier
    Buy,
    /// Put the selected tier in the cart
    Commit {
        /// Attendee first name, blank to use the session's
        first_name: String,
        /// Attendee last name, blank to use the session's
        last_name: String,
    },
}

pub(crate) fn reduce(
    state: &mut StorefrontState,
    action: SelectionAction,
    env: &StorefrontEnvironment,
) -> Effects {
    match action {
        SelectionAction::Select { id } => {
            let Some(event) = state.catalog.find(&id) else {
                tracing::debug!(%id, "Selected event is not in the catalog");
                return SmallVec::new();
            };
            state.selection = Some(Selection::for_event(event));
            state.navigator.show_page(Page::EventDetails(id));
            SmallVec::new()
        },

        SelectionAction::ChooseTier { index } => {
            if let Some(selection) = state.selection.as_mut() {
                if !selection.choose_tier(index) {
                    tracing::debug!(index, "Ignoring unknown price tier");
                }
            }
            SmallVec::new()
        },

        SelectionAction::Buy => {
            if state.selection.is_some() {
                state.navigator.open(Modal::AddToCart);
            }
            SmallVec::new()
        },

        SelectionAction::Commit { first_name, last_name } => {
            let Some(selection) = state.selection.as_ref() else {
                tracing::debug!("Commit without a selection");
                return SmallVec::new();
            };
            let item = selection.to_cart_item(&first_name, &last_name, &state.session);
            let message = format!("Ticket for \"{}\" added to the cart.", item.title);

            cart::add(state, item, env);
            state.navigator.close(Modal::AddToCart);

            let mut effects = SmallVec::new();
            effects.push(notify(state, env, NoticeLevel::Info, message));
            effects
        },
    }
}
