//! Checkout pipeline state machine.
//!
//! ```text
//! Idle ──begin──▶ Reviewing ──proceed──▶ AwaitingPayment ──submit──▶ Completed
//!  ▲                  │  ▲                      │                        │
//!  └──── cancel ──────┘  └──── begin (fresh snapshot, from any state) ───┘
//!  ▲                                                                     │
//!  └──────────────────────── confirmation delay elapsed ─────────────────┘
//! ```
//!
//! Checkout and payment act on a snapshot of the cart taken when checkout
//! begins, so edits to the live cart during checkout change nothing about
//! what gets paid for. Beginning again always replaces the snapshot.

use crate::environment::StorefrontEnvironment;
use crate::money::Money;
use crate::navigator::Modal;
use crate::notice::{notify, NoticeLevel};
use crate::reducer::{Effects, StorefrontAction, StorefrontState};
use crate::types::CartItem;
use thiserror::Error;
use ticket_booth_core::{cancellable, smallvec, Effect, EffectId, SmallVec};

/// Identifier of the post-payment confirmation timer
pub const CONFIRMATION: EffectId = EffectId::new("checkout.confirmation");

const EMPTY_CART: &str = "The cart is empty!";
const PAYMENT_COMPLETED: &str = "Payment completed!";

/// Frozen copy of the cart taken at checkout start
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSnapshot {
    items: Vec<CartItem>,
    total: Money,
}

impl CheckoutSnapshot {
    fn capture(items: &[CartItem]) -> Self {
        Self {
            items: items.to_vec(),
            total: Money::sum(items.iter().map(|item| item.price)),
        }
    }

    /// Frozen lines
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total at the time of the snapshot
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Number of frozen lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a captured snapshot
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where the checkout currently is
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// No checkout in progress
    #[default]
    Idle,
    /// Summary shown for the snapshot
    Reviewing(CheckoutSnapshot),
    /// Payment form open for the snapshot
    AwaitingPayment(CheckoutSnapshot),
    /// Payment accepted; returns to `Idle` after the confirmation delay
    Completed {
        /// Number of tickets issued
        issued: usize,
        /// Amount paid
        paid: Money,
    },
}

/// Rejected checkout transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout cannot start without items
    #[error("Cannot begin checkout: the cart is empty")]
    EmptyCart,

    /// The requested step is not valid from the current state
    #[error("Cannot {attempted} while {state}")]
    InvalidTransition {
        /// What was attempted
        attempted: &'static str,
        /// State the pipeline was in
        state: &'static str,
    },
}

impl CheckoutState {
    /// Starts (or restarts) checkout with a fresh snapshot of `cart`
    ///
    /// Valid from every state. On an empty cart nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if `cart` has no lines.
    pub fn begin(&mut self, cart: &[CartItem]) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if !matches!(self, Self::Idle) {
            tracing::debug!(from = self.name(), "Restarting checkout with a fresh snapshot");
        }

        *self = Self::Reviewing(CheckoutSnapshot::capture(cart));
        Ok(())
    }

    /// Moves from the summary to the payment form
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless `Reviewing`.
    pub fn proceed_to_payment(&mut self) -> Result<(), CheckoutError> {
        match std::mem::take(self) {
            Self::Reviewing(snapshot) => {
                *self = Self::AwaitingPayment(snapshot);
                Ok(())
            },
            other => {
                let state = other.name();
                *self = other;
                Err(CheckoutError::InvalidTransition { attempted: "proceed to payment", state })
            },
        }
    }

    /// Accepts the simulated payment and hands back the snapshot's lines
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless `AwaitingPayment`.
    pub fn submit_payment(&mut self) -> Result<Vec<CartItem>, CheckoutError> {
        match std::mem::take(self) {
            Self::AwaitingPayment(snapshot) => {
                *self = Self::Completed {
                    issued: snapshot.len(),
                    paid: snapshot.total,
                };
                Ok(snapshot.items)
            },
            other => {
                let state = other.name();
                *self = other;
                Err(CheckoutError::InvalidTransition { attempted: "submit payment", state })
            },
        }
    }

    /// Returns from `Completed` to `Idle`
    ///
    /// Returns whether a transition happened.
    pub fn finish(&mut self) -> bool {
        if matches!(self, Self::Completed { .. }) {
            *self = Self::Idle;
            true
        } else {
            false
        }
    }

    /// Discards any checkout in progress
    pub fn cancel(&mut self) {
        if !matches!(self, Self::Idle) {
            tracing::debug!(from = self.name(), "Checkout cancelled");
        }
        *self = Self::Idle;
    }

    /// The snapshot being reviewed or paid for
    #[must_use]
    pub const fn snapshot(&self) -> Option<&CheckoutSnapshot> {
        match self {
            Self::Reviewing(snapshot) | Self::AwaitingPayment(snapshot) => Some(snapshot),
            Self::Idle | Self::Completed { .. } => None,
        }
    }

    /// Whether the summary is shown
    #[must_use]
    pub const fn is_reviewing(&self) -> bool {
        matches!(self, Self::Reviewing(_))
    }

    /// Whether the payment form is open
    #[must_use]
    pub const fn is_awaiting_payment(&self) -> bool {
        matches!(self, Self::AwaitingPayment(_))
    }

    /// Whether a payment just completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// State name for logs and errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reviewing(_) => "reviewing",
            Self::AwaitingPayment(_) => "awaiting payment",
            Self::Completed { .. } => "completed",
        }
    }
}

/// Checkout actions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutAction {
    /// Snapshot the cart and show the summary
    Begin,
    /// Open the payment form
    ProceedToPayment,
    /// Submit the (simulated) payment
    SubmitPayment,
    /// Close the summary or payment form
    Cancel,
    /// Confirmation delay after payment elapsed
    ConfirmationElapsed,
}

pub(crate) fn reduce(
    state: &mut StorefrontState,
    action: CheckoutAction,
    env: &StorefrontEnvironment,
) -> Effects {
    match action {
        CheckoutAction::Begin => {
            let restarting_after_payment = state.checkout.is_completed();
            if let Err(e) = state.checkout.begin(state.cart.items()) {
                tracing::debug!(error = %e, "Checkout not started");
                return smallvec![notify(state, env, NoticeLevel::Error, EMPTY_CART)];
            }

            state.navigator.open(Modal::CheckoutSummary);
            if restarting_after_payment {
                smallvec![Effect::Cancel(CONFIRMATION)]
            } else {
                SmallVec::new()
            }
        },

        CheckoutAction::ProceedToPayment => {
            match state.checkout.proceed_to_payment() {
                Ok(()) => state.navigator.open(Modal::Payment),
                Err(e) => tracing::warn!(error = %e, "Ignoring checkout step"),
            }
            SmallVec::new()
        },

        CheckoutAction::SubmitPayment => {
            let items = match state.checkout.submit_payment() {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring checkout step");
                    return SmallVec::new();
                },
            };

            let paid = Money::sum(items.iter().map(|item| item.price));
            let issued = state.ledger.append_all(items);
            state.ledger.persist(&env.persistence);

            state.cart.clear();
            state.cart.persist(&env.persistence);

            tracing::info!(issued, %paid, "Payment completed");
            metrics::counter!("storefront.tickets.issued")
                .increment(u64::try_from(issued).unwrap_or(u64::MAX));

            smallvec![
                notify(state, env, NoticeLevel::Info, PAYMENT_COMPLETED),
                cancellable! {
                    id: CONFIRMATION,
                    duration: env.confirmation_delay,
                    action: StorefrontAction::Checkout(CheckoutAction::ConfirmationElapsed)
                },
            ]
        },

        CheckoutAction::Cancel => {
            cancel(state);
            smallvec![Effect::Cancel(CONFIRMATION)]
        },

        CheckoutAction::ConfirmationElapsed => {
            if state.checkout.finish() {
                state.navigator.close(Modal::Payment);
                tracing::debug!("Checkout returned to idle");
            }
            SmallVec::new()
        },
    }
}

/// Drops any checkout in progress and closes its views; the cart is untouched
pub(crate) fn cancel(state: &mut StorefrontState) {
    state.checkout.cancel();
    state.navigator.close(Modal::CheckoutSummary);
    state.navigator.close(Modal::Payment);
}
