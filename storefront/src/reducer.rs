//! Top-level storefront state, actions and reducer.
//!
//! The catalog, carousel and chat are self-contained features scoped into
//! the root state. Everything that spans features (selection, cart,
//! checkout, session, navigation, notices) runs in the app reducer, which
//! sees the whole [`StorefrontState`].

use crate::carousel::{CarouselAction, CarouselEnvironment, CarouselReducer, CarouselState};
use crate::cart::{self, CartAction, CartState};
use crate::catalog::{CatalogAction, CatalogReducer, CatalogState};
use crate::chat::{ChatAction, ChatReducer, ChatState};
use crate::checkout::{self, CheckoutAction, CheckoutState};
use crate::environment::StorefrontEnvironment;
use crate::ledger::LedgerState;
use crate::navigator::{Modal, NavigatorState, Page};
use crate::notice::Notice;
use crate::persistence::{CartSlot, PersistedStore, SessionSlot, TicketSlot};
use crate::selection::{self, Selection, SelectionAction};
use crate::session::{self, ProfileView, SessionAction};
use crate::types::UserSession;
use ticket_booth_core::composition::{combine_reducers, scope_reducer, BoxedReducer, CombinedReducer};
use ticket_booth_core::{Effect, Reducer, SmallVec};

/// Effects produced by the storefront reducers
pub type Effects = SmallVec<[Effect<StorefrontAction>; 4]>;

/// Everything the storefront holds in memory
#[derive(Clone, Debug, Default)]
pub struct StorefrontState {
    /// Who is using this client
    pub session: UserSession,
    /// Latest events from the backend
    pub catalog: CatalogState,
    /// Event and tier chosen on the details page
    pub selection: Option<Selection>,
    /// Live cart
    pub cart: CartState,
    /// Checkout pipeline
    pub checkout: CheckoutState,
    /// Issued tickets
    pub ledger: LedgerState,
    /// Review carousel
    pub carousel: CarouselState,
    /// Page and modal
    pub navigator: NavigatorState,
    /// Personal-info view
    pub profile: ProfileView,
    /// Chat transcript
    pub chat: ChatState,
    /// Current notice
    pub notice: Option<Notice>,
}

impl StorefrontState {
    /// Rebuilds the persisted part of the state (session, cart, ledger)
    #[must_use]
    pub fn restore(persistence: &PersistedStore) -> Self {
        let state = Self {
            session: persistence.load::<SessionSlot>(),
            cart: CartState::from_items(persistence.load::<CartSlot>()),
            ledger: LedgerState::from_tickets(persistence.load::<TicketSlot>()),
            ..Self::default()
        };

        tracing::debug!(
            logged_in = state.session.is_logged_in(),
            cart = state.cart.count(),
            tickets = state.ledger.len(),
            "State restored"
        );
        state
    }
}

/// Navigation intents
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationAction {
    /// Show a page
    Show(Page),
    /// Open a modal
    ///
    /// The checkout summary, payment form and personal-info view belong to
    /// their flows; opening them starts the flow step.
    Open(Modal),
    /// Close a modal; closing a checkout view cancels the checkout
    Close(Modal),
    /// Expand or collapse the user menu
    ToggleUserMenu,
}

/// Every user intent and effect result the storefront handles
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorefrontAction {
    /// Catalog cache
    Catalog(CatalogAction),
    /// Review carousel
    Carousel(CarouselAction),
    /// Chat assistant
    Chat(ChatAction),
    /// Pages and modals
    Navigation(NavigationAction),
    /// Event details and add-to-cart
    Selection(SelectionAction),
    /// Cart
    Cart(CartAction),
    /// Checkout pipeline
    Checkout(CheckoutAction),
    /// Login, registration, profile, logout
    Session(SessionAction),
    /// Notice timer elapsed
    DismissNotice,
}

/// Root reducer: scoped features followed by the app reducer
#[derive(Clone)]
pub struct StorefrontReducer {
    inner: CombinedReducer<StorefrontState, StorefrontAction, StorefrontEnvironment>,
}

impl StorefrontReducer {
    /// Builds the reducer tree
    #[must_use]
    pub fn new() -> Self {
        let catalog = scope_reducer(
            CatalogReducer::new(),
            catalog_state,
            |action: StorefrontAction| match action {
                StorefrontAction::Catalog(action) => Some(action),
                _ => None,
            },
            StorefrontAction::Catalog,
            same_environment,
        );
        let carousel = scope_reducer(
            CarouselReducer::new(),
            carousel_state,
            |action: StorefrontAction| match action {
                StorefrontAction::Carousel(action) => Some(action),
                _ => None,
            },
            StorefrontAction::Carousel,
            carousel_environment,
        );
        let chat = scope_reducer(
            ChatReducer::new(),
            chat_state,
            |action: StorefrontAction| match action {
                StorefrontAction::Chat(action) => Some(action),
                _ => None,
            },
            StorefrontAction::Chat,
            same_environment,
        );

        let reducers: Vec<BoxedReducer<StorefrontState, StorefrontAction, StorefrontEnvironment>> = vec![
            Box::new(catalog),
            Box::new(carousel),
            Box::new(chat),
            Box::new(AppReducer),
        ];

        Self {
            inner: combine_reducers(reducers),
        }
    }
}

impl Default for StorefrontReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        self.inner.reduce(state, action, env)
    }
}

fn catalog_state(state: &mut StorefrontState) -> &mut CatalogState {
    &mut state.catalog
}

fn carousel_state(state: &mut StorefrontState) -> &mut CarouselState {
    &mut state.carousel
}

fn chat_state(state: &mut StorefrontState) -> &mut ChatState {
    &mut state.chat
}

const fn same_environment(env: &StorefrontEnvironment) -> &StorefrontEnvironment {
    env
}

const fn carousel_environment(env: &StorefrontEnvironment) -> &CarouselEnvironment {
    &env.carousel
}

/// Cross-feature logic
#[derive(Clone, Copy)]
struct AppReducer;

impl Reducer for AppReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            StorefrontAction::Catalog(_)
            | StorefrontAction::Carousel(_)
            | StorefrontAction::Chat(_) => SmallVec::new(),
            StorefrontAction::Navigation(action) => navigate(state, action, env),
            StorefrontAction::Selection(action) => selection::reduce(state, action, env),
            StorefrontAction::Cart(action) => cart::reduce(state, action, env),
            StorefrontAction::Checkout(action) => checkout::reduce(state, action, env),
            StorefrontAction::Session(action) => session::reduce(state, action, env),
            StorefrontAction::DismissNotice => {
                state.notice = None;
                SmallVec::new()
            },
        }
    }
}

/// Leaving the checkout views for anything else cancels the checkout
fn leave_checkout(state: &mut StorefrontState, env: &StorefrontEnvironment) -> Effects {
    if matches!(state.checkout, CheckoutState::Idle) {
        return SmallVec::new();
    }
    checkout::reduce(state, CheckoutAction::Cancel, env)
}

fn navigate(
    state: &mut StorefrontState,
    action: NavigationAction,
    env: &StorefrontEnvironment,
) -> Effects {
    match action {
        NavigationAction::Show(page) => {
            let effects = leave_checkout(state, env);
            state.navigator.show_page(page);
            effects
        },
        NavigationAction::Open(Modal::CheckoutSummary) => {
            checkout::reduce(state, CheckoutAction::Begin, env)
        },
        NavigationAction::Open(Modal::Payment) => {
            checkout::reduce(state, CheckoutAction::ProceedToPayment, env)
        },
        NavigationAction::Open(Modal::PersonalInfo) => {
            let mut effects = leave_checkout(state, env);
            effects.extend(session::reduce(state, SessionAction::ShowProfile, env));
            effects
        },
        NavigationAction::Open(modal) => {
            let effects = leave_checkout(state, env);
            state.navigator.open(modal);
            effects
        },
        NavigationAction::Close(Modal::CheckoutSummary | Modal::Payment) => {
            checkout::reduce(state, CheckoutAction::Cancel, env)
        },
        NavigationAction::Close(modal) => {
            state.navigator.close(modal);
            SmallVec::new()
        },
        NavigationAction::ToggleUserMenu => {
            state.navigator.toggle_user_menu();
            SmallVec::new()
        },
    }
}
