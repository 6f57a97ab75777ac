//! Which page is showing and which modal, if any, is on top of it.

use crate::types::EventId;

/// Top-level pages
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Page {
    /// Catalog and reviews
    #[default]
    Home,
    /// Details of one event
    EventDetails(EventId),
    /// Event creation form (admin)
    CreateEvent,
}

/// Modal dialogs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modal {
    /// Login form
    Login,
    /// Registration form
    Register,
    /// About the site
    Info,
    /// Personal details of the logged-in user
    PersonalInfo,
    /// Cart contents
    Cart,
    /// Attendee names for the selected tier
    AddToCart,
    /// Checkout summary
    CheckoutSummary,
    /// Payment form
    Payment,
    /// Issued tickets
    MyTickets,
    /// Chat assistant
    Chat,
}

/// Navigation state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigatorState {
    page: Page,
    modal: Option<Modal>,
    user_menu_open: bool,
}

impl NavigatorState {
    /// Active page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Open modal
    #[must_use]
    pub const fn modal(&self) -> Option<Modal> {
        self.modal
    }

    /// Whether `modal` is the open one
    #[must_use]
    pub fn is_open(&self, modal: Modal) -> bool {
        self.modal == Some(modal)
    }

    /// Whether the user menu is expanded
    #[must_use]
    pub const fn user_menu_open(&self) -> bool {
        self.user_menu_open
    }

    /// Switches page, closing any modal and the user menu
    pub fn show_page(&mut self, page: Page) {
        tracing::debug!(?page, "Page shown");
        self.page = page;
        self.modal = None;
        self.user_menu_open = false;
    }

    /// Opens `modal` in place of any other
    pub fn open(&mut self, modal: Modal) {
        self.modal = Some(modal);
        self.user_menu_open = false;
    }

    /// Closes `modal` if it is the open one
    ///
    /// Returns whether it was open.
    pub fn close(&mut self, modal: Modal) -> bool {
        if self.is_open(modal) {
            self.modal = None;
            true
        } else {
            false
        }
    }

    /// Toggles the user menu
    pub fn toggle_user_menu(&mut self) {
        self.user_menu_open = !self.user_menu_open;
    }

    /// Collapses the user menu
    pub fn close_user_menu(&mut self) {
        self.user_menu_open = false;
    }
}
