//! Login, registration, personal info and logout.
//!
//! The client trusts its local identity record: there is no token and no
//! expiry. Logout is a full session wipe (identity, cart and ledger).

use crate::api::{ApiError, AuthReply, Credentials, Registration};
use crate::checkout::{self, CONFIRMATION};
use crate::environment::StorefrontEnvironment;
use crate::navigator::Modal;
use crate::notice::{notify, NoticeLevel};
use crate::persistence::SessionSlot;
use crate::reducer::{Effects, StorefrontAction, StorefrontState};
use crate::types::{UserProfile, UserSession};
use ticket_booth_core::{async_effect, smallvec, Effect, SmallVec};

const LOGIN_SUCCEEDED: &str = "Login successful";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const REGISTERED: &str = "Registration complete! Please log in.";
const INVALID_DATA: &str = "Invalid data";

/// What the personal-info view shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProfileView {
    /// Not requested
    #[default]
    Hidden,
    /// Waiting for the backend
    Loading,
    /// Details to show
    Loaded(UserProfile),
    /// Not logged in, or the backend failed
    Failed,
}

/// Session actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Submit the login form
    Login(Credentials),
    /// Backend answered a login
    LoginCompleted {
        /// Email the login was attempted with
        email: String,
        /// Backend reply
        result: Result<AuthReply, ApiError>,
    },
    /// Submit the registration form
    Register(Registration),
    /// Backend answered a registration
    RegisterCompleted {
        /// Backend reply
        result: Result<AuthReply, ApiError>,
    },
    /// Open the personal-info view
    ShowProfile,
    /// Backend answered a profile request
    ProfileLoaded {
        /// Email the profile was requested for
        email: String,
        /// Profile or failure
        result: Result<UserProfile, ApiError>,
    },
    /// Forget the identity, cart and tickets
    Logout,
}

/// The backend's detail, or `fallback` when there is none
fn detail_or(error: &ApiError, fallback: &str) -> String {
    let detail = error.user_message();
    if detail.trim().is_empty() { fallback.to_string() } else { detail }
}

pub(crate) fn reduce(
    state: &mut StorefrontState,
    action: SessionAction,
    env: &StorefrontEnvironment,
) -> Effects {
    match action {
        SessionAction::Login(credentials) => {
            let email = credentials.email.trim().to_string();
            let credentials = Credentials { email: email.clone(), ..credentials };
            let api = env.api.clone();
            tracing::debug!(%email, "Logging in");

            smallvec![async_effect! {
                let result = api.login(credentials).await;
                Some(StorefrontAction::Session(SessionAction::LoginCompleted { email, result }))
            }]
        },

        SessionAction::LoginCompleted { email, result } => match result {
            Ok(reply) => {
                let name = email.split('@').next().unwrap_or_default().to_string();
                state.session = UserSession {
                    name,
                    surname: std::mem::take(&mut state.session.surname),
                    email,
                };
                env.persistence.save_or_log::<SessionSlot>(&state.session);
                state.navigator.close(Modal::Login);
                tracing::info!(email = %state.session.email, "Logged in");

                let message = reply
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| LOGIN_SUCCEEDED.to_string());
                smallvec![notify(state, env, NoticeLevel::Info, message)]
            },
            Err(e) => {
                tracing::warn!(%email, error = %e, "Login failed");
                let message = format!("Login failed: {}", detail_or(&e, INVALID_CREDENTIALS));
                smallvec![notify(state, env, NoticeLevel::Error, message)]
            },
        },

        SessionAction::Register(registration) => {
            let api = env.api.clone();
            tracing::debug!(email = %registration.email, "Registering");

            smallvec![async_effect! {
                let result = api.register(registration).await;
                Some(StorefrontAction::Session(SessionAction::RegisterCompleted { result }))
            }]
        },

        SessionAction::RegisterCompleted { result } => match result {
            Ok(_) => {
                tracing::info!("Registration accepted");
                state.navigator.open(Modal::Login);
                smallvec![notify(state, env, NoticeLevel::Info, REGISTERED)]
            },
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                let message = format!("Registration failed: {}", detail_or(&e, INVALID_DATA));
                smallvec![notify(state, env, NoticeLevel::Error, message)]
            },
        },

        SessionAction::ShowProfile => {
            state.navigator.open(Modal::PersonalInfo);
            if !state.session.is_logged_in() {
                state.profile = ProfileView::Failed;
                return SmallVec::new();
            }

            state.profile = ProfileView::Loading;
            let email = state.session.email.clone();
            let api = env.api.clone();

            smallvec![async_effect! {
                let result = api.fetch_profile(&email).await;
                Some(StorefrontAction::Session(SessionAction::ProfileLoaded { email, result }))
            }]
        },

        SessionAction::ProfileLoaded { email, result } => {
            if email != state.session.email || state.profile != ProfileView::Loading {
                tracing::debug!(%email, "Ignoring stale profile response");
                return SmallVec::new();
            }

            state.profile = match result {
                Ok(profile) => ProfileView::Loaded(profile),
                Err(e) => {
                    tracing::warn!(%email, error = %e, "Profile request failed");
                    ProfileView::Failed
                },
            };
            SmallVec::new()
        },

        SessionAction::Logout => {
            tracing::info!(email = %state.session.email, "Logging out");

            checkout::cancel(state);
            state.session = UserSession::default();
            state.cart.clear();
            state.ledger.reset();
            state.profile = ProfileView::Hidden;
            state.navigator.close_user_menu();
            state.navigator.close(Modal::PersonalInfo);
            state.navigator.close(Modal::MyTickets);

            if let Err(e) = env.persistence.wipe_session() {
                tracing::error!(error = %e, "Failed to wipe persisted session");
            }

            smallvec![Effect::Cancel(CONFIRMATION)]
        },
    }
}
