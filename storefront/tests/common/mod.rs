//! Shared fixtures for the storefront integration tests

#![allow(dead_code)] // Each test binary uses a different subset

use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticket_booth_runtime::Store;
use ticket_booth_storefront::api::{
    ApiError, ApiFuture, AuthReply, BackendApi, Credentials, Registration,
};
use ticket_booth_storefront::catalog::CatalogQuery;
use ticket_booth_storefront::carousel::AvatarSource;
use ticket_booth_storefront::types::{Event, EventId, UserProfile};
use ticket_booth_storefront::{
    Money, PersistedStore, StorefrontAction, StorefrontEnvironment, StorefrontReducer,
    StorefrontState,
};
use ticket_booth_testing::{test_clock, InMemoryStorage};

pub type Storefront =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

pub const WAIT: Duration = Duration::from_secs(5);

/// Backend answering from canned data and recording what it was asked
#[derive(Default)]
pub struct StubBackend {
    events: Vec<Event>,
    login_error: Option<ApiError>,
    profile: Option<UserProfile>,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl StubBackend {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn rejecting_logins(mut self, error: ApiError) -> Self {
        self.login_error = Some(error);
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn queries(&self) -> Vec<CatalogQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl BackendApi for StubBackend {
    fn fetch_events(&self, query: &CatalogQuery) -> ApiFuture<Vec<Event>> {
        self.queries.lock().unwrap().push(query.clone());
        let events = match query {
            CatalogQuery::Search(text) => self
                .events
                .iter()
                .filter(|e| e.name.to_lowercase().contains(&text.to_lowercase()))
                .cloned()
                .collect(),
            _ => self.events.clone(),
        };
        Box::pin(async move { Ok(events) })
    }

    fn login(&self, _credentials: Credentials) -> ApiFuture<AuthReply> {
        let reply = self.login_error.clone().map_or_else(
            || Ok(AuthReply { message: Some("Welcome back".to_string()) }),
            Err,
        );
        Box::pin(async move { reply })
    }

    fn register(&self, _registration: Registration) -> ApiFuture<AuthReply> {
        Box::pin(async { Ok(AuthReply::default()) })
    }

    fn fetch_profile(&self, _email: &str) -> ApiFuture<UserProfile> {
        let profile = self.profile.clone().ok_or_else(|| ApiError::Status {
            status: 404,
            detail: "User not found".to_string(),
        });
        Box::pin(async move { profile })
    }

    fn chat(&self, prompt: &str) -> ApiFuture<String> {
        let reply = format!("You asked: {prompt}");
        Box::pin(async move { Ok(reply) })
    }
}

pub struct FixedAvatar;

impl AvatarSource for FixedAvatar {
    fn avatar(&self) -> String {
        "avatar.png".to_string()
    }
}

pub fn concert() -> Event {
    Event::new(EventId::new("1"), "Jazz Night")
        .with_tier("Standard", Money::from_cents(2000))
        .with_tier("VIP", Money::from_cents(1550))
}

pub fn theatre() -> Event {
    Event::new(EventId::new("2"), "Hamlet").with_tier("Stalls", Money::from_cents(3000))
}

pub fn environment(storage: &InMemoryStorage, backend: Arc<StubBackend>) -> StorefrontEnvironment {
    let persistence = PersistedStore::new(Arc::new(storage.clone()));
    StorefrontEnvironment::new(backend, persistence)
        .with_clock(Arc::new(test_clock()))
        .with_avatars(Arc::new(FixedAvatar))
}

/// A store restored from `storage`, as the binary builds it at startup
pub fn storefront(storage: &InMemoryStorage, backend: Arc<StubBackend>) -> Storefront {
    let env = environment(storage, backend);
    let state = StorefrontState::restore(&env.persistence);
    Store::new(state, StorefrontReducer::new(), env)
}
