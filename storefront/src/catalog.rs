//! Catalog cache: the latest events fetched from the backend.
//!
//! Every request is numbered. A response only lands if it carries the latest
//! number, so a slow answer to an old filter cannot overwrite a newer search.

use crate::api::ApiError;
use crate::environment::StorefrontEnvironment;
use crate::types::{Event, EventId};
use std::fmt;
use ticket_booth_core::{async_effect, smallvec, Effect, Reducer, SmallVec};

/// Number of events on the landing view
pub const FEATURED_LIMIT: usize = 3;

const LOAD_FAILED: &str = "Could not load events";
const SEARCH_FAILED: &str = "Search failed";
const NOTHING_FOUND: &str = "No events found.";
const NOTHING_MATCHED: &str = "No events match this search.";

/// Day-based catalog filters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayFilter {
    /// Events happening today
    Today,
    /// Events happening tomorrow
    Tomorrow,
    /// Events on the coming weekend
    Weekend,
}

impl DayFilter {
    /// Wire form sent as the `filter` query parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Weekend => "weekend",
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the catalog was asked for
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Every event
    #[default]
    All,
    /// Events on a given day
    Filter(DayFilter),
    /// Events whose name matches
    Search(String),
}

impl CatalogQuery {
    /// Query-string parameters for `GET /events`
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::All => Vec::new(),
            Self::Filter(filter) => vec![("filter", filter.as_str().to_string())],
            Self::Search(text) => vec![("search", text.clone())],
        }
    }
}

/// Where the latest request stands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the backend
    Loading,
    /// Events are current
    Loaded,
    /// The latest request failed; `message` is the inline placeholder
    Failed {
        /// Placeholder text
        message: String,
    },
}

/// Catalog state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogState {
    events: Vec<Event>,
    query: CatalogQuery,
    limit: Option<usize>,
    status: CatalogStatus,
    request: u64,
}

impl CatalogState {
    /// Every cached event
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events to render: none unless loaded, at most [`FEATURED_LIMIT`] on
    /// the landing view
    #[must_use]
    pub fn visible(&self) -> &[Event] {
        if self.status != CatalogStatus::Loaded {
            return &[];
        }
        let shown = self.limit.map_or(self.events.len(), |limit| limit.min(self.events.len()));
        &self.events[..shown]
    }

    /// Looks up a cached event for the details page
    #[must_use]
    pub fn find(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    /// Current query
    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> &CatalogStatus {
        &self.status
    }

    /// Number of the latest request
    #[must_use]
    pub const fn latest_request(&self) -> u64 {
        self.request
    }

    /// Inline text shown instead of (or for lack of) event cards
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        match &self.status {
            CatalogStatus::Failed { message } => Some(message),
            CatalogStatus::Loaded if self.events.is_empty() => match self.query {
                CatalogQuery::Search(_) => Some(NOTHING_MATCHED),
                CatalogQuery::All | CatalogQuery::Filter(_) => Some(NOTHING_FOUND),
            },
            _ => None,
        }
    }
}

/// Catalog actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogAction {
    /// Landing view: every event, first few shown
    LoadFeatured,
    /// Every event, all shown
    ShowAll,
    /// A day filter, first few shown
    ApplyFilter(DayFilter),
    /// Name search, all matches shown; blank text is ignored
    Search(String),
    /// Backend answered request number `request`
    Loaded {
        /// Request number the response belongs to
        request: u64,
        /// Events or the failure
        result: Result<Vec<Event>, ApiError>,
    },
}

/// Reducer for the catalog cache
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn request(
        state: &mut CatalogState,
        query: CatalogQuery,
        limit: Option<usize>,
        env: &StorefrontEnvironment,
    ) -> Effect<CatalogAction> {
        state.request += 1;
        state.query = query.clone();
        state.limit = limit;
        state.status = CatalogStatus::Loading;

        let request = state.request;
        let api = env.api.clone();
        tracing::debug!(request, ?query, "Requesting events");

        async_effect! {
            let result = api.fetch_events(&query).await;
            Some(CatalogAction::Loaded { request, result })
        }
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CatalogAction::LoadFeatured => {
                smallvec![Self::request(state, CatalogQuery::All, Some(FEATURED_LIMIT), env)]
            },
            CatalogAction::ShowAll => {
                smallvec![Self::request(state, CatalogQuery::All, None, env)]
            },
            CatalogAction::ApplyFilter(filter) => smallvec![Self::request(
                state,
                CatalogQuery::Filter(filter),
                Some(FEATURED_LIMIT),
                env
            )],
            CatalogAction::Search(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return SmallVec::new();
                }
                smallvec![Self::request(state, CatalogQuery::Search(text.to_string()), None, env)]
            },
            CatalogAction::Loaded { request, result } => {
                if request != state.request {
                    tracing::debug!(request, latest = state.request, "Ignoring stale catalog response");
                    return SmallVec::new();
                }

                match result {
                    Ok(events) => {
                        tracing::debug!(request, count = events.len(), "Catalog loaded");
                        state.events = events;
                        state.status = CatalogStatus::Loaded;
                    },
                    Err(e) => {
                        tracing::warn!(request, error = %e, "Catalog request failed");
                        let message = match state.query {
                            CatalogQuery::Search(_) => SEARCH_FAILED,
                            CatalogQuery::All | CatalogQuery::Filter(_) => LOAD_FAILED,
                        };
                        state.status = CatalogStatus::Failed { message: message.to_string() };
                    },
                }
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::offline_environment;
    use ticket_booth_testing::{assertions, ReducerTest};

    fn events(count: usize) -> Vec<Event> {
        (0..count)
            .map(|i| Event::new(EventId::new(i.to_string()), format!("Event {i}")))
            .collect()
    }

    fn loading(query: CatalogQuery, limit: Option<usize>, request: u64) -> CatalogState {
        CatalogState {
            query,
            limit,
            status: CatalogStatus::Loading,
            request,
            ..CatalogState::default()
        }
    }

    #[test]
    fn test_load_featured_starts_a_request() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(CatalogState::default())
            .when_action(CatalogAction::LoadFeatured)
            .then_state(|state| {
                assert_eq!(state.latest_request(), 1);
                assert_eq!(state.status(), &CatalogStatus::Loading);
                assert!(state.visible().is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_featured_view_shows_three() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(loading(CatalogQuery::All, Some(FEATURED_LIMIT), 1))
            .when_action(CatalogAction::Loaded { request: 1, result: Ok(events(5)) })
            .then_state(|state| {
                assert_eq!(state.events().len(), 5);
                assert_eq!(state.visible().len(), 3);
                assert!(state.find(&EventId::new("4")).is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_search_shows_every_match() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(loading(CatalogQuery::Search("jazz".to_string()), None, 4))
            .when_action(CatalogAction::Loaded { request: 4, result: Ok(events(5)) })
            .then_state(|state| assert_eq!(state.visible().len(), 5))
            .run();
    }

    #[test]
    fn test_stale_response_is_ignored() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(loading(CatalogQuery::Filter(DayFilter::Today), Some(3), 2))
            .when_action(CatalogAction::Loaded { request: 1, result: Ok(events(2)) })
            .then_state(|state| {
                assert_eq!(state.status(), &CatalogStatus::Loading);
                assert!(state.events().is_empty());
            })
            .run();
    }

    #[test]
    fn test_failures_degrade_to_placeholder() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(loading(CatalogQuery::Search("x".to_string()), None, 1))
            .when_action(CatalogAction::Loaded {
                request: 1,
                result: Err(ApiError::Request("offline".to_string())),
            })
            .then_state(|state| {
                assert_eq!(state.placeholder(), Some("Search failed"));
                assert!(state.visible().is_empty());
            })
            .run();

        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(loading(CatalogQuery::All, Some(3), 1))
            .when_action(CatalogAction::Loaded {
                request: 1,
                result: Err(ApiError::Status { status: 500, detail: "boom".to_string() }),
            })
            .then_state(|state| assert_eq!(state.placeholder(), Some("Could not load events")))
            .run();
    }

    #[test]
    fn test_blank_search_is_not_sent() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(CatalogState::default())
            .when_action(CatalogAction::Search("   ".to_string()))
            .then_state(|state| {
                assert_eq!(state.latest_request(), 0);
                assert_eq!(state.status(), &CatalogStatus::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_empty_result_has_a_placeholder() {
        ReducerTest::new(CatalogReducer::new())
            .with_env(offline_environment())
            .given_state(loading(CatalogQuery::Filter(DayFilter::Weekend), Some(3), 1))
            .when_action(CatalogAction::Loaded { request: 1, result: Ok(Vec::new()) })
            .then_state(|state| assert_eq!(state.placeholder(), Some("No events found.")))
            .run();
    }

    #[test]
    fn test_query_params() {
        assert!(CatalogQuery::All.params().is_empty());
        assert_eq!(
            CatalogQuery::Filter(DayFilter::Weekend).params(),
            vec![("filter", "weekend".to_string())]
        );
        assert_eq!(
            CatalogQuery::Search("jazz".to_string()).params(),
            vec![("search", "jazz".to_string())]
        );
    }
}
