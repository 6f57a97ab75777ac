//! Backend API client.
//!
//! [`BackendApi`] is the seam the reducers call through; [`HttpBackend`] is
//! the `reqwest` implementation. Calls have no timeout and are never retried:
//! a failure becomes an [`ApiError`] that the reducer turns into a message.

use crate::catalog::CatalogQuery;
use crate::types::{Event, UserProfile};
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Future returned by every backend call
pub type ApiFuture<T> = BoxFuture<'static, Result<T, ApiError>>;

/// Errors from backend calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got a response
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}: {detail}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable detail extracted from the body
        detail: String,
    },

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for showing to the user
    ///
    /// The backend's own detail when it sent one, otherwise the error itself.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            Self::Request(_) | Self::Decode(_) => self.to_string(),
        }
    }
}

/// Login form contents
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Password, sent as-is to the backend
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form contents
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// First name
    pub name: String,
    /// Last name
    pub surname: String,
    /// Account email
    pub email: String,
    /// Password, sent as-is to the backend
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login or registration payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AuthReply {
    /// Optional message to show the user
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct EventsPage {
    #[serde(alias = "eventi", default)]
    events: Vec<Event>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    response: Option<String>,
}

/// Everything the storefront asks of the backend
pub trait BackendApi: Send + Sync {
    /// `GET /events`, filtered or searched per `query`
    fn fetch_events(&self, query: &CatalogQuery) -> ApiFuture<Vec<Event>>;

    /// `POST /login`
    fn login(&self, credentials: Credentials) -> ApiFuture<AuthReply>;

    /// `POST /register`
    fn register(&self, registration: Registration) -> ApiFuture<AuthReply>;

    /// `GET /user/{email}`
    fn fetch_profile(&self, email: &str) -> ApiFuture<UserProfile>;

    /// `POST /chat`; the reply text, possibly empty
    fn chat(&self, prompt: &str) -> ApiFuture<String>;
}

/// [`BackendApi`] over HTTP/JSON
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn user_url(&self, email: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url("/user")).map_err(|e| ApiError::Request(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Request(format!("cannot append a path to {}", self.base_url)))?
            .push(email);
        Ok(url)
    }
}

impl BackendApi for HttpBackend {
    fn fetch_events(&self, query: &CatalogQuery) -> ApiFuture<Vec<Event>> {
        let request = self.client.get(self.url("/events")).query(&query.params());
        Box::pin(async move {
            let page: EventsPage = send_json(request).await?;
            tracing::debug!(count = page.events.len(), "Events fetched");
            Ok(page.events)
        })
    }

    fn login(&self, credentials: Credentials) -> ApiFuture<AuthReply> {
        let request = self.client.post(self.url("/login")).json(&credentials);
        Box::pin(send_json(request))
    }

    fn register(&self, registration: Registration) -> ApiFuture<AuthReply> {
        let request = self.client.post(self.url("/register")).json(&registration);
        Box::pin(send_json(request))
    }

    fn fetch_profile(&self, email: &str) -> ApiFuture<UserProfile> {
        let request = self.user_url(email).map(|url| self.client.get(url));
        Box::pin(async move { send_json(request?).await })
    }

    fn chat(&self, prompt: &str) -> ApiFuture<String> {
        let request = self.client.post(self.url("/chat")).json(&ChatRequest { prompt });
        Box::pin(async move {
            let reply: ChatReply = send_json(request).await?;
            Ok(reply.response.unwrap_or_default())
        })
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;

    if !status.is_success() {
        let detail = error_detail(status, &body);
        tracing::warn!(status = status.as_u16(), %detail, "Backend call failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// The JSON `detail` field, else the JSON body, else the reason phrase
fn error_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(detail) if !detail.is_null() => detail.to_string(),
            _ => Value::Object(map.clone()).to_string(),
        },
        Ok(value) if !value.is_null() => value.to_string(),
        _ => status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string),
    }
}
