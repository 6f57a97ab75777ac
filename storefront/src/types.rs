//! Domain types shared across the storefront.
//!
//! The backend speaks a mix of English and Italian field names
//! (`nome`, `fasce_prezzo`, ...); both are accepted on input. Persisted
//! records are always written with the English names.

use crate::money::Money;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Image shown when an event has no picture of its own
pub const DEFAULT_IMAGE: &str = "images/default.jpg";

/// Label used when an event has no price tiers
pub const UNSPECIFIED_TIER: &str = "Not specified";

// ============================================================================
// Catalog
// ============================================================================

/// Backend identifier of an event
///
/// The backend sends integers; the client only ever compares them, so the
/// textual form is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventId(String);

impl EventId {
    /// Creates an identifier from its textual form
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The textual form of the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Self(text)),
            Value::Number(number) => Ok(Self(number.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "event id must be a string or a number, got {other}"
            ))),
        }
    }
}

/// A named price bracket of an event
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Tier label, e.g. "Standard"
    #[serde(alias = "fascia", default, deserialize_with = "string_or_empty")]
    pub label: String,
    /// Tier price
    #[serde(alias = "prezzo", default)]
    pub price: Money,
}

/// An event as cached from the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Backend identifier
    pub id: EventId,
    /// Event name
    #[serde(alias = "nome", default, deserialize_with = "string_or_empty")]
    pub name: String,
    /// Date as sent by the backend (`YYYY-MM-DD`)
    #[serde(alias = "data", default, deserialize_with = "string_or_empty")]
    pub date: String,
    /// Start time as sent by the backend (`HH:MM`)
    #[serde(alias = "ora", default, deserialize_with = "string_or_empty")]
    pub time: String,
    /// Venue
    #[serde(alias = "luogo", default, deserialize_with = "string_or_empty")]
    pub location: String,
    /// Image URL or backend-relative path
    #[serde(alias = "immagine_url", default)]
    pub image: Option<String>,
    /// Price tiers in backend order
    #[serde(alias = "fasce_prezzo", default)]
    pub tiers: Vec<PriceTier>,
}

impl Event {
    /// The cheapest tier price, zero when the event has no tiers
    #[must_use]
    pub fn min_price(&self) -> Money {
        self.tiers
            .iter()
            .map(|tier| tier.price)
            .min()
            .unwrap_or(Money::ZERO)
    }

    /// Resolves the image reference against the backend base URL
    ///
    /// ```
    /// use ticket_booth_storefront::types::{Event, EventId, DEFAULT_IMAGE};
    ///
    /// let mut event = Event::new(EventId::new("1"), "Jazz Night");
    /// assert_eq!(event.image_src("http://localhost:8000"), DEFAULT_IMAGE);
    ///
    /// event.image = Some("/static/jazz.jpg".to_string());
    /// assert_eq!(event.image_src("http://localhost:8000/"), "http://localhost:8000/static/jazz.jpg");
    ///
    /// event.image = Some("https://cdn.example.com/jazz.jpg".to_string());
    /// assert_eq!(event.image_src("http://localhost:8000"), "https://cdn.example.com/jazz.jpg");
    /// ```
    #[must_use]
    pub fn image_src(&self, base_url: &str) -> String {
        match self.image.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_IMAGE.to_string(),
            Some(path) if path.starts_with("http") => path.to_string(),
            Some(path) => format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        }
    }

    /// Creates an event with no schedule, venue, image or tiers
    #[must_use]
    pub fn new(id: EventId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            image: None,
            tiers: Vec::new(),
        }
    }

    /// Adds a price tier
    #[must_use]
    pub fn with_tier(mut self, label: impl Into<String>, price: Money) -> Self {
        self.tiers.push(PriceTier { label: label.into(), price });
        self
    }
}

// ============================================================================
// Cart and tickets
// ============================================================================

/// One line of the cart
///
/// The event title is copied, not referenced, so the cart survives catalog
/// changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartItem {
    /// Event title
    #[serde(deserialize_with = "string_or_empty")]
    pub title: String,
    /// Attendee first name (may be empty)
    #[serde(rename = "name", deserialize_with = "string_or_empty")]
    pub first_name: String,
    /// Attendee last name (may be empty)
    #[serde(rename = "surname", deserialize_with = "string_or_empty")]
    pub last_name: String,
    /// Price tier label
    #[serde(alias = "fascia", deserialize_with = "string_or_empty")]
    pub tier: String,
    /// Price paid for the tier
    pub price: Money,
}

/// An issued ticket: the cart line, moved verbatim
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    /// Event title
    #[serde(deserialize_with = "string_or_empty")]
    pub title: String,
    /// Attendee first name
    #[serde(rename = "name", deserialize_with = "string_or_empty")]
    pub first_name: String,
    /// Attendee last name
    #[serde(rename = "surname", deserialize_with = "string_or_empty")]
    pub last_name: String,
    /// Price tier label
    #[serde(alias = "fascia", deserialize_with = "string_or_empty")]
    pub tier: String,
    /// Price paid
    pub price: Money,
}

impl From<CartItem> for Ticket {
    fn from(item: CartItem) -> Self {
        Self {
            title: item.title,
            first_name: item.first_name,
            last_name: item.last_name,
            tier: item.tier,
            price: item.price,
        }
    }
}

impl Ticket {
    /// Attendee display name, `-` when both names are empty
    #[must_use]
    pub fn attendee(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() { "-".to_string() } else { full.to_string() }
    }
}

// ============================================================================
// Session
// ============================================================================

/// The locally trusted identity of whoever uses this client
///
/// An empty email means logged out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSession {
    /// First name
    #[serde(deserialize_with = "string_or_empty")]
    pub name: String,
    /// Last name
    #[serde(deserialize_with = "string_or_empty")]
    pub surname: String,
    /// Email, empty when logged out
    #[serde(deserialize_with = "string_or_empty")]
    pub email: String,
}

impl UserSession {
    /// Whether someone is logged in
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// Avatar initial: first letter of the name, else of the email, else `U`
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .chain(self.email.chars())
            .find(|c| !c.is_whitespace())
            .map_or('U', |c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Personal details returned by the backend
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// First name
    #[serde(alias = "nome", deserialize_with = "string_or_empty")]
    pub name: String,
    /// Last name
    #[serde(alias = "cognome", deserialize_with = "string_or_empty")]
    pub surname: String,
    /// Email
    #[serde(deserialize_with = "string_or_empty")]
    pub email: String,
}

// ============================================================================
// Reviews
// ============================================================================

/// A visitor testimonial shown in the carousel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Author name
    pub author: String,
    /// Star rating, 0 to 5
    pub rating: u8,
    /// Review text
    pub text: String,
    /// Avatar image URL
    pub avatar: String,
}

impl Review {
    /// Highest rating a review can carry
    pub const MAX_RATING: u8 = 5;

    /// Rating rendered as filled and empty stars
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(Self::MAX_RATING));
        let empty = usize::from(Self::MAX_RATING) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

/// Accepts `null` for string fields
fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_accepts_backend_field_names() {
        let event: Event = serde_json::from_value(json!({
            "id": 7,
            "nome": "Jazz Night",
            "data": "2025-06-01",
            "ora": "21:00",
            "luogo": "Blue Room",
            "immagine_url": null,
            "fasce_prezzo": [
                { "fascia": "Standard", "prezzo": 20 },
                { "fascia": "VIP", "prezzo": "45.5" }
            ]
        }))
        .unwrap();

        assert_eq!(event.id, EventId::new("7"));
        assert_eq!(event.name, "Jazz Night");
        assert_eq!(event.location, "Blue Room");
        assert_eq!(event.tiers.len(), 2);
        assert_eq!(event.tiers[1].price, Money::from_cents(4550));
        assert_eq!(event.min_price(), Money::from_cents(2000));
    }

    #[test]
    fn test_event_without_tiers_costs_nothing() {
        let event: Event = serde_json::from_value(json!({ "id": "a1", "name": null })).unwrap();
        assert_eq!(event.name, "");
        assert_eq!(event.min_price(), Money::ZERO);
    }

    #[test]
    fn test_cart_item_reads_legacy_records() {
        let item: CartItem = serde_json::from_value(json!({
            "title": "Jazz Night",
            "name": "Ada",
            "surname": "Lovelace",
            "fascia": "VIP",
            "price": "45.5"
        }))
        .unwrap();

        assert_eq!(item.first_name, "Ada");
        assert_eq!(item.tier, "VIP");
        assert_eq!(item.price, Money::from_cents(4550));

        let written = serde_json::to_value(&item).unwrap();
        assert_eq!(written["tier"], json!("VIP"));
        assert_eq!(written["price"], json!(45.5));
    }

    #[test]
    fn test_ticket_is_the_cart_line_verbatim() {
        let item = CartItem {
            title: "Jazz Night".to_string(),
            first_name: "Ada".to_string(),
            last_name: String::new(),
            tier: "Standard".to_string(),
            price: Money::from_cents(2000),
        };

        let ticket = Ticket::from(item.clone());
        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            serde_json::to_value(&item).unwrap()
        );
        assert_eq!(ticket.attendee(), "Ada");
        assert_eq!(Ticket::default().attendee(), "-");
    }

    #[test]
    fn test_session_initial_and_login_state() {
        let session = UserSession {
            name: String::new(),
            surname: String::new(),
            email: "mario@example.com".to_string(),
        };
        assert!(session.is_logged_in());
        assert_eq!(session.initial(), 'M');
        assert!(!UserSession::default().is_logged_in());
        assert_eq!(UserSession::default().initial(), 'U');
    }

    #[test]
    fn test_review_stars_clamp() {
        let review = Review {
            author: "Ada".to_string(),
            rating: 3,
            text: String::new(),
            avatar: String::new(),
        };
        assert_eq!(review.stars(), "★★★☆☆");
    }
}
