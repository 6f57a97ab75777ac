//! Euro amounts held as integer cents.
//!
//! Prices arrive from the backend and from older persisted records as JSON
//! numbers, numeric strings, or garbage. Everything goes through
//! [`Money::coerce`] so totals are always computed on whole cents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A non-negative euro amount in cents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero euros
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Converts a euro amount, rounding the binary value to the nearest cent
    ///
    /// Halves that are exact in binary round away from zero; decimal text
    /// such as `1.005` should go through [`Money::parse_euros`] instead.
    /// Returns `None` for negative, NaN or infinite input.
    #[must_use]
    pub fn from_euros_f64(euros: f64) -> Option<Self> {
        if !euros.is_finite() || euros < 0.0 {
            return None;
        }

        // Float-to-int casts saturate; the input is finite and non-negative.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cents = (euros * 100.0).round() as u64;
        Some(Self(cents))
    }

    /// Parses a decimal euro amount such as `"25.5"` or `"1.005"`
    ///
    /// Digits are read exactly and rounded to the cent, half away from zero.
    /// Exponent notation falls back to [`Money::from_euros_f64`]. Returns
    /// `None` for negative or non-numeric text.
    #[must_use]
    pub fn parse_euros(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text.strip_prefix('+').unwrap_or(text);
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let is_decimal = !(whole.is_empty() && fraction.is_empty())
            && whole.bytes().all(|b| b.is_ascii_digit())
            && fraction.bytes().all(|b| b.is_ascii_digit());
        if !is_decimal {
            return text.parse::<f64>().ok().and_then(Self::from_euros_f64);
        }

        let euros: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut fraction = fraction.bytes().map(|b| u64::from(b - b'0'));
        let tenths = fraction.next().unwrap_or(0);
        let hundredths = fraction.next().unwrap_or(0);
        let round_up = fraction.next().is_some_and(|digit| digit >= 5);

        euros
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + u64::from(round_up))
            .map(Self)
    }

    /// The amount in euros, for serialization
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_euros_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Coerces an arbitrary JSON value into an amount
    ///
    /// Numbers and numeric strings convert; anything else (null, text,
    /// negative or non-finite numbers) is zero.
    ///
    /// ```
    /// use serde_json::json;
    /// use ticket_booth_storefront::money::Money;
    ///
    /// assert_eq!(Money::coerce(&json!(25.5)), Money::from_cents(2550));
    /// assert_eq!(Money::coerce(&json!("12")), Money::from_cents(1200));
    /// assert_eq!(Money::coerce(&json!(null)), Money::ZERO);
    /// ```
    #[must_use]
    pub fn coerce(value: &Value) -> Self {
        let amount = match value {
            Value::Number(number) => Self::parse_euros(&number.to_string()),
            Value::String(text) => Self::parse_euros(text),
            _ => None,
        };

        amount.unwrap_or(Self::ZERO)
    }

    /// Adds two amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Adds two amounts, clamping at the maximum representable value
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Sums a sequence of amounts without overflowing
    #[must_use]
    pub fn sum<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .fold(Self::ZERO, Self::saturating_add)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::sum(iter)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        Self::sum(iter.copied())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_euros_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::coerce(&value))
    }
}

/// Formats an amount for display, e.g. `€35.50`
#[must_use]
pub fn format_euro(amount: Money) -> String {
    amount.to_string()
}
