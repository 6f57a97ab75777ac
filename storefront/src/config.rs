//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a `.env` file.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Backend base URL (`STOREFRONT_API_BASE`)
    pub api_base: String,
    /// Directory holding the persisted slots (`STOREFRONT_DATA_DIR`)
    pub data_dir: PathBuf,
    /// Default log filter when `RUST_LOG` is unset (`STOREFRONT_LOG_LEVEL`)
    pub log_level: String,
    /// Time between review rotations (`STOREFRONT_REVIEW_ROTATION_MS`)
    pub review_rotation: Duration,
    /// Cross-fade before a rotated review activates (`STOREFRONT_REVIEW_FADE_MS`)
    pub review_fade: Duration,
    /// How long the payment confirmation stays up (`STOREFRONT_CONFIRMATION_MS`)
    pub confirmation_delay: Duration,
    /// How long a notice stays up (`STOREFRONT_NOTICE_MS`)
    pub notice_duration: Duration,
}

/// Invalid configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value is blank
    #[error("{name} must not be empty")]
    Empty {
        /// Variable name
        name: &'static str,
    },

    /// Activations would overlap the next rotation
    #[error("Review fade ({fade_ms} ms) must be shorter than the rotation interval ({rotation_ms} ms)")]
    CarouselTiming {
        /// Configured fade
        fade_ms: u128,
        /// Configured rotation interval
        rotation_ms: u128,
    },
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            data_dir: PathBuf::from(".ticket-booth"),
            log_level: "info".to_string(),
            review_rotation: Duration::from_millis(8000),
            review_fade: Duration::from_millis(1500),
            confirmation_delay: Duration::from_millis(1500),
            notice_duration: Duration::from_millis(1800),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Unparsable numbers fall back to their default with a warning.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| match lookup(key) {
            None => default,
            Some(raw) => raw.trim().parse::<u64>().map_or_else(
                |_| {
                    tracing::warn!(key, value = %raw, "Not a number of milliseconds, using default");
                    default
                },
                Duration::from_millis,
            ),
        };

        Self {
            api_base: lookup("STOREFRONT_API_BASE").unwrap_or(defaults.api_base),
            data_dir: lookup("STOREFRONT_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            log_level: lookup("STOREFRONT_LOG_LEVEL").unwrap_or(defaults.log_level),
            review_rotation: millis("STOREFRONT_REVIEW_ROTATION_MS", defaults.review_rotation),
            review_fade: millis("STOREFRONT_REVIEW_FADE_MS", defaults.review_fade),
            confirmation_delay: millis("STOREFRONT_CONFIRMATION_MS", defaults.confirmation_delay),
            notice_duration: millis("STOREFRONT_NOTICE_MS", defaults.notice_duration),
        }
    }

    /// Checks the values that defaults cannot repair
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Empty`] if the backend URL is blank
    /// - [`ConfigError::CarouselTiming`] unless the fade is strictly shorter
    ///   than the rotation interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Empty { name: "STOREFRONT_API_BASE" });
        }

        if self.review_fade >= self.review_rotation {
            return Err(ConfigError::CarouselTiming {
                fade_ms: self.review_fade.as_millis(),
                rotation_ms: self.review_rotation.as_millis(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[]));
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.review_rotation, Duration::from_millis(8000));
        assert_eq!(config.notice_duration, Duration::from_millis(1800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_API_BASE", "https://tickets.example.com"),
            ("STOREFRONT_DATA_DIR", "/var/lib/storefront"),
            ("STOREFRONT_REVIEW_ROTATION_MS", "4000"),
            ("STOREFRONT_REVIEW_FADE_MS", " 500 "),
        ]));

        assert_eq!(config.api_base, "https://tickets.example.com");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/storefront"));
        assert_eq!(config.review_rotation, Duration::from_millis(4000));
        assert_eq!(config.review_fade, Duration::from_millis(500));
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_CONFIRMATION_MS", "soon"),
            ("STOREFRONT_NOTICE_MS", "-5"),
        ]));

        assert_eq!(config.confirmation_delay, Duration::from_millis(1500));
        assert_eq!(config.notice_duration, Duration::from_millis(1800));
    }

    #[test]
    fn test_fade_must_be_shorter_than_rotation() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_REVIEW_ROTATION_MS", "1000"),
            ("STOREFRONT_REVIEW_FADE_MS", "1000"),
        ]));

        assert_eq!(
            config.validate(),
            Err(ConfigError::CarouselTiming { fade_ms: 1000, rotation_ms: 1000 })
        );
    }

    #[test]
    fn test_blank_api_base_is_rejected() {
        let config = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_API_BASE", "  ")]));
        assert_eq!(config.validate(), Err(ConfigError::Empty { name: "STOREFRONT_API_BASE" }));
    }
}
