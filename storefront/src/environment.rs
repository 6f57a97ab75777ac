//! Injected dependencies of the storefront reducers.

use crate::api::BackendApi;
use crate::carousel::{AvatarSource, CarouselEnvironment};
use crate::config::StorefrontConfig;
use crate::persistence::PersistedStore;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use ticket_booth_core::environment::{Clock, SystemClock};

/// Environment shared by every storefront reducer
#[derive(Clone)]
pub struct StorefrontEnvironment {
    /// Stamps notices and chat messages
    pub clock: Arc<dyn Clock>,
    /// Backend calls
    pub api: Arc<dyn BackendApi>,
    /// Session, cart and ticket slots
    pub persistence: PersistedStore,
    /// Carousel timing and avatars
    pub carousel: CarouselEnvironment,
    /// How long the payment confirmation stays up
    pub confirmation_delay: Duration,
    /// How long a notice stays up
    pub notice_duration: Duration,
}

impl StorefrontEnvironment {
    /// Default confirmation delay
    pub const DEFAULT_CONFIRMATION: Duration = Duration::from_millis(1500);
    /// Default notice duration
    pub const DEFAULT_NOTICE: Duration = Duration::from_millis(1800);

    /// Creates an environment with the system clock and default timing
    #[must_use]
    pub fn new(api: Arc<dyn BackendApi>, persistence: PersistedStore) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            api,
            persistence,
            carousel: CarouselEnvironment::default(),
            confirmation_delay: Self::DEFAULT_CONFIRMATION,
            notice_duration: Self::DEFAULT_NOTICE,
        }
    }

    /// Creates an environment with the timing from `config`
    #[must_use]
    pub fn from_config(
        config: &StorefrontConfig,
        api: Arc<dyn BackendApi>,
        persistence: PersistedStore,
    ) -> Self {
        let mut env = Self::new(api, persistence);
        env.carousel.rotation_interval = config.review_rotation;
        env.carousel.fade_delay = config.review_fade;
        env.confirmation_delay = config.confirmation_delay;
        env.notice_duration = config.notice_duration;
        env
    }

    /// Replaces the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the avatar source
    #[must_use]
    pub fn with_avatars(mut self, avatars: Arc<dyn AvatarSource>) -> Self {
        self.carousel.avatars = avatars;
        self
    }
}

impl fmt::Debug for StorefrontEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontEnvironment")
            .field("persistence", &self.persistence)
            .field("carousel", &self.carousel)
            .field("confirmation_delay", &self.confirmation_delay)
            .field("notice_duration", &self.notice_duration)
            .finish_non_exhaustive()
    }
}
