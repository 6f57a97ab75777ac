//! Review carousel.
//!
//! One highlighted index rotates over the reviews. Each rotation moves the
//! highlight, then activates it after a short fade so a view can cross-fade.
//!
//! Rotation is a self-rescheduling cancellable delay registered under
//! [`ROTATION`]; activation is a second cancellable delay under
//! [`ACTIVATION`]. Scheduling under an id replaces whatever was pending
//! there, so two rotations can never run side by side. A delivery can still
//! be in flight when rotation restarts, so every restart and stop bumps a
//! generation; rotations carry the generation they were scheduled for and
//! stale ones are dropped. Activations are checked against the index.

use crate::types::Review;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use ticket_booth_core::{cancellable, smallvec, Effect, EffectId, Reducer, SmallVec};

/// Identifier of the repeating rotation timer
pub const ROTATION: EffectId = EffectId::new("carousel.rotation");

/// Identifier of the pending activation
pub const ACTIVATION: EffectId = EffectId::new("carousel.activation");

/// Author used for reviews submitted without a name
pub const ANONYMOUS: &str = "Anonymous";

/// Picks avatar images for newly submitted reviews
pub trait AvatarSource: Send + Sync {
    /// An avatar image URL
    fn avatar(&self) -> String;
}

/// Random face picture from Unsplash
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAvatar;

impl AvatarSource for RandomAvatar {
    fn avatar(&self) -> String {
        let sig: u16 = rand::thread_rng().gen_range(0..1000);
        format!("https://source.unsplash.com/random/400x400/?face&sig={sig}")
    }
}

/// Timing and avatar source for the carousel
#[derive(Clone)]
pub struct CarouselEnvironment {
    /// Time between rotations
    pub rotation_interval: Duration,
    /// Time between moving the highlight and activating it
    pub fade_delay: Duration,
    /// Avatar picker for submitted reviews
    pub avatars: Arc<dyn AvatarSource>,
}

impl CarouselEnvironment {
    /// Default rotation interval
    pub const DEFAULT_ROTATION: Duration = Duration::from_millis(8000);
    /// Default fade delay
    pub const DEFAULT_FADE: Duration = Duration::from_millis(1500);

    /// Creates an environment with the given timing
    #[must_use]
    pub fn new(rotation_interval: Duration, fade_delay: Duration, avatars: Arc<dyn AvatarSource>) -> Self {
        Self {
            rotation_interval,
            fade_delay,
            avatars,
        }
    }
}

impl Default for CarouselEnvironment {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROTATION, Self::DEFAULT_FADE, Arc::new(RandomAvatar))
    }
}

impl fmt::Debug for CarouselEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselEnvironment")
            .field("rotation_interval", &self.rotation_interval)
            .field("fade_delay", &self.fade_delay)
            .finish_non_exhaustive()
    }
}

/// Whether the highlighted entry is visible yet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CarouselPhase {
    /// Highlighted entry is active
    #[default]
    Shown,
    /// Highlight moved; activation pending
    FadingIn,
}

/// Carousel state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarouselState {
    reviews: Vec<Review>,
    index: usize,
    phase: CarouselPhase,
    running: bool,
    generation: u64,
}

impl CarouselState {
    /// All reviews, newest submissions first
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Highlighted index (0 when empty)
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The highlighted review
    #[must_use]
    pub fn highlighted(&self) -> Option<&Review> {
        self.reviews.get(self.index)
    }

    /// Whether `index` is the highlighted entry
    #[must_use]
    pub const fn is_highlighted(&self, index: usize) -> bool {
        index == self.index
    }

    /// Activation phase of the highlighted entry
    #[must_use]
    pub const fn phase(&self) -> CarouselPhase {
        self.phase
    }

    /// Whether rotation is scheduled
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Rotation generation, bumped whenever rotation restarts or stops
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// A review as typed into the form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Author, blank for anonymous
    pub author: String,
    /// Rating; missing means 5, out-of-range values are clamped
    pub rating: Option<i64>,
    /// Review text
    pub text: String,
}

/// Carousel actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CarouselAction {
    /// Replace the reviews and restart rotation
    Init(Vec<Review>),
    /// Rotation timer fired
    Rotate {
        /// Generation the timer was scheduled for
        generation: u64,
    },
    /// Fade finished for `index`
    Activate {
        /// Index the fade was started for
        index: usize,
    },
    /// Prepend a new review and focus it
    Submit(ReviewDraft),
    /// Stop rotating
    Stop,
}

/// Reducer for the review carousel
#[derive(Clone, Debug, Default)]
pub struct CarouselReducer;

impl CarouselReducer {
    /// Creates the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Focuses entry 0 and (re)starts rotation timing from zero
    fn restart(
        state: &mut CarouselState,
        env: &CarouselEnvironment,
    ) -> SmallVec<[Effect<CarouselAction>; 4]> {
        state.index = 0;
        state.phase = CarouselPhase::Shown;
        state.running = state.reviews.len() > 1;
        state.generation = state.generation.wrapping_add(1);

        if state.running {
            smallvec![Effect::Cancel(ACTIVATION), schedule_rotation(state.generation, env)]
        } else {
            smallvec![Effect::Cancel(ACTIVATION), Effect::Cancel(ROTATION)]
        }
    }
}

fn schedule_rotation(generation: u64, env: &CarouselEnvironment) -> Effect<CarouselAction> {
    cancellable! {
        id: ROTATION,
        duration: env.rotation_interval,
        action: CarouselAction::Rotate { generation }
    }
}

fn review_from(draft: ReviewDraft, env: &CarouselEnvironment) -> Review {
    let author = draft.author.trim();
    let rating = draft
        .rating
        .unwrap_or(i64::from(Review::MAX_RATING))
        .clamp(0, i64::from(Review::MAX_RATING));

    Review {
        author: if author.is_empty() { ANONYMOUS.to_string() } else { author.to_string() },
        rating: u8::try_from(rating).unwrap_or(Review::MAX_RATING),
        text: draft.text.trim().to_string(),
        avatar: env.avatars.avatar(),
    }
}

impl Reducer for CarouselReducer {
    type State = CarouselState;
    type Action = CarouselAction;
    type Environment = CarouselEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CarouselAction::Init(reviews) => {
                tracing::debug!(count = reviews.len(), "Carousel initialised");
                state.reviews = reviews;
                Self::restart(state, env)
            },

            CarouselAction::Rotate { generation } => {
                if generation != state.generation {
                    tracing::trace!(generation, current = state.generation, "Stale rotation dropped");
                    return SmallVec::new();
                }
                if !state.running || state.reviews.len() <= 1 {
                    return SmallVec::new();
                }

                state.index = (state.index + 1) % state.reviews.len();
                state.phase = CarouselPhase::FadingIn;
                tracing::trace!(index = state.index, "Carousel rotated");

                smallvec![
                    schedule_rotation(state.generation, env),
                    cancellable! {
                        id: ACTIVATION,
                        duration: env.fade_delay,
                        action: CarouselAction::Activate { index: state.index }
                    },
                ]
            },

            CarouselAction::Activate { index } => {
                if state.phase == CarouselPhase::FadingIn && index == state.index {
                    state.phase = CarouselPhase::Shown;
                }
                SmallVec::new()
            },

            CarouselAction::Submit(draft) => {
                let review = review_from(draft, env);
                tracing::debug!(author = %review.author, rating = review.rating, "Review submitted");
                state.reviews.insert(0, review);
                Self::restart(state, env)
            },

            CarouselAction::Stop => {
                state.running = false;
                state.generation = state.generation.wrapping_add(1);
                state.phase = CarouselPhase::Shown;
                smallvec![Effect::Cancel(ROTATION), Effect::Cancel(ACTIVATION)]
            },
        }
    }
}
