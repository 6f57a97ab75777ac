//! Transient notices ("toasts").
//!
//! Only one notice is current. Raising a new one replaces it and restarts the
//! auto-dismiss timer, which is registered under [`NOTICE_DISMISS`].

use crate::environment::StorefrontEnvironment;
use crate::reducer::{StorefrontAction, StorefrontState};
use chrono::{DateTime, Utc};
use ticket_booth_core::{cancellable, Effect, EffectId};

/// Identifier of the auto-dismiss timer
pub const NOTICE_DISMISS: EffectId = EffectId::new("notice.dismiss");

/// Severity of a notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation or information
    Info,
    /// Something the user asked for did not happen
    Error,
}

/// A message shown briefly to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Text to show
    pub message: String,
    /// Severity
    pub level: NoticeLevel,
    /// When it was raised
    pub raised_at: DateTime<Utc>,
}

/// Replaces the current notice and schedules its dismissal
pub(crate) fn notify(
    state: &mut StorefrontState,
    env: &StorefrontEnvironment,
    level: NoticeLevel,
    message: impl Into<String>,
) -> Effect<StorefrontAction> {
    let message = message.into();
    tracing::debug!(?level, %message, "Notice raised");

    state.notice = Some(Notice {
        message,
        level,
        raised_at: env.clock.now(),
    });

    cancellable! {
        id: NOTICE_DISMISS,
        duration: env.notice_duration,
        action: StorefrontAction::DismissNotice
    }
}
