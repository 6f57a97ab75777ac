//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, particularly
//! for backend calls and cancellable timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use ticket_booth_core::async_effect;
///
/// async_effect! {
///     let result = api.fetch_events(query).await;
///     Some(CatalogAction::Loaded { request, result })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use ticket_booth_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(1500),
///     action: CheckoutAction::ConfirmationElapsed
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Cancellable` delay registered under an identifier
///
/// Scheduling again under the same identifier replaces the pending timer.
///
/// # Example
///
/// ```rust,ignore
/// use ticket_booth_core::cancellable;
/// use std::time::Duration;
///
/// cancellable! {
///     id: NOTICE_DISMISS,
///     duration: Duration::from_millis(1800),
///     action: NoticeAction::Dismiss
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::delay! {
                duration: $duration,
                action: $action
            }),
        }
    };
}
