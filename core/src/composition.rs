//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a child reducer on a slice of parent state,
//!   a subset of parent actions and a part of the parent environment
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use ticket_booth_core::{smallvec, Effect, Reducer, SmallVec};
//! use ticket_booth_core::composition::combine_reducers;
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     count: i32,
//!     name: String,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Increment,
//!     SetName(String),
//! }
//!
//! struct CounterReducer;
//! struct NameReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         if matches!(action, AppAction::Increment) {
//!             state.count += 1;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! impl Reducer for NameReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         if let AppAction::SetName(name) = action {
//!             state.name = name;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
//! let mut state = AppState::default();
//! let _ = combined.reduce(&mut state, AppAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::marker::PhantomData;
use std::sync::Arc;

/// A boxed reducer that can be shared between store clones
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
/// Later reducers observe the state changes made by earlier ones.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer {
        reducers: reducers.into_iter().map(Arc::from).collect::<Vec<_>>().into(),
    }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`]. Cloning shares the underlying reducers.
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Arc<[Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>]>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    fn clone(&self) -> Self {
        Self {
            reducers: Arc::clone(&self.reducers),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in self.reducers.iter() {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}

/// Scopes a child reducer into a parent feature.
///
/// - `state`: borrows the child state out of the parent state
/// - `extract`: picks the child action out of a parent action, `None` when the
///   action belongs to another feature (the child is then not run)
/// - `embed`: lifts child actions produced by effects back into parent actions
/// - `environment`: borrows the child environment out of the parent environment
///
/// # Examples
///
/// ```
/// use ticket_booth_core::{smallvec, Effect, Reducer, SmallVec};
/// use ticket_booth_core::composition::scope_reducer;
///
/// #[derive(Clone, Default)]
/// struct CounterState { count: i32 }
///
/// #[derive(Clone, Debug)]
/// enum CounterAction { Increment }
///
/// #[derive(Clone)]
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = CounterState;
///     type Action = CounterAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut CounterState, _action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
///         state.count += 1;
///         smallvec![Effect::None]
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct AppState { counter: CounterState, title: String }
///
/// #[derive(Clone, Debug)]
/// enum AppAction { Counter(CounterAction), Rename(String) }
///
/// let scoped = scope_reducer(
///     CounterReducer,
///     |app: &mut AppState| &mut app.counter,
///     |action: AppAction| match action {
///         AppAction::Counter(a) => Some(a),
///         AppAction::Rename(_) => None,
///     },
///     AppAction::Counter,
///     |env: &()| env,
/// );
///
/// let mut state = AppState::default();
/// let _ = scoped.reduce(&mut state, AppAction::Counter(CounterAction::Increment), &());
/// assert_eq!(state.counter.count, 1);
/// ```
pub const fn scope_reducer<S, A, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
) -> ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
        _phantom: PhantomData,
    }
}

/// A scoped reducer that runs a child reducer inside a parent feature.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
    _phantom: PhantomData<fn() -> (S, A, E)>,
}

impl<S, A, E, R> Clone for ScopedReducer<S, A, E, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            environment: self.environment,
            _phantom: PhantomData,
        }
    }
}

impl<S, A, E, R> Reducer for ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let child_env = (self.environment)(env);

        self.reducer
            .reduce(child_state, child_action, child_env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{smallvec, SmallVec};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => state.counter += 1,
                TestAction::Decrement => state.counter -= 1,
                TestAction::SetName(_) => {},
            }
            smallvec![Effect::None]
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if let TestAction::SetName(name) = action {
                state.name = name;
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn test_combine_reducers() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        let mut state = TestState::default();

        let _ = combined.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(state.counter, 1);

        let _ = combined.reduce(&mut state, TestAction::SetName("Ada".to_string()), &());
        assert_eq!(state.name, "Ada");

        let _ = combined.clone().reduce(&mut state, TestAction::Decrement, &());
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Ada");
    }

    #[test]
    fn test_combine_reducers_drops_noop_effects() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        let mut state = TestState::default();

        let effects = combined.reduce(&mut state, TestAction::Increment, &());
        assert!(effects.is_empty());
    }

    // Scoped reducer tests
    #[derive(Clone, Default)]
    struct TimerState {
        ticks: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TimerAction {
        Start,
        Tick,
    }

    struct TimerEnv {
        period: Duration,
    }

    #[derive(Clone)]
    struct TimerReducer;

    impl Reducer for TimerReducer {
        type State = TimerState;
        type Action = TimerAction;
        type Environment = TimerEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TimerAction::Start => smallvec![Effect::Delay {
                    duration: env.period,
                    action: Box::new(TimerAction::Tick),
                }],
                TimerAction::Tick => {
                    state.ticks += 1;
                    SmallVec::new()
                },
            }
        }
    }

    #[derive(Default)]
    struct ParentState {
        timer: TimerState,
        other: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Timer(TimerAction),
        Rename(String),
    }

    struct ParentEnv {
        timer: TimerEnv,
    }

    fn scoped() -> ScopedReducer<ParentState, ParentAction, ParentEnv, TimerReducer> {
        scope_reducer(
            TimerReducer,
            |parent: &mut ParentState| &mut parent.timer,
            |action: ParentAction| match action {
                ParentAction::Timer(a) => Some(a),
                ParentAction::Rename(_) => None,
            },
            ParentAction::Timer,
            |env: &ParentEnv| &env.timer,
        )
    }

    #[test]
    fn test_scope_reducer_updates_child_state() {
        let env = ParentEnv {
            timer: TimerEnv {
                period: Duration::from_millis(10),
            },
        };
        let mut state = ParentState {
            other: "kept".to_string(),
            ..ParentState::default()
        };

        let _ = scoped().reduce(&mut state, ParentAction::Timer(TimerAction::Tick), &env);
        assert_eq!(state.timer.ticks, 1);
        assert_eq!(state.other, "kept");
    }

    #[test]
    fn test_scope_reducer_ignores_foreign_actions() {
        let env = ParentEnv {
            timer: TimerEnv {
                period: Duration::from_millis(10),
            },
        };
        let mut state = ParentState::default();

        let effects = scoped().reduce(&mut state, ParentAction::Rename("x".to_string()), &env);
        assert!(effects.is_empty());
        assert_eq!(state.timer.ticks, 0);
    }

    #[test]
    fn test_scope_reducer_embeds_effect_actions() {
        let env = ParentEnv {
            timer: TimerEnv {
                period: Duration::from_millis(25),
            },
        };
        let mut state = ParentState::default();

        let effects = scoped().reduce(&mut state, ParentAction::Timer(TimerAction::Start), &env);
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            &effects[0],
            Effect::Delay { duration, action }
                if *duration == Duration::from_millis(25)
                    && **action == ParentAction::Timer(TimerAction::Tick)
        ));
    }
}
