//! Effect-based state management
//!
//! This module provides an effect-aware store that allows reducers to emit
//! side effects alongside state transitions. Effects are declarative
//! descriptions of work to be done, not the work itself.
//!
//! # Overview
//!
//! The plain reducer returns the replacement state (or none):
//! ```ignore
//! fn reducer(state: &S, action: A) -> Result<Option<S>, E>
//! ```
//!
//! An effect-aware reducer returns a [`Transition`] carrying both:
//! ```ignore
//! fn reducer(state: &S, action: A) -> Result<Transition<S, F>, E>
//! ```
//!
//! # Example
//!
//! ```
//! use bookworm_core::{Action, EffectStore, Transition};
//!
//! #[derive(Debug)]
//! enum Effect {
//!     FetchData { url: String },
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     loading: bool,
//!     data: Option<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     LoadData,
//!     DidLoadData(String),
//! }
//!
//! impl Action for AppAction {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             AppAction::LoadData => "LoadData",
//!             AppAction::DidLoadData(_) => "DidLoadData",
//!         }
//!     }
//! }
//!
//! fn reducer(
//!     state: &AppState,
//!     action: AppAction,
//! ) -> Result<Transition<AppState, Effect>, String> {
//!     Ok(match action {
//!         AppAction::LoadData => Transition::replace_with(
//!             AppState { loading: true, ..state.clone() },
//!             Effect::FetchData { url: "https://api.example.com".into() },
//!         ),
//!         AppAction::DidLoadData(data) => Transition::replace(AppState {
//!             loading: false,
//!             data: Some(data),
//!         }),
//!     })
//! }
//!
//! let mut store = EffectStore::new(AppState::default(), reducer);
//! let result = store.dispatch(AppAction::LoadData).unwrap();
//! assert!(result.changed);
//! assert_eq!(result.effects.len(), 1);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::action::Action;
use crate::snapshot::{Snapshot, SnapshotCell, StateWatcher};
use crate::store::Middleware;

/// What a reducer decided: an optional replacement state and any effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, F> {
    /// Replacement snapshot, or `None` to keep the current one.
    pub state: Option<S>,
    /// Effects to be processed after dispatch.
    pub effects: Vec<F>,
}

impl<S, F> Transition<S, F> {
    /// Keep the current state and emit nothing.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            state: None,
            effects: vec![],
        }
    }

    /// Publish `state` as the new snapshot.
    #[inline]
    pub fn replace(state: S) -> Self {
        Self {
            state: Some(state),
            effects: vec![],
        }
    }

    /// Publish `state` and emit a single effect.
    #[inline]
    pub fn replace_with(state: S, effect: F) -> Self {
        Self {
            state: Some(state),
            effects: vec![effect],
        }
    }

    /// Keep the current state but emit a single effect.
    #[inline]
    pub fn effect(effect: F) -> Self {
        Self {
            state: None,
            effects: vec![effect],
        }
    }

    /// Add an effect to this transition.
    #[inline]
    pub fn with(mut self, effect: F) -> Self {
        self.effects.push(effect);
        self
    }
}

impl<S, F> From<Option<S>> for Transition<S, F> {
    fn from(state: Option<S>) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

/// Result of dispatching an action to an effect-aware store.
///
/// Contains both the state change indicator and any effects to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<F> {
    /// Whether a new snapshot was published.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<F>,
}

impl<F> Default for DispatchResult<F> {
    fn default() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }
}

impl<F> DispatchResult<F> {
    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, F, E> = fn(&S, A) -> Result<Transition<S, F>, E>;

/// A store that supports effect-emitting reducers.
///
/// Similar to [`Store`](crate::Store), but the reducer returns a
/// [`Transition`], allowing it to declare side effects alongside the
/// replacement state.
pub struct EffectStore<S, A, F, E> {
    cell: SnapshotCell<S>,
    reducer: EffectReducer<S, A, F, E>,
    _marker: PhantomData<fn(A) -> E>,
}

impl<S, A, F, E> EffectStore<S, A, F, E>
where
    A: Action,
{
    /// Create a new effect store with the given initial state and reducer.
    pub fn new(state: S, reducer: EffectReducer<S, A, F, E>) -> Self {
        Self {
            cell: SnapshotCell::new(state),
            reducer,
            _marker: PhantomData,
        }
    }

    /// Get the current state.
    #[inline]
    pub fn state(&self) -> Arc<S> {
        self.cell.state()
    }

    /// Get the current snapshot.
    #[inline]
    pub fn snapshot(&self) -> Snapshot<S> {
        self.cell.current()
    }

    /// Register an observer of published snapshots.
    #[inline]
    pub fn subscribe(&self) -> StateWatcher<S> {
        self.cell.subscribe()
    }

    /// Dispatch an action to the store.
    ///
    /// On error nothing is published and no effects are returned.
    pub fn dispatch(&mut self, action: A) -> Result<DispatchResult<F>, E> {
        let current = self.cell.state();
        let Transition { state, effects } = (self.reducer)(&current, action)?;
        let changed = match state {
            Some(next) => {
                self.cell.publish(next);
                true
            }
            None => false,
        };
        Ok(DispatchResult { changed, effects })
    }
}

/// An effect store with middleware support.
///
/// Wraps an [`EffectStore`] and calls middleware hooks around each
/// dispatch. The middleware sees the action and the change indicator,
/// but not the effects.
pub struct EffectStoreWithMiddleware<S, A, F, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, F, E>,
    middleware: M,
}

impl<S, A, F, E, M> EffectStoreWithMiddleware<S, A, F, E, M>
where
    A: Action,
    E: fmt::Display,
    M: Middleware<A>,
{
    /// Create a new effect store with middleware.
    pub fn new(state: S, reducer: EffectReducer<S, A, F, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    /// Get the current state.
    #[inline]
    pub fn state(&self) -> Arc<S> {
        self.store.state()
    }

    /// Get the current snapshot.
    #[inline]
    pub fn snapshot(&self) -> Snapshot<S> {
        self.store.snapshot()
    }

    /// Register an observer of published snapshots.
    #[inline]
    pub fn subscribe(&self) -> StateWatcher<S> {
        self.store.subscribe()
    }

    /// Get a reference to the middleware.
    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Dispatch an action through middleware and store.
    pub fn dispatch(&mut self, action: A) -> Result<DispatchResult<F>, E> {
        self.middleware.before(&action);
        match self.store.dispatch(action.clone()) {
            Ok(result) => {
                self.middleware.after(&action, result.changed);
                Ok(result)
            }
            Err(error) => {
                self.middleware.rejected(&action, &error);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        TriggerEffect,
        Fail,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Increment => "Increment",
                TestAction::Decrement => "Decrement",
                TestAction::NoOp => "NoOp",
                TestAction::TriggerEffect => "TriggerEffect",
                TestAction::Fail => "Fail",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Log(String),
        Save,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        count: i32,
    }

    fn test_reducer(
        state: &TestState,
        action: TestAction,
    ) -> Result<Transition<TestState, TestEffect>, &'static str> {
        match action {
            TestAction::Increment => Ok(Transition::replace(TestState {
                count: state.count + 1,
            })),
            TestAction::Decrement => {
                let count = state.count - 1;
                Ok(Transition::replace_with(
                    TestState { count },
                    TestEffect::Log(format!("count: {}", count)),
                ))
            }
            TestAction::NoOp => Ok(Transition::unchanged()),
            TestAction::TriggerEffect => {
                Ok(Transition::effect(TestEffect::Log("triggered".into())).with(TestEffect::Save))
            }
            TestAction::Fail => Err("no"),
        }
    }

    #[test]
    fn test_transition_builders() {
        let t: Transition<i32, TestEffect> = Transition::unchanged();
        assert!(t.state.is_none());
        assert!(t.effects.is_empty());

        let t: Transition<i32, TestEffect> = Transition::replace(1);
        assert_eq!(t.state, Some(1));

        let t = Transition::replace_with(2, TestEffect::Save);
        assert_eq!(t.state, Some(2));
        assert_eq!(t.effects, vec![TestEffect::Save]);

        let t: Transition<i32, TestEffect> = Some(3).into();
        assert_eq!(t.state, Some(3));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_effect_store_basic() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);

        assert_eq!(store.state().count, 0);

        let result = store.dispatch(TestAction::Increment).unwrap();
        assert!(result.changed);
        assert!(!result.has_effects());
        assert_eq!(store.state().count, 1);

        let result = store.dispatch(TestAction::NoOp).unwrap();
        assert!(!result.changed);
        assert_eq!(store.snapshot().revision(), 1);
    }

    #[test]
    fn test_effect_store_with_effects() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);

        let result = store.dispatch(TestAction::Decrement).unwrap();
        assert!(result.changed);
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(&result.effects[0], TestEffect::Log(s) if s == "count: -1"));

        let result = store.dispatch(TestAction::TriggerEffect).unwrap();
        assert!(!result.changed);
        assert_eq!(result.effects.len(), 2);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Middleware<TestAction> for Recorder {
        fn before(&mut self, action: &TestAction) {
            self.calls.push(format!("before:{}", action.name()));
        }

        fn after(&mut self, action: &TestAction, state_changed: bool) {
            self.calls
                .push(format!("after:{}:{}", action.name(), state_changed));
        }

        fn rejected(&mut self, action: &TestAction, error: &dyn fmt::Display) {
            self.calls
                .push(format!("rejected:{}:{}", action.name(), error));
        }
    }

    #[test]
    fn test_middleware_sees_every_outcome() {
        let mut store =
            EffectStoreWithMiddleware::new(TestState::default(), test_reducer, Recorder::default());

        store.dispatch(TestAction::Increment).unwrap();
        store.dispatch(TestAction::NoOp).unwrap();
        assert_eq!(store.dispatch(TestAction::Fail), Err("no"));

        assert_eq!(
            store.middleware().calls,
            vec![
                "before:Increment",
                "after:Increment:true",
                "before:NoOp",
                "after:NoOp:false",
                "before:Fail",
                "rejected:Fail:no",
            ]
        );
    }

    #[test]
    fn test_effect_store_error_publishes_nothing() {
        let mut store =
            EffectStoreWithMiddleware::new(TestState::default(), test_reducer, Recorder::default());
        store.dispatch(TestAction::Increment).unwrap();

        assert_eq!(store.dispatch(TestAction::Fail), Err("no"));
        assert_eq!(store.snapshot().revision(), 1);
        assert_eq!(store.state().count, 1);
    }
}
