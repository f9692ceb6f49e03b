//! Centralized state store with reducer pattern

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::action::ActionSummary;
use crate::snapshot::{Snapshot, SnapshotCell, StateWatcher};
use crate::Action;

/// A reducer function that computes the next state from the current one
///
/// Returns `Ok(Some(next))` to publish a replacement snapshot, `Ok(None)`
/// when the action leaves the state as it is, and `Err` to reject the
/// action. The current state is only ever borrowed, never mutated.
pub type Reducer<S, A, E> = fn(&S, A) -> Result<Option<S>, E>;

/// Centralized state store with Redux-like reducer pattern
///
/// The store holds the current snapshot and provides a single point
/// for state transitions through the `dispatch` method.
///
/// # Type Parameters
/// * `S` - The application state type
/// * `A` - The action type (must implement `Action`)
/// * `E` - The error a rejected action produces
///
/// # Example
/// ```
/// use bookworm_core::{Action, Store};
///
/// #[derive(Clone, Debug, Default)]
/// struct AppState {
///     counter: i32,
/// }
///
/// #[derive(Clone, Debug)]
/// enum MyAction {
///     Increment,
///     Decrement,
/// }
///
/// impl Action for MyAction {
///     fn name(&self) -> &'static str {
///         match self {
///             MyAction::Increment => "Increment",
///             MyAction::Decrement => "Decrement",
///         }
///     }
/// }
///
/// fn reducer(state: &AppState, action: MyAction) -> Result<Option<AppState>, String> {
///     let counter = match action {
///         MyAction::Increment => state.counter + 1,
///         MyAction::Decrement => state.counter - 1,
///     };
///     Ok(Some(AppState { counter }))
/// }
///
/// let mut store = Store::new(AppState::default(), reducer);
/// store.dispatch(MyAction::Increment).unwrap();
/// assert_eq!(store.state().counter, 1);
/// ```
pub struct Store<S, A: Action, E> {
    cell: SnapshotCell<S>,
    reducer: Reducer<S, A, E>,
    _marker: PhantomData<fn(A) -> E>,
}

impl<S, A: Action, E> Store<S, A, E> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: Reducer<S, A, E>) -> Self {
        Self {
            cell: SnapshotCell::new(state),
            reducer,
            _marker: PhantomData,
        }
    }

    /// Dispatch an action to the store
    ///
    /// Returns `Ok(true)` if a new snapshot was published. On error the
    /// previous snapshot stays current and nothing is published.
    pub fn dispatch(&mut self, action: A) -> Result<bool, E> {
        let current = self.cell.state();
        match (self.reducer)(&current, action)? {
            Some(next) => {
                self.cell.publish(next);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Get the current state
    pub fn state(&self) -> Arc<S> {
        self.cell.state()
    }

    /// Get the current snapshot, including its revision
    pub fn snapshot(&self) -> Snapshot<S> {
        self.cell.current()
    }

    /// Revision of the current snapshot
    pub fn revision(&self) -> u64 {
        self.cell.revision()
    }

    /// Register an observer of published snapshots
    pub fn subscribe(&self) -> StateWatcher<S> {
        self.cell.subscribe()
    }
}

/// Hooks run around every dispatch of an
/// [`EffectStoreWithMiddleware`](crate::EffectStoreWithMiddleware)
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the reducer accepted the action
    fn after(&mut self, action: &A, state_changed: bool);

    /// Called when the reducer rejected the action
    fn rejected(&mut self, action: &A, error: &dyn fmt::Display) {
        let _ = (action, error);
    }
}

/// Middleware that logs every dispatch through `tracing`
///
/// The action summary goes out at `trace` before the reducer runs, the
/// outcome at `debug`, and rejections at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        tracing::trace!(
            action = %action.name(),
            summary = %action.summary(),
            "Dispatching action"
        );
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        tracing::debug!(
            action = %action.name(),
            state_changed,
            "Action processed"
        );
    }

    fn rejected(&mut self, action: &A, error: &dyn fmt::Display) {
        tracing::warn!(
            action = %action.name(),
            summary = %action.summary(),
            error = %error,
            "Action rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        counter: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        Fail,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Increment => "Increment",
                TestAction::Decrement => "Decrement",
                TestAction::NoOp => "NoOp",
                TestAction::Fail => "Fail",
            }
        }
    }

    fn test_reducer(state: &TestState, action: TestAction) -> Result<Option<TestState>, String> {
        match action {
            TestAction::Increment => Ok(Some(TestState {
                counter: state.counter + 1,
            })),
            TestAction::Decrement => Ok(Some(TestState {
                counter: state.counter - 1,
            })),
            TestAction::NoOp => Ok(None),
            TestAction::Fail => Err("rejected".into()),
        }
    }

    #[test]
    fn test_store_dispatch() {
        let mut store = Store::new(TestState::default(), test_reducer);

        assert_eq!(store.dispatch(TestAction::Increment), Ok(true));
        assert_eq!(store.state().counter, 1);

        assert_eq!(store.dispatch(TestAction::Increment), Ok(true));
        assert_eq!(store.state().counter, 2);

        assert_eq!(store.dispatch(TestAction::Decrement), Ok(true));
        assert_eq!(store.state().counter, 1);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_store_noop_keeps_revision() {
        let mut store = Store::new(TestState::default(), test_reducer);

        assert_eq!(store.dispatch(TestAction::NoOp), Ok(false));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_store_error_keeps_last_snapshot() {
        let mut store = Store::new(TestState::default(), test_reducer);
        store.dispatch(TestAction::Increment).unwrap();
        let before = store.snapshot();

        assert_eq!(store.dispatch(TestAction::Fail), Err("rejected".to_string()));

        let after = store.snapshot();
        assert_eq!(after.revision(), before.revision());
        assert!(Arc::ptr_eq(after.state(), before.state()));
    }

    #[test]
    fn test_previous_state_not_mutated() {
        let mut store = Store::new(TestState::default(), test_reducer);
        let held = store.state();

        store.dispatch(TestAction::Increment).unwrap();

        assert_eq!(held.counter, 0);
        assert_eq!(store.state().counter, 1);
    }

    #[tokio::test]
    async fn test_watchers_see_publication_order() {
        let mut store = Store::new(TestState::default(), test_reducer);
        let mut watcher = store.subscribe();

        let observer = tokio::spawn(async move {
            let mut revisions = Vec::new();
            while let Some(snapshot) = watcher.changed().await {
                revisions.push(snapshot.revision());
                if snapshot.counter == 50 {
                    break;
                }
            }
            revisions
        });

        for _ in 0..50 {
            store.dispatch(TestAction::Increment).unwrap();
            tokio::task::yield_now().await;
        }

        let revisions = observer.await.unwrap();
        assert!(!revisions.is_empty());
        assert!(revisions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(revisions.last(), Some(&50));
    }
}
