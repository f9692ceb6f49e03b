//! Helpers for testing stores and effect handlers
//!
//! [`ActionRecorder`] takes the place of an application's action channel so
//! a test can see what an effect handler reported back. [`collect_until`]
//! and [`assert_publication_order`] check what a store's watchers observe.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::snapshot::{Snapshot, StateWatcher};
use crate::Action;

/// Records actions sent on its channel
///
/// ```ignore
/// let mut recorder = ActionRecorder::new();
/// let mut runner = EffectRunner::new(client, recorder.sender());
///
/// runner.handle(Effect::RequestCompletion { request: 1, prompt });
/// let reply = recorder.next_within(Duration::from_secs(1)).await;
/// ```
pub struct ActionRecorder<A> {
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<A: Action> ActionRecorder<A> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Sender to hand to the code under test
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Everything recorded so far, oldest first
    pub fn drain(&mut self) -> Vec<A> {
        std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
    }

    /// The next action, or `None` if nothing arrives within `limit`.
    pub async fn next_within(&mut self, limit: Duration) -> Option<A> {
        tokio::time::timeout(limit, self.rx.recv())
            .await
            .ok()
            .flatten()
    }
}

impl<A: Action> Default for ActionRecorder<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive snapshots from `watcher` until one satisfies `done`.
///
/// Returns every snapshot observed, the satisfying one last. Stops early
/// if the store is dropped.
pub async fn collect_until<S, P>(watcher: &mut StateWatcher<S>, mut done: P) -> Vec<Snapshot<S>>
where
    P: FnMut(&S) -> bool,
{
    let mut seen = Vec::new();
    while let Some(snapshot) = watcher.changed().await {
        let finished = done(&snapshot);
        seen.push(snapshot);
        if finished {
            break;
        }
    }
    seen
}

/// Assert that `snapshots` were observed in strictly increasing revision order.
///
/// # Panics
///
/// Panics naming the first out-of-order pair.
pub fn assert_publication_order<S>(snapshots: &[Snapshot<S>]) {
    for pair in snapshots.windows(2) {
        assert!(
            pair[0].revision() < pair[1].revision(),
            "snapshot revision {} observed after revision {}",
            pair[1].revision(),
            pair[0].revision()
        );
    }
}

/// Assert that some recorded action matches a pattern.
///
/// ```ignore
/// assert_emitted!(actions, AssistantAction::DidError { message, .. } if message.contains("503"));
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "no recorded action matches `{}`; recorded: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no recorded action matches a pattern.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "unexpected action matching `{}`; recorded: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}
