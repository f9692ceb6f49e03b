//! Keyed background tasks that report back through actions
//!
//! A task is one future run on the tokio runtime; whatever action it resolves
//! to is sent on the action channel the manager was built with. The key names
//! a slot: starting a task in an occupied slot aborts the occupant first, so
//! each slot has at most one request in flight. Aborted tasks send nothing.
//!
//! ```ignore
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(action_tx);
//!
//! tasks.spawn_with_timeout("assistant", Duration::from_secs(30), ask(prompt), |elapsed| {
//!     Action::DidError(format!("no response within {elapsed:?}"))
//! });
//!
//! // user gave up
//! tasks.cancel(&TaskKey::from("assistant"));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Action;

/// Slot name for a background task
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(&'static str);

impl From<&'static str> for TaskKey {
    fn from(name: &'static str) -> Self {
        Self(name)
    }
}

/// Owns the running tasks of an application and aborts them on drop
pub struct TaskManager<A> {
    slots: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A: Action> TaskManager<A> {
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            slots: HashMap::new(),
            action_tx,
        }
    }

    /// Run `future` in slot `key` and send its action when it resolves.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);
        self.slots.retain(|_, handle| !handle.is_finished());

        let action_tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let _ = action_tx.send(future.await);
        });
        self.slots.insert(key, handle.abort_handle());
    }

    /// Like [`spawn`](Self::spawn), but once `limit` passes the future is
    /// dropped and `on_timeout(limit)` is sent in its place.
    pub fn spawn_with_timeout<F, T>(
        &mut self,
        key: impl Into<TaskKey>,
        limit: Duration,
        future: F,
        on_timeout: T,
    ) where
        F: Future<Output = A> + Send + 'static,
        T: FnOnce(Duration) -> A + Send + 'static,
    {
        self.spawn(key, async move {
            tokio::time::timeout(limit, future)
                .await
                .unwrap_or_else(|_| on_timeout(limit))
        });
    }

    /// Abort the task in slot `key`.
    ///
    /// Returns `true` if a task was still running there.
    pub fn cancel(&mut self, key: &TaskKey) -> bool {
        match self.slots.remove(key) {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.slots
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for handle in self.slots.values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASK: &str = "ask";

    #[derive(Clone, Debug, PartialEq)]
    enum Reply {
        Answer(&'static str),
        Late(Duration),
    }

    impl Action for Reply {
        fn name(&self) -> &'static str {
            match self {
                Reply::Answer(_) => "Answer",
                Reply::Late(_) => "Late",
            }
        }
    }

    async fn answer_after(delay: Duration, text: &'static str) -> Reply {
        tokio::time::sleep(delay).await;
        Reply::Answer(text)
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<Reply>, limit: Duration) -> Option<Reply> {
        tokio::time::timeout(limit, rx.recv()).await.ok().flatten()
    }

    #[tokio::test]
    async fn test_result_is_sent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn(ASK, answer_after(Duration::ZERO, "hello"));

        assert_eq!(
            recv(&mut rx, Duration::from_millis(200)).await,
            Some(Reply::Answer("hello"))
        );
    }

    #[tokio::test]
    async fn test_new_request_replaces_old() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn(ASK, answer_after(Duration::from_millis(100), "first"));
        tasks.spawn(ASK, answer_after(Duration::ZERO, "second"));

        assert_eq!(
            recv(&mut rx, Duration::from_millis(300)).await,
            Some(Reply::Answer("second"))
        );
        assert_eq!(recv(&mut rx, Duration::from_millis(200)).await, None);
    }

    #[tokio::test]
    async fn test_slow_request_reports_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_with_timeout(
            ASK,
            Duration::from_millis(20),
            answer_after(Duration::from_secs(10), "never"),
            Reply::Late,
        );

        assert_eq!(
            recv(&mut rx, Duration::from_millis(500)).await,
            Some(Reply::Late(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn test_fast_request_beats_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_with_timeout(
            ASK,
            Duration::from_secs(5),
            answer_after(Duration::ZERO, "quick"),
            Reply::Late,
        );

        assert_eq!(
            recv(&mut rx, Duration::from_millis(200)).await,
            Some(Reply::Answer("quick"))
        );
    }

    #[tokio::test]
    async fn test_cancel_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);
        let key = TaskKey::from(ASK);

        tasks.spawn(ASK, answer_after(Duration::from_millis(50), "dropped"));
        assert!(tasks.is_running(&key));

        assert!(tasks.cancel(&key));
        assert!(!tasks.is_running(&key));
        assert!(!tasks.cancel(&key));

        assert_eq!(recv(&mut rx, Duration::from_millis(150)).await, None);
    }

    #[tokio::test]
    async fn test_finished_task_is_not_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);
        let key = TaskKey::from(ASK);

        tasks.spawn(ASK, answer_after(Duration::ZERO, "done"));
        assert!(recv(&mut rx, Duration::from_millis(200)).await.is_some());
        while tasks.is_running(&key) {
            tokio::task::yield_now().await;
        }

        assert!(!tasks.cancel(&key));
    }

    #[tokio::test]
    async fn test_drop_aborts_running_tasks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn(ASK, answer_after(Duration::from_millis(50), "orphan"));
        drop(tasks);

        assert_eq!(recv(&mut rx, Duration::from_millis(150)).await, None);
    }
}
