//! Store ownership and effect handling
//!
//! [`LearningStore`] is the caller-owned state container. [`EffectRunner`]
//! executes the effects the reducer declares, and [`drive`] connects the
//! two around an action channel:
//!
//! 1. Action arrives on the channel -> `LearningStore::dispatch`
//! 2. Reducer publishes a snapshot and returns effects
//! 3. Effects go to the runner, which spawns tasks
//! 4. Tasks report back by sending result actions to the same channel

use std::sync::Arc;

use bookworm::{
    DispatchResult, EffectStoreWithMiddleware, LoggingMiddleware, Snapshot, StateWatcher,
    TaskKey, TaskManager,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::{AssistantAction, LearnAction};
use crate::effect::Effect;
use crate::error::ReduceError;
use crate::genai::{GenAiClient, NetworkError};
use crate::reducer::reducer;
use crate::state::UiState;

/// Task key shared by all assistant requests; a new one replaces the old.
pub const ASSISTANT_TASK: &str = "assistant";

/// The learning state container
pub struct LearningStore {
    store: EffectStoreWithMiddleware<UiState, LearnAction, Effect, ReduceError, LoggingMiddleware>,
}

impl Default for LearningStore {
    fn default() -> Self {
        Self::new(UiState::default())
    }
}

impl LearningStore {
    pub fn new(state: UiState) -> Self {
        Self {
            store: EffectStoreWithMiddleware::new(state, reducer, LoggingMiddleware::new()),
        }
    }

    /// Apply `action`. On error the previous snapshot stays current.
    pub fn dispatch(
        &mut self,
        action: impl Into<LearnAction>,
    ) -> Result<DispatchResult<Effect>, ReduceError> {
        self.store.dispatch(action.into())
    }

    pub fn state(&self) -> Arc<UiState> {
        self.store.state()
    }

    pub fn snapshot(&self) -> Snapshot<UiState> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> StateWatcher<UiState> {
        self.store.subscribe()
    }
}

/// Runs reducer effects as cancellable tasks
pub struct EffectRunner {
    client: GenAiClient,
    tasks: TaskManager<LearnAction>,
}

impl EffectRunner {
    /// Result actions are sent on `action_tx`.
    pub fn new(client: GenAiClient, action_tx: mpsc::UnboundedSender<LearnAction>) -> Self {
        Self {
            client,
            tasks: TaskManager::new(action_tx),
        }
    }

    pub fn handle(&mut self, effect: Effect) {
        match effect {
            Effect::RequestCompletion { request, prompt } => {
                self.request_completion(request, prompt)
            }
            Effect::CancelCompletion => self.cancel_pending(),
        }
    }

    /// Whether an assistant request is in flight
    pub fn is_pending(&self) -> bool {
        self.tasks.is_running(&TaskKey::from(ASSISTANT_TASK))
    }

    /// Abort the in-flight assistant request. No result action is sent;
    /// one already queued is dropped by the reducer.
    pub fn cancel_pending(&mut self) {
        if self.tasks.cancel(&TaskKey::from(ASSISTANT_TASK)) {
            tracing::info!("Cancelled assistant request");
        }
    }

    /// The client sets no deadline of its own; `timeout` is enforced here.
    fn request_completion(&mut self, request: u64, prompt: String) {
        let client = self.client.clone();
        let limit = client.config().timeout;
        tracing::info!(request, prompt_len = prompt.len(), ?limit, "Requesting completion");

        self.tasks.spawn_with_timeout(
            ASSISTANT_TASK,
            limit,
            async move {
                match client.get_response(&prompt).await {
                    Ok(reply) => {
                        LearnAction::from(AssistantAction::DidRespond { request, reply })
                    }
                    Err(error) => {
                        tracing::warn!(request, %error, "Completion failed");
                        LearnAction::from(AssistantAction::DidError {
                            request,
                            message: error.to_string(),
                        })
                    }
                }
            },
            move |elapsed| {
                let error = NetworkError::Timeout(elapsed);
                tracing::warn!(request, %error, "Completion timed out");
                LearnAction::from(AssistantAction::DidError {
                    request,
                    message: error.to_string(),
                })
            },
        );
    }
}

/// Feed actions from `actions` into `store` until the channel closes or
/// `shutdown` fires. Rejected actions are logged by the store middleware
/// and skipped.
pub async fn drive(
    store: &mut LearningStore,
    runner: &mut EffectRunner,
    actions: &mut mpsc::UnboundedReceiver<LearnAction>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                runner.cancel_pending();
                break;
            }
            action = actions.recv() => {
                let Some(action) = action else {
                    break;
                };
                match store.dispatch(action) {
                    Ok(result) => {
                        for effect in result.effects {
                            runner.handle(effect);
                        }
                    }
                    Err(error) => {
                        tracing::debug!(%error, "Skipping rejected action");
                    }
                }
            }
        }
    }
}
