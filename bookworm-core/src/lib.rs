//! Core traits and types for bookworm
//!
//! This crate provides the foundational abstractions for applications
//! with centralized, unidirectional state management, following a
//! Redux/Elm-inspired architecture.
//!
//! # Core Concepts
//!
//! - **Action**: Events that describe state changes
//! - **Store**: Holds one immutable snapshot, replaced through a reducer
//! - **Snapshot**: A published state value with its revision number
//! - **Middleware**: Hooks around every dispatch, such as logging
//! - **EnumToken**: Case-insensitive string-to-enum decoding for serde models
//!
//! # Basic Example
//!
//! ```ignore
//! use bookworm_core::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! enum MyAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     counter: i32,
//! }
//!
//! fn reducer(state: &AppState, action: MyAction) -> Result<Option<AppState>, Infallible> {
//!     let counter = match action {
//!         MyAction::Increment => state.counter + 1,
//!         MyAction::Decrement => state.counter - 1,
//!     };
//!     Ok(Some(AppState { counter }))
//! }
//!
//! let mut store = Store::new(AppState::default(), reducer);
//! store.dispatch(MyAction::Increment)?;
//! ```
//!
//! # Async Handler Pattern
//!
//! Reducers stay synchronous. Work that may block (network calls) is
//! described by an effect, run off the dispatch path, and reported back
//! through a result action:
//!
//! 1. **Intent actions** trigger async work (e.g., `Ask`)
//! 2. **Result actions** carry the outcome back (e.g., `DidRespond`, `DidError`)
//!
//! The `Did*` naming convention clearly identifies result actions.

pub mod action;
pub mod decode;
pub mod effect;
pub mod snapshot;
pub mod store;
#[cfg(feature = "tasks")]
pub mod tasks;
pub mod testing;
pub mod token;

// Core trait exports
pub use action::{truncate_summary, Action, ActionSummary};

// Snapshot exports
pub use snapshot::{Snapshot, SnapshotCell, StateWatcher};

// Store exports
pub use store::{LoggingMiddleware, Middleware, Reducer, Store};

// Effect exports
pub use effect::{
    DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware, Transition,
};

// Decoding exports
pub use decode::{decode_json, decode_json_all, DecodeError};
pub use token::{decode_token, token_conflict, EnumToken};

// Task exports (requires "tasks" feature)
#[cfg(feature = "tasks")]
pub use tasks::{TaskKey, TaskManager};

// Testing exports
pub use testing::{assert_publication_order, collect_until, ActionRecorder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::decode::{decode_json, DecodeError};
    pub use crate::effect::{
        DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware, Transition,
    };
    pub use crate::snapshot::{Snapshot, StateWatcher};
    pub use crate::store::{LoggingMiddleware, Middleware, Reducer, Store};
    #[cfg(feature = "tasks")]
    pub use crate::tasks::{TaskKey, TaskManager};
    pub use crate::token::{decode_token, EnumToken};
}
