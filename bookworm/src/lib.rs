//! bookworm: Unidirectional state management with case-insensitive enum decoding
//!
//! Like Redux/Elm: one immutable snapshot, replaced only by a reducer in
//! response to dispatched actions, observed through ordered watchers.
//!
//! # Example
//! ```ignore
//! use bookworm::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! enum MyAction {
//!     NextItem,
//!     PrevItem,
//! }
//!
//! #[derive(EnumToken, Clone, Copy, Debug, PartialEq)]
//! enum Kind {
//!     Challenge,
//!     Read,
//! }
//! ```

// Re-export everything from core
pub use bookworm_core::*;

// Re-export derive macros
pub use bookworm_macros::{Action, EnumToken};

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use bookworm_core::{Action, ActionSummary, EnumToken};

    // Store
    pub use bookworm_core::{
        DispatchResult, EffectStore, EffectStoreWithMiddleware, LoggingMiddleware, Middleware,
        Reducer, Snapshot, StateWatcher, Store, Transition,
    };

    // Decoding
    pub use bookworm_core::{decode_json, decode_token, DecodeError};

    #[cfg(feature = "tasks")]
    pub use bookworm_core::{TaskKey, TaskManager};

    // Derive macros
    pub use bookworm_macros::{Action, EnumToken};
}
