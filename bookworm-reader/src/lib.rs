//! Learning-app state core built on bookworm
//!
//! Domain model, immutable [`UiState`] snapshots, the closed [`LearnAction`]
//! hierarchy and its [`reducer`], plus the generative-text client the
//! assistant actions talk to.
//!
//! ```
//! use bookworm_reader::{LearnAction, LearningStore, UserAction};
//!
//! let mut store = LearningStore::default();
//! store.dispatch(LearnAction::Loading).unwrap();
//! store
//!     .dispatch(LearnAction::FetchMockData(
//!         r#"{"userId":"u1","userName":"Ada","userLives":2,"userInterests":[]}"#.into(),
//!     ))
//!     .unwrap();
//! store.dispatch(UserAction::IncreaseLives).unwrap();
//!
//! let state = store.state();
//! assert!(!state.is_loading);
//! assert_eq!(state.user_data.as_ref().map(|u| u.lives), Some(3));
//! ```

pub mod action;
pub mod config;
pub mod effect;
pub mod error;
pub mod genai;
pub mod model;
pub mod reducer;
pub mod runner;
pub mod state;

pub use action::{AssistantAction, BookAction, LearnAction, UserAction};
pub use config::{GenAiArgs, GenAiConfig};
pub use effect::Effect;
pub use error::ReduceError;
pub use genai::{GenAiClient, NetworkError, FALLBACK_RESPONSE};
pub use model::{Book, Chapter, ChapterType, Page, User};
pub use reducer::reducer;
pub use runner::{drive, EffectRunner, LearningStore, ASSISTANT_TASK};
pub use state::UiState;
