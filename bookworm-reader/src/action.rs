//! Actions - every way the learning state can change
//!
//! The hierarchy is closed: `LearnAction` wraps the user, book and
//! assistant groups, so the reducer's `match` is checked for exhaustiveness.
//! Names follow the intent/result convention: `Ask` starts an async request
//! and `DidRespond`/`DidError` carry its outcome back, tagged with the id
//! the reducer gave that request.

use bookworm::{truncate_summary, Action, ActionSummary};

use crate::model::{Book, User};

const PAYLOAD_PREVIEW: usize = 40;

#[derive(Action, Clone, Debug, PartialEq)]
pub enum LearnAction {
    /// Mark a load as in flight
    Loading,

    /// Decode bundled mock JSON for the user and finish loading
    FetchMockData(String),

    #[action(flatten)]
    User(UserAction),

    #[action(flatten)]
    Book(BookAction),

    #[action(flatten)]
    Assistant(AssistantAction),
}

#[derive(Action, Clone, Debug, PartialEq)]
pub enum UserAction {
    IncreaseLives,
    DecreaseLives,
    SelectInterest(String),
    LoadUser(User),
    /// JSON text of a `User`
    FetchUser(String),
}

#[derive(Action, Clone, Debug, PartialEq)]
pub enum BookAction {
    /// Index into the loaded book collection
    SelectBook(usize),
    /// Index into the current book's chapters
    SelectChapter(usize),
    CompleteChapter,
    LoadBooks(Vec<Book>),
    /// One JSON text per `Book`
    FetchBooks(Vec<String>),
}

#[derive(Action, Clone, Debug, PartialEq)]
pub enum AssistantAction {
    /// Intent: ask the generative-text service
    Ask(String),
    /// Drop the in-flight request, if any
    Cancel,
    /// Result: the service answered request `request`
    DidRespond { request: u64, reply: String },
    /// Result: request `request` failed or timed out
    DidError { request: u64, message: String },
}

impl From<UserAction> for LearnAction {
    fn from(action: UserAction) -> Self {
        LearnAction::User(action)
    }
}

impl From<BookAction> for LearnAction {
    fn from(action: BookAction) -> Self {
        LearnAction::Book(action)
    }
}

impl From<AssistantAction> for LearnAction {
    fn from(action: AssistantAction) -> Self {
        LearnAction::Assistant(action)
    }
}

/// Keep raw JSON and whole collections out of the logs
impl ActionSummary for LearnAction {
    fn summary(&self) -> String {
        match self {
            LearnAction::FetchMockData(json) => {
                format!("FetchMockData({} bytes)", json.len())
            }
            LearnAction::User(UserAction::FetchUser(json)) => {
                format!("FetchUser({} bytes)", json.len())
            }
            LearnAction::User(UserAction::LoadUser(user)) => {
                format!("LoadUser {{ id: {:?} }}", user.id)
            }
            LearnAction::Book(BookAction::LoadBooks(books)) => {
                format!("LoadBooks({} books)", books.len())
            }
            LearnAction::Book(BookAction::FetchBooks(items)) => {
                format!("FetchBooks({} items)", items.len())
            }
            LearnAction::Assistant(AssistantAction::Ask(prompt)) => {
                format!("Ask({:?})", truncate_summary(prompt, PAYLOAD_PREVIEW))
            }
            LearnAction::Assistant(AssistantAction::DidRespond { request, reply }) => {
                format!(
                    "DidRespond {{ request: {}, reply: {:?} }}",
                    request,
                    truncate_summary(reply, PAYLOAD_PREVIEW)
                )
            }
            _ => format!("{:?}", self),
        }
    }
}
