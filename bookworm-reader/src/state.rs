//! Application state - single source of truth
//!
//! A `UiState` value is never edited once published. The reducer builds
//! each replacement with struct-update syntax over a clone of the previous
//! snapshot; the book collection sits behind an `Arc` so those clones stay
//! cheap.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{Book, Chapter, User};

/// Everything observers of the learning screens need
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    /// A load or an assistant request is in flight
    pub is_loading: bool,

    /// The last assistant request failed
    pub is_error: bool,

    pub user_data: Option<User>,

    pub current_book: Option<Book>,

    pub current_chapter: Option<Chapter>,

    /// Loaded book collection, indexed by `SelectBook`
    pub books: Arc<[Book]>,

    /// Last answer from the generative-text service
    pub assistant_reply: Option<String>,

    /// Id of the assistant request whose result is awaited
    pub pending_request: Option<u64>,

    /// Ids handed out so far; the next `Ask` takes `requests_made + 1`
    pub requests_made: u64,
}

impl UiState {
    /// Borrowed, serializable view of this snapshot
    pub fn view(&self) -> StateView<'_> {
        StateView {
            is_loading: self.is_loading,
            is_error: self.is_error,
            user_data: self.user_data.as_ref(),
            current_book: self.current_book.as_ref().map(|book| BookSummary {
                id: &book.id,
                title: &book.title,
                progress: book.progress(),
            }),
            current_chapter: self.current_chapter.as_ref(),
            books: self
                .books
                .iter()
                .map(|book| BookSummary {
                    id: &book.id,
                    title: &book.title,
                    progress: book.progress(),
                })
                .collect(),
            assistant_reply: self.assistant_reply.as_deref(),
        }
    }
}

/// JSON rendering of a [`UiState`]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView<'a> {
    pub is_loading: bool,
    pub is_error: bool,
    pub user_data: Option<&'a User>,
    pub current_book: Option<BookSummary<'a>>,
    pub current_chapter: Option<&'a Chapter>,
    pub books: Vec<BookSummary<'a>>,
    pub assistant_reply: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub progress: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = UiState::default();
        assert!(!state.is_loading);
        assert!(!state.is_error);
        assert!(state.user_data.is_none());
        assert!(state.current_book.is_none());
        assert!(state.current_chapter.is_none());
        assert!(state.books.is_empty());
        assert!(state.pending_request.is_none());
        assert_eq!(state.requests_made, 0);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let state = UiState {
            is_loading: true,
            ..UiState::default()
        };
        let json = serde_json::to_value(state.view()).unwrap();
        assert_eq!(json["isLoading"], true);
        assert_eq!(json["isError"], false);
        assert!(json["userData"].is_null());
        assert_eq!(json["books"], serde_json::json!([]));
    }
}
