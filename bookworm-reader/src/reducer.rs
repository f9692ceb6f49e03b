//! Reducer - pure function: (state, action) -> next state
//!
//! - fn(&UiState, LearnAction) -> Result<Transition<UiState, Effect>, ReduceError>
//! - Every replacement is a new `UiState`; the input is only read
//! - Malformed payloads and bad indices reject the action
//! - No side effects: network work is returned as an `Effect`

use std::sync::Arc;

use bookworm::{decode_json, decode_json_all, Transition};

use crate::action::{AssistantAction, BookAction, LearnAction, UserAction};
use crate::effect::Effect;
use crate::error::ReduceError;
use crate::model::{Book, User};
use crate::state::UiState;

/// The reducer handles all state transitions
pub fn reducer(
    state: &UiState,
    action: LearnAction,
) -> Result<Transition<UiState, Effect>, ReduceError> {
    match action {
        LearnAction::Loading => {
            if state.is_loading {
                return Ok(Transition::unchanged());
            }
            Ok(Transition::replace(UiState {
                is_loading: true,
                ..state.clone()
            }))
        }

        // A rejected payload leaves an earlier `Loading` in place; only a
        // later accepted `FetchMockData` clears it.
        LearnAction::FetchMockData(json) => {
            let user: User = decode_json(&json)?;
            Ok(Transition::replace(UiState {
                is_loading: false,
                is_error: false,
                user_data: Some(user),
                ..state.clone()
            }))
        }

        LearnAction::User(action) => reduce_user(state, action).map(Transition::from),
        LearnAction::Book(action) => reduce_book(state, action).map(Transition::from),
        LearnAction::Assistant(action) => Ok(reduce_assistant(state, action)),
    }
}

fn reduce_user(state: &UiState, action: UserAction) -> Result<Option<UiState>, ReduceError> {
    let current = state.user_data.as_ref();
    let user = match action {
        UserAction::LoadUser(user) => Some(user),
        UserAction::FetchUser(json) => Some(decode_json::<User>(&json)?),
        UserAction::IncreaseLives => current.and_then(User::gain_life),
        UserAction::DecreaseLives => current.and_then(User::lose_life),
        UserAction::SelectInterest(interest) => {
            current.and_then(|user| user.with_interest(&interest))
        }
    };

    Ok(user.map(|user| UiState {
        user_data: Some(user),
        ..state.clone()
    }))
}

fn reduce_book(state: &UiState, action: BookAction) -> Result<Option<UiState>, ReduceError> {
    match action {
        BookAction::SelectBook(index) => {
            let book = state.books.get(index).ok_or(ReduceError::Index {
                collection: "books",
                index,
                len: state.books.len(),
            })?;
            Ok(Some(UiState {
                current_book: Some(book.clone()),
                current_chapter: book.chapters.first().cloned(),
                ..state.clone()
            }))
        }

        BookAction::SelectChapter(index) => {
            let book = state
                .current_book
                .as_ref()
                .ok_or(ReduceError::NoBookSelected)?;
            let chapter = book.chapters.get(index).ok_or(ReduceError::Index {
                collection: "chapters",
                index,
                len: book.chapters.len(),
            })?;
            Ok(Some(UiState {
                current_chapter: Some(chapter.clone()),
                ..state.clone()
            }))
        }

        BookAction::CompleteChapter => {
            let Some(chapter) = state.current_chapter.as_ref() else {
                return Ok(None);
            };
            if chapter.is_completed {
                return Ok(None);
            }

            let current_book = state
                .current_book
                .as_ref()
                .map(|book| book.with_chapter_completed(&chapter.id));
            let books = match &current_book {
                Some(selected) => state
                    .books
                    .iter()
                    .map(|book| {
                        if book.id == selected.id {
                            book.with_chapter_completed(&chapter.id)
                        } else {
                            book.clone()
                        }
                    })
                    .collect(),
                None => Arc::clone(&state.books),
            };

            Ok(Some(UiState {
                current_chapter: Some(chapter.completed()),
                current_book,
                books,
                ..state.clone()
            }))
        }

        BookAction::LoadBooks(books) => Ok(Some(with_books(state, books))),

        BookAction::FetchBooks(items) => {
            let books = decode_json_all::<Book, _>(&items)?;
            Ok(Some(with_books(state, books)))
        }
    }
}

/// Replace the collection; old selections may point at books that are gone.
fn with_books(state: &UiState, books: Vec<Book>) -> UiState {
    UiState {
        books: books.into(),
        current_book: None,
        current_chapter: None,
        ..state.clone()
    }
}

/// Results are matched against `pending_request`; a result for a cancelled
/// or superseded request is dropped without publishing.
fn reduce_assistant(state: &UiState, action: AssistantAction) -> Transition<UiState, Effect> {
    match action {
        AssistantAction::Ask(prompt) => {
            if prompt.trim().is_empty() {
                return Transition::unchanged();
            }
            let request = state.requests_made + 1;
            Transition::replace_with(
                UiState {
                    is_loading: true,
                    is_error: false,
                    pending_request: Some(request),
                    requests_made: request,
                    ..state.clone()
                },
                Effect::RequestCompletion { request, prompt },
            )
        }

        AssistantAction::Cancel => {
            let next = state.pending_request.is_some().then(|| UiState {
                is_loading: false,
                pending_request: None,
                ..state.clone()
            });
            Transition {
                state: next,
                effects: vec![Effect::CancelCompletion],
            }
        }

        AssistantAction::DidRespond { request, reply } => {
            if state.pending_request != Some(request) {
                tracing::debug!(request, "Dropping reply for stale request");
                return Transition::unchanged();
            }
            Transition::replace(UiState {
                is_loading: false,
                is_error: false,
                pending_request: None,
                assistant_reply: Some(reply),
                ..state.clone()
            })
        }

        AssistantAction::DidError { request, message } => {
            if state.pending_request != Some(request) {
                tracing::debug!(request, %message, "Dropping failure for stale request");
                return Transition::unchanged();
            }
            Transition::replace(UiState {
                is_loading: false,
                is_error: true,
                pending_request: None,
                ..state.clone()
            })
        }
    }
}
