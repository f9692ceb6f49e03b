//! Action trait for type-safe state transitions

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged, replayed, or sent to multiple handlers
/// - Debug: For debugging and logging
/// - Send + 'static: Result actions are produced by async tasks
///
/// Use `#[derive(Action)]` from `bookworm-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Short, log-friendly description of an action.
///
/// The default falls back to `Debug`. Override it for actions that carry
/// large payloads (raw JSON, decoded collections) so log lines stay readable.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Truncate `text` to at most `max` characters, appending `...` when cut.
pub fn truncate_summary(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum Ping {
        Once,
    }

    impl Action for Ping {
        fn name(&self) -> &'static str {
            "Once"
        }
    }

    impl ActionSummary for Ping {}

    #[test]
    fn test_default_summary_uses_debug() {
        assert_eq!(Ping::Once.summary(), "Once");
    }

    #[test]
    fn test_truncate_summary() {
        assert_eq!(truncate_summary("short", 10), "short");
        assert_eq!(truncate_summary("abcdefghijkl", 8), "abcde...");
    }
}
