//! Effects - side effects declared by the reducer
//!
//! Effects are returned from the reducer and handled by the
//! [`EffectRunner`](crate::runner::EffectRunner). The reducer itself
//! never touches the network.

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the generative-text service; replaces any request in flight.
    /// Results must echo `request`.
    RequestCompletion { request: u64, prompt: String },
    /// Abort the request in flight
    CancelCompletion,
}
