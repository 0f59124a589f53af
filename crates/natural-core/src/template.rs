//! The seam between prompt values and chat messages.
//!
//! Anything that can be sent to a prediction service implements
//! [`IntoPrompt`]. The `Prompt` capability type of natural functions lives in
//! `natural-prompt` and implements it; tests and hosts can plug in their own.

/// Converts a value into a series of chat messages.
pub trait IntoPrompt {
    /// Chat message representation emitted by the prompt.
    type Message: Send + Sync + 'static;

    /// Consume `self` and return **all** messages in the desired order.
    fn into_prompt(self) -> Vec<Self::Message>;
}

/// A single [`crate::generic::GenericMessage`] is already a prompt.
impl IntoPrompt for crate::generic::GenericMessage {
    type Message = crate::generic::GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![self]
    }
}
