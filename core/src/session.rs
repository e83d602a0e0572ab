//! Maps caller-supplied chat history onto provider messages.

use crate::message::{ChatMessage, ChatTurn};

/// Convert history into role-tagged messages, one per turn, in order.
///
/// Content is passed through verbatim: no filtering, truncation, or
/// summarization. An empty history yields no messages.
pub fn adapt(history: &[ChatTurn]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|turn| ChatMessage {
            role: turn.role.into(),
            content: turn.content.clone(),
        })
        .collect()
}
