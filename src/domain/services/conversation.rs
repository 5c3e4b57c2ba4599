#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use crate::domain::models::Author;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::QueryResponse;

/// The chat transcript for the current run. Nothing is persisted.
#[derive(Default)]
pub struct Conversation {
    messages: Vec<Message>,
    pending_id: Option<String>,
}

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn is_loading(&self) -> bool {
        return self.pending_id.is_some();
    }

    /// Records the user's question and returns the prompt to send. Returns
    /// `None` without touching the transcript for blank input or while an
    /// answer is still pending.
    pub fn submit(&mut self, text: &str, num_sources: usize) -> Option<ChatPrompt> {
        if text.trim().is_empty() || self.is_loading() {
            return None;
        }

        let message = Message::new(Author::User, text);
        let prompt = ChatPrompt::new(text, num_sources).with_request_id(&message.id);
        self.pending_id = Some(message.id.clone());
        self.messages.push(message);

        return Some(prompt);
    }

    /// Takes the pending request if `request_id` is the one in flight.
    fn settle(&mut self, request_id: &str) -> bool {
        if self.pending_id.as_deref() != Some(request_id) {
            tracing::debug!(request_id = request_id, "Dropping stale chat response");
            return false;
        }

        self.pending_id = None;
        return true;
    }

    /// Answers for a cancelled or superseded question are dropped.
    pub fn receive_answer(&mut self, request_id: &str, response: QueryResponse) {
        if !self.settle(request_id) {
            return;
        }

        self.messages.push(Message::new_with_sources(
            Author::Assistant,
            &response.answer,
            response.sources,
        ));
    }

    /// Returns whether the failure belonged to the pending question.
    pub fn receive_failure(&mut self, request_id: &str, detail: &str) -> bool {
        if !self.settle(request_id) {
            return false;
        }

        self.messages.push(Message::new_with_type(
            Author::Assistant,
            MessageType::Error,
            detail,
        ));

        return true;
    }

    pub fn abort(&mut self) {
        if self.pending_id.take().is_none() {
            return;
        }

        self.push_notice(Message::new_with_type(
            Author::KBChat,
            MessageType::Error,
            "Request cancelled.",
        ));
    }

    /// Appends a message that never reaches the backend, such as help text.
    pub fn push_notice(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
