//! Transcript model behind the assistant panel.

use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "Hello! I can help you analyze your finances. Ask me anything about your spending.";
pub const FAILURE_REPLY: &str = "Sorry, I encountered an error processing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Messages shown in the panel plus whether a reply is outstanding.
///
/// Only one question may be in flight; `submit` refuses input while pending.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    pending: bool,
    max_messages: usize,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new(200)
    }
}

impl ChatTranscript {
    /// Start a transcript with the assistant greeting
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
            pending: false,
            max_messages: max_messages.max(1),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn can_send(&self, input: &str) -> bool {
        !self.pending && !input.trim().is_empty()
    }

    /// Record a user question. Returns the text to send, or `None` if the
    /// input is blank or a reply is still pending.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        if !self.can_send(input) {
            return None;
        }
        let text = input.trim().to_string();
        self.push(Role::User, text.clone());
        self.pending = true;
        Some(text)
    }

    pub fn receive(&mut self, reply: impl Into<String>) {
        self.push(Role::Assistant, reply.into());
        self.pending = false;
    }

    /// The request failed; show the generic apology instead of a reply
    pub fn fail(&mut self) {
        self.receive(FAILURE_REPLY);
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(ChatMessage { role, content });
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}
