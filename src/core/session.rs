//! Session state for one chat conversation.
//!
//! The store owns the transcript, the draft input buffer, and the pending
//! flag. All mutation goes through the methods here; renderers only ever see
//! a [`SessionSnapshot`].

use std::collections::VecDeque;

use crate::core::message::{Message, Role};

/// Owns the conversation transcript, the unsent draft, and the in-flight
/// submission flag.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: VecDeque<Message>,
    draft: String,
    pending: bool,
}

/// Read-only view over the session state handed to rendering code.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
    pub transcript: &'a VecDeque<Message>,
    pub draft: &'a str,
    pub pending: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the draft buffer unconditionally.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Appends a message to the end of the transcript. Messages are never
    /// removed or reordered afterwards.
    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push_back(Message::new(role, content));
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn transcript(&self) -> &VecDeque<Message> {
        &self.transcript
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            transcript: &self.transcript,
            draft: &self.draft,
            pending: self.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_messages_keep_insertion_order() {
        let mut session = ChatSession::new();
        session.append_message(Role::User, "first");
        session.append_message(Role::Bot, "second");
        session.append_message(Role::User, "third");

        let contents: Vec<&str> = session
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn set_draft_replaces_previous_content() {
        let mut session = ChatSession::new();
        session.set_draft("hello");
        session.set_draft("world");
        assert_eq!(session.draft(), "world");
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut session = ChatSession::new();
        session.append_message(Role::User, "hi");
        session.set_draft("typing");
        session.set_pending(true);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.transcript.len(), 1);
        assert_eq!(snapshot.draft, "typing");
        assert!(snapshot.pending);
    }
}
