// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bounded conversation history
//!
//! The completion endpoint is stateless, so every request carries a trailing
//! window of the conversation. [`ConversationWindow`] keeps that window at a
//! fixed capacity by evicting whole turns from the oldest end; turn content
//! is never truncated or summarized.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of turns kept in the window
pub const DEFAULT_HISTORY_SIZE: usize = 6;

/// Originator of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant reply
    Assistant,
}

/// One message in the conversation, immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Fixed-capacity FIFO of [`Turn`]s in chronological order
#[derive(Debug)]
pub struct ConversationWindow {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl ConversationWindow {
    /// Create an empty window holding at most `capacity` turns.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a user turn and return a snapshot of the window.
    ///
    /// The snapshot is exactly the message list to transmit: the true
    /// conversation's trailing window, chronological, ending with the new
    /// user turn.
    pub fn push_user(&mut self, content: impl Into<String>) -> Vec<Turn> {
        self.push(Turn::user(content));
        self.snapshot()
    }

    /// Append the assistant's reply verbatim.
    pub fn push_assistant(&mut self, turn: Turn) {
        self.push(turn);
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&mut self, turn: Turn) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }
}

impl Default for ConversationWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(window: &ConversationWindow) -> Vec<String> {
        window.snapshot().into_iter().map(|t| t.content).collect()
    }

    #[test]
    fn test_push_user_returns_snapshot() {
        let mut window = ConversationWindow::default();
        let messages = window.push_user("hello");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], Turn::user("hello"));
    }

    #[test]
    fn test_snapshot_is_chronological() {
        let mut window = ConversationWindow::default();
        window.push_user("question");
        window.push_assistant(Turn::assistant("answer"));
        let messages = window.push_user("follow-up");

        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[2], Turn::user("follow-up"));
    }

    #[test]
    fn test_eviction_is_oldest_first() {
        // Capacity 6, eight user turns "1".."8" leaves "3".."8".
        let mut window = ConversationWindow::new(6);
        for i in 1..=8 {
            window.push_user(i.to_string());
        }

        assert_eq!(window.len(), 6);
        assert_eq!(contents(&window), ["3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn test_eviction_applies_to_assistant_turns() {
        let mut window = ConversationWindow::new(2);
        window.push_user("u1");
        window.push_assistant(Turn::assistant("a1"));
        window.push_assistant(Turn::assistant("a2"));

        assert_eq!(contents(&window), ["a1", "a2"]);
    }

    #[test]
    fn test_interleaved_turns_keep_order() {
        let mut window = ConversationWindow::new(3);
        window.push_user("u1");
        window.push_assistant(Turn::assistant("a1"));
        window.push_user("u2");
        window.push_assistant(Turn::assistant("a2"));

        assert_eq!(contents(&window), ["a1", "u2", "a2"]);
    }

    #[test]
    fn test_capacity_floor_is_one() {
        let mut window = ConversationWindow::new(0);
        window.push_user("only");
        window.push_user("newest");

        assert_eq!(window.capacity(), 1);
        assert_eq!(contents(&window), ["newest"]);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(ConversationWindow::default().capacity(), DEFAULT_HISTORY_SIZE);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
