// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversation state and the completion session

pub mod history;
pub mod session;

pub use history::{ConversationWindow, Role, Turn, DEFAULT_HISTORY_SIZE};
pub use session::ChatSession;
