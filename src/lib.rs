// SPDX-License-Identifier: AGPL-3.0-or-later

//! GigaChat chat client for your terminal.
//!
//! This crate exposes the runtime used by the `gigachat` CLI (`src/main.rs`):
//! - `auth`: OAuth token acquisition, caching and lazy renewal
//! - `chat`: bounded conversation window and the completion session
//! - `config`: settings file and environment credential resolution
//! - `transport`: shared HTTP client and TLS trust handling
//!
//! A [`chat::ChatSession`] owns one [`auth::TokenManager`] and one
//! [`chat::ConversationWindow`]; every `send` ensures a valid token, ships
//! the trailing window of the conversation, and records the reply.

pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod transport;

pub use chat::{ChatSession, ConversationWindow, Role, Turn};
pub use error::{GigaError, Result};
