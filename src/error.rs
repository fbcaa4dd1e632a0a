// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the GigaChat client
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Main error type for GigaChat operations
#[derive(Error, Debug)]
pub enum GigaError {
    /// Token acquisition errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Chat session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from the OAuth token endpoint
///
/// Acquisition failures are reported as values, never as panics; a failed
/// exchange leaves any previously stored token untouched.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token endpoint answered with a non-success status
    #[error("token endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-level failure (connect, TLS, timeout)
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Success status but an unparseable body
    #[error("malformed token response: {0}")]
    InvalidResponse(String),

    /// No token in store when one was expected
    #[error("no access token present")]
    MissingToken,
}

/// Errors surfaced by [`crate::chat::ChatSession::send`]
#[derive(Error, Debug)]
pub enum SessionError {
    /// A valid token could not be obtained; the completion endpoint was
    /// never contacted
    #[error("could not obtain a valid access token: {0}")]
    Unauthenticated(#[source] AuthError),

    /// Completion endpoint answered with a non-success status
    #[error("completion request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// Transport-level failure (connect, TLS, timeout)
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Success status but an unparseable body
    #[error("malformed completion response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for GigaChat operations
pub type Result<T> = std::result::Result<T, GigaError>;
