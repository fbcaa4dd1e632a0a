// SPDX-License-Identifier: AGPL-3.0-or-later

//! Chat session orchestration
//!
//! [`ChatSession`] ties the token manager and the conversation window
//! together: every [`ChatSession::send`] ensures a valid token, assembles
//! the bounded message list, performs one completion round trip and folds
//! the reply back into the window.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenManager;
use crate::chat::history::{ConversationWindow, Turn, DEFAULT_HISTORY_SIZE};
use crate::config::Settings;
use crate::error::{GigaError, SessionError};
use crate::transport::{self, CHAT_TIMEOUT};

/// Default completion endpoint
pub const DEFAULT_CHAT_URL: &str =
    "https://gigachat.devices.sberbank.ru/api/v1/chat/completions";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "GigaChat";

/// Sampling temperature, fixed per design
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Turn,
}

/// One conversation stream against the completion endpoint
pub struct ChatSession {
    client: Client,
    auth: TokenManager,
    window: ConversationWindow,
    chat_url: String,
    model: String,
}

impl ChatSession {
    /// Create a session with default endpoint, model and history size.
    pub fn new(client: Client, auth: TokenManager) -> Self {
        Self {
            client,
            auth,
            window: ConversationWindow::new(DEFAULT_HISTORY_SIZE),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a session from settings: shared TLS client, credentials from
    /// config or environment, configured endpoints and window size.
    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        let (client_id, client_secret) = settings.credentials.resolve().ok_or_else(|| {
            GigaError::Config(
                "client credentials are not configured; set them in settings.json or via \
                 GIGACHAT_CLIENT_ID / GIGACHAT_CLIENT_SECRET"
                    .to_string(),
            )
        })?;

        let client = transport::build_client(&settings.api.ca_bundle)?;
        let auth = TokenManager::new(client.clone(), client_id, client_secret)
            .with_auth_url(settings.api.auth_url.clone());

        Ok(Self::new(client, auth)
            .with_chat_url(settings.api.chat_url.clone())
            .with_model(settings.api.model.clone())
            .with_history_size(settings.conversation.history_size))
    }

    /// Override the completion endpoint (tests, proxies).
    pub fn with_chat_url(mut self, chat_url: impl Into<String>) -> Self {
        self.chat_url = chat_url.into();
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Resize the history window. Replaces the window, so only meaningful
    /// before the first `send`.
    pub fn with_history_size(mut self, capacity: usize) -> Self {
        self.window = ConversationWindow::new(capacity);
        self
    }

    /// The conversation window as recorded so far.
    pub fn history(&self) -> &ConversationWindow {
        &self.window
    }

    /// Send one user message and return the assistant's reply.
    ///
    /// On failure after the token check the user turn stays recorded without
    /// a matching assistant turn; it is deliberately not rolled back.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<Turn, SessionError> {
        self.auth
            .ensure_valid()
            .await
            .map_err(SessionError::Unauthenticated)?;
        let token = match self.auth.bearer() {
            Some(token) => token.to_owned(),
            None => {
                return Err(SessionError::Unauthenticated(
                    crate::error::AuthError::MissingToken,
                ))
            }
        };

        let messages = self.window.push_user(text);
        debug!(turns = messages.len(), "dispatching completion request");

        let body = CompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(&token)
            .json(&body)
            .timeout(CHAT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion request failed");
            return Err(SessionError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| {
                SessionError::InvalidResponse("response contained no choices".to_string())
            })?;

        self.window.push_assistant(reply.clone());
        Ok(reply)
    }
}
