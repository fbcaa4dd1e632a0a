// SPDX-License-Identifier: AGPL-3.0-or-later

//! OAuth token lifecycle for the GigaChat API
//!
//! [`TokenManager`] exchanges a client id/secret pair for a short-lived
//! bearer token and tracks its expiry so that callers only ever pay the
//! acquisition round trip when the cached token has gone stale.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::transport::AUTH_TIMEOUT;

/// Default token endpoint
pub const DEFAULT_AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";

/// OAuth scope for personal API access
const OAUTH_SCOPE: &str = "GIGACHAT_API_PERS";

/// Seconds subtracted from the server-declared expiry, so a token is never
/// presented while an in-flight request or clock skew could outlive it
const EXPIRY_MARGIN_SECS: u64 = 300;

/// A stored bearer token with its adjusted expiry
#[derive(Debug, Clone)]
struct BearerToken {
    secret: String,
    /// Seconds since epoch, margin already subtracted
    expires_at: u64,
}

/// Success body of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Milliseconds since epoch
    expires_at: u64,
}

/// Acquires and caches exactly one bearer token for the secret pair it was
/// constructed with.
///
/// There is no single-flight guard: two tasks sharing a manager can both
/// observe a stale token and both call [`TokenManager::acquire`]. Callers
/// needing de-duplication must serialize access externally. A
/// [`crate::chat::ChatSession`] owns its manager, so a single session never
/// races itself.
pub struct TokenManager {
    client: Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
    token: Option<BearerToken>,
}

impl TokenManager {
    /// Create a manager with the production token endpoint.
    pub fn new(
        client: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: None,
        }
    }

    /// Override the token endpoint (tests, proxies).
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Exchange the secret pair for a fresh token.
    ///
    /// On any failure the previously stored token (if any) is left untouched,
    /// so a renewal hiccup never invalidates a still-usable credential.
    pub async fn acquire(&mut self) -> Result<(), AuthError> {
        let rq_uid = Uuid::new_v4().to_string();
        debug!(%rq_uid, "requesting access token");

        let response = self
            .client
            .post(&self.auth_url)
            .header("Accept", "application/json")
            .header("RqUID", &rq_uid)
            .header("Authorization", format!("Basic {}", self.basic_credential()))
            .form(&[("scope", OAUTH_SCOPE)])
            .timeout(AUTH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "token request rejected");
            return Err(AuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        // Both fields replaced together; no partial overwrite on any path.
        self.token = Some(BearerToken {
            secret: parsed.access_token,
            expires_at: margin_adjusted_expiry(parsed.expires_at),
        });
        debug!("access token refreshed");
        Ok(())
    }

    /// True iff a token is stored and the clock has not passed its adjusted
    /// expiry. Pure query; never touches the network.
    pub fn is_valid(&self) -> bool {
        self.valid_at(now_secs())
    }

    /// Ensure a usable token is stored, acquiring one only when needed.
    ///
    /// At most one acquisition attempt is made; a failure is returned to the
    /// caller rather than retried.
    pub async fn ensure_valid(&mut self) -> Result<(), AuthError> {
        if self.is_valid() {
            return Ok(());
        }
        debug!("access token missing or expired, acquiring a new one");
        self.acquire().await
    }

    /// The current bearer secret, if one is stored.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.secret.as_str())
    }

    /// Expiry check against an explicit clock value (seconds since epoch).
    fn valid_at(&self, now: u64) -> bool {
        matches!(&self.token, Some(t) if now < t.expires_at)
    }

    fn basic_credential(&self) -> String {
        BASE64.encode(format!("{}:{}", self.client_id, self.client_secret))
    }
}

/// Convert the endpoint's millisecond expiry to seconds and apply the
/// safety margin.
fn margin_adjusted_expiry(expires_at_ms: u64) -> u64 {
    (expires_at_ms / 1000).saturating_sub(EXPIRY_MARGIN_SECS)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
