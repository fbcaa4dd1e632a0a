// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared HTTP client construction
//!
//! Both endpoints (OAuth and completions) sit behind a corporate CA. If the
//! configured certificate bundle is present on disk it is installed as an
//! extra trust root; otherwise verification is disabled entirely. This is a
//! plain presence check, with no retry or re-discovery at runtime.

use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client};
use tracing::warn;

use crate::error::Result;

/// Per-call timeout for the token endpoint
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call timeout for the completion endpoint
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(20);

/// Build the client shared by the token manager and the chat session.
pub fn build_client(ca_bundle: &Path) -> Result<Client> {
    let mut builder = Client::builder();

    if ca_bundle.exists() {
        let pem = std::fs::read(ca_bundle)?;
        let cert = Certificate::from_pem(&pem)?;
        builder = builder.add_root_certificate(cert);
    } else {
        warn!(
            path = %ca_bundle.display(),
            "CA bundle not found, TLS verification disabled"
        );
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}
