//! Server-to-server OAuth for the Zoom API

use serde::Deserialize;
use std::time::{Duration, Instant};

use super::error::ApiError;

/// Tokens are refreshed this long before Zoom says they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Account credentials for the `account_credentials` grant
#[derive(Clone)]
pub struct Credentials {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AccessToken {
    pub fn from_response(response: &TokenResponse, now: Instant) -> Self {
        Self {
            value: response.access_token.clone(),
            expires_at: now + Duration::from_secs(response.expires_in),
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Exchange account credentials for an access token
pub async fn fetch_token(
    http_client: &reqwest::Client,
    oauth_url: &str,
    credentials: &Credentials,
) -> Result<TokenResponse, ApiError> {
    let url = format!("{}/oauth/token", oauth_url);
    tracing::debug!("Requesting OAuth token from {}", url);

    let response = http_client
        .post(&url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "account_credentials"),
            ("account_id", credentials.account_id.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::error!("OAuth token request failed with HTTP {}", status.as_u16());
        return Err(ApiError::TokenError(format!(
            "HTTP {}: {}",
            status.as_u16(),
            text
        )));
    }

    serde_json::from_str::<TokenResponse>(&text)
        .map_err(|e| ApiError::TokenError(format!("invalid token response: {}", e)))
}
