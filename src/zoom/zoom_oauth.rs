// --- File: src/zoom/zoom_oauth.rs ---

use std::fmt;

use reqwest::Client;

use crate::booking::{exchange_token, AccessToken};
use crate::config::{optional, required};
use crate::error::{BookingError, ConfigError};

pub const DEFAULT_TOKEN_URL: &str = "https://zoom.us/oauth/token";
pub const DEFAULT_API_BASE: &str = "https://api.zoom.us/v2";

/// Credentials of the Zoom Server-to-Server OAuth app.
///
/// # Fields
///
/// - `client_id` / `client_secret`: sent as HTTP Basic auth to the token endpoint.
/// - `account_id`: the Zoom account the meetings are created under.
/// - `token_url` / `api_base`: endpoints, overridable for staging and tests.
#[derive(Clone)]
pub struct ZoomConfig {
    pub client_id: String,
    pub client_secret: String,
    pub account_id: String,
    pub token_url: String,
    pub api_base: String,
}

impl ZoomConfig {
    /// Reads `ZOOM_CLIENT_ID`, `ZOOM_CLIENT_SECRET` and `ZOOM_ACCOUNT_ID` (all required),
    /// plus the optional `ZOOM_TOKEN_URL` and `ZOOM_API_BASE`.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            client_id: required(lookup, "ZOOM_CLIENT_ID")?,
            client_secret: required(lookup, "ZOOM_CLIENT_SECRET")?,
            account_id: required(lookup, "ZOOM_ACCOUNT_ID")?,
            token_url: optional(lookup, "ZOOM_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_base: optional(lookup, "ZOOM_API_BASE", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

impl fmt::Debug for ZoomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("account_id", &self.account_id)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Exchanges the app credentials for an access token (`account_credentials` grant).
pub async fn fetch_access_token(
    client: &Client,
    config: &ZoomConfig,
) -> Result<AccessToken, BookingError> {
    let request = client
        .post(&config.token_url)
        .query(&[
            ("grant_type", "account_credentials"),
            ("account_id", config.account_id.as_str()),
        ])
        .basic_auth(&config.client_id, Some(&config.client_secret));

    exchange_token(request).await
}
