// --- File: src/gcal/gcal_oauth.rs ---

use std::fmt;

use reqwest::Client;

use crate::booking::{exchange_token, AccessToken};
use crate::config::{optional, required};
use crate::error::{BookingError, ConfigError};

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// OAuth client and long-lived refresh token of the calendar owner.
#[derive(Clone)]
pub struct GcalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub calendar_id: String,
    pub token_url: String,
    pub api_base: String,
}

impl GcalConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            client_id: required(lookup, "GCAL_CLIENT_ID")?,
            client_secret: required(lookup, "GCAL_CLIENT_SECRET")?,
            refresh_token: required(lookup, "GCAL_REFRESH_TOKEN")?,
            calendar_id: optional(lookup, "GCAL_CALENDAR_ID", DEFAULT_CALENDAR_ID),
            token_url: optional(lookup, "GCAL_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_base: optional(lookup, "GCAL_API_BASE", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Events collection of the configured calendar, with the id percent-encoded.
    pub fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }
}

impl fmt::Debug for GcalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("refresh_token", &"***")
            .field("calendar_id", &self.calendar_id)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Trades the stored refresh token for a fresh access token.
pub async fn fetch_access_token(
    client: &Client,
    config: &GcalConfig,
) -> Result<AccessToken, BookingError> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", config.refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];

    exchange_token(client.post(&config.token_url).form(&params)).await
}
