// --- File: src/booking.rs ---

//! Pieces shared by both booking handlers: request body parsing, input coercion,
//! the OAuth token exchange round trip and provider response decoding.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BookingError;

pub const DEFAULT_DURATION_MINS: u32 = 60;

/// Short-lived bearer credential, valid for a single booking request.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

// Both providers answer the token call with at least this field.
#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
}

/// Parses a raw request body. An empty body counts as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, BookingError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| BookingError::validation(format!("Invalid request body: {e}")))
}

/// Drops absent and blank values so callers can treat both as missing.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads `durationMins`: a positive integer, either as a JSON number or a numeric string.
pub fn duration_mins(value: Option<&Value>) -> Result<u32, BookingError> {
    let minutes = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_DURATION_MINS),
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    minutes
        .filter(|m| *m > 0)
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| BookingError::validation("Invalid durationMins"))
}

/// Parses an ISO-8601 timestamp that carries an explicit offset.
pub fn parse_start(raw: &str) -> Result<DateTime<FixedOffset>, BookingError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|_| BookingError::validation("Invalid startISO"))
}

/// Sends a prepared token request and pulls the bearer token out of the answer.
///
/// A non-success status becomes [`BookingError::TokenExchange`] carrying the provider's
/// response text, so nothing downstream runs with a missing token.
pub async fn exchange_token(request: RequestBuilder) -> Result<AccessToken, BookingError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await?;
        tracing::warn!(status = status.as_u16(), "OAuth token exchange rejected");
        return Err(BookingError::TokenExchange {
            status: status.as_u16(),
            detail,
        });
    }

    let grant: TokenGrant = response
        .json()
        .await
        .map_err(|e| BookingError::Unexpected(format!("Invalid token response: {e}")))?;
    Ok(AccessToken::new(grant.access_token))
}

/// Reads a provider's JSON body regardless of status.
pub async fn read_provider_json(response: Response) -> Result<(StatusCode, Value), BookingError> {
    let status = response.status();
    let text = response.text().await?;
    let json = serde_json::from_str(&text).map_err(|e| {
        BookingError::Unexpected(format!("Provider returned invalid JSON ({status}): {e}"))
    })?;
    Ok((status, json))
}
