// --- File: src/zoom/zoom_meeting.rs ---

use actix_web::{http::StatusCode, web, HttpResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::booking::{
    duration_mins, parse_body, parse_start, present, read_provider_json, AccessToken,
};
use crate::error::BookingError;
use crate::zoom::zoom_oauth::{fetch_access_token, ZoomConfig};

pub const DEFAULT_TOPIC: &str = "Kintsugi Session";
pub const DEFAULT_TIMEZONE: &str = "Asia/Dubai";

const SCHEDULED_MEETING: u8 = 2;
const NO_REGISTRATION_REQUIRED: u8 = 2;

/// Body accepted by `POST /api/book`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookMeetingRequest {
    pub topic: Option<String>,
    #[serde(rename = "startISO")]
    pub start_iso: Option<String>,
    pub duration_mins: Option<Value>,
    pub timezone: Option<String>,
}

/// A meeting request with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingBooking {
    pub topic: String,
    /// Forwarded exactly as the visitor sent it, once it is known to parse.
    pub start_time: String,
    pub duration_mins: u32,
    pub timezone: String,
}

impl MeetingBooking {
    pub fn from_request(request: BookMeetingRequest) -> Result<Self, BookingError> {
        let start_time =
            present(request.start_iso).ok_or_else(|| BookingError::validation("Missing startISO"))?;
        parse_start(&start_time)?;

        Ok(Self {
            topic: present(request.topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            start_time,
            duration_mins: duration_mins(request.duration_mins.as_ref())?,
            timezone: present(request.timezone).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        })
    }

    pub fn payload(&self) -> CreateMeetingPayload<'_> {
        CreateMeetingPayload {
            topic: &self.topic,
            meeting_type: SCHEDULED_MEETING,
            start_time: &self.start_time,
            duration: self.duration_mins,
            timezone: &self.timezone,
            settings: MeetingSettings {
                join_before_host: false,
                waiting_room: true,
                approval_type: NO_REGISTRATION_REQUIRED,
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MeetingSettings {
    join_before_host: bool,
    waiting_room: bool,
    approval_type: u8,
}

/// JSON body of Zoom's "create meeting" call.
#[derive(Serialize, Debug)]
pub struct CreateMeetingPayload<'a> {
    topic: &'a str,
    #[serde(rename = "type")]
    meeting_type: u8,
    start_time: &'a str,
    duration: u32,
    timezone: &'a str,
    settings: MeetingSettings,
}

/// The subset of Zoom's meeting object relayed to the caller.
#[derive(Deserialize, Debug, Default)]
pub struct CreatedMeeting {
    pub join_url: Option<String>,
    pub start_url: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Serialize, Debug)]
struct MeetingBooked {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    join_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
}

#[derive(Serialize, Debug)]
struct ZoomErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<Value>,
}

/// Calls Zoom's "create meeting" endpoint with an already exchanged token.
///
/// On a non-success status the provider's own `message` and full body are kept so the
/// caller sees exactly what Zoom objected to.
pub async fn create_meeting(
    client: &Client,
    config: &ZoomConfig,
    token: &AccessToken,
    booking: &MeetingBooking,
) -> Result<CreatedMeeting, BookingError> {
    let response = client
        .post(format!("{}/users/me/meetings", config.api_base))
        .bearer_auth(token.secret())
        .json(&booking.payload())
        .send()
        .await?;

    let (status, data) = read_provider_json(response).await?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Zoom rejected meeting creation");
        let message = data.get("message").and_then(Value::as_str).map(str::to_owned);
        return Err(BookingError::ResourceCreation {
            status: status.as_u16(),
            message,
            raw: data,
        });
    }

    serde_json::from_value(data)
        .map_err(|e| BookingError::Unexpected(format!("Unexpected Zoom meeting payload: {e}")))
}

async fn run_booking(
    body: &[u8],
    client: &Client,
    config: &ZoomConfig,
) -> Result<CreatedMeeting, BookingError> {
    let booking = MeetingBooking::from_request(parse_body(body)?)?;
    tracing::info!(
        duration = booking.duration_mins,
        timezone = %booking.timezone,
        "Zoom booking received"
    );

    let token = fetch_access_token(client, config).await?;
    tracing::debug!("Zoom access token obtained");

    let meeting = create_meeting(client, config, &token, &booking).await?;
    tracing::info!("Zoom meeting created");
    Ok(meeting)
}

/// Maps a failed booking onto Zoom-flavoured error responses.
///
/// A rejected create call keeps Zoom's own status code; every other server-side
/// failure is a 500.
pub fn error_response(error: &BookingError) -> HttpResponse {
    let (status, body) = match error {
        BookingError::MethodNotAllowed => (
            StatusCode::METHOD_NOT_ALLOWED,
            ZoomErrorBody { error: error.to_string(), raw: None },
        ),
        BookingError::Validation(reason) => (
            StatusCode::BAD_REQUEST,
            ZoomErrorBody { error: reason.clone(), raw: None },
        ),
        BookingError::TokenExchange { status, detail } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ZoomErrorBody { error: format!("Zoom token error: {status} {detail}"), raw: None },
        ),
        BookingError::ResourceCreation { status, message, raw } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ZoomErrorBody {
                error: message.clone().unwrap_or_else(|| "Zoom error".to_string()),
                raw: Some(raw.clone()),
            },
        ),
        BookingError::Unexpected(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ZoomErrorBody {
                error: if message.is_empty() {
                    "Unexpected error".to_string()
                } else {
                    message.clone()
                },
                raw: None,
            },
        ),
    };

    HttpResponse::build(status).json(body)
}

/// Handles `POST /api/book`: validate, exchange a token, create the meeting.
pub async fn book_meeting(
    body: web::Bytes,
    client: web::Data<Client>,
    config: web::Data<ZoomConfig>,
) -> HttpResponse {
    match run_booking(&body, &client, &config).await {
        Ok(meeting) => HttpResponse::Ok().json(MeetingBooked {
            ok: true,
            join_url: meeting.join_url,
            start_url: meeting.start_url,
            start_time: meeting.start_time,
        }),
        Err(e) => error_response(&e),
    }
}

/// Answers every non-POST method on `/api/book`.
pub async fn reject_method() -> HttpResponse {
    error_response(&BookingError::MethodNotAllowed)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/book")
            .route(web::post().to(book_meeting))
            .default_service(web::to(reject_method)),
    );
}
