// --- File: src/gcal/gcal_event.rs ---

use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::booking::{
    duration_mins, parse_body, parse_start, present, read_provider_json, AccessToken,
};
use crate::error::BookingError;
use crate::gcal::gcal_oauth::{fetch_access_token, GcalConfig};

const EMAIL_REMINDER_MINS: u32 = 24 * 60;
const POPUP_REMINDER_MINS: u32 = 30;
const PLACEHOLDER: &str = "—";

/// Body accepted by `POST /api/gcal-book`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookEventRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "startISO")]
    pub start_iso: Option<String>,
    pub duration_mins: Option<Value>,
}

/// A validated event request with its end time already derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBooking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub notes: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventBooking {
    pub fn from_request(request: BookEventRequest) -> Result<Self, BookingError> {
        let (name, email, service, start_iso) = match (
            present(request.name),
            present(request.email),
            present(request.service),
            present(request.start_iso),
        ) {
            (Some(name), Some(email), Some(service), Some(start_iso)) => {
                (name, email, service, start_iso)
            }
            (name, email, service, start_iso) => {
                let missing: Vec<&str> = [
                    ("name", name.is_none()),
                    ("email", email.is_none()),
                    ("service", service.is_none()),
                    ("startISO", start_iso.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                return Err(BookingError::validation(format!(
                    "Missing fields: {}",
                    missing.join(", ")
                )));
            }
        };

        let start = parse_start(&start_iso)?.with_timezone(&Utc);
        let minutes = duration_mins(request.duration_mins.as_ref())?;
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(minutes)))
            .ok_or_else(|| BookingError::validation("Invalid durationMins"))?;

        Ok(Self {
            name,
            email,
            phone: present(request.phone),
            service,
            notes: present(request.notes),
            start,
            end,
        })
    }

    pub fn summary(&self) -> String {
        format!("{} — {}", self.service, self.name)
    }

    pub fn description(&self) -> String {
        format!(
            "Website booking for {service}\n\nClient: {name}\nEmail: {email}\n\
             Phone: {phone}\n\nNotes:\n{notes}",
            service = self.service,
            name = self.name,
            email = self.email,
            phone = self.phone.as_deref().unwrap_or(PLACEHOLDER),
            notes = self.notes.as_deref().unwrap_or(PLACEHOLDER),
        )
    }

    pub fn payload(&self) -> CreateEventPayload<'_> {
        CreateEventPayload {
            summary: self.summary(),
            description: self.description(),
            start: EventTime::utc(&self.start),
            end: EventTime::utc(&self.end),
            attendees: vec![Attendee {
                email: &self.email,
                display_name: &self.name,
            }],
            reminders: Reminders {
                use_default: false,
                overrides: vec![
                    ReminderOverride { method: "email", minutes: EMAIL_REMINDER_MINS },
                    ReminderOverride { method: "popup", minutes: POPUP_REMINDER_MINS },
                ],
            },
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    date_time: String,
}

impl EventTime {
    fn utc(at: &DateTime<Utc>) -> Self {
        Self {
            date_time: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Attendee<'a> {
    email: &'a str,
    display_name: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ReminderOverride {
    method: &'static str,
    minutes: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    use_default: bool,
    overrides: Vec<ReminderOverride>,
}

/// JSON body of the Calendar API `events.insert` call.
#[derive(Serialize, Debug)]
pub struct CreateEventPayload<'a> {
    summary: String,
    description: String,
    start: EventTime,
    end: EventTime,
    attendees: Vec<Attendee<'a>>,
    reminders: Reminders,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: Option<String>,
    pub html_link: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct EventBooked {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_link: Option<String>,
}

#[derive(Serialize, Debug)]
struct GcalErrorBody {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

pub async fn create_event(
    client: &Client,
    config: &GcalConfig,
    token: &AccessToken,
    booking: &EventBooking,
) -> Result<CreatedEvent, BookingError> {
    let response = client
        .post(config.events_url())
        .bearer_auth(token.secret())
        .json(&booking.payload())
        .send()
        .await?;

    let (status, data) = read_provider_json(response).await?;
    if !status.is_success() {
        tracing::warn!(
            status = status.as_u16(),
            "Google Calendar rejected event creation"
        );
        // The envelope relays Google's body verbatim as `detail`.
        return Err(BookingError::ResourceCreation {
            status: status.as_u16(),
            message: None,
            raw: data,
        });
    }

    serde_json::from_value(data)
        .map_err(|e| BookingError::Unexpected(format!("Unexpected Calendar event payload: {e}")))
}

async fn run_booking(
    body: &[u8],
    client: &Client,
    config: &GcalConfig,
) -> Result<CreatedEvent, BookingError> {
    let booking = EventBooking::from_request(parse_body(body)?)?;
    tracing::info!(
        service = %booking.service,
        start = %booking.start,
        "Calendar booking received"
    );

    let token = fetch_access_token(client, config).await?;
    tracing::debug!("Google access token obtained");

    let event = create_event(client, config, &token, &booking).await?;
    tracing::info!("Calendar event created");
    Ok(event)
}

/// Maps a failed booking onto the `{ok:false, error, detail?}` envelope.
///
/// Unlike the Zoom handler, a rejected create call is always reported as 500 no
/// matter which status Google answered with.
pub fn error_response(error: &BookingError) -> HttpResponse {
    let (status, message, detail) = match error {
        BookingError::MethodNotAllowed => {
            (StatusCode::METHOD_NOT_ALLOWED, error.to_string(), None)
        }
        BookingError::Validation(reason) => (StatusCode::BAD_REQUEST, reason.clone(), None),
        BookingError::TokenExchange { detail, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "OAuth token error".to_string(),
            Some(Value::String(detail.clone())),
        ),
        BookingError::ResourceCreation { raw, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Calendar create error".to_string(),
            Some(raw.clone()),
        ),
        BookingError::Unexpected(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server error".to_string(),
            Some(Value::String(message.clone())),
        ),
    };

    HttpResponse::build(status).json(GcalErrorBody {
        ok: false,
        error: message,
        detail,
    })
}

/// Handles `POST /api/gcal-book`: validate, refresh a token, insert the event.
pub async fn book_event(
    body: web::Bytes,
    client: web::Data<Client>,
    config: web::Data<GcalConfig>,
) -> HttpResponse {
    match run_booking(&body, &client, &config).await {
        Ok(event) => HttpResponse::Ok().json(EventBooked {
            ok: true,
            event_id: event.id,
            html_link: event.html_link,
        }),
        Err(e) => error_response(&e),
    }
}

pub async fn reject_method() -> HttpResponse {
    error_response(&BookingError::MethodNotAllowed)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/gcal-book")
            .route(web::post().to(book_event))
            .default_service(web::to(reject_method)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::json;

    fn full_request() -> BookEventRequest {
        BookEventRequest {
            name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
            service: Some("Mindful Kintsugi Session".into()),
            start_iso: Some("2025-11-12T15:00:00+03:00".into()),
            ..Default::default()
        }
    }

    #[test]
    fn derives_end_from_duration() {
        let mut request = full_request();
        request.duration_mins = Some(json!(90));
        let booking = EventBooking::from_request(request).unwrap();

        let payload = serde_json::to_value(booking.payload()).unwrap();
        assert_eq!(payload["start"]["dateTime"], "2025-11-12T12:00:00.000Z");
        assert_eq!(payload["end"]["dateTime"], "2025-11-12T13:30:00.000Z");
    }

    #[test]
    fn names_every_missing_field() {
        let request = BookEventRequest {
            service: Some("Session".into()),
            start_iso: Some("2025-11-12T15:00:00+03:00".into()),
            email: Some(" ".into()),
            ..Default::default()
        };
        match EventBooking::from_request(request) {
            Err(BookingError::Validation(reason)) => {
                assert_eq!(reason, "Missing fields: name, email")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rejects_unparseable_start() {
        let mut request = full_request();
        request.start_iso = Some("Wednesday afternoon".into());
        let err = EventBooking::from_request(request).unwrap_err();
        assert!(matches!(err, BookingError::Validation(ref r) if r == "Invalid startISO"));
    }

    #[test]
    fn payload_matches_calendar_schema() {
        let mut request = full_request();
        request.phone = Some("+971 50 000 0000".into());
        let booking = EventBooking::from_request(request).unwrap();

        let payload = serde_json::to_value(booking.payload()).unwrap();
        assert_eq!(
            payload,
            json!({
                "summary": "Mindful Kintsugi Session — Ana",
                "description": "Website booking for Mindful Kintsugi Session\n\n\
                    Client: Ana\nEmail: ana@example.com\nPhone: +971 50 000 0000\n\nNotes:\n—",
                "start": { "dateTime": "2025-11-12T12:00:00.000Z" },
                "end": { "dateTime": "2025-11-12T13:00:00.000Z" },
                "attendees": [{ "email": "ana@example.com", "displayName": "Ana" }],
                "reminders": {
                    "useDefault": false,
                    "overrides": [
                        { "method": "email", "minutes": 1440 },
                        { "method": "popup", "minutes": 30 }
                    ]
                }
            })
        );
    }

    #[actix_web::test]
    async fn creation_failure_is_always_500() {
        let err = BookingError::ResourceCreation {
            status: 403,
            message: Some("Forbidden".into()),
            raw: json!({"error": {"code": 403, "message": "Forbidden"}}),
        };
        let resp = error_response(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Calendar create error");
        assert_eq!(body["detail"]["error"]["code"], 403);
    }

    #[actix_web::test]
    async fn unexpected_error_carries_message() {
        let resp = error_response(&BookingError::Unexpected("connection reset".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"ok": false, "error": "Server error", "detail": "connection reset"})
        );
    }
}
