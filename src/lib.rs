//! # tiny_zoom_gcal
//!
//! `tiny_zoom_gcal` is a small Actix-Web backend that lets website visitors book a
//! [Zoom](https://developers.zoom.us/docs/api/) meeting or a
//! [Google Calendar](https://developers.google.com/calendar/api) event.
//!
//! Every booking runs the same three steps: validate the body, exchange stored
//! credentials for a fresh access token, create the meeting or event and relay a
//! normalized answer. Nothing is cached or persisted between requests.
//!
//! ## ✅ Endpoints
//!
//! - 🎥 `POST /api/book` creates a scheduled Zoom meeting
//! - 📅 `POST /api/gcal-book` inserts an event into a Google calendar
//!
//! ## 🔧 Configuration
//!
//! Start the app like this:
//!
//! ```bash
//! cargo run -- .env.production
//! ```
//!
//! ### Zoom (`USE_ZOOM=true`, the default)
//!
//! - `ZOOM_CLIENT_ID`
//! - `ZOOM_CLIENT_SECRET`
//! - `ZOOM_ACCOUNT_ID`
//! - `ZOOM_TOKEN_URL` / `ZOOM_API_BASE` (optional overrides)
//!
//! ### Google Calendar (`USE_GCAL=true`, the default)
//!
//! - `GCAL_CLIENT_ID`
//! - `GCAL_CLIENT_SECRET`
//! - `GCAL_REFRESH_TOKEN`
//! - `GCAL_CALENDAR_ID=primary` (optional)
//! - `GCAL_TOKEN_URL` / `GCAL_API_BASE` (optional overrides)
//!
//! ### Server
//!
//! - `SERVER_HOST=127.0.0.1`
//! - `SERVER_PORT=6666`
//! - `RUST_LOG=info`
//!
//! ## 📚 Modules
//!
//! - [`zoom`](crate::zoom): Zoom meeting booking
//! - [`gcal`](crate::gcal): Google Calendar event booking
//! - [`booking`](crate::booking): token exchange and input handling shared by both
//! - [`config`](crate::config): startup configuration
//!
//! ## 📄 License
//!
//! MIT License

pub mod booking;
pub mod config;
pub mod error;
pub mod gcal;
pub mod utils;
pub mod zoom;

use actix_web::web;
use reqwest::Client;

use crate::config::AppConfig;

/// Mounts the enabled booking endpoints and the state they need.
///
/// Use it with [`App::configure`](actix_web::App::configure):
///
/// ```no_run
/// # use actix_web::App;
/// # use tiny_zoom_gcal::{config::AppConfig, register, utils::build_http_client};
/// # fn demo(config: AppConfig) {
/// let client = build_http_client().unwrap();
/// let app = App::new().configure(|cfg| register(cfg, &config, &client));
/// # }
/// ```
pub fn register(cfg: &mut web::ServiceConfig, config: &AppConfig, client: &Client) {
    cfg.app_data(web::Data::new(client.clone()));

    if let Some(zoom_config) = &config.zoom_config {
        cfg.app_data(web::Data::new(zoom_config.clone()));
        zoom::configure(cfg);
    }

    if let Some(gcal_config) = &config.gcal_config {
        cfg.app_data(web::Data::new(gcal_config.clone()));
        gcal::configure(cfg);
    }
}
