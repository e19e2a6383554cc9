//! # Google Calendar Module
//!
//! Creates calendar events on behalf of a single Google account, using a stored
//! refresh token to mint an access token for every booking.

pub mod gcal_event;
pub mod gcal_oauth;

pub use gcal_event::{book_event, configure, reject_method};
pub use gcal_oauth::GcalConfig;
