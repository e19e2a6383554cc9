//! # Zoom Module
//!
//! Books scheduled Zoom meetings through a Server-to-Server OAuth app
//! (`account_credentials` grant) and the `users/me/meetings` endpoint.

pub mod zoom_meeting;
pub mod zoom_oauth;

// Re-export the handler surface so `lib.rs` can mount it as `zoom::configure`.
pub use zoom_meeting::{book_meeting, configure, reject_method};
pub use zoom_oauth::ZoomConfig;
