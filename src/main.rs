use actix_web::{middleware::Logger, App, HttpServer};
use std::io;

use tiny_zoom_gcal::{config::AppConfig, register, utils};

/// The main entry point for the application.
///
/// Loads the env file named by the first command-line argument (default `.env`),
/// validates the whole configuration once and then serves the enabled booking
/// endpoints.
///
/// # Returns
///
/// A `std::io::Result<()>`: configuration problems and bind failures both surface
/// as I/O errors and stop the process before any request is accepted.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let env_file = utils::ensure_dotenv_loaded();
    utils::init_tracing();
    tracing::info!("📦 Loading environment from {env_file}");

    let config = AppConfig::load().map_err(|e| {
        tracing::error!("🚨 Invalid configuration: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let client = utils::build_http_client().map_err(io::Error::other)?;

    if config.zoom_config.is_some() {
        tracing::info!("🎥 Zoom booking enabled at POST /api/book");
    }
    if config.gcal_config.is_some() {
        tracing::info!("📅 Google Calendar booking enabled at POST /api/gcal-book");
    }

    let bind_addr = (config.server_host.clone(), config.server_port);
    tracing::info!(
        "🚀 Server starting on http://{}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| register(cfg, &config, &client))
    })
    .bind(bind_addr)?
    .run()
    .await
}
