use once_cell::sync::OnceCell;
use reqwest::Client;
use std::env;
use tracing_subscriber::EnvFilter;

static INIT_DOTENV: OnceCell<String> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file named by the first command line argument is used, falling back to `.env`.
/// A missing file is not an error: required keys are checked later by
/// [`AppConfig::load`](crate::config::AppConfig::load).
///
/// # Return
///
/// The path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    INIT_DOTENV
        .get_or_init(|| {
            let dotenv_path = env::args().nth(1).unwrap_or_else(|| ".env".to_string());
            if dotenv::from_filename(&dotenv_path).is_err() {
                tracing::debug!(path = %dotenv_path, "No env file loaded");
            }
            dotenv_path
        })
        .clone()
}

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Outbound client shared by both handlers.
///
/// Idle connections are not kept between bookings, and no timeout is set so the
/// transport default applies.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().pool_max_idle_per_host(0).build()
}
