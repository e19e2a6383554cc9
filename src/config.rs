// --- File: src/config.rs ---

use std::env;

use crate::error::ConfigError;
use crate::gcal::GcalConfig;
use crate::zoom::ZoomConfig;

// --- Unified Configuration Struct ---
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,

    // `None` when the provider is switched off via its USE_* flag.
    pub zoom_config: Option<ZoomConfig>,
    pub gcal_config: Option<GcalConfig>,
}

impl AppConfig {
    /// Loads configuration from the process environment (after the `.env` file).
    pub fn load() -> Result<Self, ConfigError> {
        crate::utils::ensure_dotenv_loaded();
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// Every required key of an enabled provider must be present; nothing is read
    /// again once the server is running.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_zoom = flag(lookup, "USE_ZOOM", true);
        let use_gcal = flag(lookup, "USE_GCAL", true);

        let server_host = optional(lookup, "SERVER_HOST", "127.0.0.1");
        let server_port = match lookup("SERVER_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value,
            })?,
            None => 6666,
        };

        let zoom_config = if use_zoom {
            Some(ZoomConfig::from_lookup(lookup)?)
        } else {
            tracing::info!("Zoom booking disabled via USE_ZOOM=false");
            None
        };

        let gcal_config = if use_gcal {
            Some(GcalConfig::from_lookup(lookup)?)
        } else {
            tracing::info!("Google Calendar booking disabled via USE_GCAL=false");
            None
        };

        if zoom_config.is_none() && gcal_config.is_none() {
            return Err(ConfigError::NoProviderEnabled);
        }

        Ok(AppConfig {
            server_host,
            server_port,
            zoom_config,
            gcal_config,
        })
    }
}

pub(crate) fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

pub(crate) fn optional<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const ZOOM_KEYS: [(&str, &str); 3] = [
        ("ZOOM_CLIENT_ID", "zid"),
        ("ZOOM_CLIENT_SECRET", "zsecret"),
        ("ZOOM_ACCOUNT_ID", "zacct"),
    ];
    const GCAL_KEYS: [(&str, &str); 3] = [
        ("GCAL_CLIENT_ID", "gid"),
        ("GCAL_CLIENT_SECRET", "gsecret"),
        ("GCAL_REFRESH_TOKEN", "grefresh"),
    ];

    #[test]
    fn loads_both_providers_with_defaults() {
        let pairs: Vec<_> = ZOOM_KEYS.iter().chain(GCAL_KEYS.iter()).copied().collect();
        let config = AppConfig::from_lookup(&lookup_from(&pairs)).unwrap();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 6666);

        let zoom = config.zoom_config.unwrap();
        assert_eq!(zoom.account_id, "zacct");
        assert_eq!(zoom.token_url, "https://zoom.us/oauth/token");
        assert_eq!(zoom.api_base, "https://api.zoom.us/v2");

        let gcal = config.gcal_config.unwrap();
        assert_eq!(gcal.calendar_id, "primary");
        assert_eq!(gcal.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(gcal.api_base, "https://www.googleapis.com/calendar/v3");
    }

    #[test]
    fn missing_secret_of_enabled_provider_fails_fast() {
        let pairs: Vec<_> = ZOOM_KEYS[..2].iter().chain(GCAL_KEYS.iter()).copied().collect();
        let err = AppConfig::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ZOOM_ACCOUNT_ID"));
    }

    #[test]
    fn disabled_provider_needs_no_keys() {
        let mut pairs: Vec<_> = GCAL_KEYS.to_vec();
        pairs.push(("USE_ZOOM", "false"));
        pairs.push(("GCAL_CALENDAR_ID", "team@group.calendar.google.com"));
        let config = AppConfig::from_lookup(&lookup_from(&pairs)).unwrap();

        assert!(config.zoom_config.is_none());
        assert_eq!(
            config.gcal_config.unwrap().calendar_id,
            "team@group.calendar.google.com"
        );
    }

    #[test]
    fn at_least_one_provider_must_be_enabled() {
        let pairs = [("USE_ZOOM", "false"), ("USE_GCAL", "FALSE")];
        let err = AppConfig::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::NoProviderEnabled);
    }

    #[test]
    fn rejects_unparseable_port() {
        let mut pairs: Vec<_> = ZOOM_KEYS.to_vec();
        pairs.push(("USE_GCAL", "false"));
        pairs.push(("SERVER_PORT", "eighty"));
        let err = AppConfig::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "SERVER_PORT",
                value: "eighty".into()
            }
        );
    }
}
