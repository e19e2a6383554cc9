#![allow(dead_code)]

use actix_web::{dev::ServiceResponse, test, App};

use tiny_zoom_gcal::{
    config::AppConfig,
    gcal::GcalConfig,
    register,
    utils::build_http_client,
    zoom::ZoomConfig,
};

pub const ZOOM_TOKEN_PATH: &str = "/oauth/token";
pub const ZOOM_MEETINGS_PATH: &str = "/v2/users/me/meetings";
pub const GCAL_TOKEN_PATH: &str = "/token";

// base64("zoom-id:zoom-secret")
pub const ZOOM_BASIC_AUTH: &str = "Basic em9vbS1pZDp6b29tLXNlY3JldA==";

pub fn zoom_config(server_url: &str) -> ZoomConfig {
    ZoomConfig {
        client_id: "zoom-id".into(),
        client_secret: "zoom-secret".into(),
        account_id: "zoom-account".into(),
        token_url: format!("{server_url}{ZOOM_TOKEN_PATH}"),
        api_base: format!("{server_url}/v2"),
    }
}

pub fn gcal_config(server_url: &str, calendar_id: &str) -> GcalConfig {
    GcalConfig {
        client_id: "gcal-id".into(),
        client_secret: "gcal-secret".into(),
        refresh_token: "gcal-refresh".into(),
        calendar_id: calendar_id.into(),
        token_url: format!("{server_url}{GCAL_TOKEN_PATH}"),
        api_base: format!("{server_url}/calendar/v3"),
    }
}

pub fn app_config(zoom: Option<ZoomConfig>, gcal: Option<GcalConfig>) -> AppConfig {
    AppConfig {
        server_host: "127.0.0.1".into(),
        server_port: 0,
        zoom_config: zoom,
        gcal_config: gcal,
    }
}

pub async fn setup_test_app(
    config: AppConfig,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let client = build_http_client().expect("Failed to build HTTP client");
    test::init_service(App::new().configure(|cfg| register(cfg, &config, &client))).await
}
