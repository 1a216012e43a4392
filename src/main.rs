mod buttons;
mod config;
mod context;
mod error;
mod handlers;
mod models;
mod render;
mod result_ext;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use result_ext::ResultExt;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let config = AppConfig::from_env()
        .log("Invalid configuration")
        .map_err(std::io::Error::other)?;
    let port = config.port;

    tracing::info!(
        port,
        app_url = %config.app_url,
        identity_api = %config.identity_api_url,
        stats_api = %config.stats_api_url,
        verified = config.neynar_api_key.is_some(),
        "starting frame server"
    );

    let app_state = AppState::new(config)
        .log("Failed to build HTTP client")
        .map_err(std::io::Error::other)?;
    let app_state = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
