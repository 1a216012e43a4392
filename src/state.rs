use std::sync::Arc;

use reqwest::Client;

use crate::config::AppConfig;

/// Shared, read-only application state. Nothing in here changes per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}
