use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::SessionManager;
use crate::storage::KeyValueStore;

/// Shared console state handed to the shell and, through it, to every view.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Durable storage; credentials in it are only touched through `session`.
    pub store: Arc<dyn KeyValueStore>,
    pub session: SessionManager,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        let session = SessionManager::new(http, config.api_base_url.clone(), store.clone());
        let api = ApiClient::new(session.clone());

        Ok(AppState {
            config,
            store,
            session,
            api,
        })
    }
}
