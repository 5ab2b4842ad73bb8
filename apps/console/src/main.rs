mod api;
mod config;
mod debounce;
mod errors;
mod preferences;
mod selection;
mod session;
mod shell;
mod state;
mod storage;
mod views;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageLocation};
use crate::state::AppState;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Fails early if CONSOLE_API_BASE_URL is missing or malformed
    let config = Config::from_env()?;

    // Logs go to stderr so the shell's stdout stays readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screening console v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn KeyValueStore> = match &config.storage {
        StorageLocation::File(path) => {
            let store = FileStore::open(path)?;
            info!("Local state stored at {}", store.path().display());
            Arc::new(store)
        }
        StorageLocation::Memory => {
            info!("Local state kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(config, store)?;
    info!("API base URL: {}", state.config.api_base_url);

    shell::run(state).await
}
