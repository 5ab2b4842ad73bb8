//! Shared fixtures for tests: a local axum server standing in for the screening
//! service, and helpers that build clients with or without a stored session.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use serde_json::json;

use crate::api::ApiClient;
use crate::session::SessionManager;
use crate::storage::{keys, KeyValueStore, MemoryStore, StoreOp};

pub const TEST_TOKEN: &str = "test-access-token";

/// Nothing listens on port 1, so requests fail without a response.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake api");
    let addr = listener.local_addr().expect("fake api address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake api server");
    });
    format!("http://{addr}")
}

pub fn session_manager(base_url: &str) -> (SessionManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let manager = SessionManager::new(reqwest::Client::new(), base_url.to_string(), store.clone());
    (manager, store)
}

/// Writes a complete admin session, as a successful login would.
pub fn seed_session(store: &dyn KeyValueStore) {
    let user = json!({
        "access_token": TEST_TOKEN,
        "refresh_token": "test-refresh-token",
        "role": "Admin",
        "user_id": 1,
        "name": "Test Admin",
        "user_location": "Bengaluru"
    });
    store
        .apply(&[
            StoreOp::set(keys::USER, user.to_string()),
            StoreOp::set(keys::USER_ID, "1"),
            StoreOp::set(keys::ACCESS_TOKEN, TEST_TOKEN),
            StoreOp::set(keys::REFRESH_TOKEN, "test-refresh-token"),
            StoreOp::set(keys::USER_NAME, "Test Admin"),
            StoreOp::set(keys::USER_LOCATION, "Bengaluru"),
        ])
        .expect("seed session");
}

pub fn signed_in_api(base_url: &str) -> (ApiClient, Arc<MemoryStore>) {
    let (manager, store) = session_manager(base_url);
    seed_session(store.as_ref());
    (ApiClient::new(manager), store)
}

pub fn unsigned_api(base_url: &str) -> ApiClient {
    ApiClient::new(session_manager(base_url).0)
}

/// Token from an `Authorization: Bearer ...` header.
pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
