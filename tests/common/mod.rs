// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::Router;
use instasnap_client::config::Config;
use instasnap_client::storage::{MemoryStore, SessionCache};
use instasnap_client::time_utils::ManualClock;
use instasnap_client::AppContext;
use std::sync::Arc;

/// Object-storage base used by every test context.
#[allow(dead_code)]
pub const S3_BASE: &str = "https://s3.test";

/// Fixed start of simulated time.
#[allow(dead_code)]
pub const T0: i64 = 1_767_225_600_000;

/// Serve `app` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend crashed");
    });
    format!("http://{}", addr)
}

/// Stores and clock behind a test cache, kept for raw inspection.
#[allow(dead_code)]
pub struct TestStores {
    pub persistent: Arc<MemoryStore>,
    pub tab: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

/// Session cache over fresh in-memory stores and a manual clock.
#[allow(dead_code)]
pub fn test_cache() -> (SessionCache, TestStores) {
    let stores = TestStores {
        persistent: Arc::new(MemoryStore::new()),
        tab: Arc::new(MemoryStore::new()),
        clock: Arc::new(ManualClock::new(T0)),
    };
    let cache = SessionCache::new(
        stores.persistent.clone(),
        stores.tab.clone(),
        stores.clock.clone(),
    );
    (cache, stores)
}

/// App context talking to the backend at `base_url`.
#[allow(dead_code)]
pub fn test_context(base_url: &str, event_id: Option<&str>) -> (Arc<AppContext>, TestStores) {
    let config = Config {
        api_base_url: base_url.to_string(),
        event_id: event_id.map(str::to_string),
        s3_base_url: S3_BASE.to_string(),
        ..Config::test_default()
    };
    let (cache, stores) = test_cache();
    (Arc::new(AppContext::new(config, cache)), stores)
}
