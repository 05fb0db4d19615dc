// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side storage layer.
//!
//! Two string key-value stores stand in for the browser's storage areas:
//! a persistent one that survives restarts and a tab-scoped one that does
//! not. [`SessionCache`] owns every key and its expiry policy.

pub mod cache;
pub mod file;
pub mod memory;

pub use cache::SessionCache;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::AppError;

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String) -> Result<(), AppError>;

    /// Removing a missing key is a no-op.
    fn remove(&self, key: &str);

    /// Every key currently stored.
    fn keys(&self) -> Vec<String>;
}

/// Storage key names, namespaced with a common application prefix.
pub mod keys {
    pub const PREFIX: &str = "instasnap_";

    // Persistent store
    pub const LAST_MOBILE: &str = "instasnap_last_mobile";
    pub const GROUP_ID: &str = "instasnap_group_id";
    pub const AUTH_TOKEN: &str = "instasnap_auth_token";
    pub const REFRESH_TOKEN: &str = "instasnap_refresh_token";
    pub const USER_DATA: &str = "instasnap_user_data";
    pub const MATCHED_PHOTOS: &str = "instasnap_matched_photos";

    // Tab-scoped store
    pub const USER_SESSION: &str = "instasnap_user_session";
    pub const PHOTOS_CACHE: &str = "instasnap_photos_";
    pub const ANONYMOUS_SELFIE: &str = "instasnap_anonymous_selfie";

    /// Every fixed key, across both stores.
    pub const ALL: [&str; 9] = [
        LAST_MOBILE,
        GROUP_ID,
        AUTH_TOKEN,
        REFRESH_TOKEN,
        USER_DATA,
        MATCHED_PHOTOS,
        USER_SESSION,
        PHOTOS_CACHE,
        ANONYMOUS_SELFIE,
    ];

    /// Keys belonging to a logged-in session.
    pub const AUTH: [&str; 5] = [
        AUTH_TOKEN,
        REFRESH_TOKEN,
        USER_DATA,
        MATCHED_PHOTOS,
        USER_SESSION,
    ];

    /// Photos cache key for one (mobile, event) pair.
    pub fn photos_cache(mobile: &str, event_id: &str) -> String {
        format!("{}{}_{}", PHOTOS_CACHE, mobile, event_id)
    }
}
