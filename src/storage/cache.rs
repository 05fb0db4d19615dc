// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and cache manager.
//!
//! Single source of truth for what this client knows about the current
//! user. Each key carries its own expiry policy:
//! - last mobile, group id, auth tokens, profile, matched photos: no expiry
//! - photos cache: 5 minutes from write
//! - anonymous selfie: 1 hour from write
//!
//! Expiry is checked on read only. The read that finds an expired entry
//! deletes it. Corrupt JSON reads as absent and is never an error.

use super::{keys, KeyValueStore, MemoryStore};
use crate::models::{
    FaceMatch, PhotosCacheData, SelfieFile, StoredSelfie, Timestamped, UserProfile, UserSession,
};
use crate::time_utils::{is_expired, Clock, SystemClock};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::TimeDelta;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// How long matched photos stay cached per (mobile, event).
pub const PHOTOS_CACHE_TTL: TimeDelta = TimeDelta::minutes(5);

/// How long an anonymous selfie is retained for re-queries.
pub const ANONYMOUS_SELFIE_TTL: TimeDelta = TimeDelta::hours(1);

/// MIME type used when a file arrives without one.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Session and cache manager over a persistent and a tab-scoped store.
#[derive(Clone)]
pub struct SessionCache {
    persistent: Arc<dyn KeyValueStore>,
    tab: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SessionCache {
    pub fn new(
        persistent: Arc<dyn KeyValueStore>,
        tab: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            persistent,
            tab,
            clock,
        }
    }

    /// Cache backed only by memory and the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
        )
    }

    // ─── Last Mobile / Group Id ──────────────────────────────────

    pub fn get_last_mobile(&self) -> Option<String> {
        self.persistent.get(keys::LAST_MOBILE)
    }

    pub fn set_last_mobile(&self, mobile: &str) {
        write(&*self.persistent, keys::LAST_MOBILE, mobile.to_string());
    }

    pub fn clear_last_mobile(&self) {
        self.persistent.remove(keys::LAST_MOBILE);
    }

    pub fn get_group_id(&self) -> Option<String> {
        self.persistent.get(keys::GROUP_ID)
    }

    pub fn set_group_id(&self, group_id: &str) {
        write(&*self.persistent, keys::GROUP_ID, group_id.to_string());
    }

    pub fn clear_group_id(&self) {
        self.persistent.remove(keys::GROUP_ID);
    }

    // ─── Photos Cache ────────────────────────────────────────────

    /// Get cached photos for a mobile/event pair, or `None` once older
    /// than five minutes.
    pub fn get_photos_cache(&self, mobile: &str, event_id: &str) -> Option<PhotosCacheData> {
        let key = keys::photos_cache(mobile, event_id);
        let entry: Timestamped<PhotosCacheData> = read_json(&*self.tab, &key)?;

        if is_expired(entry.timestamp, self.clock.now_millis(), PHOTOS_CACHE_TTL) {
            tracing::debug!(key = %key, "Photos cache expired");
            self.tab.remove(&key);
            return None;
        }

        Some(entry.data)
    }

    pub fn set_photos_cache(&self, mobile: &str, event_id: &str, data: &PhotosCacheData) {
        let entry = Timestamped {
            data,
            timestamp: self.clock.now_millis(),
        };
        write_json(&*self.tab, &keys::photos_cache(mobile, event_id), &entry);
    }

    pub fn clear_photos_cache(&self, mobile: &str, event_id: &str) {
        self.tab.remove(&keys::photos_cache(mobile, event_id));
    }

    // ─── User Session ────────────────────────────────────────────

    pub fn get_user_session(&self) -> Option<UserSession> {
        read_json(&*self.tab, keys::USER_SESSION)
    }

    pub fn set_user_session(&self, mobile: &str, event_id: &str, is_verified: bool) {
        let session = UserSession {
            mobile: mobile.to_string(),
            event_id: event_id.to_string(),
            is_verified,
        };
        write_json(&*self.tab, keys::USER_SESSION, &session);
    }

    pub fn clear_user_session(&self) {
        self.tab.remove(keys::USER_SESSION);
    }

    // ─── Authenticated User ──────────────────────────────────────

    pub fn get_auth_token(&self) -> Option<String> {
        self.persistent.get(keys::AUTH_TOKEN)
    }

    pub fn set_auth_token(&self, token: &str) {
        write(&*self.persistent, keys::AUTH_TOKEN, token.to_string());
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.persistent.get(keys::REFRESH_TOKEN)
    }

    pub fn set_refresh_token(&self, token: &str) {
        write(&*self.persistent, keys::REFRESH_TOKEN, token.to_string());
    }

    pub fn get_user_data(&self) -> Option<UserProfile> {
        read_json(&*self.persistent, keys::USER_DATA)
    }

    pub fn set_user_data(&self, user: &UserProfile) {
        write_json(&*self.persistent, keys::USER_DATA, user);
    }

    pub fn get_matched_photos(&self) -> Option<Vec<FaceMatch>> {
        read_json(&*self.persistent, keys::MATCHED_PHOTOS)
    }

    pub fn set_matched_photos(&self, photos: &[FaceMatch]) {
        write_json(&*self.persistent, keys::MATCHED_PHOTOS, &photos);
    }

    /// True iff both an auth token and user data are stored.
    ///
    /// Recomputed on every call from exactly those two lookups.
    pub fn is_authenticated(&self) -> bool {
        let has_token = self
            .persistent
            .get(keys::AUTH_TOKEN)
            .is_some_and(|t| !t.is_empty());
        has_token
            && self
                .persistent
                .get(keys::USER_DATA)
                .is_some_and(|d| !d.is_empty() && d != "null")
    }

    // ─── Anonymous Selfie ────────────────────────────────────────

    /// Retain an anonymous selfie for later re-queries.
    ///
    /// Encoding runs on a blocking task; the value is readable only once
    /// this future completes.
    pub async fn set_anonymous_selfie(&self, file: &SelfieFile) {
        let file = file.clone();
        let encoded = tokio::task::spawn_blocking(move || {
            let mime = if file.mime_type.is_empty() {
                FALLBACK_MIME
            } else {
                file.mime_type.as_str()
            };
            let data_url = format!("data:{};base64,{}", mime, BASE64.encode(&file.bytes));
            (data_url, file)
        })
        .await;

        let (data_url, file) = match encoded {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Selfie encoding task failed");
                return;
            }
        };

        let stored = StoredSelfie {
            data_url,
            size: file.size(),
            name: file.name,
            mime_type: file.mime_type,
            timestamp: self.clock.now_millis(),
        };
        write_json(&*self.tab, keys::ANONYMOUS_SELFIE, &stored);
    }

    /// Get the retained selfie, rebuilt byte-for-byte from its data URL.
    ///
    /// Returns `None` and clears the entry once older than one hour.
    pub fn get_anonymous_selfie(&self) -> Option<SelfieFile> {
        let stored: StoredSelfie = read_json(&*self.tab, keys::ANONYMOUS_SELFIE)?;

        if is_expired(stored.timestamp, self.clock.now_millis(), ANONYMOUS_SELFIE_TTL) {
            tracing::debug!("Anonymous selfie expired");
            self.clear_anonymous_selfie();
            return None;
        }

        let (mime, bytes) = parse_data_url(&stored.data_url)?;
        let mime_type = if mime.is_empty() { stored.mime_type } else { mime };
        Some(SelfieFile::new(stored.name, mime_type, bytes))
    }

    pub fn clear_anonymous_selfie(&self) {
        self.tab.remove(keys::ANONYMOUS_SELFIE);
    }

    /// Presence check only: an expired selfie still counts until read.
    pub fn has_anonymous_selfie(&self) -> bool {
        self.tab
            .get(keys::ANONYMOUS_SELFIE)
            .is_some_and(|v| !v.is_empty())
    }

    // ─── Bulk Clearing ───────────────────────────────────────────

    /// Remove every key this manager owns from both stores.
    pub fn clear_all(&self) {
        for store in [&self.persistent, &self.tab] {
            for key in keys::ALL {
                store.remove(key);
            }
            for key in store.keys() {
                if key.starts_with(keys::PHOTOS_CACHE) {
                    store.remove(&key);
                }
            }
        }
    }

    /// Remove only the logged-in session: tokens, profile, matched photos
    /// and the tab session. Last mobile, group id and anonymous caches stay.
    pub fn clear_auth(&self) {
        for key in keys::AUTH {
            self.persistent.remove(key);
            self.tab.remove(key);
        }
    }
}

fn write(store: &dyn KeyValueStore, key: &str, value: String) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "Failed to write storage key");
    }
}

fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => write(store, key, raw),
        Err(e) => tracing::warn!(key, error = %e, "Failed to encode storage value"),
    }
}

fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(key, error = %e, "Ignoring corrupt storage value");
            None
        }
    }
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and bytes.
fn parse_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    let (header, payload) = data_url.split_once(',')?;
    let mime = header
        .strip_prefix("data:")?
        .strip_suffix(";base64")?
        .to_string();
    let bytes = BASE64.decode(payload).ok()?;
    Some((mime, bytes))
}
