// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! InstaSnap client: find yourself in event photos.
//!
//! This crate provides the typed client for the InstaSnap REST API, the
//! session and cache manager that remembers logins, matches and selfies
//! between runs, and the page-flow controllers that drive the anonymous,
//! registered and gallery journeys on top of both.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::AppError;
use services::InstaSnapClient;
use std::sync::Arc;
use storage::{FileStore, KeyValueStore, MemoryStore, SessionCache};
use time_utils::SystemClock;

/// Shared application state.
pub struct AppContext {
    pub config: Config,
    pub client: InstaSnapClient,
    pub cache: SessionCache,
}

impl AppContext {
    /// Build the context from config; the persistent store is file-backed
    /// when `storage_path` is set.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let persistent: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let cache = SessionCache::new(
            persistent,
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
        );

        Ok(Self::new(config, cache))
    }

    pub fn new(config: Config, cache: SessionCache) -> Self {
        let client = InstaSnapClient::from_config(&config);
        Self {
            config,
            client,
            cache,
        }
    }

    /// Configured event, if any.
    pub fn event_id(&self) -> Option<&str> {
        self.config.event_id.as_deref()
    }
}
