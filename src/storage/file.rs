// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file store that survives restarts.
//!
//! The whole map is rewritten on every change via a temp file and rename,
//! so a crash never leaves a half-written file behind.

use super::KeyValueStore;
use crate::error::AppError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
    /// Serializes file rewrites.
    flush_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file is missing.
    ///
    /// A corrupt file is logged and ignored; storage is best-effort.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let initial = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<BTreeMap<String, String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt store file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let entries: DashMap<String, String> = initial.into_iter().collect();

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries,
            flush_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), AppError> {
        let _guard = self.flush_lock.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let raw = serde_json::to_string(&snapshot)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode store: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            if let Err(e) = self.flush() {
                tracing::warn!(key, error = %e, "Failed to persist key removal");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}
