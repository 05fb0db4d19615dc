// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Only "hard" failures live here. A backend answer that is well-formed
//! but semantically negative (wrong OTP, no face match) is returned as a
//! normal value with a `verified`/`matched` flag instead.

use crate::config::ConfigError;

/// Application error type surfaced to page flows.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Backend rejected the request; the message is shown to the user verbatim.
    #[error("{0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Marker the backend uses when a mobile number has no account.
    pub const UNKNOWN_USER_MARKERS: [&'static str; 3] =
        ["not registered", "user not found", "no user"];

    /// Check whether this error means the mobile number is unknown to the
    /// backend, so the user may be offered self-registration instead.
    pub fn is_unknown_user(&self) -> bool {
        match self {
            AppError::Api(msg) => {
                let msg = msg.to_lowercase();
                Self::UNKNOWN_USER_MARKERS
                    .iter()
                    .any(|marker| msg.contains(marker))
            }
            _ => false,
        }
    }

    /// Check whether registration failed because the user already exists.
    pub fn is_already_registered(&self) -> bool {
        matches!(self, AppError::Api(msg) if msg.to_lowercase().contains("already registered"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
