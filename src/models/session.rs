// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Records persisted by the session cache.

use crate::models::photo::EventPhoto;
use serde::{Deserialize, Serialize};

/// Marks that a mobile number passed OTP verification for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub mobile: String,
    pub event_id: String,
    pub is_verified: bool,
}

/// Matched photos remembered for one (mobile, event) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotosCacheData {
    pub photos: Vec<EventPhoto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Storage envelope carrying the write time in Unix milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timestamped<T> {
    pub data: T,
    pub timestamp: i64,
}

/// Persisted form of the anonymous selfie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSelfie {
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: usize,
    pub timestamp: i64,
}
