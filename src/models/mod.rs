// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod auth;
pub mod event;
pub mod photo;
pub mod session;

pub use auth::{
    OtpResponse, RegisterForm, RegisterResponse, SelfieFile, UserProfile, VerifyResult,
};
pub use event::{
    AnonymousMatchResult, ClusteringStatsResponse, ContributeResponse, ListResponse, MatchExtras,
    MatchRequest, MatchResult, PeopleResponse, PersonPhotosResponse, PhotoListResponse,
    PhotoPermission, PhotoPermissionResponse, PhotoViewAccess, UserMatchesResponse,
};
pub use photo::{AnonymousPhoto, EventPhoto, FaceMatch, GroupInfo, Person};
pub use session::{PhotosCacheData, StoredSelfie, Timestamped, UserSession};

use serde::{Deserialize, Deserializer};

/// Read an explicit JSON `null` as the field's default value.
///
/// `#[serde(default)]` alone only covers a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
