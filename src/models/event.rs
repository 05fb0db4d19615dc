// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Event-level responses: listings, permissions, matches and clustering.

use crate::models::null_as_default;
use crate::models::photo::{AnonymousPhoto, EventPhoto, FaceMatch, GroupInfo, Person};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Paginated listing envelope used by most GET endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_count: u32,
}

pub type PhotoListResponse = ListResponse<EventPhoto>;
pub type PhotoPermissionResponse = ListResponse<PhotoPermission>;

/// Who may view an event's photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoViewAccess {
    Everyone,
    Attendees,
    RegisteredOnly,
    Private,
    Public,
    #[serde(other)]
    Unknown,
}

/// Per-event photo permission settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPermission {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub photo_view_access: PhotoViewAccess,
    #[serde(default)]
    pub enable_social_share: bool,
    #[serde(default)]
    pub enable_partner_spotlights: bool,
    #[serde(default)]
    pub enable_event_highlights: bool,
    #[serde(default)]
    pub is_whatsapp_auth: bool,
}

/// Registered match outcome.
///
/// `matched == false` means no face in the event looked like the selfie.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched: bool,
    #[serde(rename = "FaceMatches", default, deserialize_with = "null_as_default")]
    pub face_matches: Vec<FaceMatch>,
    #[serde(default)]
    pub group_info: Option<GroupInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<EventPhoto>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MatchResult {
    /// Group id from `groupInfo`, falling back to the top-level field.
    pub fn resolved_group_id(&self) -> Option<&str> {
        self.group_info
            .as_ref()
            .map(|g| g.group_id.as_str())
            .or(self.group_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Anonymous match outcome in client vocabulary.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousMatchResult {
    pub success: bool,
    pub message: String,
    pub matched: bool,
    pub group_id: Option<String>,
    pub similarity: Option<f64>,
    pub photos: Vec<AnonymousPhoto>,
    pub processing_time: String,
}

/// Registered matching request.
///
/// Leaving `file` out with `force_refresh` set re-runs matching against
/// the selfie the backend already holds for this user.
#[derive(Debug, Clone, Default)]
pub struct MatchRequest<'a> {
    pub mobile: &'a str,
    pub event_id: &'a str,
    pub user_id: &'a str,
    pub token: &'a str,
    pub file: Option<&'a crate::models::SelfieFile>,
    pub force_refresh: bool,
    pub extras: MatchExtras,
}

/// Optional profile details sent along with a registered match.
#[derive(Debug, Clone, Default)]
pub struct MatchExtras {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub company_name: Option<String>,
    pub gender: Option<String>,
}

impl MatchExtras {
    /// Non-blank fields as multipart `(name, value)` pairs.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        [
            ("name", &self.name),
            ("designation", &self.designation),
            ("companyName", &self.company_name),
            ("gender", &self.gender),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringStats {
    pub total_groups: u32,
    pub total_face_detections: u32,
    pub average_faces_per_group: f64,
    pub client_matched_groups: u32,
    pub unmatched_groups: u32,
    pub largest_group_size: u32,
    pub smallest_group_size: u32,
    #[serde(default)]
    pub group_size_distribution: HashMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringStatsResponse {
    pub success: bool,
    pub event_id: String,
    pub statistics: ClusteringStats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMatchesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<FaceMatch>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub people: Vec<Person>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_people: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPhotosResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<EventPhoto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_photos: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributeResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_access_mode() {
        let access: PhotoViewAccess = serde_json::from_str("\"SomethingNew\"").unwrap();
        assert_eq!(access, PhotoViewAccess::Unknown);
    }

    #[test]
    fn test_match_result_group_id_fallback() {
        let nested: MatchResult = serde_json::from_value(serde_json::json!({
            "matched": true,
            "groupInfo": { "groupId": "g-nested", "totalPhotos": 3, "linked": true },
            "groupId": "g-top"
        }))
        .unwrap();
        assert_eq!(nested.resolved_group_id(), Some("g-nested"));

        let flat: MatchResult =
            serde_json::from_value(serde_json::json!({ "matched": true, "groupId": "g-top" }))
                .unwrap();
        assert_eq!(flat.resolved_group_id(), Some("g-top"));
    }

    #[test]
    fn test_match_extras_skip_blank() {
        let extras = MatchExtras {
            name: Some("Asha".to_string()),
            gender: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(extras.fields(), vec![("name", "Asha".to_string())]);
    }
}
