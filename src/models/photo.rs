// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Photo and match records exchanged with the InstaSnap API.

use crate::models::null_as_default;
use serde::{Deserialize, Serialize};

/// An event photo as listed by the gallery endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPhoto {
    #[serde(rename = "_id")]
    pub id: String,
    /// Original image path or URL
    pub image: String,
    /// Compressed image path or URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub compressed: String,
    /// Thumbnail path or URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upload_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_highlight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<String>,
    /// Album the highlight belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumRef>,
}

impl EventPhoto {
    /// Rewrite every relative image path against `base`.
    pub fn with_absolute_urls(mut self, base: &str) -> Self {
        self.image = absolute_url(base, &self.image);
        self.compressed = absolute_url(base, &self.compressed);
        self.thumbnail = absolute_url(base, &self.thumbnail);
        self
    }
}

/// Album reference embedded in highlight records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_favourite: bool,
}

/// A face match for a registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceMatch {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_id: String,
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<FaceMatch> for EventPhoto {
    /// Matches carry no separate compressed rendition; the original is reused.
    fn from(m: FaceMatch) -> Self {
        Self {
            id: m.id,
            compressed: m.image.clone(),
            image: m.image,
            thumbnail: m.thumbnail,
            upload_date: m.match_date,
            event: m.event,
            is_highlight: None,
            uploaded_size: None,
            compressed_size: None,
            album: None,
        }
    }
}

/// Cluster a registered user's face was linked to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub group_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_photos: u32,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub linked: bool,
}

/// Photo returned by the anonymous matcher, in client vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousPhoto {
    pub image_id: String,
    pub original_url: String,
    pub compressed_url: String,
    pub thumbnail_url: String,
    pub upload_date: String,
}

/// Backend shape of an anonymous match photo.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAnonymousPhoto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compressed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upload_date: String,
}

impl From<RawAnonymousPhoto> for AnonymousPhoto {
    fn from(raw: RawAnonymousPhoto) -> Self {
        Self {
            image_id: raw.id,
            original_url: raw.image,
            compressed_url: raw.compressed,
            thumbnail_url: raw.thumbnail,
            upload_date: raw.upload_date,
        }
    }
}

/// A person cluster discovered in the event photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: String,
    pub group_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub representative_face: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_images: Vec<String>,
}

/// Prefix `path` with `base` unless it is already an absolute URL.
///
/// Applying it twice gives the same result as applying it once.
pub fn absolute_url(base: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with("http") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://bucket.example";

    #[test]
    fn test_absolute_url_rewrites_relative() {
        assert_eq!(
            absolute_url(BASE, "uploads/x.jpg"),
            "https://bucket.example/uploads/x.jpg"
        );
    }

    #[test]
    fn test_absolute_url_is_idempotent() {
        let once = absolute_url(BASE, "uploads/x.jpg");
        assert_eq!(absolute_url(BASE, &once), once);
        assert_eq!(
            absolute_url(BASE, "https://cdn.example/y.jpg"),
            "https://cdn.example/y.jpg"
        );
    }

    #[test]
    fn test_face_match_to_event_photo() {
        let m: FaceMatch = serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "imageId": "img1",
            "image": "https://x/full.jpg",
            "thumbnail": "https://x/t.jpg",
            "matchDate": "2026-01-01",
            "event": "evt",
            "user": "u1"
        }))
        .unwrap();

        let photo = EventPhoto::from(m);
        assert_eq!(photo.id, "m1");
        assert_eq!(photo.compressed, "https://x/full.jpg");
        assert_eq!(photo.upload_date, "2026-01-01");
    }
}
