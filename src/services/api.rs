// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! InstaSnap API client.
//!
//! One typed method per remote endpoint. Handles:
//! - Error-shape normalization (`{ error }` bodies, `success: false` bodies)
//! - Relative photo paths rewritten to absolute object-storage URLs
//! - Backend field names renamed to client vocabulary for anonymous matches
//!
//! Two failure conventions are kept apart on purpose: transport and
//! backend failures are `Err(AppError)`, while "the answer is no" (wrong
//! OTP, no face match) comes back as `Ok` with a false flag.

use crate::config::Config;
use crate::error::AppError;
use crate::models::auth::raw_dial_code;
use crate::models::null_as_default;
use crate::models::photo::{absolute_url, RawAnonymousPhoto};
use crate::models::{
    AnonymousMatchResult, ClusteringStatsResponse, ContributeResponse, EventPhoto, MatchRequest,
    MatchResult, OtpResponse, PeopleResponse, PersonPhotosResponse, PhotoListResponse,
    PhotoPermissionResponse, RegisterForm, RegisterResponse, SelfieFile, UserMatchesResponse,
    VerifyResult,
};
use reqwest::{multipart::Form, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// InstaSnap API client.
#[derive(Clone)]
pub struct InstaSnapClient {
    http: reqwest::Client,
    base_url: String,
    s3_base_url: String,
}

impl InstaSnapClient {
    /// Create a client for the API at `base_url`; relative photo paths are
    /// resolved against `s3_base_url`.
    pub fn new(base_url: impl Into<String>, s3_base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            s3_base_url: s3_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base_url, &config.s3_base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ─── Authentication ──────────────────────────────────────────

    /// Send a login OTP to a registered mobile number.
    pub async fn send_otp(
        &self,
        mobile: &str,
        event_id: &str,
        country_code: &str,
    ) -> Result<OtpResponse, AppError> {
        tracing::debug!(event = event_id, "Sending OTP");

        let body = serde_json::json!({
            "mobile": mobile,
            "event": event_id,
            "phoneCode": raw_dial_code(country_code),
        });

        let response = self
            .http
            .post(self.url("/api/v1/auth/login-mobile-with-country"))
            .json(&body)
            .send()
            .await?;

        let (status, data) = read_envelope(response).await?;
        if let Some(message) = failure_message(status, &data, "Failed to send OTP") {
            tracing::info!(status = status.as_u16(), "OTP send rejected");
            return Err(AppError::Api(message));
        }

        decode_value(data)
    }

    /// Verify an OTP.
    ///
    /// A rejected OTP is returned as `verified: false`, never as `Err`.
    pub async fn verify_otp(
        &self,
        mobile: &str,
        otp: &str,
        event_id: &str,
        country_code: &str,
    ) -> Result<VerifyResult, AppError> {
        let body = serde_json::json!({
            "mobile": mobile,
            "otp": otp,
            "event": event_id,
            "phoneCode": raw_dial_code(country_code),
        });

        let response = self
            .http
            .post(self.url("/api/v1/auth/verify-otp-with-country"))
            .json(&body)
            .send()
            .await?;

        let (status, data) = read_envelope(response).await?;
        if let Some(message) = failure_message(status, &data, "OTP verification failed") {
            tracing::info!(status = status.as_u16(), "OTP verification rejected");
            return Ok(VerifyResult::rejected(message));
        }

        let mut result: VerifyResult = decode_value(data)?;
        result.verified = true;
        Ok(result)
    }

    /// Register a new attendee with their selfie.
    pub async fn register(&self, form: &RegisterForm) -> Result<RegisterResponse, AppError> {
        let multipart = Form::new()
            .text("mobile", form.mobile.clone())
            .text("event", form.event_id.clone())
            .text("phoneCode", raw_dial_code(&form.phone_code))
            .text("emailId", form.email_id.clone())
            .text("fullName", form.first_name.clone())
            .part("file", form.selfie.to_part()?);

        let response = self
            .http
            .post(self.url("/api/v1/auth/signup-mobile-with-country"))
            .multipart(multipart)
            .send()
            .await?;

        let (status, data) = read_envelope(response).await?;
        if let Some(message) = failure_message(status, &data, "Registration failed") {
            return Err(AppError::Api(message));
        }

        tracing::info!(event = %form.event_id, "Registration accepted");
        decode_value(data)
    }

    // ─── Matching ────────────────────────────────────────────────

    /// Match a selfie without an account.
    pub async fn match_anonymous(
        &self,
        file: &SelfieFile,
        event_id: &str,
    ) -> Result<AnonymousMatchResult, AppError> {
        let multipart = Form::new()
            .part("file", file.to_part()?)
            .text("eventId", event_id.to_string());

        let response = self
            .http
            .post(self.url("/api/v1/insta-snap/match-anonymous"))
            .multipart(multipart)
            .send()
            .await?;

        let raw: RawAnonymousMatch = handle_response(response).await?;
        let result = raw.into_result();
        tracing::info!(
            event = event_id,
            matched = result.matched,
            photos = result.photos.len(),
            "Anonymous match finished"
        );
        Ok(result)
    }

    /// Match a registered user's selfie.
    ///
    /// Without a file and with `force_refresh`, the backend re-matches the
    /// selfie it already stores for the user.
    pub async fn match_registered(&self, req: &MatchRequest<'_>) -> Result<MatchResult, AppError> {
        let mut multipart = Form::new()
            .text("mobile", req.mobile.to_string())
            .text("eventId", req.event_id.to_string())
            .text("userId", req.user_id.to_string());

        if let Some(file) = req.file {
            multipart = multipart.part("file", file.to_part()?);
        }
        if req.force_refresh {
            multipart = multipart.text("forceRefresh", "true");
        }
        for (key, value) in req.extras.fields() {
            multipart = multipart.text(key, value);
        }

        let response = self
            .http
            .post(self.url("/api/v1/mobile/instasnap/match"))
            .bearer_auth(req.token)
            .multipart(multipart)
            .send()
            .await?;

        let result: MatchResult = handle_response(response).await?;
        tracing::info!(
            event = req.event_id,
            matched = result.matched,
            force_refresh = req.force_refresh,
            "Registered match finished"
        );
        Ok(result)
    }

    /// Previously computed matches for a user.
    pub async fn get_user_matches(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<UserMatchesResponse, AppError> {
        self.get_json(
            "/api/v1/mobile/instasnap/user-matches",
            &[("userId", user_id), ("eventId", event_id)],
        )
        .await
    }

    // ─── Downloads ───────────────────────────────────────────────

    /// Generate and download a ZIP of every photo in a group.
    pub async fn download_zip(&self, group_id: &str) -> Result<Vec<u8>, AppError> {
        let body = serde_json::json!({ "groupId": group_id, "format": "zip" });

        let response = self
            .http
            .post(self.url("/api/v1/insta-snap/generate-document"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = response.status().as_u16(), "ZIP generation failed");
            return Err(AppError::Api("Failed to generate ZIP".to_string()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Download a single original photo.
    pub async fn download_photo(&self, image_id: &str, event_id: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .http
            .get(self.url("/api/v1/insta-snap/download"))
            .query(&[("imageId", image_id), ("event", event_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Api("Failed to download photo".to_string()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    // ─── Galleries ───────────────────────────────────────────────

    /// Curated highlight photos for an event.
    pub async fn get_event_highlights(
        &self,
        event_id: &str,
        skip: u32,
        limit: u32,
    ) -> Result<PhotoListResponse, AppError> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let data: PhotoListResponse = self
            .get_json(
                "/api/v1/insta-snap",
                &[
                    ("event", event_id),
                    ("isHighlight", "true"),
                    ("skip", skip.as_str()),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;
        Ok(self.absolutize_list(data))
    }

    /// Every photo of an event, one page at a time (pages start at 1).
    pub async fn get_all_event_photos(
        &self,
        event_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<PhotoListResponse, AppError> {
        let page = page.to_string();
        let limit = limit.to_string();
        let data: PhotoListResponse = self
            .get_json(
                "/api/v1/insta-snap/event-images",
                &[("event", event_id), ("page", page.as_str()), ("limit", limit.as_str())],
            )
            .await?;
        Ok(self.absolutize_list(data))
    }

    pub async fn get_wall_of_fame(
        &self,
        event_id: &str,
        skip: u32,
        limit: u32,
    ) -> Result<PhotoListResponse, AppError> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let data: PhotoListResponse = self
            .get_json(
                "/api/v1/insta-snap/wall-fame",
                &[("event", event_id), ("skip", skip.as_str()), ("limit", limit.as_str())],
            )
            .await?;
        Ok(self.absolutize_list(data))
    }

    /// Person clusters found in the event.
    pub async fn get_people(&self, event_id: &str) -> Result<PeopleResponse, AppError> {
        let mut data: PeopleResponse = self
            .get_json("/api/v1/insta-snap/people", &[("eventId", event_id)])
            .await?;
        for person in &mut data.people {
            person.representative_face = absolute_url(&self.s3_base_url, &person.representative_face);
        }
        Ok(data)
    }

    /// Photos belonging to one person cluster.
    pub async fn get_person_photos(
        &self,
        group_id: &str,
        event_id: &str,
    ) -> Result<PersonPhotosResponse, AppError> {
        let path = format!(
            "/api/v1/insta-snap/people/{}/photos",
            urlencoding::encode(group_id)
        );
        let mut data: PersonPhotosResponse =
            self.get_json(&path, &[("eventId", event_id)]).await?;
        data.photos = self.absolutize(std::mem::take(&mut data.photos));
        Ok(data)
    }

    // ─── Event Settings ──────────────────────────────────────────

    pub async fn get_photo_permission(
        &self,
        event_id: &str,
    ) -> Result<PhotoPermissionResponse, AppError> {
        self.get_json(
            "/api/v1/photo-permission",
            &[("searchkey", ""), ("photoViewAccess", ""), ("event", event_id)],
        )
        .await
    }

    pub async fn get_clustering_stats(
        &self,
        event_id: &str,
    ) -> Result<ClusteringStatsResponse, AppError> {
        self.get_json(
            "/api/v1/insta-snap/clustering-stats",
            &[("eventId", event_id)],
        )
        .await
    }

    // ─── Contributions ───────────────────────────────────────────

    /// Upload a photo taken by an attendee to the event gallery.
    pub async fn contribute_photo(
        &self,
        file: &SelfieFile,
        event_id: &str,
        user_id: &str,
        token: &str,
    ) -> Result<ContributeResponse, AppError> {
        let multipart = Form::new()
            .part("file", file.to_part()?)
            .text("eventId", event_id.to_string())
            .text("userId", user_id.to_string());

        let response = self
            .http
            .post(self.url("/api/v1/insta-snap/contribute"))
            .bearer_auth(token)
            .multipart(multipart)
            .send()
            .await?;

        let (status, data) = read_envelope(response).await?;
        if let Some(message) = failure_message(status, &data, "Failed to upload photo") {
            return Err(AppError::Api(message));
        }
        decode_value(data)
    }

    // ─── Helpers ─────────────────────────────────────────────────

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        handle_response(response).await
    }

    fn absolutize(&self, photos: Vec<EventPhoto>) -> Vec<EventPhoto> {
        photos
            .into_iter()
            .map(|p| p.with_absolute_urls(&self.s3_base_url))
            .collect()
    }

    fn absolutize_list(&self, mut data: PhotoListResponse) -> PhotoListResponse {
        data.response = self.absolutize(std::mem::take(&mut data.response));
        data
    }
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Check status and decode a JSON body.
///
/// Non-2xx uses the body's `error` field, then `HTTP <code>: <reason>`.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => err.error.filter(|e| !e.is_empty()).unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            }),
            Err(_) => "Network error occurred".to_string(),
        };
        return Err(AppError::Api(message));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
}

/// Read status and JSON body without judging success yet.
async fn read_envelope(response: reqwest::Response) -> Result<(StatusCode, Value), AppError> {
    let status = response.status();
    let body = response.text().await?;
    let data = serde_json::from_str(&body).map_err(|e| {
        AppError::Decode(format!("Non-JSON response (HTTP {}): {}", status.as_u16(), e))
    })?;
    Ok((status, data))
}

/// Failure message when the status is non-2xx or the body says
/// `success: false`; `None` when the request succeeded.
///
/// Message preference: `error`, then `message`, then `fallback`.
fn failure_message(status: StatusCode, data: &Value, fallback: &str) -> Option<String> {
    let declared_failure = data.get("success").and_then(Value::as_bool) == Some(false);
    if status.is_success() && !declared_failure {
        return None;
    }

    let field = |name: &str| {
        data.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Some(
        field("error")
            .or_else(|| field("message"))
            .unwrap_or_else(|| fallback.to_string()),
    )
}

fn decode_value<T: DeserializeOwned>(data: Value) -> Result<T, AppError> {
    serde_json::from_value(data).map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
}

/// Backend shape of an anonymous match response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnonymousMatch {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    matched: bool,
    #[serde(default)]
    matched_group: Option<RawMatchedGroup>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    similarity: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    photos: Vec<RawAnonymousPhoto>,
    #[serde(default)]
    processing_time: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatchedGroup {
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    similarity: Option<f64>,
}

impl RawAnonymousMatch {
    /// Prefer the nested `matchedGroup` fields, falling back to top level.
    fn into_result(self) -> AnonymousMatchResult {
        let (nested_group, nested_similarity) = match self.matched_group {
            Some(g) => (g.group_id, g.similarity),
            None => (None, None),
        };

        AnonymousMatchResult {
            success: self.success,
            message: self.message,
            matched: self.matched,
            group_id: nested_group
                .filter(|id| !id.is_empty())
                .or(self.group_id.filter(|id| !id.is_empty())),
            similarity: nested_similarity.or(self.similarity),
            photos: self.photos.into_iter().map(Into::into).collect(),
            processing_time: match self.processing_time {
                Some(Value::String(s)) => s,
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_message_checks_both_conventions() {
        assert_eq!(
            failure_message(StatusCode::OK, &json!({ "success": true }), "fallback"),
            None
        );
        assert_eq!(
            failure_message(
                StatusCode::OK,
                &json!({ "success": false, "message": "bad otp" }),
                "fallback"
            ),
            Some("bad otp".to_string())
        );
        assert_eq!(
            failure_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "upstream down", "message": "ignored" }),
                "fallback"
            ),
            Some("upstream down".to_string())
        );
        assert_eq!(
            failure_message(StatusCode::BAD_REQUEST, &json!({}), "fallback"),
            Some("fallback".to_string())
        );
    }

    #[test]
    fn test_anonymous_match_prefers_nested_group() {
        let raw: RawAnonymousMatch = serde_json::from_value(json!({
            "success": true,
            "matched": true,
            "matchedGroup": { "groupId": "g-nested", "similarity": 0.91 },
            "groupId": "g-top",
            "similarity": 0.5,
            "photos": [{
                "_id": "p1",
                "image": "https://x/o.jpg",
                "compressed": "https://x/c.jpg",
                "thumbnail": "https://x/t.jpg",
                "uploadDate": "2026-01-01"
            }],
            "processingTime": "1.2s"
        }))
        .unwrap();

        let result = raw.into_result();
        assert_eq!(result.group_id.as_deref(), Some("g-nested"));
        assert_eq!(result.similarity, Some(0.91));
        assert_eq!(result.photos[0].image_id, "p1");
        assert_eq!(result.photos[0].original_url, "https://x/o.jpg");
        assert_eq!(result.photos[0].compressed_url, "https://x/c.jpg");
        assert_eq!(result.photos[0].thumbnail_url, "https://x/t.jpg");
        assert_eq!(result.processing_time, "1.2s");
    }

    #[test]
    fn test_anonymous_match_top_level_fallback() {
        let raw: RawAnonymousMatch = serde_json::from_value(json!({
            "success": true,
            "matched": false,
            "groupId": "g-top",
            "processingTime": 850
        }))
        .unwrap();

        let result = raw.into_result();
        assert!(!result.matched);
        assert_eq!(result.group_id.as_deref(), Some("g-top"));
        assert_eq!(result.processing_time, "850");
        assert!(result.photos.is_empty());
    }
}
