// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OTP login, registration and profile models.

use crate::error::AppError;
use crate::models::null_as_default;
use crate::models::photo::FaceMatch;
use serde::{Deserialize, Serialize};

/// Response to an OTP send request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Only present on development backends
    #[serde(default)]
    pub otp: Option<String>,
}

/// Outcome of OTP verification.
///
/// A wrong or expired OTP is `verified == false` with a message, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_selfie: bool,
    /// Photos already matched to this user
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<FaceMatch>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl VerifyResult {
    /// Build the negative outcome returned for a rejected OTP.
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: message.clone(),
            error: Some(message),
            verified: false,
            ..Default::default()
        }
    }
}

/// Profile of an authenticated user.
///
/// Unknown backend fields are kept in `extra` so the cached copy
/// round-trips whatever the backend sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: String,
    /// Object-storage key of a selfie already on file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_key_image: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Whether a stored selfie can be matched without re-uploading.
    pub fn has_stored_selfie(&self) -> bool {
        self.aws_key_image
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Largest selfie accepted for upload.
pub const MAX_SELFIE_BYTES: usize = 10 * 1024 * 1024;

/// An image file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfieFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelfieFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reject non-images and files over [`MAX_SELFIE_BYTES`].
    pub fn validate_image(&self) -> Result<(), AppError> {
        if !self.mime_type.starts_with("image/") {
            return Err(AppError::Validation("Please upload an image file".to_string()));
        }
        if self.size() > MAX_SELFIE_BYTES {
            return Err(AppError::Validation(
                "File size must be less than 10MB".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert into a multipart file part.
    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part, AppError> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.name.clone())
            .mime_str(&self.mime_type)
            .map_err(|e| AppError::Validation(format!("Invalid file type: {}", e)))
    }
}

/// Self-registration form.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub first_name: String,
    pub mobile: String,
    pub email_id: String,
    pub event_id: String,
    /// Dial code, with or without leading `+`
    pub phone_code: String,
    pub selfie: SelfieFile,
}

impl RegisterForm {
    /// Check the fields the backend would otherwise reject.
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_valid_mobile(&self.mobile) {
            return Err(AppError::Validation(
                "Please enter a valid 10-digit mobile number".to_string(),
            ));
        }
        if !self.email_id.contains('@') {
            return Err(AppError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        if self.first_name.trim().is_empty() {
            return Err(AppError::Validation("Please enter your name".to_string()));
        }
        Ok(())
    }
}

/// Response to a registration request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Mobile numbers are exactly ten digits, without dial code.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())
}

/// Dial code as the backend stores it, without the leading `+`.
pub fn raw_dial_code(code: &str) -> String {
    code.trim().trim_start_matches('+').to_string()
}
