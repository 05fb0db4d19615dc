// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registered login + match journey.
//!
//! Steps: `Mobile → Otp → Selfie → Photos`, with `Register` reachable from
//! `Mobile` when the number is unknown and the event allows
//! self-registration. `Photos` is terminal until logout.
//!
//! Errors never abort the flow: they are kept as inline text and the user
//! stays on the current step to retry.

use crate::models::auth::is_valid_mobile;
use crate::models::{
    EventPhoto, FaceMatch, MatchRequest, PhotosCacheData, RegisterForm, SelfieFile, UserProfile,
};
use crate::services::FlowAccess;
use crate::AppContext;
use std::sync::Arc;

/// Step of the registered journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredStep {
    /// No event configured, or not mounted yet
    Loading,
    Mobile,
    Register,
    Otp,
    Selfie,
    Photos,
}

/// Fields the user fills in on the registration step.
#[derive(Debug, Clone)]
pub struct RegisterDetails {
    pub first_name: String,
    pub email_id: String,
    pub selfie: SelfieFile,
}

/// Controller for the registered journey.
pub struct RegisteredFlow {
    ctx: Arc<AppContext>,
    step: RegisteredStep,
    access: FlowAccess,
    mobile: String,
    country_code: String,
    token: Option<String>,
    user_id: Option<String>,
    user: Option<UserProfile>,
    /// Selfie given at registration, reused for the first match.
    pending_selfie: Option<SelfieFile>,
    photos: Vec<EventPhoto>,
    group_id: Option<String>,
    is_new_user: bool,
    loading: bool,
    error: Option<String>,
}

impl RegisteredFlow {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let country_code = ctx.config.country_code.clone();
        Self {
            ctx,
            step: RegisteredStep::Loading,
            access: FlowAccess::default(),
            mobile: String::new(),
            country_code,
            token: None,
            user_id: None,
            user: None,
            pending_selfie: None,
            photos: Vec::new(),
            group_id: None,
            is_new_user: false,
            loading: false,
            error: None,
        }
    }

    pub fn step(&self) -> RegisteredStep {
        self.step
    }

    pub fn access(&self) -> FlowAccess {
        self.access
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn photos(&self) -> &[EventPhoto] {
        &self.photos
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn is_new_user(&self) -> bool {
        self.is_new_user
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn set_mobile(&mut self, mobile: &str) {
        self.mobile = mobile.trim().to_string();
    }

    pub fn set_country_code(&mut self, code: &str) {
        self.country_code = code.trim().to_string();
    }

    /// Restore a returning user before showing the first step.
    ///
    /// Order: verified tab session with fresh cached photos, then a stored
    /// login with matched photos, then the mobile form prefilled with the
    /// last number used.
    pub async fn mount(&mut self) -> RegisteredStep {
        let Some(event_id) = self.ctx.event_id().map(str::to_string) else {
            tracing::warn!("No event configured; registered flow stays loading");
            self.step = RegisteredStep::Loading;
            return self.step;
        };
        let ctx = Arc::clone(&self.ctx);
        let cache = &ctx.cache;

        if let Some(session) = cache.get_user_session().filter(|s| s.event_id == event_id) {
            self.mobile = session.mobile;
            if let Some(cached) = cache
                .get_photos_cache(&self.mobile, &event_id)
                .filter(|c| !c.photos.is_empty())
            {
                tracing::debug!(event = %event_id, "Restored photos from session cache");
                self.restore_login();
                self.photos = cached.photos;
                self.group_id = cached.group_id;
                self.step = RegisteredStep::Photos;
                return self.step;
            }
        }

        if cache.is_authenticated() {
            if let Some(matches) = cache.get_matched_photos().filter(|m| !m.is_empty()) {
                tracing::debug!(event = %event_id, "Restored stored matches for logged-in user");
                self.restore_login();
                self.photos = matches.into_iter().map(EventPhoto::from).collect();
                self.group_id = cache.get_group_id();
                if self.mobile.is_empty() {
                    self.mobile = cache.get_last_mobile().unwrap_or_default();
                }
                self.step = RegisteredStep::Photos;
                return self.step;
            }
        }

        if self.mobile.is_empty() {
            if let Some(saved) = cache.get_last_mobile() {
                self.mobile = saved;
            }
        }

        self.access = FlowAccess::fetch(&self.ctx.client, &event_id).await;
        self.step = RegisteredStep::Mobile;
        self.step
    }

    /// Move to the registration form, if the event allows it.
    pub fn start_registration(&mut self) -> RegisteredStep {
        if self.step == RegisteredStep::Mobile && self.access.self_registration {
            self.error = None;
            self.step = RegisteredStep::Register;
        } else if !self.access.self_registration {
            self.error = Some("Registration is closed for this event".to_string());
        }
        self.step
    }

    /// Go back to the mobile form from registration or OTP entry.
    pub fn back_to_mobile(&mut self) -> RegisteredStep {
        if matches!(self.step, RegisteredStep::Register | RegisteredStep::Otp) {
            self.error = None;
            self.step = RegisteredStep::Mobile;
        }
        self.step
    }

    pub async fn send_otp(&mut self) -> RegisteredStep {
        let Some(event_id) = self.event_id() else {
            return self.step;
        };
        if !is_valid_mobile(&self.mobile) {
            self.error = Some("Please enter a valid 10-digit mobile number".to_string());
            return self.step;
        }

        self.begin();
        let result = self
            .ctx
            .client
            .send_otp(&self.mobile, &event_id, &self.country_code)
            .await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.ctx.cache.set_last_mobile(&self.mobile);
                self.step = RegisteredStep::Otp;
            }
            Err(e) if e.is_unknown_user() && self.access.self_registration => {
                tracing::info!(event = %event_id, "Unknown mobile, offering registration");
                self.error = Some(e.to_string());
                self.step = RegisteredStep::Register;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.step
    }

    /// Register, then send the first OTP.
    pub async fn register(&mut self, details: RegisterDetails) -> RegisteredStep {
        let Some(event_id) = self.event_id() else {
            return self.step;
        };
        if self.step != RegisteredStep::Register {
            return self.step;
        }

        let form = RegisterForm {
            first_name: details.first_name,
            mobile: self.mobile.clone(),
            email_id: details.email_id,
            event_id: event_id.clone(),
            phone_code: self.country_code.clone(),
            selfie: details.selfie,
        };
        if let Err(e) = form.validate().and_then(|_| form.selfie.validate_image()) {
            self.error = Some(e.to_string());
            return self.step;
        }

        self.begin();
        let result = self.ctx.client.register(&form).await;

        match result {
            Ok(response) if response.success => {
                self.is_new_user = true;
                self.pending_selfie = Some(form.selfie);
                self.ctx.cache.set_last_mobile(&self.mobile);

                match self
                    .ctx
                    .client
                    .send_otp(&self.mobile, &event_id, &self.country_code)
                    .await
                {
                    Ok(_) => self.step = RegisteredStep::Otp,
                    Err(e) => {
                        // Already registered: retrying must go through login.
                        self.error = Some(e.to_string());
                        self.step = RegisteredStep::Mobile;
                    }
                }
            }
            Ok(response) => {
                self.error = Some(non_empty_or(response.message, "Registration failed"));
            }
            Err(e) if e.is_already_registered() => {
                self.error = Some("You are already registered! Please use Login instead.".to_string());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
        self.step
    }

    pub async fn verify_otp(&mut self, otp: &str) -> RegisteredStep {
        let Some(event_id) = self.event_id() else {
            return self.step;
        };
        let otp = otp.trim();
        if otp.len() != 4 || !otp.chars().all(|c| c.is_ascii_digit()) {
            self.error = Some("Please enter the 4-digit OTP".to_string());
            return self.step;
        }

        self.begin();
        let result = self
            .ctx
            .client
            .verify_otp(&self.mobile, otp, &event_id, &self.country_code)
            .await;
        self.loading = false;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.error = Some(e.to_string());
                return self.step;
            }
        };

        let (Some(token), Some(user_id), true) =
            (result.token.clone(), result.user_id.clone(), result.verified)
        else {
            self.error = Some(
                Some(result.message)
                    .filter(|m| !m.is_empty())
                    .or(result.error)
                    .unwrap_or_else(|| "Invalid OTP".to_string()),
            );
            return self.step;
        };

        let cache = &self.ctx.cache;
        cache.set_auth_token(&token);
        if let Some(refresh) = result.refresh_token.as_deref() {
            cache.set_refresh_token(refresh);
        }
        let user = result.user.clone().unwrap_or_else(|| UserProfile {
            id: user_id.clone(),
            ..Default::default()
        });
        cache.set_user_data(&user);
        cache.set_user_session(&self.mobile, &event_id, true);

        self.token = Some(token);
        self.user_id = Some(user_id);
        self.user = Some(user);

        if result.requires_selfie || result.photos.is_empty() {
            self.step = RegisteredStep::Selfie;
        } else {
            self.show_matches(&event_id, result.photos, result.group_id);
        }
        self.step
    }

    /// Match a selfie, or re-match the one already on file.
    ///
    /// With no file, falls back to the selfie given at registration, then
    /// to the stored selfie reference on the user's profile.
    pub async fn match_selfie(&mut self, file: Option<SelfieFile>) -> RegisteredStep {
        let Some(event_id) = self.event_id() else {
            return self.step;
        };
        let (Some(token), Some(user_id)) = (self.token.clone(), self.user_id.clone()) else {
            self.error = Some("Authentication failed. Please try logging in again.".to_string());
            self.step = RegisteredStep::Mobile;
            return self.step;
        };

        let file = file.or_else(|| self.pending_selfie.clone());
        if let Some(Err(e)) = file.as_ref().map(SelfieFile::validate_image) {
            self.error = Some(e.to_string());
            return self.step;
        }
        let force_refresh =
            file.is_none() && self.user.as_ref().is_some_and(UserProfile::has_stored_selfie);
        if file.is_none() && !force_refresh {
            self.error = Some("Please upload a selfie first".to_string());
            return self.step;
        }

        self.begin();
        let full_mobile = format!("{}{}", self.country_code, self.mobile);
        let request = MatchRequest {
            mobile: &full_mobile,
            event_id: &event_id,
            user_id: &user_id,
            token: &token,
            file: file.as_ref(),
            force_refresh,
            ..Default::default()
        };
        let result = self.ctx.client.match_registered(&request).await;
        self.loading = false;

        match result {
            // A confirmed match with no photos yet still lands on the photos step.
            Ok(result) if result.matched => {
                let group_id = result.resolved_group_id().map(str::to_string);
                self.pending_selfie = None;
                self.show_matches(&event_id, result.face_matches, group_id);
            }
            Ok(result) => {
                self.error = Some(non_empty_or(result.message, "No matching photos found"));
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.step
    }

    /// Download all matched photos as a ZIP.
    pub async fn download_zip(&mut self) -> Option<Vec<u8>> {
        let Some(group_id) = self.group_id.clone() else {
            self.error = Some("No group ID available for download".to_string());
            return None;
        };

        self.begin();
        let result = self.ctx.client.download_zip(&group_id).await;
        self.loading = false;

        match result {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Forget the login and return to the mobile form.
    ///
    /// Last mobile and group id survive for the next visit.
    pub fn logout(&mut self) -> RegisteredStep {
        let cache = &self.ctx.cache;
        cache.clear_auth();
        if let Some(event_id) = self.ctx.event_id() {
            cache.clear_photos_cache(&self.mobile, event_id);
        }
        tracing::info!("Logged out");

        self.token = None;
        self.user_id = None;
        self.user = None;
        self.pending_selfie = None;
        self.photos.clear();
        self.group_id = None;
        self.is_new_user = false;
        self.error = None;
        self.mobile = cache.get_last_mobile().unwrap_or_default();
        self.step = RegisteredStep::Mobile;
        self.step
    }

    // ─── Helpers ─────────────────────────────────────────────────

    fn event_id(&mut self) -> Option<String> {
        let event_id = self.ctx.event_id().map(str::to_string);
        if event_id.is_none() {
            self.step = RegisteredStep::Loading;
        }
        event_id
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Load the stored login into local state.
    fn restore_login(&mut self) {
        let cache = &self.ctx.cache;
        self.token = cache.get_auth_token();
        self.user = cache.get_user_data();
        self.user_id = self.user.as_ref().map(|u| u.id.clone()).filter(|id| !id.is_empty());
    }

    fn show_matches(&mut self, event_id: &str, matches: Vec<FaceMatch>, group_id: Option<String>) {
        let cache = &self.ctx.cache;
        cache.set_matched_photos(&matches);

        let group_id = group_id.filter(|id| !id.is_empty());
        if let Some(id) = group_id.as_deref() {
            cache.set_group_id(id);
        }

        self.photos = matches.into_iter().map(EventPhoto::from).collect();
        self.group_id = group_id;
        cache.set_photos_cache(
            &self.mobile,
            event_id,
            &PhotosCacheData {
                photos: self.photos.clone(),
                group_id: self.group_id.clone(),
            },
        );
        self.step = RegisteredStep::Photos;
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
