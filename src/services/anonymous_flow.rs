// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anonymous quick-match journey: `Upload → Results`.
//!
//! A matched selfie is retained for an hour so "find more photos" can
//! re-query without asking for the file again.

use crate::models::{AnonymousPhoto, SelfieFile};
use crate::services::FlowAccess;
use crate::AppContext;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousStep {
    /// No event configured, or not mounted yet
    Loading,
    /// The event's access mode hides anonymous matching
    Unavailable,
    Upload,
    Results,
}

/// Controller for the anonymous journey.
pub struct AnonymousFlow {
    ctx: Arc<AppContext>,
    step: AnonymousStep,
    photos: Vec<AnonymousPhoto>,
    group_id: Option<String>,
    similarity: Option<f64>,
    processing_time: String,
    loading: bool,
    error: Option<String>,
}

impl AnonymousFlow {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            step: AnonymousStep::Loading,
            photos: Vec::new(),
            group_id: None,
            similarity: None,
            processing_time: String::new(),
            loading: false,
            error: None,
        }
    }

    pub fn step(&self) -> AnonymousStep {
        self.step
    }

    pub fn photos(&self) -> &[AnonymousPhoto] {
        &self.photos
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn similarity(&self) -> Option<f64> {
        self.similarity
    }

    pub fn processing_time(&self) -> &str {
        &self.processing_time
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

    /// Whether a "find more photos" action can be offered.
    ///
    /// Cheap presence check; the retained selfie may still turn out expired.
    pub fn can_find_more(&self) -> bool {
        self.ctx.cache.has_anonymous_selfie()
    }

    pub async fn mount(&mut self) -> AnonymousStep {
        let Some(event_id) = self.ctx.event_id() else {
            tracing::warn!("No event configured; anonymous flow stays loading");
            self.step = AnonymousStep::Loading;
            return self.step;
        };

        let access = FlowAccess::fetch(&self.ctx.client, event_id).await;
        self.step = if access.anonymous_match {
            AnonymousStep::Upload
        } else {
            AnonymousStep::Unavailable
        };
        self.step
    }

    /// Match a freshly uploaded selfie.
    pub async fn match_selfie(&mut self, file: SelfieFile) -> AnonymousStep {
        if let Err(e) = file.validate_image() {
            self.error = Some(e.to_string());
            return self.step;
        }
        self.run_match(file, true).await
    }

    /// Re-run matching with the retained selfie.
    pub async fn find_more(&mut self) -> AnonymousStep {
        match self.ctx.cache.get_anonymous_selfie() {
            Some(file) => self.run_match(file, false).await,
            None => {
                self.error = Some("Your selfie has expired. Please upload it again.".to_string());
                self.step = AnonymousStep::Upload;
                self.step
            }
        }
    }

    pub async fn download_zip(&mut self) -> Option<Vec<u8>> {
        let Some(group_id) = self.group_id.clone() else {
            self.error = Some("No group ID available for download".to_string());
            return None;
        };

        self.loading = true;
        self.error = None;
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

    /// Start over with a new selfie.
    pub fn reset(&mut self) -> AnonymousStep {
        self.photos.clear();
        self.group_id = None;
        self.similarity = None;
        self.processing_time.clear();
        self.error = None;
        if self.step == AnonymousStep::Results {
            self.step = AnonymousStep::Upload;
        }
        self.step
    }

    async fn run_match(&mut self, file: SelfieFile, retain: bool) -> AnonymousStep {
        let Some(event_id) = self.ctx.event_id().map(str::to_string) else {
            self.step = AnonymousStep::Loading;
            return self.step;
        };
        if self.step == AnonymousStep::Unavailable {
            return self.step;
        }

        self.loading = true;
        self.error = None;
        let result = self.ctx.client.match_anonymous(&file, &event_id).await;

        match result {
            Ok(result) if result.matched && !result.photos.is_empty() => {
                if let Some(id) = result.group_id.as_deref() {
                    self.ctx.cache.set_group_id(id);
                }
                if retain {
                    self.ctx.cache.set_anonymous_selfie(&file).await;
                }
                self.photos = result.photos;
                self.group_id = result.group_id;
                self.similarity = result.similarity;
                self.processing_time = result.processing_time;
                self.step = AnonymousStep::Results;
            }
            Ok(result) => {
                self.processing_time = result.processing_time;
                self.error = Some(if result.message.trim().is_empty() {
                    "No matching photos found".to_string()
                } else {
                    result.message
                });
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
        self.step
    }
}
