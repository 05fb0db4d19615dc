// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated browsing of event highlights or every event photo.

use crate::error::AppError;
use crate::models::{EventPhoto, PhotoListResponse};
use crate::AppContext;
use std::sync::Arc;

/// Default number of photos fetched per page.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Which listing the gallery pages through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GallerySource {
    /// Curated highlights (offset-based)
    Highlights,
    /// Every event photo (page-based, pages start at 1)
    AllPhotos,
}

pub struct GalleryFlow {
    ctx: Arc<AppContext>,
    source: GallerySource,
    page_size: u32,
    photos: Vec<EventPhoto>,
    next_page: u32,
    total_count: Option<u32>,
    exhausted: bool,
    loading: bool,
    error: Option<String>,
}

impl GalleryFlow {
    pub fn new(ctx: Arc<AppContext>, source: GallerySource) -> Self {
        Self {
            ctx,
            source,
            page_size: DEFAULT_PAGE_SIZE,
            photos: Vec::new(),
            next_page: 1,
            total_count: None,
            exhausted: false,
            loading: false,
            error: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn photos(&self) -> &[EventPhoto] {
        &self.photos
    }

    pub fn total_count(&self) -> Option<u32> {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// More photos can be requested.
    pub fn has_more(&self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.total_count {
            Some(total) => (self.photos.len() as u64) < u64::from(total),
            None => true,
        }
    }

    /// Reload from the first page.
    pub async fn mount(&mut self) -> usize {
        self.photos.clear();
        self.next_page = 1;
        self.total_count = None;
        self.exhausted = false;
        self.load_more().await
    }

    /// Fetch the next page, returning how many photos it added.
    ///
    /// Without a configured event nothing is fetched.
    pub async fn load_more(&mut self) -> usize {
        let Some(event_id) = self.ctx.event_id().map(str::to_string) else {
            return 0;
        };
        if !self.has_more() {
            return 0;
        }

        self.loading = true;
        self.error = None;
        let result = self.fetch_page(&event_id).await;
        self.loading = false;

        match result {
            Ok(page) => {
                let added = page.response.len();
                if page.total_count > 0 {
                    self.total_count = Some(page.total_count);
                }
                if added < self.page_size as usize {
                    self.exhausted = true;
                }
                self.photos.extend(page.response);
                self.next_page += 1;
                tracing::debug!(event = %event_id, added, total = self.photos.len(), "Gallery page loaded");
                added
            }
            Err(e) => {
                self.error = Some(e.to_string());
                0
            }
        }
    }

    async fn fetch_page(&self, event_id: &str) -> Result<PhotoListResponse, AppError> {
        let client = &self.ctx.client;
        match self.source {
            GallerySource::Highlights => {
                let skip = u32::try_from(self.photos.len()).unwrap_or(u32::MAX);
                client
                    .get_event_highlights(event_id, skip, self.page_size)
                    .await
            }
            GallerySource::AllPhotos => {
                client
                    .get_all_event_photos(event_id, self.next_page, self.page_size)
                    .await
            }
        }
    }
}
