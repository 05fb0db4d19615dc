// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anonymous quick-match journey against a mock backend.

use axum::{
    extract::Multipart,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::TimeDelta;
use instasnap_client::models::SelfieFile;
use instasnap_client::services::{AnonymousFlow, AnonymousStep};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

mod common;
use common::{spawn_backend, test_context};

fn selfie() -> SelfieFile {
    SelfieFile::new("me.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

fn permission(mode: &'static str) -> Router {
    Router::new().route(
        "/api/v1/photo-permission",
        get(move || async move {
            Json(json!({
                "success": true,
                "response": [{ "photoViewAccess": mode }]
            }))
        }),
    )
}

/// Anonymous matcher that always finds two photos and counts calls.
fn matching(calls: Arc<AtomicU32>) -> Router {
    Router::new().route(
        "/api/v1/insta-snap/match-anonymous",
        post(move |mut multipart: Multipart| async move {
            while let Some(field) = multipart.next_field().await.unwrap() {
                let _ = field.bytes().await;
            }
            calls.fetch_add(1, Ordering::SeqCst);
            Json(json!({
                "success": true,
                "message": "Found you",
                "matched": true,
                "matchedGroup": { "groupId": "g-anon", "similarity": 0.88 },
                "photos": [
                    { "_id": "a1", "image": "https://x/a1.jpg", "compressed": "https://x/a1c.jpg", "thumbnail": "https://x/a1t.jpg" },
                    { "_id": "a2", "image": "https://x/a2.jpg", "compressed": "https://x/a2c.jpg", "thumbnail": "https://x/a2t.jpg" }
                ],
                "processingTime": "0.4s"
            }))
        }),
    )
}

#[tokio::test]
async fn test_no_event_stays_loading() {
    let (ctx, _) = test_context("http://127.0.0.1:9", None);
    let mut flow = AnonymousFlow::new(ctx);

    assert_eq!(flow.mount().await, AnonymousStep::Loading);
    assert_eq!(flow.match_selfie(selfie()).await, AnonymousStep::Loading);
}

#[tokio::test]
async fn test_hidden_when_everyone_can_view() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = permission("Everyone").merge(matching(calls.clone()));
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx);

    assert_eq!(flow.mount().await, AnonymousStep::Unavailable);
    assert_eq!(flow.match_selfie(selfie()).await, AnonymousStep::Unavailable);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_hidden_for_attendees_only() {
    let base = spawn_backend(permission("Attendees")).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx);

    assert_eq!(flow.mount().await, AnonymousStep::Unavailable);
}

#[tokio::test]
async fn test_permission_failure_keeps_page_usable() {
    let app = Router::new().route(
        "/api/v1/photo-permission",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "db down" }))) }),
    );
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx);

    assert_eq!(flow.mount().await, AnonymousStep::Upload);
}

#[tokio::test]
async fn test_match_shows_results_and_retains_selfie() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = permission("Public").merge(matching(calls.clone()));
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx.clone());

    assert_eq!(flow.mount().await, AnonymousStep::Upload);
    assert!(!flow.can_find_more());

    assert_eq!(flow.match_selfie(selfie()).await, AnonymousStep::Results);
    assert_eq!(flow.photos().len(), 2);
    assert_eq!(flow.photos()[0].thumbnail_url, "https://x/a1t.jpg");
    assert_eq!(flow.group_id(), Some("g-anon"));
    assert_eq!(flow.similarity(), Some(0.88));
    assert_eq!(flow.processing_time(), "0.4s");
    assert!(!flow.is_loading());

    assert_eq!(ctx.cache.get_group_id().as_deref(), Some("g-anon"));
    assert!(flow.can_find_more());
    assert_eq!(ctx.cache.get_anonymous_selfie(), Some(selfie()));

    assert_eq!(flow.find_more().await, AnonymousStep::Results);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_match_stays_on_upload() {
    let app = permission("RegisteredOnly").route(
        "/api/v1/insta-snap/match-anonymous",
        post(|mut multipart: Multipart| async move {
            while let Some(field) = multipart.next_field().await.unwrap() {
                let _ = field.bytes().await;
            }
            Json(json!({ "success": true, "matched": false, "message": "", "photos": [] }))
        }),
    );
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx.clone());
    flow.mount().await;

    assert_eq!(flow.match_selfie(selfie()).await, AnonymousStep::Upload);
    assert_eq!(flow.error(), Some("No matching photos found"));
    assert!(!ctx.cache.has_anonymous_selfie());
}

#[tokio::test]
async fn test_non_image_rejected_before_upload() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = permission("Public").merge(matching(calls.clone()));
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx);
    flow.mount().await;

    let pdf = SelfieFile::new("cv.pdf", "application/pdf", vec![0x25, 0x50]);
    assert_eq!(flow.match_selfie(pdf).await, AnonymousStep::Upload);
    assert_eq!(flow.error(), Some("Please upload an image file"));

    let huge = SelfieFile::new("big.jpg", "image/jpeg", vec![0; 10 * 1024 * 1024 + 1]);
    assert_eq!(flow.match_selfie(huge).await, AnonymousStep::Upload);
    assert_eq!(flow.error(), Some("File size must be less than 10MB"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_find_more_after_expiry_asks_for_upload() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = permission("Public").merge(matching(calls.clone()));
    let base = spawn_backend(app).await;
    let (ctx, stores) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx);
    flow.mount().await;
    flow.match_selfie(selfie()).await;

    stores.clock.advance(TimeDelta::hours(1) + TimeDelta::milliseconds(1));

    assert_eq!(flow.find_more().await, AnonymousStep::Upload);
    assert_eq!(
        flow.error(),
        Some("Your selfie has expired. Please upload it again.")
    );
    assert!(!flow.can_find_more());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_download_and_reset() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = permission("Public").merge(matching(calls)).route(
        "/api/v1/insta-snap/generate-document",
        post(|| async { vec![0x50u8, 0x4b] }),
    );
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut flow = AnonymousFlow::new(ctx);
    flow.mount().await;
    flow.match_selfie(selfie()).await;

    assert_eq!(flow.download_zip().await, Some(vec![0x50, 0x4b]));

    assert_eq!(flow.reset(), AnonymousStep::Upload);
    assert!(flow.photos().is_empty());
    assert_eq!(flow.group_id(), None);
    assert_eq!(flow.download_zip().await, None);
    assert_eq!(flow.error(), Some("No group ID available for download"));
}
