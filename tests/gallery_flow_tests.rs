// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gallery pagination against a mock backend.

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use instasnap_client::services::{GalleryFlow, GallerySource};
use serde_json::{json, Value};
use std::collections::HashMap;

mod common;
use common::{spawn_backend, test_context, S3_BASE};

const TOTAL: usize = 5;

fn photo(i: usize) -> Value {
    json!({
        "_id": format!("p{}", i),
        "image": format!("uploads/{}.jpg", i),
        "compressed": format!("uploads/{}_c.jpg", i),
        "thumbnail": format!("uploads/{}_t.jpg", i),
        "event": "evt"
    })
}

fn page(start: usize, limit: usize) -> Json<Value> {
    let photos: Vec<Value> = (start..TOTAL.min(start + limit)).map(photo).collect();
    Json(json!({
        "success": true,
        "response": photos,
        "count": photos.len(),
        "totalCount": TOTAL
    }))
}

fn param(q: &HashMap<String, String>, name: &str) -> usize {
    q.get(name).and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn backend() -> Router {
    Router::new()
        .route(
            "/api/v1/insta-snap",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                page(param(&q, "skip"), param(&q, "limit"))
            }),
        )
        .route(
            "/api/v1/insta-snap/event-images",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let limit = param(&q, "limit");
                page((param(&q, "page") - 1) * limit, limit)
            }),
        )
}

#[tokio::test]
async fn test_highlights_page_by_offset() {
    let base = spawn_backend(backend()).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut gallery = GalleryFlow::new(ctx, GallerySource::Highlights).with_page_size(2);

    assert_eq!(gallery.mount().await, 2);
    assert_eq!(gallery.total_count(), Some(5));
    assert!(gallery.has_more());
    assert_eq!(gallery.photos()[0].thumbnail, format!("{}/uploads/0_t.jpg", S3_BASE));

    assert_eq!(gallery.load_more().await, 2);
    assert_eq!(gallery.load_more().await, 1);
    assert!(!gallery.has_more());
    assert_eq!(gallery.load_more().await, 0);

    let ids: Vec<&str> = gallery.photos().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4"]);
}

#[tokio::test]
async fn test_all_photos_page_by_number() {
    let base = spawn_backend(backend()).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut gallery = GalleryFlow::new(ctx, GallerySource::AllPhotos).with_page_size(3);

    assert_eq!(gallery.mount().await, 3);
    assert_eq!(gallery.load_more().await, 2);
    assert!(!gallery.has_more());
    assert_eq!(gallery.photos()[4].id, "p4");

    // Remount starts over from the first page.
    assert_eq!(gallery.mount().await, 3);
    assert_eq!(gallery.photos().len(), 3);
}

#[tokio::test]
async fn test_failure_keeps_loaded_photos() {
    let app = Router::new().route(
        "/api/v1/insta-snap",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))) }),
    );
    let base = spawn_backend(app).await;
    let (ctx, _) = test_context(&base, Some("evt"));
    let mut gallery = GalleryFlow::new(ctx, GallerySource::Highlights);

    assert_eq!(gallery.mount().await, 0);
    assert_eq!(gallery.error(), Some("boom"));
    assert!(gallery.photos().is_empty());
    assert!(!gallery.is_loading());
}

#[tokio::test]
async fn test_no_event_fetches_nothing() {
    let (ctx, _) = test_context("http://127.0.0.1:9", None);
    let mut gallery = GalleryFlow::new(ctx, GallerySource::AllPhotos);

    assert_eq!(gallery.mount().await, 0);
    assert!(gallery.error().is_none());
}
