// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! InstaSnap client
//!
//! Loads configuration, checks which journeys the configured event allows
//! and summarizes its highlights and any restored login.

use instasnap_client::{
    config::Config,
    services::{FlowAccess, GalleryFlow, GallerySource, RegisteredFlow, RegisteredStep},
    AppContext,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(api = %config.api_base_url, "Starting InstaSnap client");

    let ctx = Arc::new(AppContext::from_config(config)?);
    let Some(event_id) = ctx.event_id().map(str::to_string) else {
        tracing::warn!("INSTASNAP_EVENT_ID not set; nothing to show");
        return Ok(());
    };

    let access = FlowAccess::fetch(&ctx.client, &event_id).await;
    tracing::info!(
        event = %event_id,
        mode = ?access.mode,
        anonymous_match = access.anonymous_match,
        registration = access.registration,
        self_registration = access.self_registration,
        "Event access"
    );

    let mut gallery = GalleryFlow::new(ctx.clone(), GallerySource::Highlights);
    let loaded = gallery.mount().await;
    match gallery.error() {
        Some(error) => tracing::warn!(event = %event_id, error, "Failed to load highlights"),
        None => tracing::info!(
            event = %event_id,
            loaded,
            total = gallery.total_count().unwrap_or(0),
            "Highlights loaded"
        ),
    }

    let mut flow = RegisteredFlow::new(ctx.clone());
    if flow.mount().await == RegisteredStep::Photos {
        tracing::info!(
            photos = flow.photos().len(),
            group = flow.group_id().unwrap_or("-"),
            "Restored matched photos"
        );
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("instasnap_client=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
