// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API client and page-flow controllers.

pub mod access;
pub mod anonymous_flow;
pub mod api;
pub mod gallery_flow;
pub mod registered_flow;

pub use access::FlowAccess;
pub use anonymous_flow::{AnonymousFlow, AnonymousStep};
pub use api::InstaSnapClient;
pub use gallery_flow::{GalleryFlow, GallerySource};
pub use registered_flow::{RegisterDetails, RegisteredFlow, RegisteredStep};
