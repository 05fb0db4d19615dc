// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Which user journeys an event's photo permission allows.

use crate::models::{PhotoPermissionResponse, PhotoViewAccess};
use crate::services::InstaSnapClient;

/// Flow gates derived from the event's access mode.
///
/// With no permission on record every journey stays reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowAccess {
    pub mode: Option<PhotoViewAccess>,
    /// Anonymous quick-match page
    pub anonymous_match: bool,
    /// Registered login + match page
    pub registration: bool,
    /// "Register" entry point next to "Login"
    pub self_registration: bool,
}

impl Default for FlowAccess {
    fn default() -> Self {
        Self::from_mode(None)
    }
}

impl FlowAccess {
    pub fn from_mode(mode: Option<PhotoViewAccess>) -> Self {
        use PhotoViewAccess::*;

        Self {
            mode,
            anonymous_match: !matches!(mode, Some(Everyone | Attendees)),
            registration: mode != Some(Public),
            self_registration: mode != Some(Attendees),
        }
    }

    /// First permission record wins; an unsuccessful or empty response
    /// leaves every gate open.
    pub fn from_response(response: &PhotoPermissionResponse) -> Self {
        let mode = response
            .response
            .first()
            .filter(|_| response.success)
            .map(|p| p.photo_view_access);
        Self::from_mode(mode)
    }

    /// Fetch gates for an event. Failures are logged and fall back to
    /// the permissive default so pages stay usable.
    pub async fn fetch(client: &InstaSnapClient, event_id: &str) -> Self {
        match client.get_photo_permission(event_id).await {
            Ok(response) => Self::from_response(&response),
            Err(e) => {
                tracing::warn!(event = event_id, error = %e, "Failed to fetch photo permissions");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_gates() {
        let everyone = FlowAccess::from_mode(Some(PhotoViewAccess::Everyone));
        assert!(!everyone.anonymous_match);
        assert!(everyone.registration);
        assert!(everyone.self_registration);

        let attendees = FlowAccess::from_mode(Some(PhotoViewAccess::Attendees));
        assert!(!attendees.anonymous_match);
        assert!(attendees.registration);
        assert!(!attendees.self_registration);

        let public = FlowAccess::from_mode(Some(PhotoViewAccess::Public));
        assert!(public.anonymous_match);
        assert!(!public.registration);

        let unknown = FlowAccess::default();
        assert!(unknown.anonymous_match && unknown.registration && unknown.self_registration);
    }

    #[test]
    fn test_unsuccessful_response_is_permissive() {
        let response: PhotoPermissionResponse = serde_json::from_value(serde_json::json!({
            "success": false,
            "response": [{ "photoViewAccess": "Attendees" }]
        }))
        .unwrap();
        assert_eq!(FlowAccess::from_response(&response), FlowAccess::default());
    }
}
