// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use instasnap_client::error::AppError;

#[test]
fn test_is_unknown_user_matches() {
    let err = AppError::Api("User not registered for this event".to_string());
    assert!(err.is_unknown_user());

    let err = AppError::Api("USER NOT FOUND".to_string());
    assert!(err.is_unknown_user());

    let err = AppError::Api("No user with that mobile".to_string());
    assert!(err.is_unknown_user());

    for marker in AppError::UNKNOWN_USER_MARKERS {
        assert!(AppError::Api(marker.to_string()).is_unknown_user());
    }
}

#[test]
fn test_is_unknown_user_no_match() {
    let err = AppError::Api("Too many OTP requests".to_string());
    assert!(!err.is_unknown_user());

    let err = AppError::Network("user not found".to_string());
    assert!(!err.is_unknown_user());

    let err = AppError::Validation("Please upload an image file".to_string());
    assert!(!err.is_unknown_user());
}

#[test]
fn test_is_already_registered() {
    assert!(AppError::Api("Mobile Already Registered".to_string()).is_already_registered());
    assert!(!AppError::Api("Registration failed".to_string()).is_already_registered());
    assert!(!AppError::Decode("already registered".to_string()).is_already_registered());
}

#[test]
fn test_user_facing_messages_are_verbatim() {
    assert_eq!(AppError::Api("upstream down".to_string()).to_string(), "upstream down");
    assert_eq!(
        AppError::Validation("File size must be less than 10MB".to_string()).to_string(),
        "File size must be less than 10MB"
    );
    assert_eq!(
        AppError::Network("connection refused".to_string()).to_string(),
        "Network error: connection refused"
    );
}
