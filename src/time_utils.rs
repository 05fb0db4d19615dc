// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for wall-clock time.
//!
//! Cache expiry reads the time through [`Clock`] so tests can move time
//! forward without sleeping.

use chrono::{TimeDelta, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time in Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for simulated time.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: TimeDelta) {
        self.now.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Whether an entry written at `written_at` is older than `ttl` at `now`.
///
/// Exactly `ttl` old is still fresh. Ages beyond the `i64` range saturate,
/// so a nonsense timestamp reads as expired rather than overflowing.
pub fn is_expired(written_at: i64, now: i64, ttl: TimeDelta) -> bool {
    now.saturating_sub(written_at) > ttl.num_milliseconds()
}
