// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure budget for rotation and archiving
//!
//! Rotation runs on the write path and archiving on detached threads; both
//! share one counter. Once it passes [`MAX_BACKGROUND_FAILURES`] both
//! subsystems stop trying for the rest of the session, which keeps a broken
//! disk from flooding the log. Plain appends are unaffected.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Number of failures tolerated before rotation and archiving go quiet
pub const MAX_BACKGROUND_FAILURES: u32 = 20;

/// Shared, lock-free failure counter
#[derive(Debug, Clone, Default)]
pub struct ErrorBudget {
    failures: Arc<AtomicU32>,
}

impl ErrorBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one failure, returning the new total
    pub fn record_failure(&self) -> u32 {
        let total = self.failures.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        if total == MAX_BACKGROUND_FAILURES + 1 {
            tracing::warn!(
                failures = total,
                "too many rotation/archive failures, disabling both for this session"
            );
        }
        total
    }

    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn is_exhausted(&self) -> bool {
        self.failures() > MAX_BACKGROUND_FAILURES
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
