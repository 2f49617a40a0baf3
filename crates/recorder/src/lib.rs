// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tk-recorder: append-only per-topic file store
//!
//! This crate provides:
//! - Topic sanitizing and glob filtering
//! - Change deduplication against the last stored payload
//! - Size-based rotation into numbered slots
//! - Background gzip of rotated files behind a shared failure budget

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

/// Log at info when verbose, debug otherwise
macro_rules! verbose {
    ($on:expr, $($arg:tt)+) => {
        if $on {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

pub mod archive;
pub mod budget;
pub mod cache;
pub mod error;
pub mod event;
pub mod filter;
pub mod recorder;
pub mod rotation;
pub mod settings;
pub mod topic;
pub mod writer;

pub use archive::Archiver;
pub use budget::{ErrorBudget, MAX_BACKGROUND_FAILURES};
pub use cache::ChangeCache;
pub use error::{ArchiveError, ConfigError, RecorderError, RotationError, TopicError, WriteError};
pub use event::Event;
pub use filter::TopicFilter;
pub use recorder::{Recorder, RecorderStats, WriteOutcome};
pub use rotation::{Rotation, Rotator};
pub use settings::Settings;
