// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorder state machine: Closed -> Open -> Closed
//!
//! Per event: sanitize, filter, drop if unchanged, create directories,
//! rotate, append, remember.
//! `write` takes `&mut self`; callers with several producers funnel them
//! through one consumer instead of sharing the recorder.

use std::path::Path;

use tracing::{info, warn};

use crate::archive::Archiver;
use crate::budget::ErrorBudget;
use crate::cache::ChangeCache;
use crate::error::{ConfigError, RecorderError};
use crate::event::Event;
use crate::filter::TopicFilter;
use crate::rotation::Rotator;
use crate::settings::Settings;
use crate::topic;
use crate::writer;

/// What `write` did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A line was appended
    Stored,
    /// Same payload as the last stored one, nothing written
    Unchanged,
    /// Topic excluded by the configured filters, nothing written
    Filtered,
}

/// Counters for the current open session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub stored: u64,
    pub unchanged: u64,
    pub filtered: u64,
    pub rejected: u64,
    pub background_failures: u32,
}

/// State that only exists while the recorder is open
struct Session {
    filter: TopicFilter,
    cache: ChangeCache,
    rotator: Rotator,
    budget: ErrorBudget,
    stats: RecorderStats,
}

/// Persists topic events into an append-only per-topic file tree
pub struct Recorder {
    settings: Settings,
    session: Option<Session>,
}

impl Recorder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            session: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Validate the root directory and start a fresh session
    pub fn open(&mut self) -> Result<(), ConfigError> {
        let root = &self.settings.root_dir;
        if root.as_os_str().is_empty() {
            return Err(ConfigError::RootNotSet);
        }
        let meta = std::fs::metadata(root).map_err(|source| ConfigError::RootUnavailable {
            path: root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ConfigError::NotADirectory(root.clone()));
        }

        let filter = TopicFilter::new(&self.settings.filters)?;
        let budget = ErrorBudget::new();
        let archiver = Archiver::new(self.settings.gzip_rotated, budget.clone())
            .with_verbose(self.settings.verbose);
        let rotator = Rotator::new(self.settings.rotate_at_kib, budget.clone(), archiver)
            .with_verbose(self.settings.verbose);

        self.session = Some(Session {
            filter,
            cache: ChangeCache::new(),
            rotator,
            budget,
            stats: RecorderStats::default(),
        });

        info!(
            root = %root.display(),
            rotate_at_kib = self.settings.rotate_at_kib,
            gzip_rotated = self.settings.gzip_rotated,
            filters = self.settings.filters.len(),
            "recorder opened"
        );
        Ok(())
    }

    /// Drop the change cache and return to the closed state
    ///
    /// Archive threads that are still running are left to finish on their own.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                stored = session.stats.stored,
                unchanged = session.stats.unchanged,
                filtered = session.stats.filtered,
                rejected = session.stats.rejected,
                "recorder closed"
            );
        }
    }

    /// Store `event` if its topic is valid, accepted and changed
    ///
    /// # Panics
    ///
    /// Panics if the recorder is not open.
    pub fn write(&mut self, event: &Event) -> Result<WriteOutcome, RecorderError> {
        let verbose = self.settings.verbose;
        let root = &self.settings.root_dir;
        let session = match self.session.as_mut() {
            Some(session) => session,
            #[allow(clippy::panic)]
            None => panic!("recorder written while not open"),
        };

        let result = session.store(root, event, verbose);
        match &result {
            Ok(WriteOutcome::Stored) => session.stats.stored += 1,
            Ok(WriteOutcome::Unchanged) => session.stats.unchanged += 1,
            Ok(WriteOutcome::Filtered) => session.stats.filtered += 1,
            Err(_) => session.stats.rejected += 1,
        }
        result
    }

    /// Counters for the current session; all zero while closed
    pub fn stats(&self) -> RecorderStats {
        match &self.session {
            Some(session) => RecorderStats {
                background_failures: session.budget.failures(),
                ..session.stats
            },
            None => RecorderStats::default(),
        }
    }

    /// Rotation and archive failures counted in the current session
    pub fn background_failures(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.budget.failures())
    }
}

impl Session {
    fn store(
        &mut self,
        root: &Path,
        event: &Event,
        verbose: bool,
    ) -> Result<WriteOutcome, RecorderError> {
        let topic = topic::sanitize(&event.topic)?;

        if !self.filter.accepts(topic) {
            verbose!(verbose, topic, "topic filtered out");
            return Ok(WriteOutcome::Filtered);
        }

        if self.cache.should_skip(topic, &event.payload) {
            verbose!(verbose, topic, "topic unchanged");
            return Ok(WriteOutcome::Unchanged);
        }

        let path = root.join(topic);
        writer::create_parent(&path)?;

        if let Err(e) = self.rotator.maybe_rotate(&path) {
            warn!(error = %e, failures = self.budget.failures(), "rotation failed");
        }

        writer::append(&path, event)?;
        self.cache.record(topic, event);
        Ok(WriteOutcome::Stored)
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
