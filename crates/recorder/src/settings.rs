// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorder settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Recorder configuration, read once at open
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory of the topic file tree
    #[serde(rename = "rootdir")]
    pub root_dir: PathBuf,
    /// Rotate a topic file once it reaches this many KiB; 0 disables
    #[serde(rename = "rotate_at_size")]
    pub rotate_at_kib: u64,
    /// Gzip rotated files in the background
    pub gzip_rotated: bool,
    /// Glob patterns a topic must match to be stored; empty stores everything
    pub filters: Vec<String>,
    /// Log every routine decision at info level
    #[serde(skip)]
    pub verbose: bool,
}

impl Settings {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotate_at_kib: u64, gzip_rotated: bool) -> Self {
        self.rotate_at_kib = rotate_at_kib;
        self.gzip_rotated = gzip_rotated;
        self
    }

    pub fn with_filters<S: Into<String>>(mut self, filters: impl IntoIterator<Item = S>) -> Self {
        self.filters = filters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
