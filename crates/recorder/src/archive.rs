// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background gzip of rotated topic files
//!
//! Compression runs on a detached thread and is never awaited. The writer
//! only learns about failures through the shared [`ErrorBudget`].

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::warn;

use crate::budget::ErrorBudget;
use crate::error::ArchiveError;

/// Fire-and-forget compressor for rotated files
#[derive(Debug, Clone)]
pub struct Archiver {
    enabled: bool,
    budget: ErrorBudget,
    verbose: bool,
}

impl Archiver {
    pub fn new(enabled: bool, budget: ErrorBudget) -> Self {
        Self {
            enabled,
            budget,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Compress `path` to `path.gz` in the background and remove the original
    pub fn archive(&self, path: &Path) {
        if !self.enabled || self.budget.is_exhausted() {
            return;
        }

        verbose!(self.verbose, path = %path.display(), "archiving");

        let path = path.to_path_buf();
        let budget = self.budget.clone();
        let spawned = std::thread::Builder::new()
            .name("tk-archive".to_string())
            .spawn({
                let path = path.clone();
                move || {
                    if let Err(e) = gzip_file(&path) {
                        warn!(error = %e, "archiving rotated file failed");
                        budget.record_failure();
                    }
                }
            });

        if let Err(source) = spawned {
            let e = ArchiveError::Spawn { path, source };
            warn!(error = %e, "archiving rotated file failed");
            self.budget.record_failure();
        }
    }
}

/// `path.gz`
pub fn archive_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` at best compression into `path.gz`, then delete `path`
///
/// A partial `.gz` is removed on failure; the original stays in place.
pub fn gzip_file(path: &Path) -> Result<PathBuf, ArchiveError> {
    let target = archive_path(path);

    if let Err(source) = compress(path, &target) {
        let _ = std::fs::remove_file(&target);
        return Err(ArchiveError::Compress {
            path: path.to_path_buf(),
            source,
        });
    }

    std::fs::remove_file(path).map_err(|source| ArchiveError::RemoveOriginal {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(target)
}

fn compress(source: &Path, target: &Path) -> io::Result<()> {
    let mut input = BufReader::new(File::open(source)?);
    let output = File::create(target)?;

    let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::best());
    io::copy(&mut input, &mut encoder)?;
    let mut output = encoder.finish()?;
    output.flush()?;
    output.get_ref().sync_all()
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
