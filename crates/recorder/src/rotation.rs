// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size-based rotation of topic files
//!
//! A topic file that reached the threshold is renamed to the next free
//! numbered slot (`power` -> `power.3`). The slot number is one past the
//! highest suffix present in the directory, counting archived `.N.gz` files,
//! so numbers are never reused even after old slots are deleted.

use std::path::{Path, PathBuf};

use crate::archive::Archiver;
use crate::budget::ErrorBudget;
use crate::error::RotationError;

/// Result of a rotation that actually renamed the live file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// Where the live file was moved
    pub rotated_to: PathBuf,
    /// Slot that was handed to the archiver, if any
    pub archived: Option<PathBuf>,
}

/// Rotates topic files once they exceed a size threshold
#[derive(Debug, Clone)]
pub struct Rotator {
    threshold_kib: u64,
    budget: ErrorBudget,
    archiver: Archiver,
    verbose: bool,
}

impl Rotator {
    /// A threshold of zero disables rotation
    pub fn new(threshold_kib: u64, budget: ErrorBudget, archiver: Archiver) -> Self {
        Self {
            threshold_kib,
            budget,
            archiver,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Rotate `path` if it is at or over the threshold
    ///
    /// Every error is counted against the shared budget. Callers log it and
    /// carry on with the append.
    pub fn maybe_rotate(&self, path: &Path) -> Result<Option<Rotation>, RotationError> {
        if self.threshold_kib == 0 || self.budget.is_exhausted() {
            return Ok(None);
        }

        self.rotate(path).inspect_err(|_| {
            self.budget.record_failure();
        })
    }

    fn rotate(&self, path: &Path) -> Result<Option<Rotation>, RotationError> {
        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RotationError::Stat {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if !meta.is_file() {
            return Err(RotationError::NotAFile(path.to_path_buf()));
        }
        if meta.len() / 1024 < self.threshold_kib {
            return Ok(None);
        }

        let last = highest_slot(path)?;
        let rotated_to = slot_path(path, last + 1);

        verbose!(
            self.verbose,
            from = %path.display(),
            to = %rotated_to.display(),
            "rotating"
        );
        std::fs::rename(path, &rotated_to).map_err(|source| RotationError::Rename {
            from: path.to_path_buf(),
            to: rotated_to.clone(),
            source,
        })?;

        // The live file is the implicit slot zero; there is never a `.0`
        let mut archived = None;
        if last >= 1 {
            let previous = slot_path(path, last);
            if std::fs::metadata(&previous).is_ok_and(|m| m.is_file()) {
                self.archiver.archive(&previous);
                archived = Some(previous);
            }
        }

        Ok(Some(Rotation {
            rotated_to,
            archived,
        }))
    }
}

/// `path.N`
pub fn slot_path(path: &Path, slot: u64) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{slot}"));
    PathBuf::from(name)
}

/// Highest `N` among regular files named `<base>.N` or `<base>.N.gz`
fn highest_slot(path: &Path) -> Result<u64, RotationError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let Some(base) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(0);
    };

    let read_dir_err = |source| RotationError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let entries = std::fs::read_dir(dir).map_err(read_dir_err)?;

    let mut highest = 0;
    for entry in entries {
        let entry = entry.map_err(read_dir_err)?;
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        let name = entry.file_name();
        if let Some(slot) = name.to_str().and_then(|n| parse_slot(base, n)) {
            highest = highest.max(slot);
        }
    }
    Ok(highest)
}

/// Parse the slot number out of `<base>.N` or `<base>.N.gz`
fn parse_slot(base: &str, name: &str) -> Option<u64> {
    let suffix = name.strip_prefix(base)?.strip_prefix('.')?;
    let digits = suffix.strip_suffix(".gz").unwrap_or(suffix);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
