// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorder error taxonomy
//!
//! Only [`ConfigError`], [`TopicError`] and [`WriteError`] ever reach the
//! caller of [`crate::Recorder::write`]. Rotation and archive failures are
//! absorbed behind the error budget and only show up in logs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid recorder configuration, reported by `open`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("output root directory of the recorder is not set")]
    RootNotSet,

    #[error("data root directory does not exist or is not accessible: {path}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("data root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid topic filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// A topic that cannot be mapped onto a safe relative path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    #[error("invalid topic path '{0}': empty")]
    Empty(String),

    #[error("invalid topic path '{0}': contains '..'")]
    Traversal(String),

    #[error("invalid topic path '{0}': contains non-printable characters")]
    NonPrintable(String),
}

/// Failure to append a record line
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create topic directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open topic file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write topic file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("short write to topic file '{path}': {written} of {expected} bytes")]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },
}

/// Failure while rotating a topic file
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("failed to stat record file '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("record file unexpectedly not a file: {0}")]
    NotAFile(PathBuf),

    #[error("reading directory for record rotation failed: {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("renaming record file failed {from} -> {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while compressing a rotated file
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to spawn archive worker for '{path}': {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to compress '{path}': {source}")]
    Compress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove archived original '{path}': {source}")]
    RemoveOriginal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors returned from a single `write` call
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Validation(#[from] TopicError),

    #[error(transparent)]
    Io(#[from] WriteError),
}
