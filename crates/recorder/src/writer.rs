// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record line writer
//!
//! Each stored change becomes one line:
//!
//! ```text
//! 1577840400.10,<payload>
//! ```
//!
//! The timestamp is seconds since the epoch, right-aligned to 13 columns with
//! two decimals. Newline bytes in the payload are written as the two bytes
//! `\n`; nothing else is escaped, so a payload that already contains a
//! literal backslash-n does not survive [`unescape_newlines`] unchanged.

use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::WriteError;
use crate::event::Event;

/// Create the directories leading up to a topic file
pub fn create_parent(path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Append one formatted record line for `event` to `path`
///
/// The parent directory must exist (see [`create_parent`]). The file handle
/// is closed before returning, so the number of open descriptors does not
/// grow with the number of topics.
pub fn append(path: &Path, event: &Event) -> Result<(), WriteError> {
    let line = format_line(event);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| WriteError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let written = file.write(&line).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    if written != line.len() {
        return Err(WriteError::ShortWrite {
            path: path.to_path_buf(),
            written,
            expected: line.len(),
        });
    }

    Ok(())
}

/// Render the full record line, trailing newline included
pub fn format_line(event: &Event) -> Vec<u8> {
    let seconds = event.timestamp_millis() as f64 * 1e-3;
    let payload = escape_newlines(&event.payload);

    let mut line = format!("{:13.2},", seconds).into_bytes();
    line.reserve(payload.len() + 1);
    line.extend_from_slice(&payload);
    line.push(b'\n');
    line
}

/// Replace every `\n` byte with the two bytes `\` `n`
pub fn escape_newlines(payload: &[u8]) -> Cow<'_, [u8]> {
    if !payload.contains(&b'\n') {
        return Cow::Borrowed(payload);
    }

    let mut escaped = Vec::with_capacity(payload.len() * 2);
    for &b in payload {
        if b == b'\n' {
            escaped.extend_from_slice(b"\\n");
        } else {
            escaped.push(b);
        }
    }
    Cow::Owned(escaped)
}

/// Reverse [`escape_newlines`]
pub fn unescape_newlines(stored: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(stored.len());
    let mut bytes = stored.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\\' && bytes.peek() == Some(&b'n') {
            bytes.next();
            payload.push(b'\n');
        } else {
            payload.push(b);
        }
    }
    payload
}

/// Split a stored line into its timestamp (seconds) and original payload
///
/// Returns `None` for lines without a comma or with an unparsable timestamp.
pub fn parse_line(line: &[u8]) -> Option<(f64, Vec<u8>)> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let comma = line.iter().position(|&b| b == b',')?;
    let (head, rest) = line.split_at(comma);

    let seconds = std::str::from_utf8(head).ok()?.trim().parse::<f64>().ok()?;
    Some((seconds, unescape_newlines(&rest[1..])))
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
