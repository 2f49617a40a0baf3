// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic filter patterns
//!
//! Shell-style globs matched against the whole sanitized topic, with no
//! special meaning for `/`:
//!   - `*` matches any run of characters, including `/`
//!   - `**` is the same as `*`; `home/**/power` needs at least one level
//!     between `home` and `power`
//!   - `?` matches a single character
//!   - `[abc]`, `[!abc]` character classes
//!   - `\` is a literal character, not an escape

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled set of topic filter patterns
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    patterns: Vec<Pattern>,
}

impl TopicFilter {
    /// Compile the configured patterns; an empty list accepts everything
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(&collapse_stars(p.as_ref())).map_err(|source| {
                    ConfigError::InvalidFilter {
                        pattern: p.as_ref().to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check whether a sanitized topic is eligible for storage
    pub fn accepts(&self, topic: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        self.patterns
            .iter()
            .any(|p| p.matches_with(topic, MATCH_OPTIONS))
    }
}

/// Fold every run of `*` into one
///
/// `glob` only accepts `**` as a whole path segment and gives it recursive
/// meaning; a single `*` already crosses `/` here.
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
