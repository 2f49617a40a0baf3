// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Last-stored value per topic, used to drop unchanged payloads

use std::collections::HashMap;

use crate::event::Event;

/// Change cache keyed by sanitized topic
///
/// Entries reflect the payload last durably appended for a topic; filtered or
/// failed writes never touch it. Comparison is strict byte equality.
#[derive(Debug, Default)]
pub struct ChangeCache {
    entries: HashMap<String, Event>,
}

impl ChangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the last stored payload for `topic` equals `payload`
    pub fn should_skip(&self, topic: &str, payload: &[u8]) -> bool {
        self.entries
            .get(topic)
            .is_some_and(|last| last.payload == payload)
    }

    /// Remember `event` as the last stored value for `topic`
    pub fn record(&mut self, topic: &str, event: &Event) {
        match self.entries.get_mut(topic) {
            Some(entry) => entry.clone_from(event),
            None => {
                self.entries.insert(topic.to_string(), event.clone());
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, topic: &str) -> Option<&Event> {
        self.entries.get(topic)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
