// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound event record

use chrono::{DateTime, TimeZone, Utc};

/// One message from the event source: timestamp, topic and opaque payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Event {
    pub fn new(
        timestamp: DateTime<Utc>,
        topic: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            timestamp,
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Event stamped with the current wall-clock time
    pub fn now(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Utc::now(), topic, payload)
    }

    /// Event stamped with milliseconds since the Unix epoch
    ///
    /// Returns `None` when the value is outside the representable range.
    pub fn try_from_millis(
        timestamp_ms: i64,
        topic: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Option<Self> {
        let timestamp = Utc.timestamp_millis_opt(timestamp_ms).single()?;
        Some(Self::new(timestamp, topic, payload))
    }

    /// Like [`Event::try_from_millis`], falling back to the epoch itself
    pub fn from_millis(
        timestamp_ms: i64,
        topic: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        let timestamp = Utc
            .timestamp_millis_opt(timestamp_ms)
            .single()
            .unwrap_or_default();
        Self::new(timestamp, topic, payload)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
