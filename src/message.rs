// src/message.rs
//! Normalized message stream: the input contract produced by ingestion
//! collaborators (SMS backups, chat exports, CSV/JSON) and consumed by the
//! analysis pipeline.
//!
//! Messages are immutable once loaded. Everything derived from them lives in
//! index-aligned side tables (see `analyze::MessageAnnotation`).

use serde::{Deserialize, Serialize};

/// Which party authored a message, relative to the case owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Sent => Direction::Received,
            Direction::Received => Direction::Sent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One text message. `body` is `None` for attachments / empty payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unix epoch in milliseconds.
    #[serde(alias = "timestamp_ms")]
    pub timestamp: i64,
    pub direction: Direction,
    #[serde(default)]
    pub body: Option<String>,
}

impl Message {
    pub fn new(timestamp: i64, direction: Direction, body: impl Into<String>) -> Self {
        Self {
            timestamp,
            direction,
            body: Some(body.into()),
        }
    }

    /// Body text, or `""` when absent.
    #[inline]
    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Incoming,
    Outgoing,
    Missed,
}

/// A phone/voice call. Only feeds the per-day aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(alias = "timestamp_ms")]
    pub timestamp: i64,
    #[serde(alias = "direction")]
    pub kind: CallKind,
    #[serde(default, alias = "duration")]
    pub duration_secs: u64,
}

/// Stable chronological sort. Ties keep arrival order, which every window and
/// segmentation stage relies on.
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by_key(|m| m.timestamp);
}

/// Lowercased text with typographic quotes and dashes folded to ASCII, so the
/// `.?` apostrophe slots in the lexicons see a single character.
pub fn normalize_text(s: &str) -> String {
    s.replace(['\u{2018}', '\u{2019}', '\u{02BC}'], "'")
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2013}', '\u{2014}'], "-")
        .to_lowercase()
}

/// First `max` characters (not bytes) of `s`.
pub fn excerpt(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
