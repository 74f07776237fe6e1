// src/analyze/segment.rs
//! Run-length segmentation of heat flags into episodes, then merge and dedup.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::deescalation::DeEscalationOutcome;
use super::initiator::{Attribution, TriggerBasis};
use super::AnnotatedDay;
use crate::config::EpisodeConfig;
use crate::message::{excerpt, Direction, Message};

const MINUTE_MS: i64 = 60_000;

/// Who started an argument block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Initiator {
    Sent,
    Received,
    Unclear,
}

impl From<Direction> for Initiator {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Sent => Initiator::Sent,
            Direction::Received => Initiator::Received,
        }
    }
}

impl From<Option<Direction>> for Initiator {
    fn from(d: Option<Direction>) -> Self {
        d.map(Initiator::from).unwrap_or(Initiator::Unclear)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub index: usize,
    pub timestamp: i64,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeEscalationAttempt {
    pub index: usize,
    pub direction: Direction,
    pub timestamp: i64,
    pub excerpt: String,
}

/// A contiguous argument or calm block, `[start, end)` over the day's messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub start: usize,
    pub end: usize,
    pub is_argument: bool,
    pub initiator: Option<Initiator>,
    pub trigger: Option<Trigger>,
    pub trigger_index: Option<usize>,
    pub trigger_basis: Option<TriggerBasis>,
    pub deescalation_attempts: Vec<DeEscalationAttempt>,
    pub persistence_minutes: f64,
    pub refused_by: Option<Direction>,
    pub upset_topics_sent: Vec<String>,
    pub upset_topics_received: Vec<String>,
}

impl Episode {
    fn block(start: usize, end: usize, is_argument: bool) -> Self {
        Self {
            start,
            end,
            is_argument,
            initiator: None,
            trigger: None,
            trigger_index: None,
            trigger_basis: None,
            deescalation_attempts: Vec::new(),
            persistence_minutes: 0.0,
            refused_by: None,
            upset_topics_sent: Vec::new(),
            upset_topics_received: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn apply_attribution(
        &mut self,
        day: &AnnotatedDay<'_>,
        attribution: &Attribution,
        excerpt_chars: usize,
    ) {
        let i = attribution.trigger_index;
        self.initiator = Some(Initiator::from(attribution.direction));
        self.trigger_index = Some(i);
        self.trigger_basis = Some(attribution.basis);
        self.trigger = day.messages.get(i).map(|m| Trigger {
            index: i,
            timestamp: m.timestamp,
            excerpt: excerpt(m.text(), excerpt_chars),
        });
    }

    pub fn apply_deescalation(&mut self, outcome: DeEscalationOutcome) {
        self.deescalation_attempts = outcome.attempts;
        self.persistence_minutes = outcome.persistence_minutes;
        self.refused_by = outcome.refused_by;
    }

    /// Fold a later argument block (and the calm gap before it) into this one.
    fn absorb(&mut self, later: Episode) {
        self.end = later.end;
        self.deescalation_attempts.extend(later.deescalation_attempts);
        if later.persistence_minutes > self.persistence_minutes {
            self.persistence_minutes = later.persistence_minutes;
            self.refused_by = later.refused_by;
        }
        union_into(&mut self.upset_topics_sent, later.upset_topics_sent);
        union_into(&mut self.upset_topics_received, later.upset_topics_received);
    }
}

fn union_into(into: &mut Vec<String>, from: Vec<String>) {
    for t in from {
        if !into.contains(&t) {
            into.push(t);
        }
    }
}

#[derive(Debug, Clone)]
pub struct EpisodeSegmenter {
    cfg: EpisodeConfig,
}

impl Default for EpisodeSegmenter {
    fn default() -> Self {
        Self::new(EpisodeConfig::default())
    }
}

impl EpisodeSegmenter {
    pub fn new(cfg: EpisodeConfig) -> Self {
        Self { cfg }
    }

    pub fn trigger_excerpt_chars(&self) -> usize {
        self.cfg.trigger_excerpt_chars
    }

    /// Maximal runs of equal flags. Exactly partitions `0..flags.len()`.
    pub fn segment(&self, flags: &[bool]) -> Vec<Episode> {
        let mut out = Vec::new();
        let mut start = 0;
        for i in 1..=flags.len() {
            if i == flags.len() || flags[i] != flags[start] {
                out.push(Episode::block(start, i, flags[start]));
                start = i;
            }
        }
        out
    }

    /// Collapse argument blocks separated by a short calm gap (or none).
    /// Returns the episodes and the number of merges performed.
    pub fn merge(&self, episodes: Vec<Episode>, messages: &[Message]) -> (Vec<Episode>, usize) {
        let gap_ms = self.cfg.merge_gap_minutes.saturating_mul(MINUTE_MS);
        let mut out: Vec<Episode> = Vec::with_capacity(episodes.len());
        let mut merged = 0;

        for ep in episodes {
            if ep.is_argument {
                if let Some(prev) = previous_argument(&out) {
                    let last_ts = messages[out[prev].end - 1].timestamp;
                    let next_ts = messages[ep.start].timestamp;
                    if next_ts - last_ts <= gap_ms {
                        out.truncate(prev + 1);
                        out[prev].absorb(ep);
                        merged += 1;
                        continue;
                    }
                }
            }
            out.push(ep);
        }

        if merged > 0 {
            debug!(merged, "argument blocks merged");
        }
        (out, merged)
    }

    /// Drop argument blocks whose trigger repeats an earlier one.
    pub fn dedup(&self, episodes: Vec<Episode>, messages: &[Message]) -> (Vec<Episode>, usize) {
        let mut seen: HashSet<(i64, String)> = HashSet::new();
        let mut dropped = 0;
        let out = episodes
            .into_iter()
            .filter(|ep| {
                if !ep.is_argument {
                    return true;
                }
                let i = ep.trigger_index.unwrap_or(ep.start);
                let Some(m) = messages.get(i) else {
                    return true;
                };
                let key = (m.timestamp, excerpt(m.text(), self.cfg.dedup_prefix_chars));
                if seen.insert(key) {
                    true
                } else {
                    dropped += 1;
                    false
                }
            })
            .collect();
        (out, dropped)
    }
}

/// Index in `out` of the argument block a new argument could merge into:
/// the last element, or the one before a trailing calm block.
fn previous_argument(out: &[Episode]) -> Option<usize> {
    match out {
        [.., prev, calm] if prev.is_argument && !calm.is_argument => Some(out.len() - 2),
        [.., prev] if prev.is_argument => Some(out.len() - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages_at(minutes: &[i64]) -> Vec<Message> {
        minutes
            .iter()
            .map(|&m| Message::new(m * MINUTE_MS, Direction::Sent, format!("m{m}")))
            .collect()
    }

    fn arg(start: usize, end: usize) -> Episode {
        Episode {
            trigger_index: Some(start),
            initiator: Some(Initiator::Unclear),
            ..Episode::block(start, end, true)
        }
    }

    #[test]
    fn segment_partitions_exactly() {
        let s = EpisodeSegmenter::default();
        let eps = s.segment(&[false, true, true, false, false, true]);
        let ranges: Vec<_> = eps.iter().map(|e| (e.start, e.end, e.is_argument)).collect();
        assert_eq!(
            ranges,
            vec![(0, 1, false), (1, 3, true), (3, 5, false), (5, 6, true)]
        );
        assert!(s.segment(&[]).is_empty());
    }

    #[test]
    fn merges_across_a_short_gap_only() {
        let s = EpisodeSegmenter::default();
        // args [0,2) and [3,5); calm message between
        let close = messages_at(&[0, 1, 5, 11, 12]);
        let eps = vec![arg(0, 2), Episode::block(2, 3, false), arg(3, 5)];
        let (out, merged) = s.merge(eps.clone(), &close);
        assert_eq!(merged, 1);
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].start, out[0].end), (0, 5));

        let far = messages_at(&[0, 1, 5, 21, 22]);
        let (out, merged) = s.merge(eps, &far);
        assert_eq!(merged, 0);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn merge_keeps_earlier_trigger_and_larger_persistence() {
        let s = EpisodeSegmenter::default();
        let msgs = messages_at(&[0, 1, 2, 3]);
        let mut a = arg(0, 1);
        a.persistence_minutes = 2.0;
        a.refused_by = Some(Direction::Sent);
        a.upset_topics_sent = vec!["money".into()];
        let mut b = arg(2, 4);
        b.initiator = Some(Initiator::Received);
        b.persistence_minutes = 5.5;
        b.refused_by = Some(Direction::Received);
        b.upset_topics_sent = vec!["money".into(), "work".into()];
        let (out, _) = s.merge(vec![a, Episode::block(1, 2, false), b], &msgs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].trigger_index, Some(0));
        assert_eq!(out[0].initiator, Some(Initiator::Unclear));
        assert_eq!(out[0].persistence_minutes, 5.5);
        assert_eq!(out[0].refused_by, Some(Direction::Received));
        assert_eq!(out[0].upset_topics_sent, vec!["money", "work"]);
    }

    #[test]
    fn dedup_drops_repeated_triggers() {
        let s = EpisodeSegmenter::default();
        let mut msgs = messages_at(&[0, 1, 60, 61]);
        msgs[2] = Message::new(0, Direction::Sent, "m0");
        let eps = vec![arg(0, 2), arg(2, 4)];
        let (out, dropped) = s.dedup(eps, &msgs);
        assert_eq!(dropped, 1);
        assert_eq!(out.len(), 1);
    }
}
