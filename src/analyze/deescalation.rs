// src/analyze/deescalation.rs
//! Calming attempts inside an argument block and how long the other side kept
//! going after the first one.

use tracing::debug;

use super::segment::DeEscalationAttempt;
use super::AnnotatedDay;
use crate::config::EpisodeConfig;
use crate::message::{excerpt, Direction};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeEscalationOutcome {
    pub attempts: Vec<DeEscalationAttempt>,
    /// Minutes from the first attempt to the other side's last hostile message.
    pub persistence_minutes: f64,
    pub refused_by: Option<Direction>,
}

#[derive(Debug, Clone)]
pub struct DeEscalationTracker {
    lookahead: usize,
    excerpt_chars: usize,
}

impl Default for DeEscalationTracker {
    fn default() -> Self {
        Self::new(&EpisodeConfig::default())
    }
}

impl DeEscalationTracker {
    pub fn new(cfg: &EpisodeConfig) -> Self {
        Self {
            lookahead: cfg.deescalation_lookahead,
            excerpt_chars: cfg.attempt_excerpt_chars,
        }
    }

    pub fn track(&self, day: &AnnotatedDay<'_>, start: usize, end: usize) -> DeEscalationOutcome {
        let anns = &day.annotations;
        let n = anns.len();
        let end = end.min(n);

        let attempts: Vec<DeEscalationAttempt> = (start..end)
            .filter(|&i| anns[i].flags.is_calming())
            .map(|i| {
                let m = &day.messages[i];
                DeEscalationAttempt {
                    index: i,
                    direction: m.direction,
                    timestamp: m.timestamp,
                    excerpt: excerpt(m.text(), self.excerpt_chars),
                }
            })
            .collect();

        let Some(first) = attempts.first() else {
            return DeEscalationOutcome::default();
        };
        let other = first.direction.opposite();
        let attempt_ts = first.timestamp;

        let mut last_hostile = None;
        for i in first.index + 1..end {
            if anns[i].direction == other && anns[i].hostility >= 1 {
                last_hostile = Some(i);
            }
        }
        for i in end..n.min(end.saturating_add(self.lookahead)) {
            if anns[i].direction != other {
                continue;
            }
            if anns[i].hostility == 0 {
                break;
            }
            last_hostile = Some(i);
        }

        let mut outcome = DeEscalationOutcome {
            attempts,
            ..Default::default()
        };
        if let Some(i) = last_hostile {
            let last_ts = day.messages[i].timestamp;
            if last_ts > attempt_ts {
                let minutes = (last_ts - attempt_ts) as f64 / 60_000.0;
                outcome.persistence_minutes = (minutes * 10.0).round() / 10.0;
                outcome.refused_by = Some(other);
                debug!(
                    refused_by = %other,
                    persistence_minutes = outcome.persistence_minutes,
                    "de-escalation refused"
                );
            }
        }
        outcome
    }
}
