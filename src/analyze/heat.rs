// src/analyze/heat.rs
//! Windowed heat detection.
//!
//! Step 1 marks every index whose surrounding average directed hostility
//! reaches the threshold. Step 2 demotes heated indices that do not look like
//! a two-party fight in the wider participation window.

use serde::Serialize;

use super::MessageAnnotation;
use crate::config::HeatConfig;
use crate::message::Direction;
use crate::rolling;

/// How a heated index was confirmed as a real argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Participation {
    /// Both sides sent at least one hostile message.
    Mutual,
    /// One side hostile, the other apologizing or de-escalating.
    AttackDefend,
    /// One side hostile several times, the other curt or calming.
    OneSidedTirade,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatMap {
    /// Average directed hostility in the heat window, per index.
    pub averages: Vec<f32>,
    /// Step 1 result (before participation).
    pub heated: Vec<bool>,
    /// `Some` for indices that survived the participation check.
    pub confirmed: Vec<Option<Participation>>,
}

impl HeatMap {
    pub fn is_argument(&self, i: usize) -> bool {
        self.confirmed.get(i).map(Option::is_some).unwrap_or(false)
    }

    pub fn flags(&self) -> Vec<bool> {
        self.confirmed.iter().map(Option::is_some).collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SideTally {
    hostile: usize,
    calming: usize,
    curt: usize,
}

#[derive(Debug, Clone)]
pub struct WindowedHeatDetector {
    cfg: HeatConfig,
}

impl Default for WindowedHeatDetector {
    fn default() -> Self {
        Self::new(HeatConfig::default())
    }
}

impl WindowedHeatDetector {
    pub fn new(cfg: HeatConfig) -> Self {
        Self { cfg }
    }

    pub fn detect(&self, anns: &[MessageAnnotation]) -> HeatMap {
        let n = anns.len();
        let hostility: Vec<u8> = anns.iter().map(|a| a.hostility).collect();

        let averages: Vec<f32> = (0..n)
            .map(|i| {
                let w = rolling::half_open(i, self.cfg.window_before, self.cfg.window_after, n);
                rolling::mean_over(&hostility, w)
            })
            .collect();
        let heated: Vec<bool> = averages.iter().map(|&a| a >= self.cfg.threshold).collect();

        let confirmed = (0..n)
            .map(|i| {
                if heated[i] {
                    self.participation(anns, i)
                } else {
                    None
                }
            })
            .collect();

        HeatMap {
            averages,
            heated,
            confirmed,
        }
    }

    fn participation(&self, anns: &[MessageAnnotation], i: usize) -> Option<Participation> {
        let w = rolling::half_open(
            i,
            self.cfg.participation_before,
            self.cfg.participation_after,
            anns.len(),
        );
        let mut sent = SideTally::default();
        let mut received = SideTally::default();
        for a in &anns[w] {
            let side = match a.direction {
                Direction::Sent => &mut sent,
                Direction::Received => &mut received,
            };
            if a.hostility > 0 {
                side.hostile += 1;
            }
            if a.flags.is_calming() {
                side.calming += 1;
            }
            if a.flags.is_curt_reply {
                side.curt += 1;
            }
        }

        if sent.hostile > 0 && received.hostile > 0 {
            return Some(Participation::Mutual);
        }
        let attack_defend = (sent.hostile > 0 && received.calming > 0)
            || (received.hostile > 0 && sent.calming > 0);
        if attack_defend {
            return Some(Participation::AttackDefend);
        }
        let tirade = |attacker: &SideTally, other: &SideTally| {
            attacker.hostile >= self.cfg.tirade_min_hostile
                && (other.curt >= self.cfg.tirade_min_curt || other.calming > 0)
        };
        if tirade(&sent, &received) || tirade(&received, &sent) {
            return Some(Participation::OneSidedTirade);
        }
        None
    }
}
