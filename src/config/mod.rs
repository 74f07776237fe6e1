// src/config/mod.rs
//! Analysis configuration: every window size and threshold the pipeline uses,
//! plus the per-case settings (party labels, date range, UTC offset).
//!
//! Loaded from TOML (`$ANALYSIS_CONFIG_PATH` or `config/analysis.toml`).
//! A missing file means defaults; out-of-range values are sanitized instead
//! of rejected.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const ENV_ANALYSIS_CONFIG_PATH: &str = "ANALYSIS_CONFIG_PATH";
pub const ENV_ANALYSIS_HEAT_THRESHOLD: &str = "ANALYSIS_HEAT_THRESHOLD";
pub const DEFAULT_ANALYSIS_CONFIG_PATH: &str = "config/analysis.toml";

pub const DEFAULT_HEAT_THRESHOLD: f32 = 0.3;

/// Heat + participation windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConfig {
    /// Messages before `i` in the heat window `[i - before, i + after)`.
    pub window_before: usize,
    pub window_after: usize,
    /// Average directed hostility at which an index counts as heated.
    pub threshold: f32,
    pub participation_before: usize,
    pub participation_after: usize,
    /// One-sided tirade: hostile messages needed from the attacker...
    pub tirade_min_hostile: usize,
    /// ...and curt replies needed from the other side.
    pub tirade_min_curt: usize,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            window_before: 8,
            window_after: 8,
            threshold: DEFAULT_HEAT_THRESHOLD,
            participation_before: 16,
            participation_after: 16,
            tirade_min_hostile: 3,
            tirade_min_curt: 2,
        }
    }
}

/// Windows for the context filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Inclusive radius for joke context.
    pub joke_radius: usize,
    pub joke_min_messages: usize,
    /// Inclusive radius for banter.
    pub banter_radius: usize,
    /// Half-open `[i - before, i + after)` stressor window.
    pub stressor_before: usize,
    pub stressor_after: usize,
    pub stressor_min_categories: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            joke_radius: 3,
            joke_min_messages: 2,
            banter_radius: 4,
            stressor_before: 10,
            stressor_after: 10,
            stressor_min_categories: 2,
        }
    }
}

/// Episode segmentation, attribution and de-escalation tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub merge_gap_minutes: i64,
    pub dedup_prefix_chars: usize,
    pub initiator_lookback: usize,
    pub initiator_lookahead: usize,
    /// Messages past the block end scanned for continued hostility.
    pub deescalation_lookahead: usize,
    pub trigger_excerpt_chars: usize,
    pub attempt_excerpt_chars: usize,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            merge_gap_minutes: 15,
            dedup_prefix_chars: 50,
            initiator_lookback: 30,
            initiator_lookahead: 15,
            deescalation_lookahead: 30,
            trigger_excerpt_chars: 200,
            attempt_excerpt_chars: 150,
        }
    }
}

/// Day-level aggregates: banter blocks, gaps, mood cut-offs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayConfig {
    /// Banter window `[i - half, i + half)`.
    pub banter_half_window: usize,
    pub banter_min_playful: usize,
    pub banter_min_block: usize,
    pub gap_minutes: i64,
    pub explosive_avg: f32,
    pub explosive_blocks: usize,
    pub heated_avg: f32,
    pub tense_avg: f32,
    /// Share of positive-tone messages above which a calm day is `loving`.
    pub loving_share: f32,
    /// Shortest run of silent calendar days reported as a contact gap.
    pub silence_min_days: i64,
    pub hurtful_preview_chars: usize,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            banter_half_window: 3,
            banter_min_playful: 2,
            banter_min_block: 3,
            gap_minutes: 120,
            explosive_avg: 1.5,
            explosive_blocks: 2,
            heated_avg: 0.8,
            tense_avg: 0.3,
            loving_share: 0.1,
            silence_min_days: 3,
            hurtful_preview_chars: 150,
        }
    }
}

/// Per-case settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    pub name: String,
    /// Display label for the `sent` side.
    pub sent_label: String,
    pub received_label: String,
    /// Inclusive calendar-date filter, applied after the UTC offset.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Fixed offset used to assign messages to calendar days.
    pub utc_offset_minutes: i32,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            name: "case".to_string(),
            sent_label: "sent".to_string(),
            received_label: "received".to_string(),
            start_date: None,
            end_date: None,
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub heat: HeatConfig,
    pub context: ContextConfig,
    pub episodes: EpisodeConfig,
    pub day: DayConfig,
    pub case: CaseConfig,
}

fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 5.0))
}

impl AnalysisConfig {
    /// Resolve the config path from env, read it (missing → defaults), apply
    /// the env threshold override and sanitize.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_ANALYSIS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ANALYSIS_CONFIG_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read analysis config at {}", path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Invalid analysis config at {}", path.display()))?
        } else {
            debug!(path = %path.display(), "analysis config not found, using defaults");
            Self::default()
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_ANALYSIS_HEAT_THRESHOLD).ok()) {
            cfg.heat.threshold = t;
        }
        cfg.sanitize();
        Ok(cfg)
    }

    /// Parse a TOML string. Missing sections and keys take defaults.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: AnalysisConfig = toml::from_str(toml_str)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Clamp / swap invalid values back into a usable range.
    pub fn sanitize(&mut self) {
        let h = &mut self.heat;
        if !h.threshold.is_finite() {
            warn!("heat threshold is not finite, using default");
            h.threshold = DEFAULT_HEAT_THRESHOLD;
        }
        h.threshold = h.threshold.clamp(0.0, 5.0);
        if h.window_before + h.window_after == 0 {
            h.window_after = 1;
        }
        h.tirade_min_hostile = h.tirade_min_hostile.max(1);

        let c = &mut self.context;
        c.joke_min_messages = c.joke_min_messages.max(1);
        c.stressor_min_categories = c.stressor_min_categories.max(1);

        let e = &mut self.episodes;
        e.merge_gap_minutes = e.merge_gap_minutes.max(0);
        e.dedup_prefix_chars = e.dedup_prefix_chars.max(1);

        let d = &mut self.day;
        d.gap_minutes = d.gap_minutes.max(1);
        d.banter_min_block = d.banter_min_block.max(1);
        d.silence_min_days = d.silence_min_days.max(1);
        d.hurtful_preview_chars = d.hurtful_preview_chars.max(1);
        for v in [
            &mut d.explosive_avg,
            &mut d.heated_avg,
            &mut d.tense_avg,
            &mut d.loving_share,
        ] {
            if !v.is_finite() || *v < 0.0 {
                *v = 0.0;
            }
        }
        // mood cut-offs must stay ordered
        if d.heated_avg > d.explosive_avg {
            std::mem::swap(&mut d.heated_avg, &mut d.explosive_avg);
        }
        if d.tense_avg > d.heated_avg {
            std::mem::swap(&mut d.tense_avg, &mut d.heated_avg);
        }

        let k = &mut self.case;
        if let (Some(s), Some(e)) = (k.start_date, k.end_date) {
            if s > e {
                k.start_date = Some(e);
                k.end_date = Some(s);
            }
        }
        // keep the offset inside a real timezone range (±18h)
        k.utc_offset_minutes = k.utc_offset_minutes.clamp(-18 * 60 + 1, 18 * 60 - 1);
    }
}
