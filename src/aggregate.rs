// src/aggregate.rs
//! Day-level roll-ups computed after a day's episodes are final: mood,
//! banter blocks, long silences, hurtful language, message and call counts.
//! [`contact_gaps`] works across days.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyze::{AnnotatedDay, DayAnalysis};
use crate::config::DayConfig;
use crate::lexicon::hurtful::Severity;
use crate::message::{excerpt, CallKind, CallRecord, Direction, Message};
use crate::rolling;

const MINUTE_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Explosive,
    Heated,
    Tense,
    Loving,
    Neutral,
    NoContact,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Explosive => "explosive",
            Mood::Heated => "heated",
            Mood::Tense => "tense",
            Mood::Loving => "loving",
            Mood::Neutral => "neutral",
            Mood::NoContact => "no_contact",
        }
    }
}

/// Mood from average raw hostility, argument-block count and the share of
/// positive-tone messages.
pub fn classify_day_mood(
    messages: usize,
    avg_raw_hostility: f32,
    argument_blocks: usize,
    positive_messages: usize,
    cfg: &DayConfig,
) -> Mood {
    if messages == 0 {
        return Mood::NoContact;
    }
    if avg_raw_hostility >= cfg.explosive_avg || argument_blocks >= cfg.explosive_blocks {
        Mood::Explosive
    } else if avg_raw_hostility >= cfg.heated_avg || argument_blocks >= 1 {
        Mood::Heated
    } else if avg_raw_hostility >= cfg.tense_avg {
        Mood::Tense
    } else if positive_messages as f32 / messages as f32 > cfg.loving_share {
        Mood::Loving
    } else {
        Mood::Neutral
    }
}

/// Run of playful back-and-forth. `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanterBlock {
    pub start: usize,
    pub end: usize,
    pub message_count: usize,
    pub duration_minutes: f64,
}

pub fn banter_blocks(day: &AnnotatedDay<'_>, cfg: &DayConfig) -> Vec<BanterBlock> {
    let sig = &day.signals;
    let n = sig.len();
    let flagged: Vec<bool> = (0..n)
        .map(|i| {
            let w = rolling::half_open(i, cfg.banter_half_window, cfg.banter_half_window, n);
            let mut count = 0;
            let (mut sent, mut received) = (false, false);
            for j in w {
                if sig.playful[j] {
                    count += 1;
                    match sig.directions[j] {
                        Direction::Sent => sent = true,
                        Direction::Received => received = true,
                    }
                }
            }
            sent && received && count >= cfg.banter_min_playful
        })
        .collect();

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < n {
        if !flagged[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && flagged[i] {
            i += 1;
        }
        let len = i - start;
        if len >= cfg.banter_min_block {
            let ms = day.messages[i - 1].timestamp - day.messages[start].timestamp;
            blocks.push(BanterBlock {
                start,
                end: i - 1,
                message_count: len,
                duration_minutes: round1(ms as f64 / MINUTE_MS as f64),
            });
        }
    }
    blocks
}

/// Silence between two consecutive messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationGap {
    pub after_index: usize,
    pub before_index: usize,
    pub gap_minutes: i64,
    /// `"3h05m"`.
    pub label: String,
}

pub fn conversation_gaps(messages: &[Message], cfg: &DayConfig) -> Vec<ConversationGap> {
    messages
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let minutes = (pair[1].timestamp - pair[0].timestamp) / MINUTE_MS;
            (minutes >= cfg.gap_minutes).then(|| ConversationGap {
                after_index: i,
                before_index: i + 1,
                gap_minutes: minutes,
                label: format!("{}h{:02}m", minutes / 60, minutes % 60),
            })
        })
        .collect()
}

/// One hurtful message, as listed in the day report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HurtfulEntry {
    pub index: usize,
    pub timestamp: i64,
    pub words: Vec<String>,
    pub severity: Severity,
    pub preview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HurtfulByParty {
    pub from_sent: Vec<HurtfulEntry>,
    pub from_received: Vec<HurtfulEntry>,
}

impl HurtfulByParty {
    pub fn is_empty(&self) -> bool {
        self.from_sent.is_empty() && self.from_received.is_empty()
    }

    pub fn len(&self) -> usize {
        self.from_sent.len() + self.from_received.len()
    }
}

/// Hurtful messages of one day split by sender. Previews longer than
/// `preview_chars` end in `...`.
pub fn hurtful_by_party(day: &AnnotatedDay<'_>, preview_chars: usize) -> HurtfulByParty {
    let mut out = HurtfulByParty::default();
    for (ann, msg) in day.annotations.iter().zip(day.messages) {
        let Some(hit) = &ann.hurtful else { continue };
        let body = msg.text();
        let mut preview = excerpt(body, preview_chars);
        if body.chars().count() > preview_chars {
            preview.push_str("...");
        }
        let entry = HurtfulEntry {
            index: ann.index,
            timestamp: msg.timestamp,
            words: hit.words.clone(),
            severity: hit.severity,
            preview,
        };
        match ann.direction {
            Direction::Sent => out.from_sent.push(entry),
            Direction::Received => out.from_received.push(entry),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapReason {
    /// The last day before the silence had hurtful messages.
    AfterConflict,
    Unknown,
}

/// Run of whole calendar days without any message or call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactGap {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    pub reason: GapReason,
}

/// Silences of at least `min_days` between consecutive contact days.
/// `contact_days` is sorted and pairs each date with whether it had hurtful
/// messages. Longest first; equal lengths stay chronological.
pub fn contact_gaps(contact_days: &[(NaiveDate, bool)], min_days: i64) -> Vec<ContactGap> {
    let mut gaps: Vec<ContactGap> = contact_days
        .windows(2)
        .filter_map(|pair| {
            let ((d1, heated), (d2, _)) = (pair[0], pair[1]);
            let days = (d2 - d1).num_days() - 1;
            if days < min_days {
                return None;
            }
            Some(ContactGap {
                start: d1.succ_opt()?,
                end: d2.pred_opt()?,
                days,
                reason: if heated {
                    GapReason::AfterConflict
                } else {
                    GapReason::Unknown
                },
            })
        })
        .collect();
    gaps.sort_by(|a, b| b.days.cmp(&a.days));
    gaps
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub weekday: String,
    /// Any message or call on this date.
    pub had_contact: bool,
    pub sent: usize,
    pub received: usize,
    pub total: usize,
    pub calls_incoming: usize,
    pub calls_outgoing: usize,
    pub calls_missed: usize,
    pub talk_seconds: u64,
    pub argument_messages: usize,
    pub banter_messages: usize,
    pub argument_blocks: usize,
    pub avg_raw_hostility: f32,
    pub mood: Mood,
}

impl DayAggregate {
    pub fn compute(
        date: NaiveDate,
        analysis: &DayAnalysis<'_>,
        banter: &[BanterBlock],
        calls: &[CallRecord],
        cfg: &DayConfig,
    ) -> Self {
        let anns = &analysis.day.annotations;
        let total = anns.len();
        let sent = anns.iter().filter(|a| a.direction == Direction::Sent).count();
        let raw_sum: u32 = anns.iter().map(|a| a.raw_hostility as u32).sum();
        let avg = if total == 0 { 0.0 } else { raw_sum as f32 / total as f32 };
        let positive = anns.iter().filter(|a| a.tone.is_positive()).count();
        let argument_blocks = analysis.arguments().count();

        let calls_of = |k: CallKind| calls.iter().filter(|c| c.kind == k).count();

        Self {
            date,
            weekday: date.format("%A").to_string(),
            had_contact: total > 0 || !calls.is_empty(),
            sent,
            received: total - sent,
            total,
            calls_incoming: calls_of(CallKind::Incoming),
            calls_outgoing: calls_of(CallKind::Outgoing),
            calls_missed: calls_of(CallKind::Missed),
            talk_seconds: calls.iter().map(|c| c.duration_secs).sum(),
            argument_messages: analysis.arguments().map(|e| e.len()).sum(),
            banter_messages: banter.iter().map(|b| b.message_count).sum(),
            argument_blocks,
            avg_raw_hostility: (avg * 100.0).round() / 100.0,
            mood: classify_day_mood(total, avg, argument_blocks, positive, cfg),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
