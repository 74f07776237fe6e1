// src/engine.rs
//! # Case Engine
//! Composes the per-day pipeline into a case-level run: stable sort, split
//! into calendar days at a fixed UTC offset, analyze each day on its own,
//! then roll everything up into a [`CaseReport`]. With both range dates
//! configured, dates without any record still get an (empty) day report.
//!
//! No I/O here; the binary reads files and prints the report.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{
    banter_blocks, contact_gaps, conversation_gaps, hurtful_by_party, BanterBlock, ContactGap,
    ConversationGap, DayAggregate, HurtfulByParty,
};
use crate::analyze::{Episode, Initiator, MessageAnnotation, Pipeline};
use crate::config::AnalysisConfig;
use crate::health::{GottmanRatio, HealthScore, HealthTally};
use crate::message::{sort_chronologically, CallRecord, Direction, Message};
use crate::metrics::{record_day, record_health};

/// Everything reported for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    #[serde(flatten)]
    pub aggregate: DayAggregate,
    pub episodes: Vec<Episode>,
    pub banter_blocks: Vec<BanterBlock>,
    pub gaps: Vec<ConversationGap>,
    pub hurtful: HurtfulByParty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<MessageAnnotation>>,
}

impl DayReport {
    pub fn arguments(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(|e| e.is_argument)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseTotals {
    pub days: usize,
    pub contact_days: usize,
    pub messages: usize,
    pub sent: usize,
    pub received: usize,
    pub argument_blocks: usize,
    pub initiated_by_sent: usize,
    pub initiated_by_received: usize,
    pub initiated_unclear: usize,
    pub refused_by_sent: usize,
    pub refused_by_received: usize,
    pub banter_blocks: usize,
    pub hurtful_from_sent: usize,
    pub hurtful_from_received: usize,
}

impl CaseTotals {
    fn add_day(&mut self, day: &DayReport) {
        self.days += 1;
        if day.aggregate.had_contact {
            self.contact_days += 1;
        }
        self.hurtful_from_sent += day.hurtful.from_sent.len();
        self.hurtful_from_received += day.hurtful.from_received.len();
        self.messages += day.aggregate.total;
        self.sent += day.aggregate.sent;
        self.received += day.aggregate.received;
        self.banter_blocks += day.banter_blocks.len();
        for ep in day.arguments() {
            self.argument_blocks += 1;
            match ep.initiator {
                Some(Initiator::Sent) => self.initiated_by_sent += 1,
                Some(Initiator::Received) => self.initiated_by_received += 1,
                _ => self.initiated_unclear += 1,
            }
            match ep.refused_by {
                Some(Direction::Sent) => self.refused_by_sent += 1,
                Some(Direction::Received) => self.refused_by_received += 1,
                None => {}
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub case: String,
    pub sent_label: String,
    pub received_label: String,
    pub days: Vec<DayReport>,
    pub totals: CaseTotals,
    /// Multi-day silences between contact days, longest first.
    pub contact_gaps: Vec<ContactGap>,
    pub gottman: GottmanRatio,
    pub health: HealthScore,
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    cfg: AnalysisConfig,
    pipeline: Pipeline,
    offset: FixedOffset,
    include_annotations: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(cfg: AnalysisConfig) -> Self {
        let offset = FixedOffset::east_opt(cfg.case.utc_offset_minutes * 60).unwrap_or_else(|| {
            warn!(
                minutes = cfg.case.utc_offset_minutes,
                "utc offset out of range, using UTC"
            );
            Utc.fix()
        });
        Self {
            pipeline: Pipeline::new(&cfg),
            cfg,
            offset,
            include_annotations: false,
        }
    }

    /// Attach per-message annotations to every day report.
    pub fn with_annotations(mut self, on: bool) -> Self {
        self.include_annotations = on;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Calendar date of an epoch-ms timestamp at the configured offset.
    pub fn local_date(&self, timestamp_ms: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(timestamp_ms)
            .map(|dt| dt.with_timezone(&self.offset).date_naive())
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        let c = &self.cfg.case;
        c.start_date.map_or(true, |s| date >= s) && c.end_date.map_or(true, |e| date <= e)
    }

    /// Analyze one day's (sorted) messages and calls.
    pub fn analyze_day(&self, date: NaiveDate, messages: &[Message], calls: &[CallRecord]) -> DayReport {
        self.analyze_day_into(date, messages, calls, &mut HealthTally::default())
    }

    fn analyze_day_into(
        &self,
        date: NaiveDate,
        messages: &[Message],
        calls: &[CallRecord],
        tally: &mut HealthTally,
    ) -> DayReport {
        let analysis = self.pipeline.run(messages);
        tally.extend(&analysis.day.annotations);
        let banter = banter_blocks(&analysis.day, &self.cfg.day);
        let gaps = conversation_gaps(messages, &self.cfg.day);
        let aggregate = DayAggregate::compute(date, &analysis, &banter, calls, &self.cfg.day);
        let hurtful = hurtful_by_party(&analysis.day, self.cfg.day.hurtful_preview_chars);

        record_day(
            messages.len(),
            analysis.arguments().count(),
            analysis.merged,
            analysis.deduped,
            aggregate.avg_raw_hostility,
        );
        debug!(
            %date,
            messages = messages.len(),
            arguments = aggregate.argument_blocks,
            mood = aggregate.mood.as_str(),
            "day analyzed"
        );

        let annotations = self.include_annotations.then(|| analysis.day.annotations.clone());
        DayReport {
            aggregate,
            episodes: analysis.episodes,
            banter_blocks: banter,
            gaps,
            hurtful,
            annotations,
        }
    }

    /// Full case run. Messages are sorted here; input order only breaks ties.
    pub fn analyze_case(&self, mut messages: Vec<Message>, calls: &[CallRecord]) -> CaseReport {
        sort_chronologically(&mut messages);

        let mut by_day: BTreeMap<NaiveDate, (Vec<Message>, Vec<CallRecord>)> = BTreeMap::new();
        let mut skipped = 0usize;
        for m in messages {
            match self.local_date(m.timestamp) {
                Some(d) if self.in_range(d) => by_day.entry(d).or_default().0.push(m),
                Some(_) => {}
                None => skipped += 1,
            }
        }
        for c in calls {
            match self.local_date(c.timestamp) {
                Some(d) if self.in_range(d) => by_day.entry(d).or_default().1.push(c.clone()),
                Some(_) => {}
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "records with out-of-range timestamps skipped");
        }
        if let (Some(start), Some(end)) = (self.cfg.case.start_date, self.cfg.case.end_date) {
            for d in start.iter_days().take_while(|d| *d <= end) {
                by_day.entry(d).or_default();
            }
        }

        let mut tally = HealthTally::default();
        let mut totals = CaseTotals::default();
        let mut days = Vec::with_capacity(by_day.len());
        for (date, (msgs, day_calls)) in &by_day {
            let report = self.analyze_day_into(*date, msgs, day_calls, &mut tally);
            totals.add_day(&report);
            days.push(report);
        }

        let contact: Vec<(NaiveDate, bool)> = days
            .iter()
            .filter(|d| d.aggregate.had_contact)
            .map(|d| (d.aggregate.date, !d.hurtful.is_empty()))
            .collect();
        let silences = contact_gaps(&contact, self.cfg.day.silence_min_days);

        let gottman = tally.gottman_ratio();
        let health = tally.health_score();
        record_health(health.score);
        info!(
            case = %self.cfg.case.name,
            days = totals.days,
            contact_days = totals.contact_days,
            contact_gaps = silences.len(),
            messages = totals.messages,
            arguments = totals.argument_blocks,
            health = health.score,
            grade = %health.grade,
            "case analyzed"
        );

        CaseReport {
            case: self.cfg.case.name.clone(),
            sent_label: self.cfg.case.sent_label.clone(),
            received_label: self.cfg.case.received_label.clone(),
            days,
            totals,
            contact_gaps: silences,
            gottman,
            health,
        }
    }
}
