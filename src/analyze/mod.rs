// src/analyze/mod.rs
//! Per-day analysis pipeline.
//!
//! Order:
//! 1) normalize bodies, lexical scan, tone, hurtful language, behavioral patterns
//! 2) context filters (text + window) and directed-hostility scoring
//! 3) windowed heat + participation
//! 4) run-length segmentation into argument / calm episodes
//! 5) per argument block: initiator, de-escalation, upset topics
//! 6) merge close argument blocks, then dedup repeated triggers
//!
//! Messages are never mutated; everything derived lives in the index-aligned
//! [`MessageAnnotation`] table, so running the pipeline twice on the same
//! slice gives identical output.

pub mod context;
pub mod deescalation;
pub mod heat;
pub mod initiator;
pub mod scoring;
pub mod segment;
pub mod topics;

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::debug::dev_log_scored;
use crate::lexicon::{
    behavioral::{self, BehavioralMatch},
    hurtful::{self, HurtfulHit},
    tone::{scan_tone, ToneFindings},
    Category, LexicalPatternMatcher,
};
use crate::message::{normalize_text, Direction, Message};

pub use context::{ContextFilterBank, ContextFlags, DaySignals};
pub use deescalation::{DeEscalationOutcome, DeEscalationTracker};
pub use heat::{HeatMap, Participation, WindowedHeatDetector};
pub use initiator::{Attribution, InitiatorAttributor, TriggerBasis};
pub use scoring::{HostilityRule, MessageScore, ScoringEngine};
pub use segment::{DeEscalationAttempt, Episode, EpisodeSegmenter, Initiator, Trigger};
pub use topics::TopicClassifier;

/// Everything derived for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageAnnotation {
    pub index: usize,
    pub direction: Direction,
    pub raw_hostility: u8,
    /// Directed hostility after context filters.
    pub hostility: u8,
    pub provocation: u8,
    pub rule: HostilityRule,
    pub flags: ContextFlags,
    pub topics: Vec<&'static str>,
    pub supportive: Vec<&'static str>,
    pub tone: ToneFindings,
    pub behavioral: Vec<BehavioralMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hurtful: Option<HurtfulHit>,
    /// `category:label` for every lexical hit.
    pub labels: Vec<String>,
}

impl MessageAnnotation {
    /// Annotation of a message with no hits at all.
    pub fn empty(index: usize, direction: Direction) -> Self {
        Self {
            index,
            direction,
            raw_hostility: 0,
            hostility: 0,
            provocation: 0,
            rule: HostilityRule::NoHostility,
            flags: ContextFlags::default(),
            topics: Vec::new(),
            supportive: Vec::new(),
            tone: ToneFindings::default(),
            behavioral: Vec::new(),
            hurtful: None,
            labels: Vec::new(),
        }
    }
}

/// A day's messages with their normalized text, window signals and annotations.
#[derive(Debug, Clone)]
pub struct AnnotatedDay<'a> {
    pub messages: &'a [Message],
    pub texts: Vec<String>,
    pub signals: DaySignals,
    pub annotations: Vec<MessageAnnotation>,
}

impl AnnotatedDay<'_> {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Output of the per-day pipeline.
#[derive(Debug, Clone)]
pub struct DayAnalysis<'a> {
    pub day: AnnotatedDay<'a>,
    pub heat: HeatMap,
    /// Final episodes (merged and deduped), in order.
    pub episodes: Vec<Episode>,
    pub merged: usize,
    pub deduped: usize,
}

impl DayAnalysis<'_> {
    pub fn arguments(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(|e| e.is_argument)
    }
}

/// All stages wired with one [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    matcher: LexicalPatternMatcher,
    bank: ContextFilterBank,
    scorer: ScoringEngine,
    heat: WindowedHeatDetector,
    segmenter: EpisodeSegmenter,
    attributor: InitiatorAttributor,
    tracker: DeEscalationTracker,
    topics: TopicClassifier,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Pipeline {
    pub fn new(cfg: &AnalysisConfig) -> Self {
        Self {
            matcher: LexicalPatternMatcher::new(),
            bank: ContextFilterBank::new(cfg.context.clone()),
            scorer: ScoringEngine::new(),
            heat: WindowedHeatDetector::new(cfg.heat.clone()),
            segmenter: EpisodeSegmenter::new(cfg.episodes.clone()),
            attributor: InitiatorAttributor::new(&cfg.episodes),
            tracker: DeEscalationTracker::new(&cfg.episodes),
            topics: TopicClassifier,
        }
    }

    /// Stages 1–2: score every message of one (chronologically sorted) day.
    pub fn annotate<'a>(&self, messages: &'a [Message]) -> AnnotatedDay<'a> {
        let texts: Vec<String> = messages.iter().map(|m| normalize_text(m.text())).collect();
        let signals = DaySignals::new(messages, &texts);

        let annotations = messages
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let text = texts[i].as_str();
                let scan = self.matcher.scan(m.text());
                let tone = scan_tone(text);
                let flags = self
                    .bank
                    .flags(&signals, i, text, !tone.escalation.is_empty());
                let score = self.scorer.score(&scan, &flags);
                let behavioral = behavioral::detect(text, flags.is_benign());
                let labels = scan.labels();

                dev_log_scored(
                    i,
                    m.text(),
                    score.raw_hostility,
                    score.hostility,
                    score.provocation,
                    score.rule.as_str(),
                    &labels,
                );

                MessageAnnotation {
                    index: i,
                    direction: m.direction,
                    raw_hostility: score.raw_hostility,
                    hostility: score.hostility,
                    provocation: score.provocation,
                    rule: score.rule,
                    flags,
                    topics: scan.topics(),
                    supportive: scan.labels_in(Category::Supportive),
                    tone,
                    behavioral,
                    hurtful: hurtful::classify(text),
                    labels,
                }
            })
            .collect();

        AnnotatedDay {
            messages,
            texts,
            signals,
            annotations,
        }
    }

    /// Stages 3–6 on an annotated day.
    pub fn segment<'a>(&self, day: AnnotatedDay<'a>) -> DayAnalysis<'a> {
        let heat = self.heat.detect(&day.annotations);
        let mut episodes = self.segmenter.segment(&heat.flags());

        for ep in episodes.iter_mut().filter(|e| e.is_argument) {
            let attribution = self.attributor.attribute(&day, ep.start);
            ep.apply_attribution(&day, &attribution, self.segmenter.trigger_excerpt_chars());

            let outcome = self.tracker.track(&day, ep.start, ep.end);
            ep.apply_deescalation(outcome);

            let (sent, received) = self.topics.classify(&day, ep.start, ep.end);
            ep.upset_topics_sent = sent;
            ep.upset_topics_received = received;
        }

        let before = episodes.iter().filter(|e| e.is_argument).count();
        let (episodes, merged) = self.segmenter.merge(episodes, day.messages);
        let (episodes, deduped) = self.segmenter.dedup(episodes, day.messages);
        debug!(
            messages = day.len(),
            argument_blocks = before,
            merged,
            deduped,
            "day segmented"
        );

        DayAnalysis {
            day,
            heat,
            episodes,
            merged,
            deduped,
        }
    }

    /// Full per-day run.
    pub fn run<'a>(&self, messages: &'a [Message]) -> DayAnalysis<'a> {
        let day = self.annotate(messages);
        self.segment(day)
    }
}
