// src/lexicon/tone.rs
//! Tone markers: subtle negativity that precedes arguments, explicit
//! escalation, and warm everyday signals. Used for day mood and the
//! de-escalation/escalation overlap flag; never for hostility scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{compile_labelled, Markers};

static PASSIVE_AGGRESSIVE: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        ("passive_aggressive", r"\bfine\b\.?$"),
        ("dismissive", r"\bwhatever\b"),
        ("curt_response", r"\bok\b\.?$"),
        ("curt_response", r"\bk\b\.?$"),
        ("reluctant_agreement", r"\b(guess|suppose)\s+(so|not)\b"),
        ("passive_aggressive", r"\bif\s+you\s+say\s+so\b"),
        ("sarcastic_agreement", r"\byeah\s+sure\b"),
        ("dismissive", r"\bdo\s+what(ever)?\s+you\s+want\b"),
        ("disengagement", r"\bi\s+don.?t\s+care\b"),
        ("withdrawal", r"\bnever\s*mind\b"),
        ("withdrawal", r"\bforget\s+it\b"),
        ("resentment", r"\bwhy\s+do\s+i\s+(even|bother)\b"),
        ("contempt", r"\bhere\s+we\s+go\s+again\b"),
        ("generalizing", r"\balways\b.*\b(do\s+this|the\s+same)\b"),
        ("generalizing", r"\bnever\b.*\b(listen|care|help|change)\b"),
        ("expectation_setting", r"\byou\s+should\s+(already|know)\b"),
    ])
});

static ESCALATION: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        ("stonewalling", r"\bdon.?t\s+talk\s+to\s+me\b"),
        ("threatening_end", r"\bi.?m\s+done\b"),
        ("demanding_space", r"\bleave\s+me\s+alone\b"),
        ("demanding_space", r"\bstop\s+texting\b"),
        (
            "invalidating",
            r"\bthis\s+is\s+(pointless|useless|going\s+nowhere)\b",
        ),
        ("overwhelm", r"\bi\s+can.?t\s+(do\s+this|deal\s+with)\b"),
        ("blame_shifting", r"\byou\s+make\s+me\b"),
        (
            "conditional_threat",
            r"\bif\s+you\s+(don.?t|can.?t)\b.*\b(then|i.?ll|i\s+will)\b",
        ),
        ("absolute_blame", r"\b(always|never)\s+\w+\s+(wrong|right|fault)\b"),
        ("absolute_blame", r"\byou.?re\s+(always|never)\b"),
        ("accusation", r"\byou\s+(just|only)\s+care\s+about\b"),
        ("frustration_demand", r"\bwhy\s+can.?t\s+you\s+just\b"),
    ])
});

static POSITIVE: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        ("affection", r"\bi\s+love\s+you\b"),
        ("longing", r"\bi\s+miss\s+you\b"),
        ("gratitude", r"\bthank\s*you\b"),
        ("apology", r"\bsorry\b"),
        ("appreciation", r"\bi\s+appreciate\b"),
        ("validation", r"\byou.?re\s+(right|correct)\b"),
        ("accountability", r"\bmy\s+bad\b"),
        ("daily_ritual", r"\bgood\s+(morning|night|evening)\b"),
        ("affection", r"\bsweet\s+dreams\b"),
        ("care", r"\bhave\s+a\s+good\b"),
        ("longing", r"\bmiss\s+you\b"),
        ("anticipation", r"\bcan.?t\s+wait\s+to\s+see\s+you\b"),
    ])
});

/// Tone labels found in one message, one entry per matching pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToneFindings {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub passive_aggressive: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub escalation: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub positive: Vec<&'static str>,
}

impl ToneFindings {
    pub fn is_empty(&self) -> bool {
        self.passive_aggressive.is_empty() && self.escalation.is_empty() && self.positive.is_empty()
    }

    pub fn is_positive(&self) -> bool {
        !self.positive.is_empty()
    }

    pub fn has_escalation(&self, label: &str) -> bool {
        self.escalation.iter().any(|l| *l == label)
    }
}

fn labels(table: &[(&'static str, Regex)], text: &str) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|&(label, _)| label)
        .collect()
}

/// Tone of normalized `text`. The trailing-anchor patterns expect the text
/// already trimmed.
pub fn scan_tone(text: &str) -> ToneFindings {
    let text = text.trim();
    if text.is_empty() {
        return ToneFindings::default();
    }
    ToneFindings {
        passive_aggressive: labels(&PASSIVE_AGGRESSIVE, text),
        escalation: labels(&ESCALATION, text),
        positive: labels(&POSITIVE, text),
    }
}
