// src/lexicon/hurtful.rs
//! Hurtful language aimed at the other person, graded mild / moderate /
//! severe. Reported per day and party; does not feed hostility scoring.
//!
//! Mild profanity only counts when the same sentence also addresses "you",
//! so "this damn printer" is not hurtful while "you damn liar" is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{compile_labelled, Markers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

/// Words or phrase labels found in one message and the worst severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HurtfulHit {
    pub words: Vec<String>,
    pub severity: Severity,
}

static SEVERE: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        (
            "weaponizing deceased family",
            r"\bdead\s+(sissy|sister|brother|mom|dad|mother|father|baby|child)\b",
        ),
        ("weaponizing death", r"\b(at\s+least\s+)?my\s+\w+\s+isn.?t\s+dead\b"),
        ("calling helpless baby", r"\bhelpless\s+(little\s+)?baby\b"),
        ("calling a baby", r"\byou.?re\s+a\s+baby\b"),
        ("weaponizing addiction", r"\bwon.?t\s+stop\s+drinking\b"),
        ("hospital abandonment threat", r"\bleave\s+you\s+in\s+the\s+hospital\b"),
        ("permanent abandonment threat", r"\bnever\s+see\w*\s+you\s+again\b"),
        (
            "blaming for illness",
            r"\b(seizure|cancer|tumor|disease|disorder|illness)\b.*\byour\s+fault\b",
        ),
        ("direct threat", r"\bi.?ll\s+(kill|hurt|destroy|ruin)\s+(you|your)\b"),
        ("threat of retaliation", r"\byou.?ll\s+(regret|pay\s+for|be\s+sorry)\b"),
        ("threat to quality of life", r"\bi\s+will\s+make\s+your\s+life\b"),
        (
            "unlovability attack",
            r"\bno\s+one\s+will\s+(ever\s+)?(love|want|care\s+about)\s+you\b",
        ),
        ("wish of harm", r"\byou\s+deserve\s+to\s+(suffer|be\s+alone|die|hurt)\b"),
        (
            "accusation of not caring",
            r"\byou\s+don.?t\s+care\s+about\s+(me|anyone|anything)\b",
        ),
        ("blame statement", r"\byou\s+fucked\s+up\b"),
        ("weaponized indifference", r"\bi\s+don.?t\s+care\b.*\bbecause\b"),
        ("stated looping intent", r"\bkeep\s+bringing\s+it\s+up\b.*\bover\s+and\s+over\b"),
        ("dehumanization", r"\byou.?re\s+(worthless|nothing|garbage|trash|a\s+waste)\b"),
        (
            "social isolation attack",
            r"\bnobody\s+(likes|loves|wants|cares\s+about)\s+you\b",
        ),
    ])
});

/// Directed insults and profanity. An empty label reports the matched text.
static MODERATE: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        (
            "",
            r"\byou.?re\s+(so\s+)?(stupid|dumb|pathetic|useless|worthless|selfish|lazy|immature|childish|incompetent|ignorant|delusional|disgusting)\b",
        ),
        ("", r"\byou\s+(stupid|dumb|pathetic|useless|worthless|selfish)\b"),
        ("fuck you", r"\bfuck\s+you\b"),
        ("screw you", r"\bscrew\s+you\b"),
        ("go to hell", r"\bgo\s+to\s+hell\b"),
        ("eat shit", r"\beat\s+shit\b"),
        (
            "",
            r"\byou.?re\s+(an?\s+)?(idiot|moron|loser|narcissist|psycho|psychopath|sociopath|liar|bitch|asshole|piece\s+of\s+shit|cunt|bastard|whore|slut)\b",
        ),
        ("", r"\byou\s+(piece\s+of|sack\s+of)\b"),
        ("shut up", r"\bshut\s+(the\s+fuck\s+)?up\b"),
        ("hate you", r"\bhate\s+you\b"),
        ("can't stand you", r"\bcan.?t\s+stand\s+you\b"),
        ("sick of you", r"\bsick\s+of\s+you\b"),
        ("disgusted by you", r"\bdisgusted\s+by\s+you\b"),
        ("wish never met", r"\bi\s+wish\s+i\s+never\s+met\s+you\b"),
    ])
});

static MILD_PROFANITY: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        ("fuck", r"\bfuck\b"),
        ("fucking", r"\bfucking\b"),
        ("fucked", r"\bfucked\b"),
        ("shit", r"\bshit\b"),
        ("shitty", r"\bshitty\b"),
        ("bullshit", r"\bbullshit\b"),
        ("damn", r"\bdamn\b"),
        ("dammit", r"\bdammit\b"),
        ("crap", r"\bcrap\b"),
        ("ass", r"\bass\b"),
        ("hell", r"\bhell\b"),
    ])
});

static MILD_DISMISSIVE: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        ("don't care", r"\bi\s+don.?t\s+care\b"),
        ("leave me alone", r"\bleave\s+me\s+alone\b"),
        ("get lost", r"\bget\s+lost\b"),
        ("go away", r"\bgo\s+away\b"),
        ("whatever", r"\bwhatever\b"),
        ("don't have time", r"\bi\s+don.?t\s+have\s+time\s+for\s+this\b"),
        ("talk to the hand", r"\btalk\s+to\s+the\s+hand\b"),
        ("don't want to discuss", r"\bi\s+don.?t\s+want\s+to\s+(hear|talk|discuss)\b"),
    ])
});

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence break regex"));
static ADDRESSES_YOU: Lazy<Regex> = Lazy::new(|| Regex::new(r"\byour?\b").expect("you regex"));

fn push_unique(words: &mut Vec<String>, w: &str) {
    if !words.iter().any(|x| x == w) {
        words.push(w.to_string());
    }
}

/// Classify normalized `text`. `None` for benign or empty messages.
pub fn classify(text: &str) -> Option<HurtfulHit> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let mut words = Vec::new();
    let mut severity = None;

    for (label, re) in SEVERE.iter() {
        if re.is_match(text) {
            push_unique(&mut words, label);
            severity = Some(Severity::Severe);
        }
    }

    for (label, re) in MODERATE.iter() {
        if let Some(m) = re.find(text) {
            let w = if label.is_empty() { m.as_str() } else { *label };
            push_unique(&mut words, w);
            severity = severity.max(Some(Severity::Moderate));
        }
    }

    let addressed: Vec<&str> = SENTENCE_BREAK
        .split(text)
        .filter(|s| ADDRESSES_YOU.is_match(s))
        .collect();
    for (label, re) in MILD_PROFANITY.iter() {
        if addressed.iter().any(|s| re.is_match(s)) {
            push_unique(&mut words, label);
            severity = severity.max(Some(Severity::Mild));
        }
    }

    for (label, re) in MILD_DISMISSIVE.iter() {
        if re.is_match(text) {
            push_unique(&mut words, label);
            severity = severity.max(Some(Severity::Mild));
        }
    }

    severity.map(|severity| HurtfulHit { words, severity })
}
