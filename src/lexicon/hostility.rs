// src/lexicon/hostility.rs
//! Tiered hostility lexicon. Produces the *raw* score before any context
//! adjustment; the scoring stage decides how much of it is aimed at the
//! other party.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, Category, LexicalHit, Pattern};

pub const MAX_HOSTILITY: u8 = 5;

/// Strong direct attacks (+3). Kept separate because its spans are masked
/// before the profanity scan, so "fuck you" is one +3 hit and not +3 +1.
static STRONG_ATTACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bfuck\s+you\b|\bhate\s+you\b|\byou.?re\s+(pathetic|worthless|stupid|useless|crazy|insane)\b",
    )
    .expect("strong attack pattern")
});

static PROFANITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfuck\w*\b|\bshit\w*\b|\bbullshit\b|\bdamn\b").expect("profanity pattern")
});

static TIERS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    compile(&[
        ("demand_contempt", 2, r"\bshut\s+(the fuck )?up\b|\bgo\s+away\b"),
        (
            "generalizing",
            1,
            r"\byou\s+(always|never)\b|\byou\s+(don.?t|can.?t|won.?t)\b",
        ),
        ("rhetorical_why", 1, r"\bwhy\s+(do|can.?t|won.?t|don.?t)\s+you\b"),
    ])
});

/// A whole message that is nothing but a dismissive word.
static DISMISSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(k|ok|fine|whatever|sure|bye)\.?$").expect("dismissive pattern"));

/// Raw hostility of normalized `text`, pushing one hit per matched tier.
pub fn scan(text: &str, hits: &mut Vec<LexicalHit>) -> u8 {
    let mut score: u8 = 0;
    let mut push = |label: &'static str, weight: u8| {
        hits.push(LexicalHit {
            category: Category::Hostility,
            label,
            weight,
        });
        score = score.saturating_add(weight);
    };

    if STRONG_ATTACK.is_match(text) {
        push("strong_attack", 3);
    }
    for p in TIERS.iter() {
        if p.is_match(text) {
            push(p.label, p.weight);
        }
    }
    let masked = STRONG_ATTACK.replace_all(text, " ");
    if PROFANITY.is_match(&masked) {
        push("profanity", 1);
    }
    if DISMISSIVE.is_match(text.trim()) {
        push("dismissive", 1);
    }

    score.min(MAX_HOSTILITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> u8 {
        scan(&crate::message::normalize_text(text), &mut Vec::new())
    }

    #[test]
    fn fuck_you_is_exactly_three() {
        assert_eq!(raw("fuck you"), 3);
        assert_eq!(raw("Fuck you then"), 3);
    }

    #[test]
    fn profanity_outside_the_attack_still_counts() {
        // strong attack + separate profanity
        assert_eq!(raw("fuck you, this is bullshit"), 4);
    }

    #[test]
    fn tiers_accumulate_and_cap() {
        // strong(3) + demand(2) + generalizing(1) + rhetorical(1) + profanity(1) = 8 → 5
        assert_eq!(
            raw("shut up, you're pathetic, you never listen, why do you do this shit"),
            MAX_HOSTILITY
        );
    }

    #[test]
    fn standalone_dismissive_words() {
        for w in ["ok.", "fine.", "whatever", "K", "bye"] {
            assert_eq!(raw(w), 1, "{w}");
        }
        assert_eq!(raw("ok see you at 5"), 0);
    }

    #[test]
    fn neutral_text_is_zero() {
        assert_eq!(raw("dinner at 7?"), 0);
    }
}
