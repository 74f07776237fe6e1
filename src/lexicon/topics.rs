// src/lexicon/topics.rs
//! Topic lexicons.
//!
//! Two tables: per-message conversation topics (tagged on every annotation),
//! and the coarser "what is this person upset about" table applied to one
//! party's combined text inside an argument block.

use once_cell::sync::Lazy;

use super::{compile_labelled, Category, LexicalHit, Markers};

pub const DEFAULT_UPSET_TOPIC: &str = "general frustration";
pub const MAX_UPSET_TOPICS: usize = 3;

static MESSAGE_TOPICS: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        (
            "scheduling",
            r"\bschedul\w*\b|\bwhat\s+time\b|\bwhen\s+(are|do|can|should|will)\b",
        ),
        ("family", r"\bmom\b|\bdad\b|\bfamily\b|\bsister\b|\bbrother\b|\bparents?\b"),
        ("work", r"\bwork\b|\bjob\b|\bboss\b|\bclient\b|\boffice\b|\bmeeting\b"),
        ("money", r"\bmoney\b|\bpay\b|\brent\b|\bbills?\b|\bcost\b|\bexpens\w*\b"),
        ("intimacy", r"\bsex\b|\bintima\w*\b|\bcuddle\b|\bkiss\b"),
        ("safety", r"\bstalk\w*\b|\bporch\b|\bsafe\w*\b|\bpolic\w*\b"),
        (
            "health",
            r"\bhospital\b|\bseizure\b|\bsick\b|\bhealth\b|\bdoctor\b|\bmedic\w*\b",
        ),
        ("travel", r"\btravel\b|\bflight\b|\bairport\b|\btrip\b"),
        ("trust", r"\btrust\b|\bhonest\w*\b|\blie\w*\b|\blying\b|\btruth\b"),
        (
            "breakup_talk",
            r"\bbreak\s*up\b|\bover\b.*\brelationship\b|\bdone\b.*\bwith\s+you\b",
        ),
    ])
});

static UPSET_TOPICS: Lazy<Markers> = Lazy::new(|| {
    compile_labelled(&[
        (
            "lateness/tardiness",
            r"\blate\b|\bon time\b|\bshowed up\b.*\b(late|hour|minute)\b|\bwaiting\b.*\b(for you|all day)\b",
        ),
        (
            "feeling dismissed/ignored",
            r"\b(dismiss|dismissive|don.?t care|doesn.?t care|ignore|ignored|ignoring)\b",
        ),
        (
            "not listening",
            r"\b(not listen|don.?t listen|never listen|won.?t listen|aren.?t listening)\b",
        ),
        (
            "controlling behavior",
            r"\b(control|controlling|tell me what|boss me|let me|allow me|my decision)\b",
        ),
        (
            "broken promises",
            r"\b(promise|promised|broke.*promise|said you would|you said)\b",
        ),
        ("trust issues", r"\b(trust|honest|lie|lied|lying|truth|cheat)\b"),
        ("feeling disrespected", r"\b(respect|disrespect|rude|mean to me)\b"),
        (
            "lack of help/effort",
            r"\b(help|never help|don.?t help|won.?t help|all by myself|do everything)\b",
        ),
        (
            "family issues",
            r"\b(family|mom|dad|mother|father|sister|brother|parent)\b",
        ),
        ("money issues", r"\b(money|pay|owe|rent|bill|afford|expensive|broke)\b"),
        (
            "wanting more time together",
            r"\b(time|spend time|see you|see me|hanging out|come over|visit)\b",
        ),
        (
            "communication/response time",
            r"\b(phone|text|respond|reply|answer|call back|ghosting|left on read)\b",
        ),
        (
            "not feeling like a priority",
            r"\b(priority|prioritize|important|matter|care about)\b",
        ),
        ("needing space", r"\b(space|alone|smother|clingy|need.*break|back off)\b"),
        (
            "safety situation",
            r"\b(stalk|stalker|creep|following|watching|porch|car outside)\b",
        ),
        ("tone/aggression", r"\b(attack|yell|scream|tone|voice|calm down)\b"),
        (
            "wanting an apology/accountability",
            r"\b(apologize|apology|sorry|admit|acknowledge|own up)\b",
        ),
    ])
});

/// Push one topic hit per matching topic in normalized `text`.
pub fn scan(text: &str, hits: &mut Vec<LexicalHit>) {
    hits.extend(
        MESSAGE_TOPICS
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|&(label, _)| LexicalHit {
                category: Category::Topic,
                label,
                weight: 0,
            }),
    );
}

/// Up to three upset topics for one party's combined text, in table order.
/// Falls back to [`DEFAULT_UPSET_TOPIC`] when nothing matches.
pub fn upset_topics(combined: &str) -> Vec<String> {
    let found: Vec<String> = UPSET_TOPICS
        .iter()
        .filter(|(_, re)| re.is_match(combined))
        .take(MAX_UPSET_TOPICS)
        .map(|(label, _)| label.to_string())
        .collect();
    if found.is_empty() {
        vec![DEFAULT_UPSET_TOPIC.to_string()]
    } else {
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_topics_tag_everything_that_matches() {
        let mut hits = Vec::new();
        scan("my boss wants the rent money by friday", &mut hits);
        let labels: Vec<_> = hits.iter().map(|h| h.label).collect();
        assert_eq!(labels, vec!["work", "money"]);
    }

    #[test]
    fn upset_topics_cap_at_three_in_table_order() {
        let t = upset_topics("you were late again, you ignored me, you never listen, you promised");
        assert_eq!(
            t,
            vec![
                "lateness/tardiness",
                "feeling dismissed/ignored",
                "not listening"
            ]
        );
    }

    #[test]
    fn upset_topics_default() {
        assert_eq!(upset_topics("ugh"), vec![DEFAULT_UPSET_TOPIC]);
        assert_eq!(upset_topics(""), vec![DEFAULT_UPSET_TOPIC]);
    }
}
