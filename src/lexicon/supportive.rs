// src/lexicon/supportive.rs
//! Supportive-communication lexicon (turning toward, repair, validation, ...).
//!
//! Every matching pattern yields one hit weighted by its category's value;
//! the hit counts feed the Gottman ratio and the health score.

use once_cell::sync::Lazy;

use super::{compile, Category, LexicalHit, Pattern};

/// Category → impact value (higher means more weight for relationship health).
pub const CATEGORIES: &[(&str, u8)] = &[
    ("validation", 8),
    ("empathy", 10),
    ("appreciation", 7),
    ("encouragement", 7),
    ("accountability", 10),
    ("repair_attempt", 9),
    ("active_listening", 6),
    ("emotional_support", 8),
    ("affirmation", 7),
    ("compromise", 6),
    ("boundary_respect", 6),
    ("reassurance", 5),
    ("gratitude", 5),
    ("vulnerability", 9),
];

/// Impact value of a supportive category, 0 for unknown labels.
pub fn value(category: &str) -> u8 {
    CATEGORIES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|&(_, v)| v)
        .unwrap_or(0)
}

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    let table: Vec<(&'static str, &str)> = vec![
        ("validation", r"\bthat\s+makes\s+sense\b"),
        ("validation", r"\bi\s+(can\s+)?understand\s+(why|how|that|what)\b"),
        ("validation", r"\byour\s+feelings\s+are\s+valid\b"),
        ("validation", r"\bi\s+(totally\s+|completely\s+)?get\s+(why|how|that|it)\b"),
        ("validation", r"\byou\s+have\s+every\s+right\s+to\s+(feel|be)\b"),
        (
            "validation",
            r"\bthat.?s\s+(completely\s+|totally\s+)?(understandable|reasonable|fair|valid)\b",
        ),
        ("validation", r"\bi\s+see\s+(where|why|how)\s+you.?re\s+coming\s+from\b"),
        (
            "validation",
            r"\bthat\s+sounds\s+(really\s+)?(hard|tough|difficult|frustrating|stressful)\b",
        ),
        ("validation", r"\bi\s+hear\s+you\b"),
        ("empathy", r"\bi\s+can\s+(only\s+)?imagine\s+how\s+(that|you)\b"),
        (
            "empathy",
            r"\bthat\s+must\s+(be|have\s+been)\s+(really\s+)?(hard|tough|difficult|painful|scary|overwhelming|awful|terrible|stressful)\b",
        ),
        (
            "empathy",
            r"\bi.?m\s+(so\s+)?sorry\s+(you.?re|you\s+are|you\s+had\s+to|that\s+happened|to\s+hear)\b",
        ),
        ("empathy", r"\bmy\s+heart\s+(goes|breaks|aches|hurts)\s+(out\s+)?(for|with|to)\s+you\b"),
        ("empathy", r"\bi\s+wish\s+i\s+could\s+(take|make)\s+(away|it\s+better)\b"),
        ("appreciation", r"\bi\s+appreciate\s+(you|that|everything|what\s+you)\b"),
        (
            "appreciation",
            r"\bthank\s+you\s+(so\s+much\s+)?for\s+(being|doing|helping|listening|understanding|supporting|always|everything|your)\b",
        ),
        (
            "appreciation",
            r"\bi.?m\s+(so\s+)?(thankful|grateful)\s+(for\s+you|to\s+have|that\s+you)\b",
        ),
        ("appreciation", r"\byou\s+mean\s+(so\s+much|the\s+world|everything)\s+to\s+me\b"),
        ("appreciation", r"\bi.?m\s+(so\s+)?lucky\s+to\s+have\s+you\b"),
        ("encouragement", r"\bi\s+believe\s+in\s+you\b"),
        ("encouragement", r"\byou\s+(can|got)\s+(do|handle|get\s+through)\s+(this|it)\b"),
        ("encouragement", r"\bi.?m\s+(so\s+)?proud\s+of\s+(you|what\s+you)\b"),
        ("encouragement", r"\bkeep\s+(going|it\s+up|pushing|trying)\b"),
        ("encouragement", r"\byou\s+inspire\s+me\b"),
        ("accountability", r"\bi\s+was\s+wrong\b"),
        ("accountability", r"\bi\s+take\s+(full\s+)?responsibility\b"),
        ("accountability", r"\bthat\s+was\s+my\s+(fault|mistake|bad)\b"),
        (
            "accountability",
            r"\bi\s+shouldn.?t\s+have\s+(said|done|acted|reacted|yelled|snapped)\b",
        ),
        ("accountability", r"\bi\s+owe\s+you\s+an?\s+apolog"),
        ("accountability", r"\bi\s+let\s+you\s+down\b"),
        (
            "repair_attempt",
            r"\bcan\s+we\s+(start\s+over|try\s+again|talk\s+about\s+this\s+calmly|reset)\b",
        ),
        ("repair_attempt", r"\bi\s+don.?t\s+want\s+to\s+(fight|argue|lose\s+you|hurt\s+you)\b"),
        ("repair_attempt", r"\blet.?s\s+(take\s+a\s+)?breather?\b"),
        ("repair_attempt", r"\bwe.?re\s+on\s+the\s+same\s+(team|side)\b"),
        ("repair_attempt", r"\bi\s+miss\s+us\b"),
        ("repair_attempt", r"\blet.?s\s+not\s+go\s+to\s+(bed|sleep)\s+(mad|angry|upset)\b"),
        ("repair_attempt", r"\bi.?m\s+sorry,?\s+(can|let|please)\b"),
        ("repair_attempt", r"\bhow\s+can\s+(i|we)\s+(fix|make\s+(this|it)\s+(right|better))\b"),
        ("active_listening", r"\btell\s+me\s+more\b"),
        ("active_listening", r"\bi.?m\s+listening\b"),
        (
            "active_listening",
            r"\bwhat\s+(do\s+you\s+need|can\s+i\s+do|would\s+help|happened\s+next)\b",
        ),
        ("active_listening", r"\bi\s+want\s+to\s+understand\b"),
        ("active_listening", r"\bhelp\s+me\s+understand\b"),
        ("emotional_support", r"\bi.?m\s+(right\s+)?here\s+for\s+you\b"),
        ("emotional_support", r"\byou.?re\s+not\s+alone\s+in\s+this\b"),
        ("emotional_support", r"\bi.?ve\s+got\s+(you|your\s+back)\b"),
        (
            "emotional_support",
            r"\byou\s+can\s+(always\s+)?(lean\s+on|count\s+on|depend\s+on|talk\s+to|come\s+to)\s+me\b",
        ),
        ("emotional_support", r"\bi.?m\s+not\s+going\s+anywhere\b"),
        (
            "affirmation",
            r"\byou.?re\s+(an?\s+)?(amazing|wonderful|incredible|beautiful|kind|smart|talented|brave|strong|resilient)\b",
        ),
        ("affirmation", r"\byou\s+are\s+(enough|worthy|loved|important|valued)\b"),
        ("affirmation", r"\bi\s+admire\s+(you|your|how|the\s+way)\b"),
        ("compromise", r"\blet.?s\s+find\s+a\s+(middle\s+ground|compromise|solution|way)\b"),
        (
            "compromise",
            r"\bi.?m\s+willing\s+to\s+(try|compromise|meet\s+you|work\s+on|change|adjust)\b",
        ),
        ("compromise", r"\bwe\s+can\s+(work\s+this\s+out|figure\s+this\s+out|find\s+a\s+way)\b"),
        ("compromise", r"\byou\s+make\s+a\s+(good|fair|valid)\s+point\b"),
        ("boundary_respect", r"\btake\s+(your|all\s+the|as\s+much)\s+time\b"),
        ("boundary_respect", r"\bwhenever\s+you.?re\s+ready\b"),
        ("boundary_respect", r"\bno\s+pressure\b"),
        (
            "boundary_respect",
            r"\bi\s+respect\s+your\s+(space|decision|choice|boundaries|need|feelings|privacy)\b",
        ),
        ("reassurance", r"\bi\s+love\s+you\b"),
        ("reassurance", r"\bwe.?re\s+(going\s+to\s+be\s+)?ok(ay)?\b"),
        ("reassurance", r"\byou\s+can\s+trust\s+me\b"),
        ("reassurance", r"\bwe.?ll\s+get\s+through\s+this\b"),
        ("gratitude", r"\bthank\s+you\b"),
        ("gratitude", r"\bthanks\s+(so\s+much|a\s+lot|for\s+everything|for\s+being|babe|love)\b"),
        ("gratitude", r"\byou.?re\s+the\s+best\b"),
        (
            "gratitude",
            r"\b(that|this)\s+means\s+(so\s+much|a\s+lot|the\s+world|everything)\s+to\s+me\b",
        ),
        (
            "vulnerability",
            r"\bi.?m\s+(scared|afraid|worried|anxious|nervous)\s+(that|about|of|to)\b",
        ),
        ("vulnerability", r"\bi\s+feel\s+(insecure|vulnerable|exposed|scared)\b"),
        ("vulnerability", r"\bcan\s+i\s+be\s+honest\s+with\s+you\b"),
    ];
    let weighted: Vec<(&'static str, u8, &str)> = table
        .into_iter()
        .map(|(label, pattern)| (label, value(label), pattern))
        .collect();
    compile(&weighted)
});

/// Push one supportive hit per matched pattern in normalized `text`.
/// Returns the number of hits added.
pub fn scan(text: &str, hits: &mut Vec<LexicalHit>) -> usize {
    let before = hits.len();
    hits.extend(PATTERNS.iter().filter(|p| p.is_match(text)).map(|p| LexicalHit {
        category: Category::Supportive,
        label: p.label,
        weight: p.weight,
    }));
    hits.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Vec<&'static str> {
        let mut hits = Vec::new();
        scan(text, &mut hits);
        hits.into_iter().map(|h| h.label).collect()
    }

    #[test]
    fn every_pattern_category_has_a_value() {
        for p in PATTERNS.iter() {
            assert!(p.weight >= 5 && p.weight <= 10, "{}", p.label);
        }
        assert_eq!(value("empathy"), 10);
        assert_eq!(value("gratitude"), 5);
        assert_eq!(value("nonsense"), 0);
    }

    #[test]
    fn repair_and_accountability() {
        let l = labels("i was wrong, can we start over? i don't want to fight");
        assert!(l.contains(&"accountability"));
        assert!(l.contains(&"repair_attempt"));
    }

    #[test]
    fn plain_logistics_are_not_supportive() {
        assert!(labels("pick up milk on the way").is_empty());
    }
}
