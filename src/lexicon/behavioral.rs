// src/lexicon/behavioral.rs
//! Behavioral-pattern library: DARVO, gaslighting, the four horsemen,
//! coercive control and the wider manipulation catalogue. Each category has
//! a severity 3..=10. Matches are the negative side of the Gottman ratio.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::compile_all;

/// Low-severity categories that are dropped when a benign context
/// (apology, self-talk, venting, de-escalation, hurt, joke, banter) fires.
pub const MILD_SKIP: &[&str] = &[
    "defensiveness",
    "stonewalling",
    "deflection",
    "minimizing",
    "catastrophizing",
    "demand_compliance",
    "criticism",
    "guilt_trip",
    "silent_treatment",
    "selective_memory",
];

/// Categories at or above this severity count as "severe" for the health score.
pub const SEVERE_THRESHOLD: u8 = 8;

struct BehavioralCategory {
    name: &'static str,
    severity: u8,
    patterns: Vec<Regex>,
}

type Table = &'static [(&'static str, u8, &'static [&'static str])];

const TABLE: Table = &[
    (
        "deny",
        6,
        &[
            r"i\s+never\s+said\s+that",
            r"i\s+didn.?t\s+(say|do|mean)\s+that",
            r"that.?s\s+not\s+(true|what\s+(happened|i\s+said))",
            r"you.?re\s+(making\s+that\s+up|lying|imagining)",
            r"that\s+didn.?t\s+happen",
            r"i\s+don.?t\s+remember\s+(saying|doing)",
            r"i\s+never\s+did\s+(that|anything)",
            r"prove\s+it",
            r"where.?s\s+(the\s+)?(proof|evidence)",
            r"you\s+(have|got)\s+no\s+proof",
        ],
    ),
    (
        "attack",
        6,
        &[
            r"you\s+always\s+\w*(ruin|mess|blame|complain|make|start|overreact|twist|lie|destroy|sabotage|cause)\w*",
            r"you\s+never\s+\w*(listen|care|help|try|change|learn|understand|apologize|admit)\w*",
            r"your\s+fault",
            r"you.?re\s+the\s+(one|problem|reason)",
            r"what\s+about\s+(when\s+)?you",
            r"you\s+can.?t\s+(even|just)",
            r"look\s+at\s+yourself",
            r"you.?re\s+no\s+better",
            r"you\s+do\s+(the\s+)?(same|it\s+too|worse)",
        ],
    ),
    (
        "reverse_victim",
        8,
        &[
            r"you\s+(hurt|are\s+hurting)\s+me",
            r"you\s+made\s+me\s+(feel|do|cry|upset|act\s+this\s+way)",
            r"because\s+of\s+you",
            r"you\s+did\s+this\s+to\s+me",
            r"i.?m\s+(the\s+)?(real\s+)?victim",
            r"you\s+don.?t\s+care\s+about\s+me",
            r"you.?re\s+(abusing|manipulating|gaslighting|bullying)\s+me",
            r"you.?re\s+the\s+(abuser|manipulator|bully|toxic\s+one)",
            r"look\s+what\s+you.?ve\s+done\s+to\s+me",
            r"you\s+drove\s+me\s+to\s+(this|it|drink|cry)",
        ],
    ),
    (
        "gaslighting",
        9,
        &[
            r"that\s+never\s+happened",
            r"that\s+didn.?t\s+happen",
            r"you.?re\s+(imagining|making)\s+(things|that|it)\s+up",
            r"you.?re\s+remembering\s+(it\s+)?wrong",
            r"that.?s\s+not\s+what\s+(happened|i\s+said|i\s+meant)",
            r"you.?re\s+(crazy|insane|delusional|paranoid|losing\s+it|losing\s+your\s+mind|unhinged|unstable|mental|nuts)",
            r"you\s+sound\s+crazy",
            r"you.?re\s+the\s+only\s+one\s+who\s+thinks\s+that",
            r"something\s+is\s+(wrong|off)\s+with\s+you",
            r"you.?re\s+too\s+sensitive",
            r"you.?re\s+(overreacting|being\s+dramatic|being\s+emotional)",
            r"stop\s+being\s+(so\s+)?(dramatic|sensitive|emotional|crazy|hysterical)",
            r"you\s+always\s+twist\s+(things|everything|my\s+words)",
            r"can.?t\s+you\s+take\s+a\s+joke",
            r"no\s+one\s+(else\s+)?(thinks|would\s+think|agrees\s+with\s+you)",
            r"everyone\s+(thinks|knows|says|agrees)\s+(you.?re|you\s+are|that\s+you)",
            r"ask\s+anyone",
        ],
    ),
    (
        "criticism",
        5,
        &[
            r"you\s+always\s+(do|are|make|ruin|mess|forget|ignore)",
            r"you\s+never\s+(do|are|help|listen|remember|learn|try|think)",
            r"what.?s\s+wrong\s+with\s+you",
            r"what\s+kind\s+of\s+(person|man|woman)\s+(are\s+you|does\s+that)",
            r"you.?re\s+just\s+like\s+your\s+(mom|dad|mother|father|ex)",
            r"you\s+can.?t\s+do\s+anything\s+right",
            r"you.?re\s+(impossible|hopeless|incapable|incompetent)",
        ],
    ),
    (
        "contempt",
        6,
        &[
            r"\b(duh|obviously|clearly)\b.*\byou",
            r"you.?re\s+so\s+(dumb|stupid|clueless|slow|dense|thick)",
            r"grow\s+up",
            r"act\s+your\s+age",
            r"are\s+you\s+(a\s+)?(child|kid|baby|infant)",
            r"that.?s\s+the\s+dumbest\s+thing",
            r"you\b.*\bpathetic",
            r"\beye\s*roll\b",
            r"you.?re\s+not\s+(smart|good|capable|strong|mature)\s+enough",
        ],
    ),
    (
        "defensiveness",
        3,
        &[
            r"it.?s\s+not\s+my\s+fault",
            r"i\s+didn.?t\s+do\s+anything\s+(wrong|bad)",
            r"why\s+are\s+you\s+attacking\s+me",
            r"i\s+was\s+just\s+trying\s+to\s+(help|be\s+nice)",
            r"you\s+started\s+(it|this)",
            r"you.?re\s+the\s+one\s+who",
            r"yeah\s+but\s+you",
            r"well\s+you\s+also",
        ],
    ),
    (
        "stonewalling",
        3,
        &[
            r"this\s+conversation\s+is\s+over",
            r"i\s+have\s+nothing\s+(more\s+)?(to\s+say|else\s+to\s+say)",
            r"i.?m\s+done\s+talking",
            r"i\s+don.?t\s+want\s+to\s+(talk|hear|discuss)\s+(about\s+)?(this|it)",
            r"don.?t\s+talk\s+to\s+me",
            r"i.?m\s+not\s+listening",
        ],
    ),
    (
        "control",
        8,
        &[
            r"who\s+(are|were)\s+you\s+(with|talking\s+to|texting|calling|seeing)",
            r"(show|let)\s+me\s+(see\s+)?your\s+(phone|messages|texts|email|dms)",
            r"you\s+don.?t\s+need\s+(them|friends|anyone\s+else|to\s+go\s+out)",
            r"i.?m\s+the\s+only\s+one\s+who\s+(loves|cares|understands|knows)\s+you",
            r"you\s+have\s+to\s+(choose|pick)\s+(me|between)",
            r"you\s+spend\s+too\s+much\s+time\s+with",
            r"i\s+need\s+to\s+know\s+where\s+you\s+are",
            r"(send|share)\s+(me\s+)?your\s+location",
            r"you\s+need\s+(my\s+)?permission",
        ],
    ),
    (
        "financial_control",
        8,
        &[
            r"i\s+pay\s+(for\s+)?everything",
            r"my\s+money",
            r"you\s+owe\s+me",
            r"i.?ll\s+(cut|stop)\s+(you\s+off|paying|supporting|helping)",
            r"you.?re\s+a\s+(financial\s+)?burden",
        ],
    ),
    (
        "weaponize_family",
        10,
        &[
            r"dead\s+(sister|brother|sibling|baby|child|friend)",
            r"leave\s+you\s+in\s+the\s+hospital",
            r"your\s+(mom|dad|mother|father|parent)\s+(is|was)\s+(a|an)\s+\w+",
            r"you.?re\s+going\s+to\s+end\s+up\s+like\s+your\s+(mom|dad|mother|father)",
        ],
    ),
    (
        "guilt_trip",
        5,
        &[
            r"after\s+everything\s+i.?(ve)?\s+(done|did|gave|sacrificed)",
            r"i\s+(gave|did|sacrificed)\s+(so\s+much|everything)",
            r"you.?d\s+be\s+nothing\s+without\s+me",
            r"i\s+put\s+up\s+with\s+(so\s+much|everything|all\s+your)",
            r"i\s+dropped\s+everything\s+for\s+you",
        ],
    ),
    (
        "deflection",
        4,
        &[
            r"that.?s\s+not\s+the\s+point",
            r"we.?re\s+not\s+talking\s+about",
            r"what\s+about\s+when\s+you",
            r"remember\s+when\s+you",
            r"well\s+what\s+about",
        ],
    ),
    (
        "ultimatum",
        7,
        &[
            r"(then\s+)?we.?re\s+(done|through|over|finished)",
            r"never\s+see\w*\s+you\s+again",
            r"stop\s+texting\s+me",
            r"leave\s+me\s+alone",
            r"this\s+is\s+your\s+last\s+chance",
            r"you.?re\s+going\s+to\s+lose\s+me",
        ],
    ),
    (
        "looping",
        7,
        &[
            r"over\s+and\s+over(\s+and\s+over)?(\s+again)?",
            r"i.?ll\s+keep\s+asking",
            r"we.?re\s+not\s+done\s+(talking|discussing)",
            r"answer\s+the\s+question",
            r"just\s+answer\s+me",
        ],
    ),
    (
        "lying_indicator",
        5,
        &[
            r"i\s+(already|just)\s+told\s+you",
            r"you.?re\s+putting\s+words\s+in\s+my\s+mouth",
            r"why\s+(do|would)\s+i\s+(lie|make\s+that\s+up)",
            r"i\s+swear\s+i\s+didn.?t",
            r"believe\s+what\s+you\s+want",
            r"i\s+would\s+never\s+do\s+that",
        ],
    ),
    (
        "minimizing",
        4,
        &[
            r"it.?s\s+not\s+(that\s+)?(big\s+of\s+a|a\s+big)\s+deal",
            r"you.?re\s+(blowing|making)\s+(this|it)\s+(out\s+of\s+proportion|into\s+a\s+big\s+deal|bigger)",
            r"get\s+over\s+it",
            r"why\s+are\s+you\s+still\s+(upset|mad|angry|bringing\s+this\s+up)",
            r"move\s+on\s+already",
        ],
    ),
    (
        "love_bombing",
        6,
        &[
            r"you.?re\s+my\s+(everything|world|soulmate|other\s+half)",
            r"we.?re\s+(meant|destined)\s+to\s+be",
            r"you\s+complete\s+me",
            r"no\s+one\s+(will\s+ever|could\s+ever)\s+(love|understand|know)\s+you\s+like\s+i\s+do",
        ],
    ),
    (
        "future_faking",
        5,
        &[
            r"i\s+promise\s+i.?ll\s+(change|be\s+better|stop|never\s+do\s+it\s+again)",
            r"things\s+will\s+(be\s+)?different\s+(this\s+time|from\s+now\s+on)",
            r"just\s+give\s+me\s+(one\s+more|another)\s+chance",
            r"it\s+won.?t\s+happen\s+again",
        ],
    ),
    (
        "triangulation",
        6,
        &[
            r"even\s+(my|your)\s+(mom|dad|friend|sister|brother)\s+(thinks|said|agrees)",
            r"at\s+least\s+(he|she|they|my\s+ex)\s+(didn.?t|would|never|always)",
            r"maybe\s+i\s+should\s+(go\s+back\s+to|be\s+with|call)\s+(my\s+)?ex",
            r"other\s+(guys|girls|people|men|women)\s+(would|don.?t|wouldn.?t)",
        ],
    ),
    (
        "emotional_blackmail",
        9,
        &[
            r"if\s+you\s+(loved|cared\s+about|really\s+loved)\s+me.*you\s+(would|wouldn.?t)",
            r"if\s+you\s+leave\s+i.?ll\s+(kill\s+myself|hurt\s+myself|die|be\s+nothing)",
            r"i\s+can.?t\s+(go\s+on|survive|live)\s+without\s+you",
            r"a\s+(real|good|loving)\s+(boyfriend|girlfriend|partner|husband|wife)\s+would",
        ],
    ),
    (
        "silent_treatment",
        3,
        &[
            r"i.?m\s+not\s+(going\s+to\s+)?(talk|speak|respond|answer|reply)\s+to\s+you",
            r"don.?t\s+(bother\s+)?(calling|texting|messaging|contacting)\s+me",
            r"you.?ll\s+hear\s+from\s+me\s+when\s+i.?m\s+ready",
        ],
    ),
    (
        "double_bind",
        7,
        &[
            r"(damned|screwed)\s+if\s+you\s+do.*(damned|screwed)\s+if\s+you\s+don.?t",
            r"whatever\s+you\s+do\s+(is\s+)?(wrong|not\s+good\s+enough|a\s+problem)",
            r"nothing\s+you\s+do\s+is\s+(ever\s+)?(right|enough|good\s+enough)",
        ],
    ),
    (
        "prank_test",
        5,
        &[
            r"i\s+was\s+(just\s+)?testing",
            r"i\s+wanted\s+to\s+see\s+(how|if|what)\s+you",
        ],
    ),
    (
        "selective_memory",
        4,
        &[
            r"i\s+forgot\s+to\s+(mention|tell\s+you|say)",
            r"i\s+didn.?t\s+tell\s+you\s+(because|since)",
        ],
    ),
    (
        "catastrophizing",
        3,
        &[
            r"(everything|nothing)\s+(is\s+)?(ruined|terrible|awful|broken|falling\s+apart|a\s+disaster)",
            r"nothing\s+ever\s+(works|goes\s+right|changes)",
            r"(my|our)\s+life\s+is\s+(ruined|over|destroyed|a\s+disaster)",
        ],
    ),
    (
        "demand_compliance",
        4,
        &[
            r"just\s+(do|say|agree|admit|accept)\s+(it|what\s+i)",
            r"say\s+(you.?re\s+)?sorry",
            r"admit\s+(it|what\s+you\s+did|you\s+were\s+wrong)",
            r"agree\s+with\s+me",
        ],
    ),
];

static CATEGORIES: Lazy<Vec<BehavioralCategory>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|&(name, severity, patterns)| BehavioralCategory {
            name,
            severity,
            patterns: compile_all(patterns),
        })
        .collect()
});

/// One behavioral-pattern hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BehavioralMatch {
    pub category: &'static str,
    pub severity: u8,
    pub matched: String,
}

/// Severity of a category, 0 when unknown.
pub fn severity(category: &str) -> u8 {
    TABLE
        .iter()
        .find(|(name, _, _)| *name == category)
        .map(|&(_, sev, _)| sev)
        .unwrap_or(0)
}

pub fn is_mild(category: &str) -> bool {
    MILD_SKIP.contains(&category)
}

/// Every category name in library order.
pub fn category_names() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|&(name, _, _)| name)
}

/// All pattern hits in normalized `text`, one per matching regex.
/// With `benign_context` set, the [`MILD_SKIP`] categories are not evaluated.
pub fn detect(text: &str, benign_context: bool) -> Vec<BehavioralMatch> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for cat in CATEGORIES.iter() {
        if benign_context && is_mild(cat.name) {
            continue;
        }
        for re in &cat.patterns {
            if let Some(m) = re.find(text) {
                out.push(BehavioralMatch {
                    category: cat.name,
                    severity: cat.severity,
                    matched: m.as_str().to_string(),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(text: &str, benign: bool) -> Vec<&'static str> {
        detect(text, benign).into_iter().map(|m| m.category).collect()
    }

    #[test]
    fn library_has_27_categories_with_valid_severities() {
        assert_eq!(category_names().count(), 27);
        for name in category_names() {
            let s = severity(name);
            assert!((3..=10).contains(&s), "{name}: {s}");
        }
        for mild in MILD_SKIP {
            assert!(severity(mild) > 0, "{mild} missing from table");
        }
    }

    #[test]
    fn gaslighting_is_never_suppressed() {
        let c = cats("that never happened, you're crazy", true);
        assert!(c.contains(&"gaslighting"));
    }

    #[test]
    fn mild_categories_drop_under_benign_context() {
        let text = "it's not my fault";
        assert!(cats(text, false).contains(&"defensiveness"));
        assert!(!cats(text, true).contains(&"defensiveness"));
    }

    #[test]
    fn attack_requires_a_loaded_verb() {
        assert!(cats("you always ruin everything", false).contains(&"attack"));
        assert!(!cats("you always look nice", false).contains(&"attack"));
    }
}
