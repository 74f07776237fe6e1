// src/lexicon/provocation.rs
//! Provocation lexicon: accusations, dismissals, guilt trips, ultimatums and
//! character attacks that start fights without needing a single swear word.
//!
//! Scored independently of the context filters.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, Category, LexicalHit, Pattern};

pub const MAX_PROVOCATION: u8 = 4;

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    compile(&[
        // direct accusations
        ("accusation", 3, r"you\s+(did|do)\s+(this|that|it)\s+on\s+purpose"),
        ("accusation", 3, r"you\s+(fuck|screw|mess)\s+(me|us|everything)\s+(over|up)"),
        ("accusation", 2, r"you\s+(lied|lie|lying|manipulat)"),
        (
            "accusation",
            2,
            r"you\s+(don.?t|never|didn.?t)\s+(care|listen|try|help|support|show up|stand up|prioriti)",
        ),
        (
            "accusation",
            2,
            r"you\s+(don.?t|never)\s+(put|make|give)\s+(any|an|zero|no)\s*(effort|time|energy|priority)",
        ),
        (
            "accusation",
            2,
            r"you\s+(always|constantly|keep|never stop)\s+(cancel|flake|bail|disappoint|let me down|push me away)",
        ),
        // character attacks / dismissals
        (
            "dismissal",
            1,
            r"you\s+(don.?t|do not)\s+(even\s+)?(know|understand|see|get|realize)",
        ),
        (
            "character_attack",
            2,
            r"you.?re\s+(unreliable|selfish|awful|terrible|the\s+problem|the\s+worst)",
        ),
        (
            "dismissal",
            2,
            r"you\s+(don.?t|never|didn.?t)\s+(appreciate|acknowledge|admit|recognize)",
        ),
        (
            "minimizing",
            1,
            r"(it.?s|that.?s)\s+(not that|not even|really not)\s+(hard|difficult|complicated)",
        ),
        ("minimizing", 1, r"everyone\s+else\s+(can|does|would)"),
        // guilt tripping
        ("guilt_trip", 1, r"(i.?m|i am)\s+still\s+(here|talking|trying|with you)"),
        ("guilt_trip", 1, r"that.?s\s+(compassion|love|patience|effort)"),
        (
            "guilt_trip",
            1,
            r"after\s+(everything|all|what)\s+i\s+(did|do|gave|done|sacrificed)",
        ),
        // ultimatums / threatening the end
        ("ultimatum", 2, r"(fine\s+then|okay\s+then)\s+(don.?t|leave|go|bye|whatever)"),
        ("ultimatum", 2, r"maybe\s+(we|you)\s+should\s+(just|break|stop|end)"),
        ("ultimatum", 2, r"i\s+(didn.?t|don.?t)\s+shut\s+up\s+fast\s+enough"),
        // accusing of punishment / control
        ("punishment_accusation", 3, r"you\s+(cancel|did this)\s+to\s+punish"),
        (
            "punishment_accusation",
            2,
            r"because\s+i\s+didn.?t\s+do\s+what\s+you\s+want",
        ),
        // minimizing the partner's situation
        (
            "minimizing",
            2,
            r"you\s+(just|only)\s+want\s+(me\s+to|to)\s+(shut|stop|be quiet|drop|accept)",
        ),
        (
            "minimizing",
            2,
            r"without\s+putting\s+in\s+(an\s+ounce|any|zero|no)\s*(of)?\s*(work|effort)",
        ),
        // sarcastic agreement
        ("sarcastic_agreement", 2, r"(it was|it.?s)\s+all\s+my\s+fault"),
        (
            "sarcastic_agreement",
            1,
            r"(right|sure|okay),?\s+(it.?s|i.?m)\s+(all|always|never)\s+(my|the)",
        ),
        // dismissing abilities / intelligence
        (
            "ability_dismissal",
            2,
            r"you\s+(don.?t|do not)\s+(even\s+)?(know|have)\s+(what|the)\s+(you.?re|basics)",
        ),
        ("ability_dismissal", 2, r"(it.?s|that.?s)\s+got\s+you\s+convinced"),
        ("ability_dismissal", 2, r"you\s+(have|got)\s+(nothing|something)\s+worthwhile"),
        (
            "ability_dismissal",
            2,
            r"you\s+(don.?t|do not)\s+have\s+(something|anything)\s+worth",
        ),
        ("ability_dismissal", 2, r"you\s+don.?t\s+even\s+know"),
        // direct blame
        ("blame", 3, r"(this|that|it)\s+is\s+your\s+fault"),
        ("blame", 3, r"(this|that).?s\s+your\s+fault"),
        ("blame", 2, r"\byour\s+fault\b"),
        // projecting hostility
        (
            "hostility_projection",
            2,
            r"you\s+(were|are|being)\s+(actively\s+)?(hostile|aggressive|mean|cruel|awful|nasty)",
        ),
        (
            "hostility_projection",
            2,
            r"you\s+treated\s+me\s+like\s+(i was|a|i.?m)\s+(a\s+)?(jerk|idiot|moron|nothing|garbage|shit|trash)",
        ),
        // catastrophizing about the partner
        ("catastrophizing", 3, r"you.?re\s+alone\s+because\s+you"),
        ("catastrophizing", 3, r"you\s+drive\s+everyone\s+away"),
        (
            "catastrophizing",
            2,
            r"you\s+(always|constantly|keep)\s+(push|drive|scare)\s+(me|people|everyone)\s+away",
        ),
        // past wrongs as weapons
        (
            "past_grievance",
            2,
            r"(your|you)\s+(family|parents|dad|mom)\s+(fucked|screwed|messed|let)",
        ),
        (
            "past_grievance",
            2,
            r"you\s+(went back|broke|violated)\s+(on|our)\s+(agreement|promise|deal)",
        ),
    ])
});

/// "sorry I didn't ..." only counts as weaponized when paired with a jab.
static SARCASTIC_SORRY: Lazy<(Regex, Regex)> = Lazy::new(|| {
    (
        Regex::new(r"sorry\s+(i|that i)\s+(didn.?t|got|couldn.?t|freaked|had)")
            .expect("sarcastic sorry pattern"),
        Regex::new(r"(shut up|fall down|freak|trash|upset)").expect("sarcastic sorry jab"),
    )
});

/// Provocation score of normalized `text`, pushing one hit per matched pattern.
pub fn scan(text: &str, hits: &mut Vec<LexicalHit>) -> u8 {
    let mut score: u8 = 0;
    for p in PATTERNS.iter() {
        if p.is_match(text) {
            hits.push(LexicalHit {
                category: Category::Provocation,
                label: p.label,
                weight: p.weight,
            });
            score = score.saturating_add(p.weight);
        }
    }

    let (sorry, jab) = &*SARCASTIC_SORRY;
    if sorry.is_match(text) && jab.is_match(text) {
        hits.push(LexicalHit {
            category: Category::Provocation,
            label: "sarcastic_apology",
            weight: 2,
        });
        score = score.saturating_add(2);
    }

    score.min(MAX_PROVOCATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prov(text: &str) -> u8 {
        scan(&crate::message::normalize_text(text), &mut Vec::new())
    }

    #[test]
    fn never_listen_is_two() {
        assert_eq!(prov("you never listen to me"), 2);
    }

    #[test]
    fn blame_stacks_and_caps_at_four() {
        // "this is your fault"(3) + "your fault"(2) = 5 → 4
        assert_eq!(prov("this is your fault"), MAX_PROVOCATION);
    }

    #[test]
    fn sarcastic_sorry_needs_a_jab() {
        assert_eq!(prov("sorry i didn't reply, was driving"), 0);
        assert_eq!(prov("sorry i didn't shut up fast enough"), MAX_PROVOCATION);
    }

    #[test]
    fn profanity_alone_is_not_provocation() {
        assert_eq!(prov("fuck this traffic"), 0);
    }
}
