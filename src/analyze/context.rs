// src/analyze/context.rs
//! Context filters: predicates that tell apart negativity aimed at the
//! partner from apologies, self-talk, venting about third parties, jokes,
//! hurt, and stress.
//!
//! Text predicates take normalized text (see `message::normalize_text`).
//! Window predicates read precomputed per-message signals from [`DaySignals`],
//! so every body is matched once per day.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::ContextConfig;
use crate::lexicon::{any_match, compile_all};
use crate::message::{Direction, Message};
use crate::rolling;

static APOLOGY: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b(i.?m |im |i am )?(really |so |truly |very )?(sorry|apologize|apologise)\b",
        r"\bmy bad\b",
        r"\bmy fault\b",
        r"\bi was wrong\b",
        r"\bi shouldn.?t have\b",
        r"\bi should have\b",
        r"\bforgive me\b",
        r"\bplease.*chance\b",
        r"\bi.?ll (do |try |be )better\b",
        r"\bi (messed|screwed|fucked) up\b",
        r"\byou.?re right\b",
        r"\byou were right\b",
    ])
});

static SELF_DIRECTED: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\bi.?m\s+(a |an |such a |the )?(shit|ass|idiot|stupid|terrible|worst|bad|awful|mess)",
        r"\bi\s+(suck|hate myself|messed up|screwed up|fucked up)\b",
        r"\bi\s+should\s+(shut up|stop|have)\b",
        r"\bmy fault\b",
        r"\bmy bad\b",
        r"\bi was wrong\b",
    ])
});

static THIRD_PARTY: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b(my |the )?(worker|boss|client|customer|employee|coworker|colleague|manager|contractor|guy|tenant)s?\b",
        r"\b(this |that |the )?(job|work|company|business|office|site)\b.*\b(sucks?|terrible|awful|shit|fuck|annoying|ridiculous)\b",
        r"\b(my |the )?(car|truck|phone|computer|laptop)\b.*\b(broke|dead|fucked|shit)\b",
        r"\b(traffic|weather|subway|train|bus)\b.*\b(sucks?|awful|terrible|shit|fuck)\b",
    ])
});

static DE_ESCALATION: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b(let.?s |can we |we should )(stop|calm|relax|chill|drop it|move on|not fight|not argue)\b",
        r"\b(please |just )?(calm down|stop fighting|stop arguing|stop this|enough)\b",
        r"\bcan we (just |please )?(talk|discuss) (calmly|nicely|like adults|normally)\b",
        r"\bi don.?t want to (fight|argue)\b",
        r"\blet.?s not (fight|argue|do this)\b",
        r"\bcan we (move on|move past|drop)\b",
        r"\bi.?m (trying to|not trying to)\s*(fight|argue|upset you|make you mad)\b",
        r"\bleave me alone\b",
        r"\bi need (a |some )?(space|break|minute|time)\b",
        r"\bplease stop\b",
        r"\blet.?s just\b.*\b(tomorrow|later|another time|sleep|rest)\b",
    ])
});

static HURT: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b(sounds like|feels like|seems like)\s+you\s+(don.?t|do not|doesn.?t)\s*(want|wanna|care|like|love|miss)",
        r"\byou\s+(don.?t|do not)\s+(want to|wanna)\s+(see|be with|talk to|hang out|spend time)",
        r"\byou\s+(don.?t|do not)\s+(want|wanna)\s+me\b",
        r"\byou\s+(don.?t|do not)\s+(miss|need|love)\s+me\b",
        r"\bi\s+(miss|love|need)\s+you\b",
        r"\bwish\s+you\s+would\b",
        r"\bi\s+wish\b.*\b(see|talk|time|together)\b",
        r"\bthis\s+(sucks|hurts|isn.?t fair|is hard)\b",
        r"\bi\s+(don.?t|do not)\s+know\s+what\s+to\s+(do|say)\b",
        r"\byou\s+(don.?t|do not)\s+know\s+what\s+to\s+do\b",
        r"\bwhat\s+(am|do)\s+i\s+supposed\s+to\b",
        r"\bi\s+(don.?t|do not)\s+want(a|\s+to)\s+(argue|fight|lose|bother|upset)\b",
        r"\bare\s+you\s+(dumping|breaking|leaving|done with)\b",
        r"\bare\s+you\s+ok\b",
        r"\bplease\s+(don.?t|do not)\s+(dump|leave|break up|go)\b",
        r"\bi\s+hope\s+you.?(re|\s+are)\s+ok\b",
        r"\bi\s+expect(ed)?\s+to\b.*\b(nice|good|great|time|see|together)\b",
        r"\bwaiting\s+to\s+spend\s+time\b",
        r"\bwant(ed)?\s+to\s+(see|be with|spend)\b",
        r"\bsorry\s+(i|im|i.?m)\s+(so\s+)?(tired|late|exhausted|sleepy|busy)\b",
        r"\byou.?re\s+not\s+(listening|hearing|understanding)\b",
        r"\bmaybe\s+(i|you)\s+(just|should)\b",
        r"\bidk\s+what\s+to\s+(say|do)\b",
    ])
});

/// Laughter / playful markers for the joke-context count.
static JOKE_SIGNALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?:\b(?:lol|lmao|lmfao|haha+|rofl)\b|😂|🤣|😆|😹|💀)",
        r"^(?:lol|haha|lmao|😂)$",
        r"\b(?:jk|just kidding|joking|kidding)\b",
        r"(?:🤪|😜|😝|🤡|😏|😈|🙃)",
    ])
});

static BANTER_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\b(?:lol|lmao|haha+|omg|bruh|bro|dude)\b|😂|🤣|💀|😭|😆)")
        .expect("banter pattern")
});

/// Broader playful markers used for day-level banter blocks.
static PLAYFUL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\b(?:lol|lmao|lmfao|haha+|rofl|omg|bruh|dude|bro|jk|kidding|joking)\b|😂|🤣|😆|💀|🤪|😜|😝|🙃|😏|😈|🤡|😭)",
    )
    .expect("playful pattern")
});

/// Stressor categories: exhaustion, workload, caregiving, injury, safety, bereavement.
static STRESSORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b(tired|exhausted|sleepy|sleep|rest|nap|fell\s+asleep|woke\s+up)\b",
        r"\b(work|install|job|client|project|hours|shift|overtime)\b",
        r"\b(mom|dad|seizure|cancer|hospital|doctor|surgery|broken\s+rib|caregiver)\b",
        r"\b(hurt|injury|back\s+pain|dizzy|sick)\b",
        r"\b(stalk|stalker|creep|porch|camera|police)\b",
        r"\b(sister|passed\s+away|funeral|death|grief|mourning)\b",
    ])
});

static SECOND_PERSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\byou\b|\byour\b|\byou.?re\b|\byou.?ve\b|\byou.?ll\b").expect("second person")
});

static CURT_REPLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(k|ok|fine|whatever|sure|bye|goodnight|good night|stop|enough|wow|smh|lol|mhm|yep|yea|nah|no|yes)\s*\.?$",
    )
    .expect("curt reply pattern")
});

pub fn is_apology(text: &str) -> bool {
    !text.is_empty() && any_match(&APOLOGY, text)
}

pub fn is_self_directed(text: &str) -> bool {
    !text.is_empty() && any_match(&SELF_DIRECTED, text)
}

/// Negativity about work, objects, weather: someone other than the partner.
pub fn is_third_party_venting(text: &str) -> bool {
    !text.is_empty() && any_match(&THIRD_PARTY, text)
}

/// Calming or disengaging phrasing. Includes "leave me alone".
pub fn is_de_escalation(text: &str) -> bool {
    !text.is_empty() && any_match(&DE_ESCALATION, text)
}

pub fn is_expressing_hurt(text: &str) -> bool {
    !text.is_empty() && any_match(&HURT, text)
}

pub fn contains_second_person_reference(text: &str) -> bool {
    SECOND_PERSON.is_match(text)
}

/// A whole message that is a one-word reply ("k", "fine", "wow", ...).
pub fn is_curt_reply(text: &str) -> bool {
    CURT_REPLY.is_match(text.trim())
}

pub fn is_playful(text: &str) -> bool {
    PLAYFUL.is_match(text)
}

fn stressor_mask(text: &str) -> u8 {
    STRESSORS
        .iter()
        .enumerate()
        .filter(|(_, re)| re.is_match(text))
        .fold(0u8, |acc, (bit, _)| acc | (1 << bit))
}

/// Per-message signals for the window predicates, computed once per day.
#[derive(Debug, Clone, Default)]
pub struct DaySignals {
    pub directions: Vec<Direction>,
    pub empty: Vec<bool>,
    pub laughing: Vec<bool>,
    pub banter_word: Vec<bool>,
    pub playful: Vec<bool>,
    stressors: Vec<u8>,
}

impl DaySignals {
    /// `texts` are the normalized bodies, index-aligned with `messages`.
    pub fn new(messages: &[Message], texts: &[String]) -> Self {
        debug_assert_eq!(messages.len(), texts.len());
        let mut s = DaySignals::default();
        for (m, t) in messages.iter().zip(texts) {
            s.directions.push(m.direction);
            s.empty.push(t.trim().is_empty());
            s.laughing.push(any_match(&JOKE_SIGNALS, t));
            s.banter_word.push(BANTER_WORDS.is_match(t));
            s.playful.push(PLAYFUL.is_match(t));
            s.stressors.push(stressor_mask(t));
        }
        s
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// All context flags for one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    pub is_apology: bool,
    pub is_self_directed: bool,
    pub is_third_party_venting: bool,
    pub is_joke_context: bool,
    pub is_banter: bool,
    pub is_de_escalation: bool,
    pub is_expressing_hurt: bool,
    pub is_stressor_context: bool,
    pub has_second_person: bool,
    pub is_curt_reply: bool,
    /// De-escalation phrasing that the tone lexicon also reads as escalation
    /// ("leave me alone").
    pub deescalation_overlaps_escalation: bool,
}

impl ContextFlags {
    /// Apology or de-escalation: the message is trying to calm things down.
    pub fn is_calming(&self) -> bool {
        self.is_apology || self.is_de_escalation
    }

    /// Any context under which mild behavioral categories are skipped.
    pub fn is_benign(&self) -> bool {
        self.is_apology
            || self.is_self_directed
            || self.is_third_party_venting
            || self.is_de_escalation
            || self.is_expressing_hurt
            || self.is_joke_context
            || self.is_banter
    }
}

/// Window-aware filter bank, parameterized by [`ContextConfig`].
#[derive(Debug, Clone)]
pub struct ContextFilterBank {
    cfg: ContextConfig,
}

impl Default for ContextFilterBank {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl ContextFilterBank {
    pub fn new(cfg: ContextConfig) -> Self {
        Self { cfg }
    }

    /// At least `joke_min_messages` messages within ±`joke_radius` carry laughter.
    pub fn is_joke_context(&self, sig: &DaySignals, i: usize) -> bool {
        let range = rolling::inclusive(i, self.cfg.joke_radius, sig.len());
        sig.laughing[range].iter().filter(|&&l| l).count() >= self.cfg.joke_min_messages
    }

    /// Banter markers from both directions within ±`banter_radius`.
    pub fn is_banter(&self, sig: &DaySignals, i: usize) -> bool {
        let range = rolling::inclusive(i, self.cfg.banter_radius, sig.len());
        let mut sent = false;
        let mut received = false;
        for j in range {
            if sig.banter_word[j] {
                match sig.directions[j] {
                    Direction::Sent => sent = true,
                    Direction::Received => received = true,
                }
            }
        }
        sent && received
    }

    /// Enough distinct stressor categories in the surrounding window.
    /// False for an empty body.
    pub fn is_legitimate_stressor_context(&self, sig: &DaySignals, i: usize) -> bool {
        if sig.empty.get(i).copied().unwrap_or(true) {
            return false;
        }
        let range = rolling::half_open(
            i,
            self.cfg.stressor_before,
            self.cfg.stressor_after,
            sig.len(),
        );
        let mask = sig.stressors[range].iter().fold(0u8, |acc, m| acc | m);
        mask.count_ones() as usize >= self.cfg.stressor_min_categories
    }

    /// Evaluate every filter for message `i`. `text` is its normalized body and
    /// `tone_escalates` whether the tone lexicon found escalation in it.
    pub fn flags(&self, sig: &DaySignals, i: usize, text: &str, tone_escalates: bool) -> ContextFlags {
        let is_de_escalation = is_de_escalation(text);
        ContextFlags {
            is_apology: is_apology(text),
            is_self_directed: is_self_directed(text),
            is_third_party_venting: is_third_party_venting(text),
            is_joke_context: self.is_joke_context(sig, i),
            is_banter: self.is_banter(sig, i),
            is_de_escalation,
            is_expressing_hurt: is_expressing_hurt(text),
            is_stressor_context: self.is_legitimate_stressor_context(sig, i),
            has_second_person: contains_second_person_reference(text),
            is_curt_reply: is_curt_reply(text),
            deescalation_overlaps_escalation: is_de_escalation && tone_escalates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::normalize_text;

    fn day(msgs: &[(Direction, &str)]) -> (Vec<Message>, Vec<String>) {
        let messages: Vec<Message> = msgs
            .iter()
            .enumerate()
            .map(|(i, (d, b))| Message::new(i as i64 * 60_000, *d, *b))
            .collect();
        let texts = messages.iter().map(|m| normalize_text(m.text())).collect();
        (messages, texts)
    }

    #[test]
    fn text_predicates() {
        assert!(is_apology("i'm sorry, i was an idiot"));
        assert!(is_self_directed("i'm such a mess today"));
        assert!(is_third_party_venting("my boss is shit"));
        assert!(is_third_party_venting("traffic fucking sucks"));
        assert!(is_de_escalation("can we stop fighting"));
        assert!(is_de_escalation("leave me alone"));
        assert!(is_expressing_hurt("sounds like you don't wanna see me"));
        assert!(!is_apology(""));
        assert!(!is_de_escalation("dinner at 7?"));
    }

    #[test]
    fn second_person_and_curt() {
        assert!(contains_second_person_reference("you're late"));
        assert!(!contains_second_person_reference("youth soccer"));
        assert!(is_curt_reply("k."));
        assert!(is_curt_reply("wow"));
        assert!(!is_curt_reply("ok see you soon"));
    }

    #[test]
    fn joke_context_needs_two_laughing_messages() {
        use Direction::*;
        let (m, t) = day(&[(Sent, "this is bullshit lol"), (Received, "haha 😂")]);
        let sig = DaySignals::new(&m, &t);
        let bank = ContextFilterBank::default();
        assert!(bank.is_joke_context(&sig, 0));

        let (m, t) = day(&[(Sent, "this is bullshit lol"), (Received, "why")]);
        let sig = DaySignals::new(&m, &t);
        assert!(!bank.is_joke_context(&sig, 0));
    }

    #[test]
    fn banter_needs_both_sides() {
        use Direction::*;
        let (m, t) = day(&[(Sent, "lol"), (Sent, "omg"), (Received, "ok")]);
        let sig = DaySignals::new(&m, &t);
        let bank = ContextFilterBank::default();
        assert!(!bank.is_banter(&sig, 1));

        let (m, t) = day(&[(Sent, "lol"), (Received, "bruh 😂")]);
        let sig = DaySignals::new(&m, &t);
        assert!(bank.is_banter(&sig, 0));
    }

    #[test]
    fn stressor_context_needs_two_categories() {
        use Direction::*;
        let (m, t) = day(&[
            (Received, "so tired, barely slept"),
            (Received, "mom is back in the hospital"),
            (Received, "why don't you ever call"),
        ]);
        let sig = DaySignals::new(&m, &t);
        let bank = ContextFilterBank::default();
        assert!(bank.is_legitimate_stressor_context(&sig, 2));

        let (m, t) = day(&[(Received, "so tired"), (Received, "why don't you ever call")]);
        let sig = DaySignals::new(&m, &t);
        assert!(!bank.is_legitimate_stressor_context(&sig, 1));

        let (m, t) = day(&[(Received, "tired from work"), (Sent, "")]);
        let sig = DaySignals::new(&m, &t);
        assert!(!bank.is_legitimate_stressor_context(&sig, 1));
    }

    #[test]
    fn leave_me_alone_overlap_flag() {
        let (m, t) = day(&[(Direction::Sent, "leave me alone")]);
        let sig = DaySignals::new(&m, &t);
        let f = ContextFilterBank::default().flags(&sig, 0, &t[0], true);
        assert!(f.is_de_escalation);
        assert!(f.deescalation_overlaps_escalation);
        assert!(f.is_calming());
    }
}
