// src/analyze/initiator.rs
//! Who started it.
//!
//! The first hostile message in an argument is often the *reaction*. The
//! attributor searches a window that reaches well before the block start and
//! prefers a provocation over the hostility it provoked.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::AnnotatedDay;
use crate::config::EpisodeConfig;
use crate::lexicon::compile_all;
use crate::message::Direction;
use crate::rolling;

/// Provocation / hostility level that counts as "strong".
const STRONG: u8 = 2;

/// Dismissive "you don't ... care / listen / ..." needs both halves.
static DISMISSIVE_SUBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"you\s+(don.?t|can.?t|won.?t|never|didn.?t|aren.?t)").expect("dismissive subject")
});
static DISMISSIVE_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(know|care|try|listen|understand|appreciate|acknowledge|realize|get it|show|plan|effort|change)",
    )
    .expect("dismissive object")
});
static BLAME_OR_QUESTION: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(your fault|you.?re wrong|you.?re the|because of you|blame you)",
        r"(why\s+(do|did|can.?t|don.?t|won.?t)\s+you|what.?s wrong with you|are you serious)",
    ])
});

/// Content the provocation lexicon may miss but that still pushes buttons.
pub fn is_implicit_provocation(text: &str) -> bool {
    (DISMISSIVE_SUBJECT.is_match(text) && DISMISSIVE_OBJECT.is_match(text))
        || BLAME_OR_QUESTION.iter().any(|re| re.is_match(text))
}

/// Which rule picked the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerBasis {
    /// Strong provocation at or before the first strong hostility.
    Provocation,
    StrongHostility,
    /// Mild hostility answering an earlier provocation from the other side.
    /// The search runs backward, so the nearest prompt wins, not the earliest.
    PriorProvocation,
    MildHostility,
    /// Nothing qualified in the search window.
    Unattributed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribution {
    /// `None` when unattributed.
    pub direction: Option<Direction>,
    pub trigger_index: usize,
    pub basis: TriggerBasis,
}

#[derive(Debug, Clone)]
pub struct InitiatorAttributor {
    lookback: usize,
    lookahead: usize,
}

impl Default for InitiatorAttributor {
    fn default() -> Self {
        Self::new(&EpisodeConfig::default())
    }
}

impl InitiatorAttributor {
    pub fn new(cfg: &EpisodeConfig) -> Self {
        Self {
            lookback: cfg.initiator_lookback,
            lookahead: cfg.initiator_lookahead,
        }
    }

    /// Attribute the argument block starting at `start`.
    pub fn attribute(&self, day: &AnnotatedDay<'_>, start: usize) -> Attribution {
        let anns = &day.annotations;
        let window = rolling::half_open(start, self.lookback, self.lookahead, anns.len());

        let mut first_mild = None;
        let mut first_strong = None;
        let mut first_provoke = None;
        for i in window.clone() {
            let a = &anns[i];
            if a.flags.is_calming() {
                continue;
            }
            if first_mild.is_none() && a.hostility >= 1 {
                first_mild = Some(i);
            }
            if first_strong.is_none() && a.hostility >= STRONG {
                first_strong = Some(i);
            }
            if first_provoke.is_none() && a.provocation >= STRONG {
                first_provoke = Some(i);
            }
        }

        let found = |i: usize, basis| Attribution {
            direction: Some(anns[i].direction),
            trigger_index: i,
            basis,
        };

        match (first_provoke, first_strong) {
            (Some(p), Some(h)) if p <= h => return found(p, TriggerBasis::Provocation),
            (Some(_), Some(h)) => return found(h, TriggerBasis::StrongHostility),
            (Some(p), None) => return found(p, TriggerBasis::Provocation),
            (None, Some(h)) => return found(h, TriggerBasis::StrongHostility),
            (None, None) => {}
        }

        if let Some(h) = first_mild {
            let hostile_side = anns[h].direction;
            // nearest earlier provocation from the other side wins
            let prior = (window.start..h).rev().find(|&j| {
                anns[j].direction != hostile_side
                    && (anns[j].provocation >= 1 || is_implicit_provocation(&day.texts[j]))
            });
            return match prior {
                Some(j) => found(j, TriggerBasis::PriorProvocation),
                None => found(h, TriggerBasis::MildHostility),
            };
        }

        Attribution {
            direction: None,
            trigger_index: start,
            basis: TriggerBasis::Unattributed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Pipeline;
    use crate::message::Message;
    use Direction::*;

    fn day(items: &[(Direction, &str)]) -> Vec<Message> {
        items
            .iter()
            .enumerate()
            .map(|(i, &(d, b))| Message::new(i as i64 * 60_000, d, b))
            .collect()
    }

    #[test]
    fn implicit_provocation_heuristics() {
        assert!(is_implicit_provocation("you don't even try"));
        assert!(is_implicit_provocation("this is because of you"));
        assert!(is_implicit_provocation("what's wrong with you"));
        assert!(!is_implicit_provocation("see you at 6"));
    }

    #[test]
    fn strong_hostility_before_provocation_wins() {
        let m = day(&[(Received, "shut up, you always do this"), (Sent, "this is your fault")]);
        let d = Pipeline::default().annotate(&m);
        let a = InitiatorAttributor::default().attribute(&d, 0);
        assert_eq!(a.basis, TriggerBasis::StrongHostility);
        assert_eq!(a.direction, Some(Received));
        assert_eq!(a.trigger_index, 0);
    }

    #[test]
    fn mild_reaction_is_traced_back_to_the_nearest_prompt() {
        let m = day(&[
            (Sent, "are you serious"),
            (Sent, "what's wrong with you"),
            (Received, "you can't be like that"),
        ]);
        let d = Pipeline::default().annotate(&m);
        assert_eq!(d.annotations[2].hostility, 1);
        let a = InitiatorAttributor::default().attribute(&d, 2);
        assert_eq!(a.basis, TriggerBasis::PriorProvocation);
        assert_eq!(a.trigger_index, 1);
        assert_eq!(a.direction, Some(Sent));
    }

    #[test]
    fn nothing_hostile_is_unattributed() {
        let m = day(&[(Sent, "hi"), (Received, "hey")]);
        let d = Pipeline::default().annotate(&m);
        let a = InitiatorAttributor::default().attribute(&d, 1);
        assert_eq!(a.basis, TriggerBasis::Unattributed);
        assert_eq!(a.direction, None);
        assert_eq!(a.trigger_index, 1);
    }
}
