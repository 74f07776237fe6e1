//! Directed-hostility scoring.
//!
//! The raw lexical score says how negative a message *reads*; the directed
//! score says how much of that is aimed at the other party. Filters for
//! apologies and self-talk always apply; venting, joke and hurt filters only
//! soften mild messages (raw <= 2). "fuck you" is never explained away.
//!
//! Every outcome records the [`HostilityRule`] that produced it.

use serde::Serialize;

use super::context::ContextFlags;
use crate::lexicon::{hostility::MAX_HOSTILITY, LexicalScan};

/// Raw scores at or below this are "mild" and subject to the soft filters.
pub const MILD_MAX: u8 = 2;

/// Which branch of the scorer decided the directed hostility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostilityRule {
    NoHostility,
    Apology,
    SelfDirected,
    ThirdPartyVenting,
    JokeContext,
    ExpressingHurt,
    DeEscalation,
    StressorContext,
    StrongDirected,
    StrongUndirected,
    ModerateDirected,
    MildUndirected,
    MildDirected,
}

impl HostilityRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostilityRule::NoHostility => "no_hostility",
            HostilityRule::Apology => "apology",
            HostilityRule::SelfDirected => "self_directed",
            HostilityRule::ThirdPartyVenting => "third_party_venting",
            HostilityRule::JokeContext => "joke_context",
            HostilityRule::ExpressingHurt => "expressing_hurt",
            HostilityRule::DeEscalation => "de_escalation",
            HostilityRule::StressorContext => "stressor_context",
            HostilityRule::StrongDirected => "strong_directed",
            HostilityRule::StrongUndirected => "strong_undirected",
            HostilityRule::ModerateDirected => "moderate_directed",
            HostilityRule::MildUndirected => "mild_undirected",
            HostilityRule::MildDirected => "mild_directed",
        }
    }

    /// True when a context filter (not the plain intensity ladder) decided.
    pub fn is_context_filter(&self) -> bool {
        matches!(
            self,
            HostilityRule::Apology
                | HostilityRule::SelfDirected
                | HostilityRule::ThirdPartyVenting
                | HostilityRule::JokeContext
                | HostilityRule::ExpressingHurt
                | HostilityRule::DeEscalation
                | HostilityRule::StressorContext
        )
    }
}

/// Per-message scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageScore {
    pub raw_hostility: u8,
    pub hostility: u8,
    pub provocation: u8,
    pub rule: HostilityRule,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score one message from its lexical scan and context flags.
    /// Provocation passes through untouched by the filters.
    pub fn score(&self, scan: &LexicalScan, flags: &ContextFlags) -> MessageScore {
        let raw = scan.raw_hostility.min(MAX_HOSTILITY);
        let (hostility, rule) = directed_hostility(raw, flags);
        MessageScore {
            raw_hostility: raw,
            hostility,
            provocation: scan.provocation,
            rule,
        }
    }
}

fn directed_hostility(raw: u8, f: &ContextFlags) -> (u8, HostilityRule) {
    use HostilityRule::*;

    if raw == 0 {
        return (0, NoHostility);
    }
    if f.is_apology {
        return (0, Apology);
    }
    if f.is_self_directed {
        return (0, SelfDirected);
    }
    if raw <= MILD_MAX {
        if f.is_third_party_venting {
            return (0, ThirdPartyVenting);
        }
        if f.is_joke_context {
            return (0, JokeContext);
        }
        if f.is_expressing_hurt {
            return (0, ExpressingHurt);
        }
    }
    if f.is_de_escalation {
        return (raw.saturating_sub(1).max(1), DeEscalation);
    }
    if raw <= MILD_MAX && f.is_stressor_context {
        return (raw.saturating_sub(1), StressorContext);
    }

    let has_you = f.has_second_person;
    match (raw, has_you) {
        (3.., true) => (raw, StrongDirected),
        (3.., false) => (raw - 1, StrongUndirected),
        (2, true) => (raw, ModerateDirected),
        (_, false) => (raw.saturating_sub(1), MildUndirected),
        (_, true) => (raw, MildDirected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(raw: u8) -> LexicalScan {
        LexicalScan {
            raw_hostility: raw,
            ..Default::default()
        }
    }

    fn you() -> ContextFlags {
        ContextFlags {
            has_second_person: true,
            ..Default::default()
        }
    }

    #[test]
    fn zero_raw_is_zero() {
        let s = ScoringEngine::new().score(&scan(0), &you());
        assert_eq!((s.hostility, s.rule), (0, HostilityRule::NoHostility));
    }

    #[test]
    fn apology_zeroes_even_strong_language() {
        let f = ContextFlags {
            is_apology: true,
            ..you()
        };
        let s = ScoringEngine::new().score(&scan(4), &f);
        assert_eq!((s.hostility, s.rule), (0, HostilityRule::Apology));
        assert!(s.rule.is_context_filter());
        assert!(!HostilityRule::StrongDirected.is_context_filter());
    }

    #[test]
    fn joke_only_softens_mild() {
        let joke = ContextFlags {
            is_joke_context: true,
            ..you()
        };
        let e = ScoringEngine::new();
        assert_eq!(e.score(&scan(1), &joke).hostility, 0);
        let strong = e.score(&scan(3), &joke);
        assert_eq!((strong.hostility, strong.rule), (3, HostilityRule::StrongDirected));
    }

    #[test]
    fn de_escalation_keeps_at_least_one() {
        let f = ContextFlags {
            is_de_escalation: true,
            ..Default::default()
        };
        let e = ScoringEngine::new();
        assert_eq!(e.score(&scan(1), &f).hostility, 1);
        assert_eq!(e.score(&scan(4), &f).hostility, 3);
    }

    #[test]
    fn stressor_context_discounts_mild() {
        let f = ContextFlags {
            is_stressor_context: true,
            ..you()
        };
        let s = ScoringEngine::new().score(&scan(2), &f);
        assert_eq!((s.hostility, s.rule), (1, HostilityRule::StressorContext));
    }

    #[test]
    fn intensity_ladder() {
        let e = ScoringEngine::new();
        let none = ContextFlags::default();
        assert_eq!(e.score(&scan(5), &you()).hostility, 5);
        assert_eq!(e.score(&scan(3), &none).hostility, 2);
        assert_eq!(e.score(&scan(2), &you()).hostility, 2);
        assert_eq!(e.score(&scan(2), &none).hostility, 1);
        assert_eq!(e.score(&scan(1), &none).hostility, 0);
        let mild = e.score(&scan(1), &you());
        assert_eq!((mild.hostility, mild.rule), (1, HostilityRule::MildDirected));
    }

    #[test]
    fn provocation_is_not_filtered() {
        let f = ContextFlags {
            is_apology: true,
            ..Default::default()
        };
        let s = ScoringEngine::new().score(
            &LexicalScan {
                raw_hostility: 0,
                provocation: 3,
                hits: vec![],
            },
            &f,
        );
        assert_eq!(s.provocation, 3);
    }
}
