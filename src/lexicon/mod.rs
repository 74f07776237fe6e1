// src/lexicon/mod.rs
//! Surface-pattern lexicons and the matcher that runs them.
//!
//! Every table is an immutable static compiled once on first use. Patterns
//! are written against normalized (lowercased, ASCII-quoted) text, see
//! [`crate::message::normalize_text`].
//!
//! Four lexicons feed the scores (hostility, provocation, supportive, topic).
//! Three more feed the aggregates only: the tone markers in [`tone`], the
//! hurtful-language classifier in [`hurtful`] and the behavioral-pattern
//! library in [`behavioral`].

pub mod behavioral;
pub mod hostility;
pub mod hurtful;
pub mod provocation;
pub mod supportive;
pub mod tone;
pub mod topics;

use regex::Regex;
use serde::Serialize;

use crate::message::normalize_text;

/// A compiled, labelled, weighted pattern.
#[derive(Debug)]
pub struct Pattern {
    pub label: &'static str,
    pub weight: u8,
    re: Regex,
}

impl Pattern {
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

/// Compile a `(label, weight, regex)` table. Tables are compiled-in constants,
/// so a bad pattern is a programming error.
pub(crate) fn compile(table: &[(&'static str, u8, &str)]) -> Vec<Pattern> {
    table
        .iter()
        .map(|&(label, weight, pattern)| Pattern {
            label,
            weight,
            re: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("lexicon pattern `{label}` invalid: {e}")),
        })
        .collect()
}

/// Labelled regexes that are reported but never weighted.
pub(crate) type Markers = Vec<(&'static str, Regex)>;

/// Compile a `(label, regex)` marker table.
pub(crate) fn compile_labelled(table: &[(&'static str, &str)]) -> Markers {
    table
        .iter()
        .map(|&(label, pattern)| {
            let re = Regex::new(pattern)
                .unwrap_or_else(|e| panic!("marker pattern `{label}` invalid: {e}"));
            (label, re)
        })
        .collect()
}

/// Compile a plain list of regexes used by boolean predicates.
pub(crate) fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("filter pattern `{p}` invalid: {e}")))
        .collect()
}

#[inline]
pub(crate) fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hostility,
    Provocation,
    Supportive,
    Topic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hostility => "hostility",
            Category::Provocation => "provocation",
            Category::Supportive => "supportive",
            Category::Topic => "topic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexicalHit {
    pub category: Category,
    pub label: &'static str,
    pub weight: u8,
}

/// Result of one lexical pass over a message body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexicalScan {
    /// Sum of hostility weights, capped at [`hostility::MAX_HOSTILITY`].
    pub raw_hostility: u8,
    /// Sum of provocation weights, capped at [`provocation::MAX_PROVOCATION`].
    pub provocation: u8,
    pub hits: Vec<LexicalHit>,
}

impl LexicalScan {
    /// `category:label` strings for every hit, in match order.
    pub fn labels(&self) -> Vec<String> {
        self.hits
            .iter()
            .map(|h| format!("{}:{}", h.category.as_str(), h.label))
            .collect()
    }

    pub fn labels_in(&self, category: Category) -> Vec<&'static str> {
        self.hits
            .iter()
            .filter(|h| h.category == category)
            .map(|h| h.label)
            .collect()
    }

    /// Distinct topic labels in lexicon order.
    pub fn topics(&self) -> Vec<&'static str> {
        let mut out = self.labels_in(Category::Topic);
        out.dedup();
        out
    }
}

/// Runs all four scoring lexicons over a message body.
/// Stateless; the tables are process-wide statics.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalPatternMatcher;

impl LexicalPatternMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Scan a raw body. Empty text yields an empty scan, never an error.
    pub fn scan(&self, body: &str) -> LexicalScan {
        if body.trim().is_empty() {
            return LexicalScan::default();
        }
        let text = normalize_text(body);

        let mut hits = Vec::new();
        let raw_hostility = hostility::scan(&text, &mut hits);
        let provocation = provocation::scan(&text, &mut hits);
        supportive::scan(&text, &mut hits);
        topics::scan(&text, &mut hits);

        LexicalScan {
            raw_hostility,
            provocation,
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_matches_nothing() {
        let m = LexicalPatternMatcher::new();
        assert_eq!(m.scan(""), LexicalScan::default());
        assert_eq!(m.scan("   \n"), LexicalScan::default());
    }

    #[test]
    fn categories_accumulate_without_short_circuit() {
        let m = LexicalPatternMatcher::new();
        // hostility (profanity + generalizing), provocation, and a topic in one body
        let s = m.scan("you never help with the rent, this is bullshit");
        assert!(s.raw_hostility >= 2);
        assert!(s.provocation >= 2);
        assert!(s.topics().contains(&"money"));
        let labels = s.labels();
        assert!(labels.iter().any(|l| l.starts_with("hostility:")));
        assert!(labels.iter().any(|l| l.starts_with("provocation:")));
    }

    #[test]
    fn supportive_hits_are_reported() {
        let m = LexicalPatternMatcher::new();
        let s = m.scan("Thank you so much for listening, I hear you");
        let sup = s.labels_in(Category::Supportive);
        assert!(sup.contains(&"gratitude"));
        assert!(sup.contains(&"validation"));
        assert_eq!(s.raw_hostility, 0);
    }

    #[test]
    fn marker_tables_keep_labels_and_order() {
        let m = compile_labelled(&[("b", r"\bfine\b"), ("a", r"\bok\b")]);
        let hits: Vec<_> = m
            .iter()
            .filter(|(_, re)| re.is_match("ok fine"))
            .map(|&(label, _)| label)
            .collect();
        assert_eq!(hits, vec!["b", "a"]);
    }

    #[test]
    fn garbled_text_yields_no_hits() {
        let m = LexicalPatternMatcher::new();
        let s = m.scan("\u{0}\u{1}??!!##@@ ÿÿÿ 🤖");
        assert_eq!(s.raw_hostility, 0);
        assert_eq!(s.provocation, 0);
    }
}
