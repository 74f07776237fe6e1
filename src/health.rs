// src/health.rs
//! Case-level relationship health: supportive vs. behavioral-pattern hits
//! (a text-only take on the 5:1 positive/negative ratio) and a 0–100 score
//! built from four factors.
//!
//! This is a rough indicator of written communication dynamics, not a
//! clinical measure.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::analyze::MessageAnnotation;
use crate::lexicon::behavioral::SEVERE_THRESHOLD;
use crate::message::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthClass {
    Healthy,
    AtRisk,
    Unhealthy,
    Critical,
    /// No hits of either kind.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GottmanRatio {
    /// `None` when there are positives and no negatives.
    pub ratio: Option<f64>,
    pub classification: HealthClass,
    pub positive_count: usize,
    pub negative_count: usize,
    pub total_messages: usize,
    pub positive_breakdown: BTreeMap<String, usize>,
    pub negative_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthFactors {
    pub ratio_score: u32,
    pub diversity_score: u32,
    pub severity_score: u32,
    pub balance_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScore {
    pub score: u32,
    pub grade: char,
    pub classification: HealthClass,
    pub gottman_ratio: Option<f64>,
    pub factors: HealthFactors,
    pub recommendations: Vec<String>,
}

/// Running counts over every annotated message of a case.
#[derive(Debug, Clone, Default)]
pub struct HealthTally {
    messages: usize,
    positive: BTreeMap<String, usize>,
    negative: BTreeMap<String, usize>,
    severe: BTreeSet<&'static str>,
    sent_positive: usize,
    received_positive: usize,
}

impl HealthTally {
    pub fn add(&mut self, ann: &MessageAnnotation) {
        self.messages += 1;
        for cat in &ann.supportive {
            *self.positive.entry((*cat).to_string()).or_default() += 1;
        }
        match ann.direction {
            Direction::Sent => self.sent_positive += ann.supportive.len(),
            Direction::Received => self.received_positive += ann.supportive.len(),
        }
        for m in &ann.behavioral {
            *self.negative.entry(m.category.to_string()).or_default() += 1;
            if m.severity >= SEVERE_THRESHOLD {
                self.severe.insert(m.category);
            }
        }
    }

    pub fn extend<'a>(&mut self, anns: impl IntoIterator<Item = &'a MessageAnnotation>) {
        for a in anns {
            self.add(a);
        }
    }

    pub fn gottman_ratio(&self) -> GottmanRatio {
        let pos: usize = self.positive.values().sum();
        let neg: usize = self.negative.values().sum();
        let ratio = match (pos, neg) {
            (0, 0) => Some(0.0),
            (_, 0) => None,
            _ => Some(pos as f64 / neg as f64),
        };
        let classification = match ratio {
            _ if pos == 0 && neg == 0 => HealthClass::Neutral,
            None => HealthClass::Healthy,
            Some(r) if r >= 5.0 => HealthClass::Healthy,
            Some(r) if r >= 3.0 => HealthClass::AtRisk,
            Some(r) if r >= 1.0 => HealthClass::Unhealthy,
            Some(_) => HealthClass::Critical,
        };
        GottmanRatio {
            ratio,
            classification,
            positive_count: pos,
            negative_count: neg,
            total_messages: self.messages,
            positive_breakdown: self.positive.clone(),
            negative_breakdown: self.negative.clone(),
        }
    }

    pub fn health_score(&self) -> HealthScore {
        let g = self.gottman_ratio();

        let ratio_score = match g.ratio {
            None => 40,
            Some(r) if r >= 5.0 => 40,
            Some(r) if r >= 3.0 => (20.0 + (r - 3.0) * 10.0) as u32,
            Some(r) if r >= 1.0 => (10.0 + (r - 1.0) * 5.0) as u32,
            Some(r) => (r * 10.0).max(0.0) as u32,
        };
        let diversity_score = (self.positive.len() as u32 * 3).min(20);
        let severity_score = match self.severe.len() {
            0 => 20,
            1..=2 => 10,
            _ => 0,
        };
        let total_pos = self.sent_positive + self.received_positive;
        let balance_score = if total_pos == 0 {
            0
        } else {
            let minority = self.sent_positive.min(self.received_positive);
            (minority as f64 / total_pos as f64 * 40.0) as u32
        };

        let score = (ratio_score + diversity_score + severity_score + balance_score).min(100);
        let grade = match score {
            80.. => 'A',
            65.. => 'B',
            50.. => 'C',
            35.. => 'D',
            _ => 'F',
        };

        let mut recommendations = Vec::new();
        if ratio_score < 20 {
            recommendations.push(
                "Increase positive interactions: aim for at least five positive \
                 exchanges for every negative one."
                    .to_string(),
            );
        }
        if diversity_score < 10 {
            recommendations.push(
                "Diversify supportive behaviors such as validation, encouragement, \
                 appreciation and active listening."
                    .to_string(),
            );
        }
        if severity_score < 20 {
            let names: Vec<&str> = self.severe.iter().copied().collect();
            recommendations.push(format!(
                "High-severity patterns detected ({}). Consider professional support \
                 to address these dynamics.",
                names.join(", ")
            ));
        }
        if balance_score < 10 {
            recommendations.push(
                "Supportive communication appears one-sided; both parties should be \
                 contributing positively."
                    .to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push(
                "Communication patterns appear healthy. Keep up the positive, mutual \
                 support."
                    .to_string(),
            );
        }

        HealthScore {
            score,
            grade,
            classification: g.classification,
            gottman_ratio: g.ratio,
            factors: HealthFactors {
                ratio_score,
                diversity_score,
                severity_score,
                balance_score,
            },
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::behavioral::{severity, BehavioralMatch};

    fn ann(dir: Direction, supportive: &[&'static str], negative: &[&'static str]) -> MessageAnnotation {
        MessageAnnotation {
            supportive: supportive.to_vec(),
            behavioral: negative
                .iter()
                .map(|&c| BehavioralMatch {
                    category: c,
                    severity: severity(c),
                    matched: String::new(),
                })
                .collect(),
            ..MessageAnnotation::empty(0, dir)
        }
    }

    #[test]
    fn empty_case_is_neutral() {
        let t = HealthTally::default();
        let g = t.gottman_ratio();
        assert_eq!(g.classification, HealthClass::Neutral);
        assert_eq!(g.ratio, Some(0.0));
        let h = t.health_score();
        // ratio 0 + diversity 0 + severity 20 + balance 0
        assert_eq!(h.score, 20);
        assert_eq!(h.grade, 'F');
    }

    #[test]
    fn only_positives_is_unbounded_and_healthy() {
        let mut t = HealthTally::default();
        t.add(&ann(Direction::Sent, &["gratitude"], &[]));
        let g = t.gottman_ratio();
        assert_eq!(g.ratio, None);
        assert_eq!(g.classification, HealthClass::Healthy);
        assert_eq!(t.health_score().factors.ratio_score, 40);
    }

    #[test]
    fn ratio_classes() {
        let mut t = HealthTally::default();
        t.add(&ann(Direction::Sent, &["empathy", "validation", "gratitude"], &["attack"]));
        assert_eq!(t.gottman_ratio().classification, HealthClass::AtRisk);
        t.add(&ann(Direction::Received, &[], &["attack", "contempt"]));
        assert_eq!(t.gottman_ratio().classification, HealthClass::Unhealthy);
        t.add(&ann(Direction::Received, &[], &["deny"]));
        assert_eq!(t.gottman_ratio().classification, HealthClass::Critical);
    }

    #[test]
    fn balanced_diverse_case_scores_a() {
        let mut t = HealthTally::default();
        let cats = [
            "validation",
            "empathy",
            "appreciation",
            "encouragement",
            "accountability",
            "repair_attempt",
            "gratitude",
        ];
        for (i, c) in cats.iter().enumerate() {
            let d = if i % 2 == 0 { Direction::Sent } else { Direction::Received };
            t.add(&ann(d, &[*c], &[]));
        }
        let h = t.health_score();
        // 40 + min(21, 20) + 20 + int(3/7 * 40) = 40 + 20 + 20 + 17
        assert_eq!(h.factors.balance_score, 17);
        assert_eq!(h.score, 97);
        assert_eq!(h.grade, 'A');
        assert_eq!(h.recommendations.len(), 1);
    }

    #[test]
    fn severe_categories_cost_points_and_are_named() {
        let mut t = HealthTally::default();
        t.add(&ann(Direction::Received, &[], &["gaslighting"]));
        let h = t.health_score();
        assert_eq!(h.factors.severity_score, 10);
        assert!(h.recommendations.iter().any(|r| r.contains("gaslighting")));

        t.add(&ann(Direction::Received, &[], &["control", "weaponize_family"]));
        assert_eq!(t.health_score().factors.severity_score, 0);
    }
}
