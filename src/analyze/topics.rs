// src/analyze/topics.rs
//! Per-party upset topics for one argument block.

use super::AnnotatedDay;
use crate::lexicon::topics::upset_topics;
use crate::message::Direction;

#[derive(Debug, Clone, Copy, Default)]
pub struct TopicClassifier;

impl TopicClassifier {
    /// `(sent, received)` topics over `[start, end)`. A party that wrote
    /// nothing in the block gets an empty list.
    pub fn classify(
        &self,
        day: &AnnotatedDay<'_>,
        start: usize,
        end: usize,
    ) -> (Vec<String>, Vec<String>) {
        let end = end.min(day.len());
        let side = |dir: Direction| {
            let parts: Vec<&str> = (start..end)
                .filter(|&i| day.messages[i].direction == dir)
                .map(|i| day.texts[i].as_str())
                .collect();
            if parts.is_empty() {
                Vec::new()
            } else {
                upset_topics(&parts.join(" "))
            }
        };
        (side(Direction::Sent), side(Direction::Received))
    }
}
