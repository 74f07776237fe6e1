// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod config;
pub mod debug;
pub mod engine;
pub mod health;
pub mod lexicon;
pub mod message;
pub mod metrics;
pub mod rolling;

// Per-day pipeline (context, scoring, heat, segmentation, attribution, de-escalation, topics)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Episode, Initiator, MessageAnnotation, Pipeline};
pub use crate::config::AnalysisConfig;
pub use crate::engine::{Analyzer, CaseReport, DayReport};
pub use crate::message::{CallRecord, Direction, Message};
