// src/metrics.rs
//! Pipeline metrics. Counters are always emitted through the `metrics`
//! facade (no-ops without a recorder); the binary installs a Prometheus
//! recorder when asked to and renders it at the end of a run.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const MESSAGES_SCORED: &str = "messages_scored_total";
pub const ARGUMENT_EPISODES: &str = "argument_episodes_total";
pub const EPISODES_MERGED: &str = "episodes_merged_total";
pub const EPISODES_DEDUPED: &str = "episodes_deduped_total";
pub const DAY_HOSTILITY_AVG: &str = "day_hostility_avg";
pub const DAYS_ANALYZED: &str = "days_analyzed_total";
pub const LAST_HEALTH_SCORE: &str = "case_health_score";

/// One-time metrics registration (so series show up in the exposition).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(MESSAGES_SCORED, "Messages run through lexical scoring.");
        describe_counter!(
            ARGUMENT_EPISODES,
            "Argument episodes emitted after merge and dedup."
        );
        describe_counter!(
            EPISODES_MERGED,
            "Argument episodes absorbed into an earlier one by the merge pass."
        );
        describe_counter!(EPISODES_DEDUPED, "Argument episodes dropped as duplicates.");
        describe_counter!(DAYS_ANALYZED, "Calendar days analyzed.");
        describe_histogram!(DAY_HOSTILITY_AVG, "Average raw hostility per analyzed day.");
        describe_gauge!(LAST_HEALTH_SCORE, "Health score of the last analyzed case.");
    });
}

/// Per-day counters, recorded once the day's episodes are final.
pub(crate) fn record_day(scored: usize, arguments: usize, merged: usize, deduped: usize, avg: f32) {
    ensure_metrics_described();
    counter!(DAYS_ANALYZED).increment(1);
    counter!(MESSAGES_SCORED).increment(scored as u64);
    counter!(ARGUMENT_EPISODES).increment(arguments as u64);
    counter!(EPISODES_MERGED).increment(merged as u64);
    counter!(EPISODES_DEDUPED).increment(deduped as u64);
    histogram!(DAY_HOSTILITY_AVG).record(avg as f64);
}

pub(crate) fn record_health(score: u32) {
    ensure_metrics_described();
    gauge!(LAST_HEALTH_SCORE).set(score as f64);
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder process-wide. Fails if another
    /// recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Prometheus exposition text.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
