// tests/metrics.rs
// Own test binary: the Prometheus recorder is process-global.

use conflict_pattern_analyzer::{metrics::Metrics, Analyzer, Direction, Message};

#[test]
fn exposition_contains_pipeline_series() {
    let m = Metrics::init().expect("recorder installs once per process");

    let noon = 1_709_553_600_000;
    let msgs = vec![
        Message::new(noon, Direction::Sent, "you never listen to me"),
        Message::new(noon + 60_000, Direction::Received, "fuck you then"),
    ];
    let report = Analyzer::default().analyze_case(msgs, &[]);
    assert_eq!(report.totals.argument_blocks, 1);

    let text = m.render();
    for needle in [
        "messages_scored_total",
        "argument_episodes_total",
        "days_analyzed_total",
        "day_hostility_avg",
        "case_health_score",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
}
