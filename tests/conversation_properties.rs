// tests/conversation_properties.rs
// End-to-end behavior of the per-day pipeline and the case engine through the
// public API.

use chrono::NaiveDate;
use conflict_pattern_analyzer::{
    analyze::HostilityRule, lexicon::hurtful::Severity, AnalysisConfig, Analyzer, Direction,
    Initiator, Message, Pipeline,
};

use Direction::*;

const MIN: i64 = 60_000;
// 2024-03-04T12:00:00Z
const NOON: i64 = 1_709_553_600_000;

fn at_minutes(items: &[(i64, Direction, &str)]) -> Vec<Message> {
    items
        .iter()
        .map(|&(m, d, b)| Message::new(NOON + m * MIN, d, b))
        .collect()
}

/// Two three-message fights (indices 0..3 and 39..42) with 36 neutral
/// messages between. Heat spreads the first block to `[0, 10)` and the second
/// to `[33, 42)`; `gap_secs` is the time from message 9 to message 33.
fn two_fights(gap_secs: i64) -> Vec<Message> {
    let spacing = gap_secs / 24;
    (0..42)
        .map(|i: i64| {
            let secs = match i {
                0..=9 => i * 10,
                10..=32 => 90 + (i - 9) * spacing,
                _ => 90 + gap_secs + (i - 33) * 10,
            };
            let (dir, body) = match i {
                0 | 2 | 39 | 41 => (Sent, "fuck you"),
                1 | 40 => (Received, "fuck you too"),
                _ if i % 2 == 0 => (Sent, "what time is dinner"),
                _ => (Received, "around seven i think"),
            };
            Message::new(NOON + secs * 1_000, dir, body)
        })
        .collect()
}

#[test]
fn fights_ten_minutes_apart_merge() {
    let m = two_fights(10 * 60);
    let a = Pipeline::default().run(&m);
    let args: Vec<_> = a.arguments().collect();
    assert_eq!(a.merged, 1);
    assert_eq!(args.len(), 1);
    assert_eq!((args[0].start, args[0].end), (0, 42));
    assert_eq!(args[0].trigger_index, Some(0));
    assert_eq!(a.episodes.len(), 1);
}

#[test]
fn fights_twenty_minutes_apart_stay_distinct() {
    let m = two_fights(20 * 60);
    let a = Pipeline::default().run(&m);
    let args: Vec<_> = a.arguments().collect();
    assert_eq!(a.merged, 0);
    assert_eq!(args.len(), 2);
    assert_eq!((args[0].start, args[0].end), (0, 10));
    assert_eq!((args[1].start, args[1].end), (33, 42));
    assert_eq!(args[1].trigger_index, Some(39));
    assert_eq!(a.episodes.len(), 3);
}

#[test]
fn apology_is_never_hostile() {
    let m = at_minutes(&[
        (0, Sent, "I'm sorry, I was an idiot"),
        (2, Received, "whatever"),
        (3, Sent, "I'm sorry, fuck you is what I said and I was wrong"),
    ]);
    let a = Pipeline::default().run(&m);
    assert_eq!(a.day.annotations[0].hostility, 0);
    let strong = &a.day.annotations[2];
    assert!(strong.raw_hostility >= 3);
    assert_eq!(strong.hostility, 0);
    assert_eq!(strong.rule, HostilityRule::Apology);
}

#[test]
fn provocation_outranks_the_reaction() {
    let m = at_minutes(&[(0, Sent, "you never listen to me"), (1, Received, "fuck you then")]);
    let r = Analyzer::default().analyze_case(m, &[]);
    assert_eq!(r.totals.argument_blocks, 1);
    assert_eq!(r.totals.initiated_by_sent, 1);
    let ep = r.days[0].arguments().next().unwrap();
    assert_eq!(ep.initiator, Some(Initiator::Sent));
    let trigger = ep.trigger.as_ref().unwrap();
    assert_eq!(trigger.excerpt, "you never listen to me");
}

#[test]
fn ignored_request_to_stop_is_recorded() {
    let m = at_minutes(&[
        (0, Sent, "can we stop fighting"),
        (5, Received, "shut up, you always do this"),
        (12, Received, "shut up, you never change"),
    ]);
    let r = Analyzer::default().analyze_case(m, &[]);
    let ep = r.days[0].arguments().next().unwrap();
    assert_eq!(ep.persistence_minutes, 12.0);
    assert_eq!(ep.refused_by, Some(Received));
    assert_eq!(ep.deescalation_attempts[0].excerpt, "can we stop fighting");
    assert_eq!(r.totals.refused_by_received, 1);
    assert_eq!(r.totals.refused_by_sent, 0);
}

#[test]
fn curt_replies_alone_are_not_a_fight() {
    let m = at_minutes(&[(0, Received, "ok."), (1, Received, "fine."), (2, Received, "whatever")]);
    let r = Analyzer::default().analyze_case(m, &[]);
    assert_eq!(r.totals.argument_blocks, 0);
    // raw 1 on every message
    assert_eq!(r.days[0].aggregate.avg_raw_hostility, 1.0);
}

#[test]
fn report_serializes_with_optional_annotations() {
    let m = at_minutes(&[(0, Sent, "good morning"), (3, Received, "good morning, thank you")]);
    let plain = Analyzer::default().analyze_case(m.clone(), &[]);
    let v = serde_json::to_value(&plain).unwrap();
    assert_eq!(v["case"], "case");
    assert_eq!(v["days"][0]["date"], "2024-03-04");
    assert_eq!(v["days"][0]["weekday"], "Monday");
    assert!(v["days"][0].get("annotations").is_none());

    let with = Analyzer::new(AnalysisConfig::default())
        .with_annotations(true)
        .analyze_case(m, &[]);
    let v = serde_json::to_value(&with).unwrap();
    assert_eq!(v["days"][0]["annotations"].as_array().unwrap().len(), 2);
    assert_eq!(v["days"][0]["annotations"][0]["rule"], "no_hostility");
}

#[test]
fn hurtful_language_is_listed_per_party() {
    let m = at_minutes(&[
        (0, Received, "i wish i never met you, you're disgusting"),
        (2, Sent, "good morning"),
    ]);
    let r = Analyzer::default().with_annotations(true).analyze_case(m, &[]);
    let h = &r.days[0].hurtful;
    assert!(h.from_sent.is_empty());
    assert_eq!(h.from_received.len(), 1);
    assert_eq!(h.from_received[0].severity, Severity::Moderate);
    assert!(h.from_received[0].words.iter().any(|w| w == "wish never met"));
    assert_eq!(r.totals.hurtful_from_received, 1);

    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["days"][0]["hurtful"]["from_received"][0]["severity"], "moderate");
    assert_eq!(v["days"][0]["annotations"][0]["hurtful"]["severity"], "moderate");
    assert!(v["days"][0]["annotations"][1].get("hurtful").is_none());
}

#[test]
fn configured_range_reports_silent_days() {
    const DAY: i64 = 24 * 60 * MIN;
    let m = vec![
        Message::new(NOON, Sent, "you're a liar"),
        Message::new(NOON + 5 * DAY, Received, "hi"),
    ];
    let mut cfg = AnalysisConfig::default();
    cfg.case.start_date = NaiveDate::from_ymd_opt(2024, 3, 3);
    cfg.case.end_date = NaiveDate::from_ymd_opt(2024, 3, 10);
    let r = Analyzer::new(cfg).analyze_case(m, &[]);

    assert_eq!(r.days.len(), 8);
    assert_eq!(r.totals.contact_days, 2);
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["days"][0]["mood"], "no_contact");
    assert_eq!(v["days"][0]["had_contact"], false);
    assert_eq!(v["contact_gaps"].as_array().unwrap().len(), 1);
    assert_eq!(v["contact_gaps"][0]["start"], "2024-03-05");
    assert_eq!(v["contact_gaps"][0]["end"], "2024-03-08");
    assert_eq!(v["contact_gaps"][0]["days"], 4);
    assert_eq!(v["contact_gaps"][0]["reason"], "after_conflict");
}
