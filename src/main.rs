//! `conflict-analyze`: binary entrypoint.
//! Reads a normalized message export (and optional call log), runs the case
//! analysis and prints the JSON report to stdout.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use conflict_pattern_analyzer::{
    metrics::Metrics, AnalysisConfig, Analyzer, CallRecord, Message,
};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "conflict-analyze", about = "Score and segment a two-party message history")]
struct Args {
    /// JSON array of messages
    messages: PathBuf,
    /// JSON array of call records
    #[arg(long)]
    calls: Option<PathBuf>,
    /// Analysis config (TOML); falls back to ANALYSIS_CONFIG_PATH
    #[arg(long)]
    config: Option<PathBuf>,
    /// Include per-message annotations in each day report
    #[arg(long)]
    annotations: bool,
    /// Print the Prometheus exposition to stderr after the run
    #[arg(long)]
    metrics: bool,
}

/// Compact logs to stderr, JSON when `LOG_FORMAT=json`. `RUST_LOG` filters.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("conflict_pattern_analyzer=info,warn"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; ANALYSIS_* variables may come from there.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();

    let metrics = if args.metrics {
        Some(Metrics::init()?)
    } else {
        None
    };

    let cfg = match &args.config {
        Some(p) => AnalysisConfig::load_from(p)?,
        None => AnalysisConfig::load()?,
    };

    let messages: Vec<Message> = read_json(&args.messages)?;
    let calls: Vec<CallRecord> = match &args.calls {
        Some(p) => read_json(p)?,
        None => Vec::new(),
    };
    info!(messages = messages.len(), calls = calls.len(), "input loaded");

    let report = Analyzer::new(cfg)
        .with_annotations(args.annotations)
        .analyze_case(messages, &calls);

    let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{out}");

    if let Some(m) = metrics {
        eprintln!("{}", m.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("conflict-analyze").chain(v.iter().copied()))
    }

    #[test]
    fn parses_all_flags() {
        let a = args(&["m.json", "--calls", "c.json", "--config", "a.toml", "--annotations", "--metrics"])
            .unwrap();
        assert_eq!(a.messages, PathBuf::from("m.json"));
        assert_eq!(a.calls, Some(PathBuf::from("c.json")));
        assert_eq!(a.config, Some(PathBuf::from("a.toml")));
        assert!(a.annotations && a.metrics);
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(args(&[]).is_err());
        assert!(args(&["m.json", "--calls"]).is_err());
        assert!(args(&["m.json", "--bogus"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
