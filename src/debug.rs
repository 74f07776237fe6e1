// src/debug.rs
//! Anonymized dev logging for message-level events.
//!
//! Gate: `ANALYSIS_DEV_LOG=1` AND a dev environment (debug build, or
//! `ANALYSIS_ENV` in {local, development, dev}). Raw message text is never
//! logged; bodies are replaced by a short sha256 prefix.

use tracing::info;

pub const ENV_ANALYSIS_DEV_LOG: &str = "ANALYSIS_DEV_LOG";
pub const ENV_ANALYSIS_ENV: &str = "ANALYSIS_ENV";

pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_ANALYSIS_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var(ENV_ANALYSIS_ENV)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// First 6 bytes of sha256(text) as lowercase hex.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// One scored message. Only the hash, the scores and up to 5 labels are logged.
pub(crate) fn dev_log_scored(
    index: usize,
    text: &str,
    raw: u8,
    directed: u8,
    provocation: u8,
    rule: &str,
    labels: &[String],
) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    let labels_short = truncate_vec(labels, 5);
    info!(
        target: "scoring",
        %id, index, raw, directed, provocation, rule,
        labels = ?labels_short
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn anon_hash_is_short_stable_hex() {
        let a = anon_hash("you never listen");
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, anon_hash("you never listen"));
        assert_ne!(a, anon_hash("you never listen!"));
    }

    #[test]
    #[serial]
    fn dev_log_gate_requires_flag() {
        std::env::remove_var(ENV_ANALYSIS_DEV_LOG);
        assert!(!dev_logging_enabled());
        std::env::set_var(ENV_ANALYSIS_DEV_LOG, "1");
        if cfg!(debug_assertions) {
            assert!(dev_logging_enabled());
        }
        std::env::remove_var(ENV_ANALYSIS_DEV_LOG);
    }
}
