// ============================================================
// Layer 6 — Logging
// ============================================================
// One tracing subscriber for the whole process:
//
//   stderr                 ← always, coloured
//   <output>/prepare.log   ← prepare runs only, plain text, appended
//
// Both outputs share one EnvFilter: RUST_LOG, plus
// `dialogue_prep=info` so the crate's own progress is always shown.

use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "dialogue_prep=info";

/// Build the subscriber without installing it.
pub fn subscriber(log_file: Option<&Path>) -> Result<impl Subscriber + Send + Sync + 'static> {
    let filter = EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse()?);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file '{}'", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer))
}

/// Install the global subscriber. Call once, before any work is logged.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    subscriber(log_file)?
        .try_init()
        .context("A global tracing subscriber is already installed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_events_reach_the_log_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("prepare.log");

        let sub = subscriber(Some(&path)).unwrap();
        tracing::subscriber::with_default(sub, || {
            tracing::info!("Prepared 3 examples");
        });

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Prepared 3 examples"));
        // plain text, no ANSI colour codes
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("prepare.log");
        fs::write(&path, "previous run\n").unwrap();

        tracing::subscriber::with_default(subscriber(Some(&path)).unwrap(), || {
            tracing::warn!("second run");
        });

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("previous run\n"));
        assert!(text.contains("second run"));
    }

    #[test]
    fn test_unwritable_log_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(subscriber(Some(&dir.path().join("missing/prepare.log"))).is_err());
    }
}
