//! Log output.
//!
//! The terminal is owned by the UI, so events go to a file. Without a log file no subscriber is
//! installed and events are discarded.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "rook=debug,rook_chess=debug";

/// Install the global subscriber. Returns whether one was installed.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()?;

    tracing::info!(log_file = %path.display(), "Logging initialized");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_no_subscriber() {
        assert!(!init(None).unwrap());
    }

    #[test]
    fn test_unwritable_file_is_reported() {
        let err = init(Some(Path::new("/nonexistent-dir/rook.log"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/rook.log"));
    }
}
