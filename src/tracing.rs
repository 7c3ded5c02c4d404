//! Tracing infrastructure for diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=highlight=debug,message=debug` - scoped filtering
//! - `RUST_LOG=codenav::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/codenav/logs/codenav.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::OutlineModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`) and goes to stderr so
/// it never mixes with printed outlines.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of publish and highlight state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSnapshot {
    pub revision: u64,
    pub chain: Vec<String>,
}

impl HighlightSnapshot {
    pub fn from_model(model: &OutlineModel) -> Self {
        Self {
            revision: model.document.revision,
            chain: model.highlighted.clone(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &HighlightSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.revision != other.revision {
            changes.push(format!("revision: {} → {}", self.revision, other.revision));
        }
        if self.chain != other.chain {
            changes.push(format!(
                "highlight: [{}] → [{}]",
                self.chain.join(", "),
                other.chain.join(", ")
            ));
        }
        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
