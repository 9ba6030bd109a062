// ── Core error types ──
//
// Errors raised by signal sources and subscription startup. None of these
// reach the widget's observer: the subscription task logs them and stops.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Source errors ────────────────────────────────────────────────
    #[error("Failed to read wireless status from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed wireless status line: {line}")]
    Parse { line: String },

    // ── Runtime errors ───────────────────────────────────────────────
    #[error("No async runtime available to drive the subscription")]
    NoRuntime,

    // ── Configuration errors ─────────────────────────────────────────
    /// Raised by a source whose settings cannot run, e.g. a zero poll interval.
    #[error("Configuration error: {message}")]
    Config { message: String },
}
