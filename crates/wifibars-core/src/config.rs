// ── Runtime source configuration ──
//
// Describes *which* signal source to run and how often to poll it.
// Built by the binary (usually from `wifibars-config`), never read from disk here.

use std::path::PathBuf;
use std::time::Duration;

/// Default location of the kernel's wireless status table.
pub const DEFAULT_PROC_WIRELESS_PATH: &str = "/proc/net/wireless";

/// Which upstream produces signal levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Poll the kernel wireless status table.
    ProcWireless {
        path: PathBuf,
        /// Interface to read; the first listed interface when `None`.
        interface: Option<String>,
    },
    /// Synthetic sweep through every level.
    Demo,
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::ProcWireless {
            path: PathBuf::from(DEFAULT_PROC_WIRELESS_PATH),
            interface: None,
        }
    }
}

/// Configuration for the signal source backing an indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Poll period for `ProcWireless`, step period for `Demo`.
    pub poll_interval: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            poll_interval: Duration::from_secs(2),
        }
    }
}
