// ── /proc/net/wireless source ──
//
// Polls the kernel's wireless status table and converts the signal level
// column (dBm) of one interface into a `SignalLevel`. Emits the first
// reading and then only changes.
//
// Table layout:
//
//   Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
//    face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
//    wlan0: 0000   54.  -56.  -256        0      0      0      0     18        0

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_stream::stream;
use tracing::trace;

use super::{LevelStream, SignalSource, poll_ticker};
use crate::error::CoreError;
use crate::level::SignalLevel;

const HEADER_LINES: usize = 2;
/// Position of the signal level among the columns after the interface name.
const LEVEL_COLUMN: usize = 2;

/// Polling source backed by `/proc/net/wireless`.
#[derive(Debug, Clone)]
pub struct ProcWirelessSource {
    path: PathBuf,
    interface: Option<String>,
    poll_interval: Duration,
}

impl ProcWirelessSource {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            interface: None,
            poll_interval,
        }
    }

    /// Read a specific interface instead of the first one listed.
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }
}

impl SignalSource for ProcWirelessSource {
    fn observe(&self) -> LevelStream {
        let path = self.path.clone();
        let interface = self.interface.clone();
        let period = self.poll_interval;

        Box::pin(stream! {
            let mut ticker = match poll_ticker(period) {
                Ok(ticker) => ticker,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let mut last = None;

            loop {
                ticker.tick().await;
                match read_level(&path, interface.as_deref()).await {
                    Ok(level) if last == Some(level) => {}
                    Ok(level) => {
                        trace!(%level, "wireless level changed");
                        last = Some(level);
                        yield Ok(level);
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        })
    }
}

async fn read_level(path: &Path, interface: Option<&str>) -> Result<SignalLevel, CoreError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    // No listed interface means the radio is not associated.
    Ok(parse_signal_dbm(&contents, interface)?.map_or(SignalLevel::NO_SIGNAL, SignalLevel::from_dbm))
}

/// Extract the signal level (dBm) for `interface` from a wireless status table.
///
/// Returns `Ok(None)` when the interface (or any interface, if `None`) is
/// not listed.
pub fn parse_signal_dbm(contents: &str, interface: Option<&str>) -> Result<Option<i32>, CoreError> {
    for line in contents.lines().skip(HEADER_LINES) {
        let Some((name, columns)) = line.split_once(':') else {
            continue;
        };
        if interface.is_some_and(|wanted| wanted != name.trim()) {
            continue;
        }

        let dbm = columns
            .split_whitespace()
            .nth(LEVEL_COLUMN)
            .and_then(parse_reading)
            .ok_or_else(|| CoreError::Parse {
                line: line.trim().to_string(),
            })?;
        return Ok(Some(dbm));
    }
    Ok(None)
}

/// Readings carry a trailing `.` and sometimes a fraction; keep the integer part.
fn parse_reading(raw: &str) -> Option<i32> {
    raw.split('.').next()?.parse().ok()
}
