// ── Manually driven source ──
//
// Pushes whatever the owner emits to every open stream. Handy for tests
// and for hosts that already receive levels from elsewhere.

use futures_util::{StreamExt, future};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use super::{LevelStream, SignalSource};
use crate::level::SignalLevel;

const CHANNEL_CAPACITY: usize = 64;

/// Broadcast-backed source fed through [`ManualSource::emit`].
#[derive(Debug, Clone)]
pub struct ManualSource {
    tx: broadcast::Sender<SignalLevel>,
}

impl ManualSource {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Push a level to every open stream. Returns how many streams received it.
    pub fn emit(&self, level: SignalLevel) -> usize {
        self.tx.send(level).unwrap_or(0)
    }

    /// Number of currently open streams.
    pub fn stream_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ManualSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for ManualSource {
    fn observe(&self) -> LevelStream {
        BroadcastStream::new(self.tx.subscribe())
            .filter_map(|item| {
                future::ready(match item {
                    Ok(level) => Some(Ok(level)),
                    Err(err) => {
                        warn!(error = %err, "level stream lagged; dropping stale levels");
                        None
                    }
                })
            })
            .boxed()
    }
}
