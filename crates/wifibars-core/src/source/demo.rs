// ── Demo source ──
//
// Sweeps NO_SIGNAL → EXCELLENT → NO_SIGNAL forever, one step per tick.

use std::time::Duration;

use async_stream::stream;
use super::{LevelStream, SignalSource, poll_ticker};
use crate::error::CoreError;
use crate::level::SignalLevel;

const SWEEP: [i32; 8] = [0, 1, 2, 3, 4, 3, 2, 1];

/// Synthetic source cycling through every level.
#[derive(Debug, Clone)]
pub struct DemoSource {
    step: Duration,
}

impl DemoSource {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl SignalSource for DemoSource {
    fn observe(&self) -> LevelStream {
        let step = self.step;
        Box::pin(stream! {
            let mut ticker = match poll_ticker(step) {
                Ok(ticker) => ticker,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            for rank in SWEEP.iter().copied().cycle() {
                ticker.tick().await;
                yield Ok::<_, CoreError>(SignalLevel::from_rank(rank));
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test(start_paused = true)]
    async fn sweeps_up_and_back_down() {
        let source = DemoSource::new(Duration::from_millis(500));
        let ranks: Vec<i32> = source
            .observe()
            .take(10)
            .map(|item| item.unwrap().rank())
            .collect()
            .await;
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 3, 2, 1, 0, 1]);
    }
}
