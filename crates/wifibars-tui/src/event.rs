//! Terminal input pump.
//!
//! A background task turns crossterm's event stream plus a frame timer into
//! [`TermEvent`]s on an unbounded channel. Signal deliveries never pass
//! through here; they go straight onto the action channel.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Time to draw a frame.
    Frame,
}

pub struct TermEvents {
    rx: mpsc::UnboundedReceiver<TermEvent>,
    cancel: CancellationToken,
}

impl TermEvents {
    /// Start reading terminal input, emitting a `Frame` every `frame_period`.
    pub fn spawn(frame_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut frames = tokio::time::interval(frame_period);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,

                    _ = frames.tick() => TermEvent::Frame,

                    Some(Ok(raw)) = input.next() => match raw {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => TermEvent::Key(key),
                        CrosstermEvent::Resize(w, h) => TermEvent::Resize(w, h),
                        _ => continue,
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    pub async fn next(&mut self) -> Option<TermEvent> {
        self.rx.recv().await
    }
}

impl Drop for TermEvents {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
