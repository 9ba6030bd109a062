// ── Upstream subscriptions ──
//
// A `Subscription` owns one background task draining a `LevelStream`.
// The task never touches UI state: it tags each level with its
// `SubscriptionId` and hands it to a delivery callback, which normally
// posts onto the UI action channel. Consumers drop deliveries whose id
// does not match their live subscription.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::level::SignalLevel;
use crate::source::LevelStream;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A level emitted by the subscription identified by `subscription`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDelivery {
    pub subscription: SubscriptionId,
    pub level: SignalLevel,
}

/// Handle to a running upstream subscription.
///
/// Releasing is idempotent and also happens on drop.
pub struct Subscription {
    id: SubscriptionId,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Spawn a task that forwards every level from `stream` to `deliver`.
    ///
    /// The task ends when the subscription is released, the stream completes
    /// or yields an error, or `deliver` returns `false` (receiver gone).
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(mut stream: LevelStream, deliver: F) -> Result<Self, CoreError>
    where
        F: Fn(LevelDelivery) -> bool + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| CoreError::NoRuntime)?;
        let id = SubscriptionId::next();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        let task = handle.spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    () = task_cancel.cancelled() => break,

                    item = stream.next() => match item {
                        Some(Ok(level)) => {
                            if !deliver(LevelDelivery { subscription: id, level }) {
                                debug!(subscription = %id, "delivery receiver closed");
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            warn!(subscription = %id, error = %e, "signal source failed; subscription ended");
                            break;
                        }
                        None => {
                            debug!(subscription = %id, "signal source completed");
                            break;
                        }
                    }
                }
            }
        });

        debug!(subscription = %id, "subscription started");
        Ok(Self {
            id,
            cancel,
            task: Some(task),
        })
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the background task has stopped on its own or been released.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the subscription. Returns `false` if it was already released.
    pub fn release(&mut self) -> bool {
        if self.is_released() {
            return false;
        }
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!(subscription = %self.id, "subscription released");
        true
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::source::{DemoSource, ManualSource, SignalSource};
    use futures_util::stream;
    use tokio::sync::mpsc;

    fn channel_sink() -> (
        impl Fn(LevelDelivery) -> bool + Send + 'static,
        mpsc::UnboundedReceiver<LevelDelivery>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (move |delivery| tx.send(delivery).is_ok(), rx)
    }

    #[test]
    fn spawn_outside_runtime_is_an_error() {
        let source = ManualSource::new();
        let (sink, _rx) = channel_sink();
        let result = Subscription::spawn(source.observe(), sink);
        assert!(matches!(result, Err(CoreError::NoRuntime)));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(SubscriptionId::next(), SubscriptionId::next());
    }

    #[tokio::test]
    async fn forwards_levels_tagged_with_its_id() {
        let source = ManualSource::new();
        let (sink, mut rx) = channel_sink();
        let sub = Subscription::spawn(source.observe(), sink).unwrap();

        source.emit(SignalLevel::POOR);
        source.emit(SignalLevel::GOOD);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.subscription, sub.id());
        assert_eq!(first.level, SignalLevel::POOR);
        assert_eq!(second.level, SignalLevel::GOOD);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let source = ManualSource::new();
        let (sink, _rx) = channel_sink();
        let mut sub = Subscription::spawn(source.observe(), sink).unwrap();

        assert!(sub.release());
        assert!(!sub.release());
        assert!(sub.is_released());
        assert!(sub.is_finished());
    }

    #[tokio::test]
    async fn released_subscription_stops_delivering() {
        let source = ManualSource::new();
        let (sink, mut rx) = channel_sink();
        let mut sub = Subscription::spawn(source.observe(), sink).unwrap();

        sub.release();
        source.emit(SignalLevel::EXCELLENT);
        tokio::task::yield_now().await;

        // Sender lives in the aborted task; the channel closes once it is dropped.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stream_error_ends_the_task() {
        let items: Vec<Result<SignalLevel, CoreError>> = vec![
            Ok(SignalLevel::FAIR),
            Err(CoreError::Parse {
                line: "wlan0: 0000".into(),
            }),
            Ok(SignalLevel::GOOD),
        ];
        let (sink, mut rx) = channel_sink();
        let sub = Subscription::spawn(Box::pin(stream::iter(items)), sink).unwrap();

        assert_eq!(rx.recv().await.unwrap().level, SignalLevel::FAIR);
        assert!(rx.recv().await.is_none());
        assert!(sub.is_finished());
        assert!(!sub.is_released());
    }

    #[tokio::test]
    async fn zero_interval_source_ends_without_delivering() {
        let (sink, mut rx) = channel_sink();
        let sub = Subscription::spawn(DemoSource::new(Duration::ZERO).observe(), sink).unwrap();

        assert!(rx.recv().await.is_none());
        assert!(sub.is_finished());
        assert!(!sub.is_released());
    }

    #[tokio::test]
    async fn closed_receiver_ends_the_task() {
        let source = ManualSource::new();
        let (sink, rx) = channel_sink();
        let sub = Subscription::spawn(source.observe(), sink).unwrap();
        drop(rx);

        source.emit(SignalLevel::POOR);
        while !sub.is_finished() {
            tokio::task::yield_now().await;
        }
    }
}
