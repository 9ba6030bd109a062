// ── Level observers ──
//
// A widget holds at most one observer, and never keeps it alive: the host
// owns the `Arc`, the widget keeps a `Weak` and upgrades it per notification.

use std::fmt;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::level::WifiLevel;

/// Receives normalized level changes.
pub trait WifiLevelObserver: Send + Sync {
    fn on_level_changed(&self, level: WifiLevel);
}

impl<F> WifiLevelObserver for F
where
    F: Fn(WifiLevel) + Send + Sync,
{
    fn on_level_changed(&self, level: WifiLevel) {
        self(level);
    }
}

/// Non-owning holder for a single observer.
#[derive(Default)]
pub struct ObserverSlot {
    observer: Option<Weak<dyn WifiLevelObserver>>,
}

impl ObserverSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a weak relation to `observer`, replacing any previous one.
    pub fn register<O: WifiLevelObserver + 'static>(&mut self, observer: &Arc<O>) {
        let weak: Weak<O> = Arc::downgrade(observer);
        let weak: Weak<dyn WifiLevelObserver> = weak;
        self.observer = Some(weak);
    }

    /// Drop the relation. The observer itself is untouched.
    pub fn clear(&mut self) {
        self.observer = None;
    }

    /// Whether a relation is stored, regardless of whether its target is alive.
    pub fn is_registered(&self) -> bool {
        self.observer.is_some()
    }

    /// Whether a relation is stored and its target is still alive.
    pub fn is_alive(&self) -> bool {
        self.observer
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Invoke the observer if it is registered and alive.
    ///
    /// Returns `true` when the observer was actually called.
    pub fn notify(&self, level: WifiLevel) -> bool {
        let Some(weak) = self.observer.as_ref() else {
            return false;
        };
        let Some(observer) = weak.upgrade() else {
            debug!(%level, "observer dropped; skipping notification");
            return false;
        };
        observer.on_level_changed(level);
        true
    }
}

impl fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("registered", &self.is_registered())
            .field("alive", &self.is_alive())
            .finish()
    }
}
