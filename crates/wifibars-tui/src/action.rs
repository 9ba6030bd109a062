//! All possible UI actions. Actions are the sole mechanism for state mutation.

use wifibars_core::{LevelDelivery, WifiLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Render,

    /// Show or hide the indicator (attach / detach).
    ToggleIndicator,
    /// Register or unregister the status-line observer.
    ToggleObserver,
    /// Drop the app's handle to the observer without unregistering it.
    DropObserver,

    /// A level from an upstream subscription, marshalled onto the UI loop.
    SignalDelivered(LevelDelivery),
    /// The indicator's observer was notified of a level.
    LevelObserved(WifiLevel),
}
