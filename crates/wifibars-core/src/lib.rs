// wifibars-core: Signal-level model and subscription plumbing between sources and the TUI.

pub mod config;
pub mod error;
pub mod level;
pub mod observer;
pub mod source;
pub mod subscription;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{SourceConfig, SourceKind};
pub use error::CoreError;
pub use level::{SignalLevel, WifiLevel};
pub use observer::{ObserverSlot, WifiLevelObserver};
pub use source::{
    DemoSource, LevelStream, ManualSource, ProcWirelessSource, SignalSource, build_source,
};
pub use subscription::{LevelDelivery, Subscription, SubscriptionId};
