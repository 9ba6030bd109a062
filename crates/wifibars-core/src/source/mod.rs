// ── Signal sources ──
//
// Producers of `SignalLevel` streams. Each call to `observe()` opens an
// independent stream; dropping the stream disconnects it.

mod demo;
mod manual;
mod proc_wireless;

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::BoxStream;
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::config::{SourceConfig, SourceKind};
use crate::error::CoreError;
use crate::level::SignalLevel;

pub use demo::DemoSource;
pub use manual::ManualSource;
pub use proc_wireless::{ProcWirelessSource, parse_signal_dbm};

/// Stream of levels from a source. An `Err` item means the source gave up.
pub type LevelStream = BoxStream<'static, Result<SignalLevel, CoreError>>;

/// Something that can be observed for Wi-Fi signal levels.
pub trait SignalSource: Send + Sync {
    /// Open a new level stream.
    fn observe(&self) -> LevelStream;
}

impl<S: SignalSource + ?Sized> SignalSource for Arc<S> {
    fn observe(&self) -> LevelStream {
        (**self).observe()
    }
}

/// Ticker driving a polling source. A zero period cannot tick.
fn poll_ticker(period: Duration) -> Result<Interval, CoreError> {
    if period.is_zero() {
        return Err(CoreError::Config {
            message: "poll interval must be non-zero".into(),
        });
    }
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    Ok(ticker)
}

/// Build the source described by `config`.
pub fn build_source(config: &SourceConfig) -> Arc<dyn SignalSource> {
    match &config.kind {
        SourceKind::ProcWireless { path, interface } => {
            let mut source = ProcWirelessSource::new(path.clone(), config.poll_interval);
            if let Some(name) = interface {
                source = source.with_interface(name.clone());
            }
            Arc::new(source)
        }
        SourceKind::Demo => Arc::new(DemoSource::new(config.poll_interval)),
    }
}
