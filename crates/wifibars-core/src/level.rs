// ── Signal levels ──
//
// `SignalLevel` is what sources produce: a bare integer rank that may hold
// values outside the known range. `WifiLevel` is the closed enum handed to
// observers, so they never depend on a source's representation.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// RSSI at or below which the link counts as no signal.
const MIN_RSSI_DBM: i32 = -100;
/// RSSI at or above which the link counts as excellent.
const MAX_RSSI_DBM: i32 = -55;

/// Signal level rank as reported by an upstream source.
///
/// Ranks `0..=4` are defined; anything else is treated as unrecognized by
/// consumers and falls back to [`SignalLevel::NO_SIGNAL`] semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SignalLevel(i32);

impl SignalLevel {
    pub const NO_SIGNAL: Self = Self(0);
    pub const POOR: Self = Self(1);
    pub const FAIR: Self = Self(2);
    pub const GOOD: Self = Self(3);
    pub const EXCELLENT: Self = Self(4);

    /// Number of defined levels.
    pub const COUNT: i32 = 5;

    pub const fn from_rank(rank: i32) -> Self {
        Self(rank)
    }

    pub const fn rank(self) -> i32 {
        self.0
    }

    /// Whether the rank is one of the five defined levels.
    pub const fn is_known(self) -> bool {
        self.0 >= 0 && self.0 < Self::COUNT
    }

    /// Bucket an RSSI reading (dBm) into a level.
    ///
    /// Linear between -100 dBm and -55 dBm, clamped at both ends.
    pub const fn from_dbm(dbm: i32) -> Self {
        if dbm <= MIN_RSSI_DBM {
            Self::NO_SIGNAL
        } else if dbm >= MAX_RSSI_DBM {
            Self::EXCELLENT
        } else {
            let input_range = MAX_RSSI_DBM - MIN_RSSI_DBM;
            let output_range = Self::COUNT - 1;
            Self((dbm - MIN_RSSI_DBM) * output_range / input_range)
        }
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", WifiLevel::from(*self))?;
        if !self.is_known() {
            write!(f, " (rank {})", self.0)?;
        }
        Ok(())
    }
}

/// Normalized signal level exposed to observers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WifiLevel {
    #[default]
    NoSignal,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl WifiLevel {
    /// Number of lit bars for this level (0-4).
    pub const fn bars(self) -> u8 {
        match self {
            Self::NoSignal => 0,
            Self::Poor => 1,
            Self::Fair => 2,
            Self::Good => 3,
            Self::Excellent => 4,
        }
    }
}

impl From<SignalLevel> for WifiLevel {
    #[allow(clippy::match_same_arms)]
    fn from(level: SignalLevel) -> Self {
        match level.rank() {
            0 => Self::NoSignal,
            1 => Self::Poor,
            2 => Self::Fair,
            3 => Self::Good,
            4 => Self::Excellent,
            _ => Self::NoSignal,
        }
    }
}

impl From<WifiLevel> for SignalLevel {
    fn from(level: WifiLevel) -> Self {
        Self::from_rank(i32::from(level.bars()))
    }
}
