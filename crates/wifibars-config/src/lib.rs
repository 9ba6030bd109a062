//! Configuration for the wifibars indicator.
//!
//! TOML file + environment overrides, merged through figment, and
//! translation to `wifibars_core::SourceConfig`. The binary layers its CLI
//! flags on top of what this crate loads.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use wifibars_core::config::DEFAULT_PROC_WIRELESS_PATH;
use wifibars_core::{SourceConfig, SourceKind, WifiLevel};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indicator: IndicatorSettings,

    #[serde(default)]
    pub source: SourceSettings,
}

/// Styling attributes read when the indicator is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndicatorSettings {
    /// Tint applied to every icon. Absent, zero, or "none" means untinted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<TintSetting>,

    /// Custom glyphs. When present they replace the builtin icon set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<GlyphSettings>,
}

/// A tint color as written in configuration.
///
/// Either a packed `0xRRGGBB` integer or a color name / `#rrggbb` string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TintSetting {
    Packed(i64),
    Named(String),
}

impl TintSetting {
    /// Whether this value is the "no tint" sentinel.
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Packed(value) => *value <= 0,
            Self::Named(name) => {
                let name = name.trim();
                name.is_empty() || name.eq_ignore_ascii_case("none")
            }
        }
    }
}

impl FromStr for TintSetting {
    type Err = std::convert::Infallible;

    /// Integers (decimal or `0x` hex) become `Packed`, anything else `Named`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let packed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .map_or_else(|| trimmed.parse().ok(), |hex| i64::from_str_radix(hex, 16).ok());
        Ok(packed.map_or_else(|| Self::Named(trimmed.to_string()), Self::Packed))
    }
}

/// Per-level glyph overrides. Missing entries have no icon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlyphSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_signal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excellent: Option<String>,
}

impl GlyphSettings {
    pub fn for_level(&self, level: WifiLevel) -> Option<&str> {
        let glyph = match level {
            WifiLevel::NoSignal => &self.no_signal,
            WifiLevel::Poor => &self.poor,
            WifiLevel::Fair => &self.fair,
            WifiLevel::Good => &self.good,
            WifiLevel::Excellent => &self.excellent,
        };
        glyph.as_deref()
    }
}

/// Which signal source to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKindSetting {
    #[default]
    Proc,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceSettings {
    #[serde(default)]
    pub kind: SourceKindSetting,

    /// Wireless status table to poll.
    #[serde(default = "default_proc_path")]
    pub path: PathBuf,

    /// Interface name; the first listed interface when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKindSetting::default(),
            path: default_proc_path(),
            interface: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_proc_path() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_WIRELESS_PATH)
}
fn default_poll_interval_ms() -> u64 {
    2_000
}

impl SourceSettings {
    /// Translate into the runtime config consumed by `wifibars_core::build_source`.
    pub fn to_source_config(&self) -> Result<SourceConfig, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "source.poll_interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let kind = match self.kind {
            SourceKindSetting::Proc => SourceKind::ProcWireless {
                path: self.path.clone(),
                interface: self.interface.clone(),
            },
            SourceKindSetting::Demo => SourceKind::Demo,
        };

        Ok(SourceConfig {
            kind,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wifibars", "wifibars").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wifibars");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIFIBARS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Render a config as TOML.
pub fn render_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}
