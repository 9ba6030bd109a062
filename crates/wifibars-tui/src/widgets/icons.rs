//! Signal icons: ▂▄▆█ glyphs per level, the level→icon mapping, and tinting.
//!
//! An [`IconSet`] is built once and shared between indicators behind an
//! `Arc`. It is never mutated: tinting always produces an owned [`Icon`].

use std::collections::HashMap;
use std::str::FromStr;

use color_eyre::eyre::{Result, eyre};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use strum::{Display, EnumIter, IntoEnumIterator};

use wifibars_config::{GlyphSettings, TintSetting};
use wifibars_core::{SignalLevel, WifiLevel};

use crate::theme;

/// One of the five icon assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SignalIcon {
    Bars0,
    Bars1,
    Bars2,
    Bars3,
    Bars4,
}

impl SignalIcon {
    /// The level this icon depicts.
    pub const fn level(self) -> WifiLevel {
        match self {
            Self::Bars0 => WifiLevel::NoSignal,
            Self::Bars1 => WifiLevel::Poor,
            Self::Bars2 => WifiLevel::Fair,
            Self::Bars3 => WifiLevel::Good,
            Self::Bars4 => WifiLevel::Excellent,
        }
    }
}

/// Pick the icon for a raw level. Unrecognized ranks get the no-signal icon.
#[allow(clippy::match_same_arms)]
pub const fn asset_for(level: SignalLevel) -> SignalIcon {
    match level.rank() {
        0 => SignalIcon::Bars0,
        1 => SignalIcon::Bars1,
        2 => SignalIcon::Bars2,
        3 => SignalIcon::Bars3,
        4 => SignalIcon::Bars4,
        _ => SignalIcon::Bars0,
    }
}

/// A renderable glyph with its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    glyph: String,
    style: Style,
}

impl Icon {
    pub fn new(glyph: impl Into<String>, style: Style) -> Self {
        Self {
            glyph: glyph.into(),
            style,
        }
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Copy of this icon drawn in `color`.
    pub fn tinted(&self, color: Color) -> Self {
        Self {
            glyph: self.glyph.clone(),
            style: self.style.fg(color),
        }
    }

    pub fn span(&self) -> Span<'_> {
        Span::styled(self.glyph.as_str(), self.style)
    }
}

/// Immutable catalog of icons, keyed by [`SignalIcon`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconSet {
    icons: HashMap<SignalIcon, Icon>,
}

impl IconSet {
    /// The stock bar glyphs, colored by level.
    pub fn builtin() -> Self {
        let icons = SignalIcon::iter()
            .map(|icon| {
                let glyph = match icon {
                    SignalIcon::Bars0 => "·   ",
                    SignalIcon::Bars1 => "▂   ",
                    SignalIcon::Bars2 => "▂▄  ",
                    SignalIcon::Bars3 => "▂▄▆ ",
                    SignalIcon::Bars4 => "▂▄▆█",
                };
                (icon, Self::themed(glyph, icon))
            })
            .collect();
        Self { icons }
    }

    /// Icons from configured glyphs only. Levels without a glyph have no icon.
    pub fn from_glyphs(glyphs: &GlyphSettings) -> Self {
        let icons = SignalIcon::iter()
            .filter_map(|icon| {
                glyphs
                    .for_level(icon.level())
                    .map(|glyph| (icon, Self::themed(glyph, icon)))
            })
            .collect();
        Self { icons }
    }

    /// Configured glyphs when present, the builtin set otherwise.
    pub fn from_settings(glyphs: Option<&GlyphSettings>) -> Self {
        glyphs.map_or_else(Self::builtin, Self::from_glyphs)
    }

    /// Look up an icon. `None` when the set has no entry for it.
    pub fn resolve(&self, icon: SignalIcon) -> Option<&Icon> {
        self.icons.get(&icon)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    fn themed(glyph: &str, icon: SignalIcon) -> Icon {
        Icon::new(glyph, Style::default().fg(theme::level_color(icon.level())))
    }
}

/// Turn a configured tint into a color. Sentinel values yield `None`.
pub fn resolve_tint(setting: &TintSetting) -> Result<Option<Color>> {
    if setting.is_unset() {
        return Ok(None);
    }
    let color = match setting {
        TintSetting::Packed(value) => {
            let rgb = u32::try_from(value & 0x00ff_ffff)
                .map_err(|e| eyre!("invalid packed tint {value:#x}: {e}"))?;
            Color::from_u32(rgb)
        }
        TintSetting::Named(name) => {
            Color::from_str(name.trim()).map_err(|_| eyre!("invalid tint color '{name}'"))?
        }
    };
    Ok(Some(color))
}
