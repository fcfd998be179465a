//! Desktop configuration.
//!
//! The configuration is read once at startup from the virtual file
//! [`CONFIG_PATH`](crate::vfs::CONFIG_PATH), written in the `.hk` DSL
//! understood by [`parser`].  Four fixed sections exist: `theme`,
//! `wallpaper`, `animation` and `general`.
//!
//! Leaves are [`Value`]s.  Their type follows the text: a value written as
//! a number becomes [`Value::Num`], anything else stays [`Value::Str`].
//!
//! # Example
//!
//! ```text
//! ! comments start with a bang
//! [theme]
//! -> gap_size => 16
//! -> accent_color => #d946ef
//!
//! [general]
//! -> font_family => Fira Code
//! ```
//!
//! Keys missing from the file keep their [`Config::default`] value.
//! Unknown sections and unknown keys are dropped.

pub mod parser;

use crate::layout::Spacing;
use crate::vfs::VirtualFs;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// A configuration leaf: text or number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Num(f64),
    Str(String),
}

impl Value {
    /// Build a value from raw DSL text, coercing numeric text to
    /// [`Value::Num`].
    pub fn from_text(text: &str) -> Self {
        match parser::parse_number(text) {
            Some(n) => Value::Num(n),
            None => Value::Str(text.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Num(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Declares a section struct whose fields are all [`Value`]s, along with
/// the by-name lookup used by the merge.
macro_rules! config_section {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: Value, )+
        }

        impl $name {
            fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
                match key {
                    $( stringify!($field) => Some(&mut self.$field), )+
                    _ => None,
                }
            }
        }
    };
}

config_section! {
    /// Colours, blur and spacing.
    ThemeConfig {
        border_active,
        border_inactive,
        /// CSS-style length, e.g. `16px`.
        blur_strength,
        /// Pixels between tiled windows.
        gap_size,
        /// Pixels between the screen edge and the tiled area.
        outer_padding,
        active_opacity,
        inactive_opacity,
        accent_color,
        /// Bar background, `#rrggbbaa`.
        bar_bg,
    }
}

config_section! {
    /// Background image and the dark overlay drawn over it.
    WallpaperConfig {
        url,
        overlay_opacity,
    }
}

config_section! {
    /// Transition timing for the renderer.
    AnimationConfig {
        /// Seconds.
        duration,
        /// Spring stiffness.
        stiffness,
    }
}

config_section! {
    GeneralConfig {
        font_family,
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            border_active: "#06b6d4".into(),
            border_inactive: "#334155".into(),
            blur_strength: "16px".into(),
            gap_size: Value::Num(12.0),
            outer_padding: Value::Num(24.0),
            active_opacity: Value::Num(1.0),
            inactive_opacity: Value::Num(0.85),
            accent_color: "#06b6d4".into(),
            bar_bg: "#0f172acc".into(),
        }
    }
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            url: "https://images.unsplash.com/photo-1550684848-fac1c5b4e853?q=80&w=2070&auto=format&fit=crop".into(),
            overlay_opacity: Value::Num(0.4),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Value::Num(0.3),
            stiffness: Value::Num(100.0),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            font_family: "JetBrains Mono".into(),
        }
    }
}

/// The default configuration written out in DSL form.
///
/// Parsing this text yields exactly [`Config::default`].
pub const DEFAULT_CONFIG_TEXT: &str = "\
! HackerLand defaults
! Copy to ~/.config/HackerLand.hk and edit.

[theme]
-> border_active => #06b6d4
-> border_inactive => #334155
-> blur_strength => 16px
-> gap_size => 12
-> outer_padding => 24
-> active_opacity => 1
-> inactive_opacity => 0.85
-> accent_color => #06b6d4
-> bar_bg => #0f172acc

[wallpaper]
-> url => https://images.unsplash.com/photo-1550684848-fac1c5b4e853?q=80&w=2070&auto=format&fit=crop
-> overlay_opacity => 0.4

[animation]
-> duration => 0.3
-> stiffness => 100

[general]
-> font_family => JetBrains Mono
";

/// One of the four known configuration sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Theme,
    Wallpaper,
    Animation,
    General,
}

impl Section {
    /// Resolve a lowercase section name.  Returns `None` for names that
    /// have no section, which makes their assignments no-ops.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "theme" => Some(Section::Theme),
            "wallpaper" => Some(Section::Wallpaper),
            "animation" => Some(Section::Animation),
            "general" => Some(Section::General),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Section::Theme => "theme",
            Section::Wallpaper => "wallpaper",
            Section::Animation => "animation",
            Section::General => "general",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single `section.key = value` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub section: Section,
    pub key: String,
    pub value: Value,
}

/// A sparse, ordered set of assignments to apply over a base
/// configuration.  Later entries win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: Vec<Override>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: Section, key: impl Into<String>, value: Value) {
        self.entries.push(Override {
            section,
            key: key.into(),
            value,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    pub theme: ThemeConfig,
    pub wallpaper: WallpaperConfig,
    pub animation: AnimationConfig,
    pub general: GeneralConfig,
}

impl Config {
    /// Return a new configuration with `overrides` applied over `self`.
    ///
    /// `self` is left untouched.  Assignments to keys the section does
    /// not have are dropped.
    pub fn merge(&self, overrides: &Overrides) -> Config {
        let mut merged = self.clone();
        for o in overrides.iter() {
            match merged.slot_mut(o.section, &o.key) {
                Some(slot) => *slot = o.value.clone(),
                None => debug!("dropping unknown key {}.{}", o.section, o.key),
            }
        }
        merged
    }

    fn slot_mut(&mut self, section: Section, key: &str) -> Option<&mut Value> {
        match section {
            Section::Theme => self.theme.get_mut(key),
            Section::Wallpaper => self.wallpaper.get_mut(key),
            Section::Animation => self.animation.get_mut(key),
            Section::General => self.general.get_mut(key),
        }
    }

    /// Layout spacing from `theme.gap_size` and `theme.outer_padding`.
    ///
    /// A value that is not a finite number falls back to the default;
    /// negative numbers clamp to zero.
    pub fn spacing(&self) -> Spacing {
        let defaults = ThemeConfig::default();
        Spacing {
            gap: number_or(&self.theme.gap_size, &defaults.gap_size, "theme.gap_size"),
            padding: number_or(
                &self.theme.outer_padding,
                &defaults.outer_padding,
                "theme.outer_padding",
            ),
        }
    }

    /// Window opacity for a focused or unfocused window.
    pub fn opacity(&self, active: bool) -> f64 {
        let defaults = ThemeConfig::default();
        if active {
            number_or(&self.theme.active_opacity, &defaults.active_opacity, "theme.active_opacity")
        } else {
            number_or(
                &self.theme.inactive_opacity,
                &defaults.inactive_opacity,
                "theme.inactive_opacity",
            )
        }
    }

    /// Load and parse the DSL file at `path` in `fs`.
    pub fn load(fs: &VirtualFs, path: &str) -> Result<Self, ConfigError> {
        let bytes = fs
            .read(path)
            .ok_or_else(|| ConfigError::NotFound(path.to_string()))?;
        let text = std::str::from_utf8(bytes).map_err(|source| ConfigError::NotText {
            path: path.to_string(),
            source,
        })?;
        Ok(parser::parse(text))
    }

    /// Like [`Config::load`], but falls back to the defaults on any
    /// failure.
    pub fn load_or_default(fs: &VirtualFs, path: &str) -> Self {
        match Self::load(fs, path) {
            Ok(cfg) => {
                info!("loaded config from {}", path);
                cfg
            }
            Err(e) => {
                info!("{}, using defaults", e);
                Config::default()
            }
        }
    }
}

fn number_or(value: &Value, fallback: &Value, name: &str) -> f64 {
    match value.as_number() {
        Some(n) if n.is_finite() => n.max(0.0),
        _ => {
            warn!("{} is not a usable number ({}), using default", name, value);
            fallback.as_number().unwrap_or(0.0)
        }
    }
}

/// Error from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {0} not found")]
    NotFound(String),
    #[error("config file {path} is not valid UTF-8")]
    NotText {
        path: String,
        #[source]
        source: std::str::Utf8Error,
    },
}
