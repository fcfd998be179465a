//! Commands and types used throughout hackerland.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the desktop can perform, and
//! [`WindowId`] / [`WindowKind`] / [`Direction`] provide the supporting
//! data types.
//!
//! Command sources forward JSON on the wire; window kinds and directions
//! are parsed case-insensitively (e.g. `"Terminal"`, `"down"`).

use crate::input::KeyChord;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque, process-unique window identifier.
///
/// Ids are handed out by an [`IdSource`](crate::traits::IdSource) and are
/// never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kinds of application window the desktop can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Terminal,
    Browser,
    Settings,
    Welcome,
}

impl WindowKind {
    /// Lowercase name used on the wire and as a fallback title.
    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Terminal => "terminal",
            WindowKind::Browser => "browser",
            WindowKind::Settings => "settings",
            WindowKind::Welcome => "welcome",
        }
    }

    /// Title shown in the window decoration.
    ///
    /// Terminals show the shell's working directory; every other kind is
    /// titled after itself.
    pub fn default_title(self) -> &'static str {
        match self {
            WindowKind::Terminal => "~/user/projects",
            other => other.name(),
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known [`WindowKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown window kind: {0:?}")]
pub struct UnknownKind(String);

impl FromStr for WindowKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terminal" => Ok(WindowKind::Terminal),
            "browser" => Ok(WindowKind::Browser),
            "settings" => Ok(WindowKind::Settings),
            "welcome" => Ok(WindowKind::Welcome),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for WindowKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// Direction for moving the launcher selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts "up", "Down", "arrow_up", …).
fn parse_direction(s: &str) -> Option<Direction> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "up" | "arrowup" => Some(Direction::Up),
        "down" | "arrowdown" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Every action the desktop can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Desktop`](crate::desktop::Desktop),
/// one at a time and in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Open a new window of the given kind and focus it.
    SpawnWindow(WindowKind),

    /// Close the window with this id.  Unknown ids are ignored.
    CloseWindow(WindowId),

    /// Close whichever window currently has focus, if any.
    CloseActiveWindow,

    /// Give focus to the window with this id.  Unknown ids are ignored.
    FocusWindow(WindowId),

    /// Switch to workspace `1..=5`.  Other values are rejected.
    SetActiveWorkspace(u32),

    /// Send the focused window to workspace `1..=5` without following it.
    MoveActiveToWorkspace(u32),

    /// Switch to the next layout: master-stack, monocle, grid.
    CycleLayout,

    /// Grow (positive) or shrink (negative) the master column's share of
    /// the width.  The share stays within `0.1..=0.9`.
    ResizeMaster(f64),

    /// Stash the focused window in the scratchpad, or with nothing
    /// focused, bring the most recently stashed one back.
    ToggleScratchpad,

    /// Pin the focused window to every workspace, or unpin it.
    ToggleSticky,

    /// Show the application launcher with an empty query.
    OpenLauncher,

    /// Replace the launcher's filter text.
    LauncherQuery(String),

    /// Move the launcher selection, wrapping around the filtered list.
    LauncherSelect(Direction),

    /// Launch the selected entry and hide the launcher.
    LauncherConfirm,

    /// Hide the launcher without launching anything.
    LauncherClose,

    /// Feed one line of input to the shell running in a terminal window.
    ShellInput { window: WindowId, line: String },

    /// A raw key chord, translated by the
    /// [`InputRouter`](crate::input::InputRouter).
    ///
    /// On the wire this is a string such as `"alt+enter"`.
    Key(KeyChord),
}
