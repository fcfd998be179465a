//! Keyboard chords and the router that turns them into [`Command`]s.
//!
//! Chords are written as modifier names followed by a key, separated by
//! `+` or `-`: `alt+enter`, `Alt-Shift-1`, `escape`.  Matching is
//! case-insensitive and a few key aliases are normalised (`return` →
//! `enter`, `esc` → `escape`, `up` → `arrowup`).
//!
//! Every global binding is gated on a modifier.  While the launcher is
//! open, the bare navigation keys (`enter`, `escape`, `arrowup`,
//! `arrowdown`) are claimed by the launcher before global bindings are
//! consulted.

use crate::command::{Command, Direction, WindowKind};
use log::debug;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Modifier keys held while a chord is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether no modifier is held.
    pub fn is_empty(self) -> bool {
        self == Modifiers::default()
    }
}

/// A modifier + key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    /// Lowercase key name (`"enter"`, `"q"`, `"1"`, `"arrowup"`).
    pub key: String,
}

/// Errors from parsing a chord string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChordError {
    #[error("empty key chord")]
    Empty,
    #[error("unknown modifier: {0:?}")]
    UnknownModifier(String),
}

impl KeyChord {
    /// A key pressed without modifiers.
    pub fn plain(key: &str) -> Self {
        Self {
            modifiers: Modifiers::default(),
            key: normalise_key(key),
        }
    }

    /// A key pressed with `alt` held.
    pub fn alt(key: &str) -> Self {
        Self {
            modifiers: Modifiers {
                alt: true,
                ..Modifiers::default()
            },
            key: normalise_key(key),
        }
    }

    /// A key pressed with `alt` and `shift` held.
    pub fn alt_shift(key: &str) -> Self {
        Self {
            modifiers: Modifiers {
                alt: true,
                shift: true,
                ..Modifiers::default()
            },
            key: normalise_key(key),
        }
    }
}

fn normalise_key(key: &str) -> String {
    let key = key.trim().to_lowercase();
    match key.as_str() {
        "return" => "enter".into(),
        "esc" => "escape".into(),
        "up" => "arrowup".into(),
        "down" => "arrowdown".into(),
        _ => key,
    }
}

impl FromStr for KeyChord {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(['+', '-']).map(str::trim).collect();
        let (key, mods) = parts.split_last().ok_or(ChordError::Empty)?;
        if key.is_empty() {
            return Err(ChordError::Empty);
        }

        let mut modifiers = Modifiers::default();
        for part in mods {
            match part.to_lowercase().as_str() {
                "alt" | "opt" | "option" => modifiers.alt = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "super" | "meta" | "cmd" | "win" => modifiers.meta = true,
                _ => return Err(ChordError::UnknownModifier(part.to_string())),
            }
        }

        Ok(Self {
            modifiers,
            key: normalise_key(key),
        })
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [(m.alt, "alt"), (m.ctrl, "ctrl"), (m.shift, "shift"), (m.meta, "super")] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        f.write_str(&self.key)
    }
}

impl Serialize for KeyChord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for KeyChord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// Errors from [`InputRouter::bind`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error(transparent)]
    Chord(#[from] ChordError),
    /// A chord may not be bound to another chord.
    #[error("cannot bind {0} to a key chord")]
    KeyTarget(KeyChord),
}

/// Step used by the `alt+h` / `alt+l` master resize bindings.
pub const MASTER_STEP: f64 = 0.05;

/// Maps key chords to [`Command`]s.
///
/// [`InputRouter::default`] installs the stock bindings:
///
/// | chord             | command                          |
/// |-------------------|----------------------------------|
/// | `alt+enter`       | spawn a terminal                 |
/// | `alt+q`           | close the focused window         |
/// | `alt+d`           | open the launcher                |
/// | `alt+space`       | cycle the layout                 |
/// | `alt+h` / `alt+l` | shrink / grow the master column  |
/// | `alt+minus`       | toggle the scratchpad            |
/// | `alt+p`           | toggle sticky                    |
/// | `alt+1` … `alt+5` | switch workspace                 |
/// | `alt+shift+1` …   | move the focused window there    |
#[derive(Debug, Clone)]
pub struct InputRouter {
    bindings: HashMap<KeyChord, Command>,
}

impl InputRouter {
    /// A router with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `chord` (e.g. `"alt+t"`) to `command`, replacing any previous
    /// binding for the same chord.
    ///
    /// [`Command::Key`] targets are refused: routing never produces
    /// another chord.
    pub fn bind(&mut self, chord: &str, command: Command) -> Result<(), BindError> {
        let chord: KeyChord = chord.parse()?;
        if let Command::Key(target) = command {
            return Err(BindError::KeyTarget(target));
        }
        debug!("binding {} to {:?}", chord, command);
        self.bindings.insert(chord, command);
        Ok(())
    }

    /// All bindings as `(chord, command)` pairs, sorted by chord text.
    pub fn bindings(&self) -> Vec<(String, Command)> {
        let mut list: Vec<(String, Command)> = self
            .bindings
            .iter()
            .map(|(chord, cmd)| (chord.to_string(), cmd.clone()))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    }

    /// Translate a chord into a command.
    ///
    /// `launcher_open` lets the launcher claim its navigation keys first.
    /// Returns `None` for chords nothing is bound to.
    pub fn route(&self, chord: &KeyChord, launcher_open: bool) -> Option<Command> {
        if launcher_open && chord.modifiers.is_empty() {
            let launcher_cmd = match chord.key.as_str() {
                "enter" => Some(Command::LauncherConfirm),
                "escape" => Some(Command::LauncherClose),
                "arrowup" => Some(Command::LauncherSelect(Direction::Up)),
                "arrowdown" => Some(Command::LauncherSelect(Direction::Down)),
                _ => None,
            };
            if launcher_cmd.is_some() {
                return launcher_cmd;
            }
        }

        let routed = self.bindings.get(chord).cloned();
        if routed.is_none() {
            debug!("unbound chord {}", chord);
        }
        routed
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        let mut router = Self::empty();
        let b = &mut router.bindings;
        b.insert(KeyChord::alt("enter"), Command::SpawnWindow(WindowKind::Terminal));
        b.insert(KeyChord::alt("q"), Command::CloseActiveWindow);
        b.insert(KeyChord::alt("d"), Command::OpenLauncher);
        b.insert(KeyChord::alt("space"), Command::CycleLayout);
        b.insert(KeyChord::alt("h"), Command::ResizeMaster(-MASTER_STEP));
        b.insert(KeyChord::alt("l"), Command::ResizeMaster(MASTER_STEP));
        b.insert(KeyChord::alt("minus"), Command::ToggleScratchpad);
        b.insert(KeyChord::alt("p"), Command::ToggleSticky);
        for n in 1..=5u32 {
            let key = n.to_string();
            b.insert(KeyChord::alt(&key), Command::SetActiveWorkspace(n));
            b.insert(KeyChord::alt_shift(&key), Command::MoveActiveToWorkspace(n));
        }
        router
    }
}
