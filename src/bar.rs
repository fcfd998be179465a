//! Status bar along the top of the screen.
//!
//! Left to right: the brand pill, one indicator per workspace, the layout,
//! the config path, static system stats and the clock.  The clock runs on its own
//! thread ([`spawn_clock`]) and talks to the renderer directly; it never
//! touches window state.

use crate::traits::{Scene, SceneEvent};
use crate::workspace::Workspace;
use chrono::{DateTime, Local, TimeZone};
use log::debug;
use std::fmt;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Height of the bar in logical pixels.  Tiled windows start below it.
pub const BAR_HEIGHT: f64 = 40.0;

pub const CPU_USAGE: &str = "12%";
pub const MEMORY_USAGE: &str = "2.1G";

/// How often the clock thread ticks.
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// `HH:MM` in 24-hour time.
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%H:%M").to_string()
}

/// Start a thread that sends the current time to `sink` once per
/// [`CLOCK_INTERVAL`].  The thread exits when the receiver is dropped.
pub fn spawn_clock(sink: mpsc::Sender<SceneEvent>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        let now = format_clock(&Local::now());
        if sink.send(SceneEvent::Clock(now)).is_err() {
            debug!("clock receiver gone, stopping");
            break;
        }
        thread::sleep(CLOCK_INTERVAL);
    })
}

/// Renders the bar as a single line of text.
#[derive(Debug, Clone)]
pub struct StatusBar {
    config_path: String,
}

impl StatusBar {
    pub fn new(config_path: &str) -> Self {
        Self {
            config_path: config_path.to_string(),
        }
    }

    /// Workspace indicators: `[n]` for the active one, `n` for occupied
    /// ones and `·` for the rest.
    pub fn workspaces(scene: &Scene) -> String {
        Workspace::all()
            .map(|ws| {
                let n = ws.number();
                if n == scene.active_workspace {
                    format!("[{}]", n)
                } else if scene.occupied_workspaces.contains(&n) {
                    n.to_string()
                } else {
                    "·".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Layout name, plus the scratchpad size when anything is stashed.
    pub fn layout(scene: &Scene) -> String {
        match scene.scratchpad {
            0 => scene.layout.to_string(),
            n => format!("{} +{} stashed", scene.layout, n),
        }
    }

    pub fn render(&self, scene: &Scene, clock: &str) -> String {
        format!(
            "HACKERLAND  {}  {}  │  USER @ HACKEROS :: {}  │  CPU {}  RAM {}  │  {}",
            Self::workspaces(scene),
            Self::layout(scene),
            self.config_path,
            CPU_USAGE,
            MEMORY_USAGE,
            clock
        )
    }
}
