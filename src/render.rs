//! Terminal renderer for [`Scene`] snapshots.
//!
//! Runs on its own thread, consuming [`SceneEvent`]s from the desktop and
//! the clock.  In text mode every frame is drawn as a block of lines; in
//! JSON mode each frame is a single JSON object per line.

use crate::bar::StatusBar;
use crate::config::Config;
use crate::traits::{Scene, SceneEvent, WindowView};
use log::{debug, info};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::mpsc;

/// How frames are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Text,
    Json,
}

/// Scrollback lines shown under each terminal window.
const TERMINAL_PREVIEW_LINES: usize = 3;

/// Shown when the active workspace has no windows.
const IDLE_HINTS: &[&str] = &[
    "Press Alt+Enter to open a Terminal",
    "Press Alt+D to open the Application Launcher",
];

#[derive(Serialize)]
struct JsonFrame<'a> {
    clock: &'a str,
    #[serde(flatten)]
    scene: &'a Scene,
}

pub struct TextRenderer<W: Write> {
    out: W,
    config: Config,
    bar: StatusBar,
    mode: RenderMode,
    scene: Scene,
    clock: String,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, config: Config, bar: StatusBar, mode: RenderMode) -> Self {
        Self {
            out,
            config,
            bar,
            mode,
            scene: Scene::default(),
            clock: "--:--".to_string(),
        }
    }

    /// Record `event`.  Returns `true` if what is on screen changed.
    pub fn apply(&mut self, event: SceneEvent) -> bool {
        match event {
            SceneEvent::Frame(scene) => {
                let changed = scene != self.scene;
                self.scene = scene;
                changed
            }
            SceneEvent::Clock(text) => {
                let changed = text != self.clock;
                self.clock = text;
                changed
            }
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Draw the current state as text.
    pub fn render(&self) -> String {
        let mut lines = vec![self.bar.render(&self.scene, &self.clock)];

        if self.scene.windows.is_empty() {
            lines.extend(IDLE_HINTS.iter().map(|h| format!("  {}", h)));
        }
        for w in &self.scene.windows {
            lines.push(self.window_line(w));
            lines.extend(
                w.lines
                    .iter()
                    .rev()
                    .take(TERMINAL_PREVIEW_LINES)
                    .rev()
                    .map(|l| format!("      │ {}", l)),
            );
        }

        if let Some(launcher) = &self.scene.launcher {
            lines.push(format!("  run> {}", launcher.query));
            if launcher.matches.is_empty() {
                lines.push("    (no matches)".to_string());
            }
            for (i, name) in launcher.matches.iter().enumerate() {
                let marker = if i == launcher.selected { '>' } else { ' ' };
                lines.push(format!("    {} {}", marker, name));
            }
        }

        lines.join("\n")
    }

    fn window_line(&self, w: &WindowView) -> String {
        let r = w.rect;
        format!(
            "  {} {:<4} {:<16} {:<9} {:>4}x{:<4} @ {},{}  opacity {}{}",
            if w.active { '*' } else { ' ' },
            w.id.to_string(),
            w.title,
            w.kind.name(),
            r.width.round(),
            r.height.round(),
            r.x.round(),
            r.y.round(),
            self.config.opacity(w.active),
            if w.sticky { "  sticky" } else { "" },
        )
    }

    /// Write the current state in the configured mode.
    pub fn draw(&mut self) -> io::Result<()> {
        match self.mode {
            RenderMode::Text => {
                let frame = self.render();
                writeln!(self.out, "{}\n", frame)?;
            }
            RenderMode::Json => {
                let frame = JsonFrame {
                    clock: &self.clock,
                    scene: &self.scene,
                };
                let json = serde_json::to_string(&frame)?;
                writeln!(self.out, "{}", json)?;
            }
        }
        self.out.flush()
    }

    /// Draw every change received on `events` until all senders are gone.
    pub fn run(&mut self, events: mpsc::Receiver<SceneEvent>) -> io::Result<()> {
        info!("renderer running ({:?})", self.mode);
        for event in events {
            if self.apply(event) {
                self.draw()?;
            }
        }
        debug!("scene channel closed, renderer exiting");
        Ok(())
    }
}
