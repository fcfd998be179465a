//! Seams between the desktop core and the outside world.
//!
//! * [`CommandSource`] abstracts the transports that deliver user intent
//!   (a Unix socket, stdin, a test harness) so the main loop is not coupled
//!   to any of them.
//! * [`IdSource`] abstracts window id allocation so tests can pin ids.
//! * [`Scene`] / [`SceneEvent`] are what the [`Desktop`](crate::desktop::Desktop)
//!   publishes to the rendering side.  Renderers never see the window
//!   manager itself, only these snapshots.
//! * [`StateReport`] is the compact summary pushed to socket clients.

use crate::command::{Command, WindowId, WindowKind};
use crate::layout::{LayoutMode, Rect};
use serde::Serialize;
use std::sync::mpsc;

//  Window ids

/// Hands out window ids.
///
/// # Contract
///
/// Every call to [`next_id`](IdSource::next_id) returns an id that has
/// never been returned before by the same source.
pub trait IdSource {
    fn next_id(&mut self) -> WindowId;
}

/// The stock [`IdSource`]: a counter starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> WindowId {
        let id = WindowId(self.next);
        self.next += 1;
        id
    }
}

//  Scene

/// One visible window as the renderer should draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowView {
    pub id: WindowId,
    pub title: String,
    pub kind: WindowKind,
    pub rect: Rect,
    /// Whether this window has focus.
    pub active: bool,
    /// Whether this window is shown on every workspace.
    pub sticky: bool,
    /// Last lines of the shell scrollback, for terminal windows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

/// The launcher overlay, when it is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LauncherView {
    pub query: String,
    /// Names of the entries matching `query`, in catalog order.
    pub matches: Vec<String>,
    /// Index into `matches`.  Meaningless when `matches` is empty.
    pub selected: usize,
}

/// A read-only snapshot of everything on screen.
///
/// Built by the [`Desktop`](crate::desktop::Desktop) after every command
/// and handed to the renderer over a channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    /// Windows on the active workspace in stacking order, with geometry.
    pub windows: Vec<WindowView>,
    pub active_workspace: u32,
    /// Workspaces that hold at least one window, ascending.
    pub occupied_workspaces: Vec<u32>,
    pub layout: LayoutMode,
    /// Number of windows stashed in the scratchpad.
    pub scratchpad: usize,
    pub launcher: Option<LauncherView>,
}

impl Scene {
    /// The focused window, if it is visible.
    pub fn active_window(&self) -> Option<&WindowView> {
        self.windows.iter().find(|w| w.active)
    }
}

/// One-line desktop summary broadcast to socket clients after every
/// command, as compact JSON:
///
/// ```json
/// {"workspace":1,"layout":"master_stack","window_count":2,"active":2,"sticky_active":false,"scratchpad":0}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateReport {
    pub workspace: u32,
    pub layout: LayoutMode,
    /// Windows visible on the active workspace.
    pub window_count: usize,
    pub active: Option<WindowId>,
    /// Whether the focused window is sticky.
    pub sticky_active: bool,
    pub scratchpad: usize,
}

/// Events delivered to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The desktop changed; redraw from this snapshot.
    Frame(Scene),
    /// The clock ticked; the payload is the text to show in the bar.
    Clock(String),
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport and forward parsed commands
/// into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
