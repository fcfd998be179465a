//! The orchestrator that ties the window manager, launcher, shells and
//! input routing together.
//!
//! [`Desktop`] owns all mutable desktop state and reacts to [`Command`]s one
//! at a time.  After every successful command it publishes a fresh
//! [`Scene`] to the renderer and a [`StateReport`] to the state sink, for
//! whichever of the two is attached.

use crate::bar::BAR_HEIGHT;
use crate::command::{Command, WindowId, WindowKind};
use crate::config::Config;
use crate::input::InputRouter;
use crate::launcher::Launcher;
use crate::layout::Rect;
use crate::shell::Shell;
use crate::traits::{IdSource, Scene, SceneEvent, SequentialIds, StateReport, WindowView};
use crate::wm::WindowManager;
use crate::workspace::WorkspaceError;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::mpsc;

/// The simulated display.
pub const SCREEN: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1920.0,
    height: 1080.0,
};

/// Scrollback lines copied into each terminal's [`WindowView`].
const SCENE_SCROLLBACK: usize = 12;

/// Possible errors from the desktop.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DesktopError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Shell input was sent to a window that has no shell.
    #[error("window {0} is not a terminal")]
    NotATerminal(WindowId),
}

/// Orchestrates the desktop.
///
/// # Typical usage
///
/// ```ignore
/// let mut desktop = Desktop::new(Config::default());
/// desktop.handle(Command::SpawnWindow(WindowKind::Terminal))?;
/// ```
pub struct Desktop<I: IdSource = SequentialIds> {
    wm: WindowManager<I>,
    config: Config,
    router: InputRouter,
    launcher: Launcher,
    shells: HashMap<WindowId, Shell>,
    /// Area available to tiled windows: the screen minus the bar.
    region: Rect,
    scene_tx: Option<mpsc::Sender<SceneEvent>>,
    state_tx: Option<mpsc::Sender<StateReport>>,
}

impl Desktop<SequentialIds> {
    /// An empty desktop using `config`, the stock key bindings and
    /// sequential window ids.
    pub fn new(config: Config) -> Self {
        Self::with_window_manager(WindowManager::new(), config)
    }
}

impl<I: IdSource> Desktop<I> {
    pub fn with_window_manager(wm: WindowManager<I>, config: Config) -> Self {
        Self {
            wm,
            config,
            router: InputRouter::default(),
            launcher: Launcher::new(),
            shells: HashMap::new(),
            region: Rect::new(
                SCREEN.x,
                SCREEN.y + BAR_HEIGHT,
                SCREEN.width,
                SCREEN.height - BAR_HEIGHT,
            ),
            scene_tx: None,
            state_tx: None,
        }
    }

    /// Replace the key bindings.
    pub fn set_router(&mut self, router: InputRouter) {
        self.router = router;
    }

    /// Attach a scene channel.
    ///
    /// The desktop sends a [`SceneEvent::Frame`] after every command that
    /// succeeds.  The receiving end is typically the renderer thread.
    pub fn set_scene_sink(&mut self, tx: mpsc::Sender<SceneEvent>) {
        self.scene_tx = Some(tx);
    }

    /// Attach a state channel.  A [`StateReport`] follows every command
    /// that succeeds; the socket listener broadcasts them to its clients.
    pub fn set_state_sink(&mut self, tx: mpsc::Sender<StateReport>) {
        self.state_tx = Some(tx);
    }

    pub fn window_manager(&self) -> &WindowManager<I> {
        &self.wm
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shell running in terminal `id`.
    pub fn shell(&self, id: WindowId) -> Option<&Shell> {
        self.shells.get(&id)
    }

    /// Process a single [`Command`].
    ///
    /// On error the desktop state is unchanged and no scene is published.
    pub fn handle(&mut self, cmd: Command) -> Result<(), DesktopError> {
        self.apply(cmd)?;
        self.publish();
        Ok(())
    }

    fn apply(&mut self, cmd: Command) -> Result<(), DesktopError> {
        match cmd {
            Command::SpawnWindow(kind) => {
                self.spawn(kind);
            }

            Command::CloseWindow(id) => {
                if let Some(w) = self.wm.close_window(id) {
                    self.shells.remove(&w.id);
                }
            }

            Command::CloseActiveWindow => {
                if let Some(w) = self.wm.close_active_window() {
                    self.shells.remove(&w.id);
                }
            }

            Command::FocusWindow(id) => {
                self.wm.focus_window(id);
            }

            Command::SetActiveWorkspace(n) => {
                self.wm.set_active_workspace(n)?;
            }

            Command::MoveActiveToWorkspace(n) => {
                self.wm.move_active_to_workspace(n)?;
            }

            Command::CycleLayout => {
                self.wm.cycle_layout();
            }

            Command::ResizeMaster(delta) => {
                self.wm.resize_master(delta);
            }

            Command::ToggleScratchpad => {
                self.wm.toggle_scratchpad();
            }

            Command::ToggleSticky => {
                self.wm.toggle_sticky();
            }

            Command::OpenLauncher => {
                info!("launcher opened");
                self.launcher.open();
            }

            Command::LauncherQuery(query) => {
                if self.launcher.is_open() {
                    self.launcher.set_query(&query);
                } else {
                    debug!("launcher closed, ignoring query {:?}", query);
                }
            }

            Command::LauncherSelect(dir) => {
                if self.launcher.is_open() {
                    self.launcher.select(dir);
                }
            }

            Command::LauncherConfirm => {
                if !self.launcher.is_open() {
                    return Ok(());
                }
                match self.launcher.confirm() {
                    Some(kind) => {
                        self.spawn(kind);
                    }
                    None => debug!("launcher has no match for {:?}", self.launcher.query()),
                }
            }

            Command::LauncherClose => {
                self.launcher.close();
            }

            Command::ShellInput { window, line } => {
                let Some(w) = self.wm.window(window) else {
                    debug!("shell input for missing window {}", window);
                    return Ok(());
                };
                if w.kind != WindowKind::Terminal {
                    return Err(DesktopError::NotATerminal(window));
                }
                self.shells
                    .entry(window)
                    .or_default()
                    .execute(&line);
            }

            Command::Key(chord) => {
                if let Some(routed) = self.router.route(&chord, self.launcher.is_open()) {
                    debug!("{} → {:?}", chord, routed);
                    self.apply(routed)?;
                }
            }
        }
        Ok(())
    }

    fn spawn(&mut self, kind: WindowKind) -> WindowId {
        let id = self.wm.spawn_window(kind);
        if kind == WindowKind::Terminal {
            self.shells.insert(id, Shell::new());
        }
        id
    }

    /// Snapshot of what is on screen now.
    pub fn scene(&self) -> Scene {
        let active = self.wm.active_id();
        let windows = self
            .wm
            .geometry(self.region, self.config.spacing())
            .into_iter()
            .filter_map(|(id, rect)| {
                let w = self.wm.window(id)?;
                Some(WindowView {
                    id,
                    title: w.title.clone(),
                    kind: w.kind,
                    rect,
                    active: active == Some(id),
                    sticky: self.wm.is_sticky(id),
                    lines: self
                        .shells
                        .get(&id)
                        .map(|s| s.tail(SCENE_SCROLLBACK).to_vec())
                        .unwrap_or_default(),
                })
            })
            .collect();

        Scene {
            windows,
            active_workspace: self.wm.active_workspace().number(),
            occupied_workspaces: self
                .wm
                .occupied_workspaces()
                .into_iter()
                .map(|ws| ws.number())
                .collect(),
            layout: self.wm.tiling().mode,
            scratchpad: self.wm.scratchpad().len(),
            launcher: self.launcher.view(),
        }
    }

    /// Compact summary of the window manager state.
    pub fn state_report(&self) -> StateReport {
        let active = self.wm.active_id();
        StateReport {
            workspace: self.wm.active_workspace().number(),
            layout: self.wm.tiling().mode,
            window_count: self.wm.visible_windows().len(),
            active,
            sticky_active: active.is_some_and(|id| self.wm.is_sticky(id)),
            scratchpad: self.wm.scratchpad().len(),
        }
    }

    fn publish(&self) {
        if let Some(tx) = &self.scene_tx {
            if tx.send(SceneEvent::Frame(self.scene())).is_err() {
                debug!("scene receiver gone");
            }
        }
        if let Some(tx) = &self.state_tx {
            if tx.send(self.state_report()).is_err() {
                debug!("state receiver gone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Direction;
    use crate::config::parser;
    use crate::input::KeyChord;
    use crate::layout::LayoutMode;

    fn make_desktop() -> Desktop {
        Desktop::new(Config::default())
    }

    fn key(chord: &str) -> Command {
        Command::Key(chord.parse().unwrap())
    }

    fn collect_scene_events(d: &mut Desktop, cmd: Command) -> Vec<SceneEvent> {
        let (tx, rx) = mpsc::channel();
        d.set_scene_sink(tx);
        let _ = d.handle(cmd);
        rx.try_iter().collect()
    }

    #[test]
    fn every_command_publishes_one_frame() {
        let mut d = make_desktop();
        let events = collect_scene_events(&mut d, Command::SpawnWindow(WindowKind::Browser));
        match events.as_slice() {
            [SceneEvent::Frame(scene)] => {
                assert_eq!(scene.windows.len(), 1);
                assert!(scene.windows[0].active);
                assert_eq!(scene.occupied_workspaces, vec![1]);
            }
            other => panic!("expected one frame, got {other:#?}"),
        }
    }

    #[test]
    fn failed_command_publishes_nothing() {
        let mut d = make_desktop();
        let events = collect_scene_events(&mut d, Command::SetActiveWorkspace(7));
        assert!(events.is_empty());
        assert_eq!(d.window_manager().active_workspace().number(), 1);
        assert_eq!(
            d.handle(Command::SetActiveWorkspace(7)),
            Err(DesktopError::Workspace(WorkspaceError::OutOfRange(7)))
        );
    }

    #[test]
    fn scene_geometry_sits_below_the_bar() {
        let mut d = make_desktop();
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        let scene = d.scene();
        let r = scene.windows[0].rect;
        assert_eq!(r, Rect::new(24.0, BAR_HEIGHT + 24.0, 1872.0, 1080.0 - BAR_HEIGHT - 48.0));
    }

    #[test]
    fn configured_spacing_reaches_the_layout() {
        let cfg = parser::parse("[theme]\n-> gap_size => 20\n-> outer_padding => 0\n");
        let mut d = Desktop::new(cfg);
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        d.handle(Command::SpawnWindow(WindowKind::Browser)).unwrap();
        let scene = d.scene();
        assert_eq!(scene.windows[0].rect.width, 950.0);
        assert_eq!(scene.windows[1].rect.x, 970.0);
    }

    #[test]
    fn terminals_get_shells() {
        let mut d = make_desktop();
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        d.handle(Command::SpawnWindow(WindowKind::Settings)).unwrap();
        let term = WindowId(1);
        let settings = WindowId(2);
        assert!(d.shell(term).is_some());
        assert!(d.shell(settings).is_none());

        d.handle(Command::ShellInput {
            window: term,
            line: "whoami".into(),
        })
        .unwrap();
        assert_eq!(d.shell(term).unwrap().tail(1), &["root@hackerland".to_string()]);

        let scene = d.scene();
        assert_eq!(scene.windows[0].lines.last().unwrap(), "root@hackerland");
        assert!(scene.windows[1].lines.is_empty());
    }

    #[test]
    fn shell_input_to_non_terminal_is_an_error() {
        let mut d = make_desktop();
        d.handle(Command::SpawnWindow(WindowKind::Browser)).unwrap();
        assert_eq!(
            d.handle(Command::ShellInput {
                window: WindowId(1),
                line: "ls".into()
            }),
            Err(DesktopError::NotATerminal(WindowId(1)))
        );
        // Missing windows are ignored.
        assert_eq!(
            d.handle(Command::ShellInput {
                window: WindowId(9),
                line: "ls".into()
            }),
            Ok(())
        );
    }

    #[test]
    fn closing_drops_the_shell() {
        let mut d = make_desktop();
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        d.handle(Command::CloseActiveWindow).unwrap();
        assert!(d.shell(WindowId(1)).is_none());
        assert!(d.window_manager().windows().is_empty());
    }

    #[test]
    fn key_chords_drive_the_window_manager() {
        let mut d = make_desktop();
        d.handle(key("alt+enter")).unwrap();
        d.handle(key("alt+enter")).unwrap();
        assert_eq!(d.window_manager().windows().len(), 2);

        d.handle(key("alt+q")).unwrap();
        assert_eq!(d.window_manager().windows().len(), 1);
        assert_eq!(d.window_manager().active_id(), Some(WindowId(1)));

        d.handle(key("alt+3")).unwrap();
        assert_eq!(d.window_manager().active_workspace().number(), 3);
        assert!(d.scene().windows.is_empty());

        // Unbound keys do nothing.
        d.handle(key("q")).unwrap();
        d.handle(key("alt+9")).unwrap();
        assert_eq!(d.window_manager().active_workspace().number(), 3);
    }

    #[test]
    fn alt_shift_moves_focused_window() {
        let mut d = make_desktop();
        d.handle(key("alt+enter")).unwrap();
        d.handle(key("alt+shift+2")).unwrap();
        assert!(d.scene().windows.is_empty());
        d.handle(key("alt+2")).unwrap();
        assert_eq!(d.scene().windows.len(), 1);
    }

    #[test]
    fn launcher_flow_via_keys() {
        let mut d = make_desktop();
        d.handle(key("alt+d")).unwrap();
        assert!(d.launcher().is_open());
        assert!(d.scene().launcher.is_some());

        d.handle(key("arrowdown")).unwrap();
        d.handle(key("enter")).unwrap();
        assert!(!d.launcher().is_open());
        let w = &d.window_manager().windows()[0];
        assert_eq!(w.kind, WindowKind::Browser);
        assert!(d.scene().launcher.is_none());
    }

    #[test]
    fn launcher_query_and_escape() {
        let mut d = make_desktop();
        d.handle(Command::OpenLauncher).unwrap();
        d.handle(Command::LauncherQuery("zzz".into())).unwrap();
        d.handle(Command::LauncherConfirm).unwrap();
        assert!(d.launcher().is_open());
        assert!(d.window_manager().windows().is_empty());

        d.handle(key("esc")).unwrap();
        assert!(!d.launcher().is_open());

        // Enter with the launcher closed is not bound.
        d.handle(key("enter")).unwrap();
        assert!(d.window_manager().windows().is_empty());
    }

    #[test]
    fn launcher_commands_ignored_while_closed() {
        let mut d = make_desktop();
        d.handle(Command::LauncherQuery("set".into())).unwrap();
        d.handle(Command::LauncherSelect(Direction::Down)).unwrap();
        d.handle(Command::LauncherConfirm).unwrap();
        assert!(d.window_manager().windows().is_empty());
        assert_eq!(d.launcher().query(), "");
    }

    #[test]
    fn thunar_launches_a_terminal_with_a_shell() {
        let mut d = make_desktop();
        d.handle(Command::OpenLauncher).unwrap();
        d.handle(Command::LauncherQuery("THU".into())).unwrap();
        d.handle(Command::LauncherConfirm).unwrap();
        assert!(d.shell(WindowId(1)).is_some());
    }

    #[test]
    fn custom_router() {
        let mut d = make_desktop();
        let mut router = InputRouter::empty();
        router
            .bind("ctrl+b", Command::SpawnWindow(WindowKind::Browser))
            .unwrap();
        d.set_router(router);
        d.handle(key("alt+enter")).unwrap();
        assert!(d.window_manager().windows().is_empty());
        d.handle(Command::Key(KeyChord::plain("b"))).unwrap();
        d.handle(key("ctrl+b")).unwrap();
        assert_eq!(d.window_manager().windows().len(), 1);
    }

    #[test]
    fn chord_to_chord_bindings_are_refused() {
        let mut d = make_desktop();
        let mut router = InputRouter::empty();
        assert!(router.bind("ctrl+k", key("ctrl+k")).is_err());
        d.set_router(router);
        assert_eq!(d.handle(key("ctrl+k")), Ok(()));
        assert!(d.window_manager().windows().is_empty());
    }

    #[test]
    fn layout_keys_reach_the_scene() {
        let mut d = make_desktop();
        d.handle(key("alt+enter")).unwrap();
        d.handle(key("alt+enter")).unwrap();
        d.handle(key("alt+l")).unwrap();
        let master = d.scene().windows[0].rect;
        // (1872 - 12) * 0.55
        assert!((master.width - 1023.0).abs() < 1e-6);

        d.handle(key("alt+space")).unwrap();
        let scene = d.scene();
        assert_eq!(scene.layout, LayoutMode::Monocle);
        assert_eq!(scene.windows[0].rect, scene.windows[1].rect);

        d.handle(key("alt+space")).unwrap();
        assert_eq!(d.scene().layout, LayoutMode::Grid);
    }

    #[test]
    fn scratchpad_and_sticky_via_commands() {
        let mut d = make_desktop();
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        d.handle(Command::SpawnWindow(WindowKind::Browser)).unwrap();

        d.handle(Command::ToggleSticky).unwrap();
        d.handle(Command::SetActiveWorkspace(2)).unwrap();
        let scene = d.scene();
        assert_eq!(scene.windows.len(), 1);
        assert!(scene.windows[0].sticky);
        assert!(d.state_report().sticky_active);

        d.handle(Command::ToggleScratchpad).unwrap();
        let scene = d.scene();
        assert!(scene.windows.is_empty());
        assert_eq!(scene.scratchpad, 1);

        d.handle(Command::ToggleScratchpad).unwrap();
        let scene = d.scene();
        assert_eq!(scene.scratchpad, 0);
        assert_eq!(scene.active_window().map(|w| w.id), Some(WindowId(2)));
        assert!(!scene.windows[0].sticky);
    }

    #[test]
    fn state_reports_follow_successful_commands() {
        let mut d = make_desktop();
        let (tx, rx) = mpsc::channel();
        d.set_state_sink(tx);
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        d.handle(Command::CycleLayout).unwrap();
        let _ = d.handle(Command::SetActiveWorkspace(9));
        let reports: Vec<StateReport> = rx.try_iter().collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[1],
            StateReport {
                workspace: 1,
                layout: LayoutMode::Monocle,
                window_count: 1,
                active: Some(WindowId(1)),
                sticky_active: false,
                scratchpad: 0,
            }
        );
    }

    #[test]
    fn focus_window_switches_workspace_in_scene() {
        let mut d = make_desktop();
        d.handle(Command::SpawnWindow(WindowKind::Terminal)).unwrap();
        d.handle(Command::SetActiveWorkspace(4)).unwrap();
        d.handle(Command::SpawnWindow(WindowKind::Browser)).unwrap();
        d.handle(Command::FocusWindow(WindowId(1))).unwrap();
        let scene = d.scene();
        assert_eq!(scene.active_workspace, 1);
        assert_eq!(scene.occupied_workspaces, vec![1, 4]);
        assert_eq!(scene.active_window().map(|w| w.id), Some(WindowId(1)));
    }
}
