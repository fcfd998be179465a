//! Window lifecycle, focus, workspace and layout state.
//!
//! The [`WindowManager`] owns every [`Window`].  Windows are kept in
//! insertion order, which is also stacking order.  Each window belongs to
//! exactly one workspace, tracked in a [`WorkspaceMap`], unless it is
//! stashed in the scratchpad, where it belongs to none and is never shown.
//!
//! A window on the active workspace is visible.  So is a *sticky* window,
//! on every workspace: sticky windows are tiled first, then the active
//! workspace's own windows.  The first visible window is the layout master.
//!
//! Invariants held after every operation:
//!
//! * window ids are pairwise distinct for the lifetime of the manager;
//! * the active id is either unset or names a window present in the list,
//!   and that window is visible on the active workspace;
//! * a stashed window is neither sticky nor on any workspace;
//! * an empty window list means no active id.

use crate::command::{WindowId, WindowKind};
use crate::layout::{self, LayoutMode, Rect, Spacing, Tiling};
use crate::traits::{IdSource, SequentialIds};
use crate::workspace::{Workspace, WorkspaceError, WorkspaceMap};
use log::{debug, info};

/// An application window.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub kind: WindowKind,
}

/// Owns the window list, focus, the active workspace and the layout.
#[derive(Debug)]
pub struct WindowManager<I: IdSource = SequentialIds> {
    ids: I,
    windows: Vec<Window>,
    active: Option<WindowId>,
    active_workspace: Workspace,
    membership: WorkspaceMap,
    sticky: Vec<WindowId>,
    /// Stashed windows, most recent last.
    scratchpad: Vec<WindowId>,
    tiling: Tiling,
}

impl WindowManager<SequentialIds> {
    /// An empty desktop on workspace 1 with sequential ids.
    pub fn new() -> Self {
        Self::with_ids(SequentialIds::new())
    }
}

impl Default for WindowManager<SequentialIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdSource> WindowManager<I> {
    /// An empty desktop on workspace 1 drawing ids from `ids`.
    pub fn with_ids(ids: I) -> Self {
        Self {
            ids,
            windows: Vec::new(),
            active: None,
            active_workspace: Workspace::FIRST,
            membership: WorkspaceMap::new(),
            sticky: Vec::new(),
            scratchpad: Vec::new(),
            tiling: Tiling::default(),
        }
    }

    //  Mutations

    /// Open a window of `kind` on the active workspace and focus it.
    pub fn spawn_window(&mut self, kind: WindowKind) -> WindowId {
        let id = self.ids.next_id();
        debug_assert!(
            self.index_of(id).is_none(),
            "id source returned duplicate id {}",
            id
        );
        self.windows.push(Window {
            id,
            title: kind.default_title().to_string(),
            kind,
        });
        self.membership.assign(id, self.active_workspace);
        self.active = Some(id);
        info!("spawned {} window {} on workspace {}", kind, id, self.active_workspace);
        id
    }

    /// Close the window `id`.  Unknown ids are ignored.
    ///
    /// If the closed window had focus, focus moves to the last remaining
    /// visible window, or is cleared.
    pub fn close_window(&mut self, id: WindowId) -> Option<Window> {
        let Some(index) = self.index_of(id) else {
            debug!("close: no window {}", id);
            return None;
        };
        let window = self.windows.remove(index);
        self.membership.remove(id);
        self.sticky.retain(|w| *w != id);
        self.scratchpad.retain(|w| *w != id);
        if self.active == Some(id) {
            self.active = self.last_on(self.active_workspace);
        }
        info!("closed {} window {}", window.kind, id);
        Some(window)
    }

    /// Close the focused window.  Does nothing when nothing has focus.
    pub fn close_active_window(&mut self) -> Option<Window> {
        let id = self.active?;
        self.close_window(id)
    }

    /// Focus the window `id`, switching to its workspace if it is not
    /// visible from here.
    ///
    /// Returns `false` (and changes nothing) for unknown and stashed ids.
    /// Stacking order is never changed.
    pub fn focus_window(&mut self, id: WindowId) -> bool {
        let Some(workspace) = self.membership.workspace_of(id) else {
            debug!("focus: no window {} on any workspace", id);
            return false;
        };
        if workspace != self.active_workspace && !self.is_sticky(id) {
            info!("switching to workspace {} to focus {}", workspace, id);
            self.active_workspace = workspace;
        }
        self.active = Some(id);
        true
    }

    /// Switch to workspace `n`.
    ///
    /// Out-of-range values are rejected and leave the state untouched.  On
    /// an actual switch, focus moves to the last visible window there, or
    /// is cleared if nothing is visible.
    pub fn set_active_workspace(&mut self, n: u32) -> Result<(), WorkspaceError> {
        let target = Workspace::new(n)?;
        if target == self.active_workspace {
            return Ok(());
        }
        self.active_workspace = target;
        self.active = self.last_on(target);
        info!("switched to workspace {}", target);
        Ok(())
    }

    /// Send the focused window to workspace `n` without following it.
    ///
    /// Focus falls back to the last visible window on the current
    /// workspace.  Returns the moved window's id, or `None` when nothing
    /// has focus or the window is already there.
    pub fn move_active_to_workspace(&mut self, n: u32) -> Result<Option<WindowId>, WorkspaceError> {
        let target = Workspace::new(n)?;
        let Some(id) = self.active else {
            return Ok(None);
        };
        if target == self.active_workspace {
            return Ok(None);
        }
        self.membership.assign(id, target);
        self.active = self.last_on(self.active_workspace);
        info!("moved {} to workspace {}", id, target);
        Ok(Some(id))
    }

    /// Stash the focused window, or bring the most recent one back.
    ///
    /// With a focused window, that window leaves its workspace (and the
    /// sticky set) for the scratchpad and focus is cleared, so the next
    /// toggle restores it.  With nothing focused, the most recently stashed
    /// window returns to the active workspace, keeps its stacking position
    /// and takes focus.  Returns the window that moved.
    pub fn toggle_scratchpad(&mut self) -> Option<WindowId> {
        if let Some(id) = self.active {
            self.membership.remove(id);
            self.sticky.retain(|w| *w != id);
            self.scratchpad.push(id);
            self.active = None;
            info!("stashed {} in the scratchpad", id);
            return Some(id);
        }
        let id = self.scratchpad.pop()?;
        self.membership.assign(id, self.active_workspace);
        self.active = Some(id);
        info!("restored {} from the scratchpad", id);
        Some(id)
    }

    /// Pin the focused window to every workspace, or unpin it.
    ///
    /// An unpinned window stays on the workspace it was unpinned from.
    /// Returns the new sticky state, or `None` when nothing has focus.
    pub fn toggle_sticky(&mut self) -> Option<bool> {
        let id = self.active?;
        if self.is_sticky(id) {
            self.sticky.retain(|w| *w != id);
            self.membership.assign(id, self.active_workspace);
            info!("{} is no longer sticky", id);
            Some(false)
        } else {
            self.sticky.push(id);
            info!("{} is sticky", id);
            Some(true)
        }
    }

    /// Switch to the next [`LayoutMode`].
    pub fn cycle_layout(&mut self) -> LayoutMode {
        self.tiling.mode = self.tiling.mode.next();
        info!("layout is now {}", self.tiling.mode);
        self.tiling.mode
    }

    /// Change the master share of the width by `delta`.  Returns the new
    /// ratio.
    pub fn resize_master(&mut self, delta: f64) -> f64 {
        self.tiling.resize_master(delta);
        debug!("master ratio {:.2}", self.tiling.master_ratio);
        self.tiling.master_ratio
    }

    //  Queries

    /// Every window in stacking order, across all workspaces and the
    /// scratchpad.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Look up a window by id.
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Windows shown on the active workspace: sticky ones first, then the
    /// workspace's own, each group in stacking order.
    pub fn visible_windows(&self) -> Vec<&Window> {
        self.visible_on(self.active_workspace)
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.active
    }

    pub fn active_workspace(&self) -> Workspace {
        self.active_workspace
    }

    /// The workspace `id` lives on.  Stashed windows live on none.
    pub fn workspace_of(&self, id: WindowId) -> Option<Workspace> {
        self.membership.workspace_of(id)
    }

    /// Workspaces holding at least one window, ascending.  A sticky window
    /// counts on the workspace it was pinned from.
    pub fn occupied_workspaces(&self) -> Vec<Workspace> {
        self.membership.occupied()
    }

    pub fn is_sticky(&self, id: WindowId) -> bool {
        self.sticky.contains(&id)
    }

    /// Stashed windows, most recent last.
    pub fn scratchpad(&self) -> &[WindowId] {
        &self.scratchpad
    }

    pub fn tiling(&self) -> Tiling {
        self.tiling
    }

    /// Tile the visible windows inside `region`.
    pub fn geometry(&self, region: Rect, spacing: Spacing) -> Vec<(WindowId, Rect)> {
        let visible = self.visible_windows();
        let rects = layout::layout(&visible, region, spacing, self.tiling);
        visible.iter().map(|w| w.id).zip(rects).collect()
    }

    //  Helpers

    fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    fn visible_on(&self, workspace: Workspace) -> Vec<&Window> {
        let sticky = self.windows.iter().filter(|w| self.is_sticky(w.id));
        let own = self
            .windows
            .iter()
            .filter(|w| !self.is_sticky(w.id) && self.membership.is_on(w.id, workspace));
        sticky.chain(own).collect()
    }

    fn last_on(&self, workspace: Workspace) -> Option<WindowId> {
        self.visible_on(workspace).last().map(|w| w.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Id source that hands out ids from a fixed list.
    struct FixedIds(Vec<u64>);

    impl IdSource for FixedIds {
        fn next_id(&mut self) -> WindowId {
            WindowId(self.0.remove(0))
        }
    }

    fn ids(wm: &WindowManager<impl IdSource>) -> Vec<u64> {
        wm.windows().iter().map(|w| w.id.0).collect()
    }

    fn visible_ids(wm: &WindowManager<impl IdSource>) -> Vec<u64> {
        wm.visible_windows().iter().map(|w| w.id.0).collect()
    }

    fn assert_invariants<I: IdSource>(wm: &WindowManager<I>) {
        let mut seen = std::collections::HashSet::new();
        for w in wm.windows() {
            assert!(seen.insert(w.id), "duplicate id {}", w.id);
        }
        if let Some(id) = wm.active_id() {
            assert!(wm.window(id).is_some(), "active {} not in list", id);
            assert!(
                wm.visible_windows().iter().any(|w| w.id == id),
                "active {} not visible",
                id
            );
        }
        for id in wm.scratchpad() {
            assert_eq!(wm.workspace_of(*id), None);
            assert!(!wm.is_sticky(*id));
        }
        let ratio = wm.tiling().master_ratio;
        assert!((layout::MIN_MASTER_RATIO..=layout::MAX_MASTER_RATIO).contains(&ratio));
        if wm.windows().is_empty() {
            assert_eq!(wm.active_id(), None);
        }
    }

    #[test]
    fn starts_empty_on_workspace_one() {
        let wm = WindowManager::new();
        assert!(wm.windows().is_empty());
        assert_eq!(wm.active_id(), None);
        assert_eq!(wm.active_workspace().number(), 1);
    }

    #[test]
    fn spawn_appends_and_focuses() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Browser);
        assert_eq!(ids(&wm), vec![a.0, b.0]);
        assert_eq!(wm.active_id(), Some(b));
        assert_eq!(wm.window(a).unwrap().title, "~/user/projects");
        assert_eq!(wm.window(b).unwrap().title, "browser");
    }

    #[test]
    fn injected_ids_are_used() {
        let mut wm = WindowManager::with_ids(FixedIds(vec![40, 7]));
        assert_eq!(wm.spawn_window(WindowKind::Settings), WindowId(40));
        assert_eq!(wm.spawn_window(WindowKind::Settings), WindowId(7));
    }

    #[test]
    fn closing_active_first_window_focuses_the_other() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Terminal);
        wm.focus_window(a);
        wm.close_window(a);
        assert_eq!(wm.active_id(), Some(b));
    }

    #[test]
    fn closing_active_picks_last_remaining() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Terminal);
        let c = wm.spawn_window(WindowKind::Terminal);
        wm.focus_window(b);
        wm.close_window(b);
        assert_eq!(wm.active_id(), Some(c));
        assert_eq!(ids(&wm), vec![a.0, c.0]);
    }

    #[test]
    fn closing_inactive_keeps_focus() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Terminal);
        wm.close_window(a);
        assert_eq!(wm.active_id(), Some(b));
    }

    #[test]
    fn closing_last_window_clears_focus() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        assert_eq!(wm.close_window(a).map(|w| w.id), Some(a));
        assert_eq!(wm.active_id(), None);
        assert!(wm.windows().is_empty());
    }

    #[test]
    fn close_unknown_is_noop() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        assert!(wm.close_window(WindowId(999)).is_none());
        assert_eq!(ids(&wm), vec![a.0]);
        assert_eq!(wm.active_id(), Some(a));
    }

    #[test]
    fn close_active_with_nothing_focused() {
        let mut wm = WindowManager::new();
        assert!(wm.close_active_window().is_none());
        let a = wm.spawn_window(WindowKind::Terminal);
        assert_eq!(wm.close_active_window().map(|w| w.id), Some(a));
        assert!(wm.close_active_window().is_none());
    }

    #[test]
    fn focus_does_not_reorder() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Browser);
        assert!(wm.focus_window(a));
        assert_eq!(ids(&wm), vec![a.0, b.0]);
        assert_eq!(wm.active_id(), Some(a));
        assert!(!wm.focus_window(WindowId(77)));
        assert_eq!(wm.active_id(), Some(a));
    }

    #[test]
    fn workspace_out_of_range_is_rejected() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        assert_eq!(wm.set_active_workspace(7), Err(WorkspaceError::OutOfRange(7)));
        assert_eq!(wm.set_active_workspace(0), Err(WorkspaceError::OutOfRange(0)));
        assert_eq!(wm.active_workspace().number(), 1);
        assert_eq!(wm.active_id(), Some(a));
    }

    #[test]
    fn workspaces_scope_visibility() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        wm.set_active_workspace(2).unwrap();
        assert_eq!(wm.active_id(), None);
        assert!(wm.visible_windows().is_empty());

        let b = wm.spawn_window(WindowKind::Browser);
        assert_eq!(visible_ids(&wm), vec![b.0]);
        assert_eq!(ids(&wm), vec![a.0, b.0]);

        wm.set_active_workspace(1).unwrap();
        assert_eq!(visible_ids(&wm), vec![a.0]);
        assert_eq!(wm.active_id(), Some(a));
        assert_eq!(
            wm.occupied_workspaces().iter().map(|w| w.number()).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn switching_to_current_workspace_keeps_focus() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        wm.spawn_window(WindowKind::Terminal);
        wm.focus_window(a);
        wm.set_active_workspace(1).unwrap();
        assert_eq!(wm.active_id(), Some(a));
    }

    #[test]
    fn focusing_hidden_window_follows_it() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        wm.set_active_workspace(3).unwrap();
        wm.spawn_window(WindowKind::Browser);
        assert!(wm.focus_window(a));
        assert_eq!(wm.active_workspace().number(), 1);
        assert_eq!(wm.active_id(), Some(a));
    }

    #[test]
    fn closing_on_other_workspace_refocuses_locally() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        wm.set_active_workspace(2).unwrap();
        let b = wm.spawn_window(WindowKind::Terminal);
        let c = wm.spawn_window(WindowKind::Terminal);
        wm.close_window(c);
        // `a` is the last window overall but lives on workspace 1.
        assert_eq!(wm.active_id(), Some(b));
        wm.close_window(b);
        assert_eq!(wm.active_id(), None);
        assert_eq!(ids(&wm), vec![a.0]);
    }

    #[test]
    fn move_active_to_workspace() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Browser);
        assert_eq!(wm.move_active_to_workspace(4), Ok(Some(b)));
        assert_eq!(wm.workspace_of(b).map(Workspace::number), Some(4));
        assert_eq!(wm.active_id(), Some(a));
        assert_eq!(visible_ids(&wm), vec![a.0]);
        assert_eq!(wm.active_workspace().number(), 1);

        wm.set_active_workspace(4).unwrap();
        assert_eq!(wm.active_id(), Some(b));
    }

    #[test]
    fn move_active_edge_cases() {
        let mut wm = WindowManager::new();
        assert_eq!(wm.move_active_to_workspace(2), Ok(None));
        let a = wm.spawn_window(WindowKind::Terminal);
        assert_eq!(wm.move_active_to_workspace(1), Ok(None));
        assert_eq!(wm.move_active_to_workspace(9), Err(WorkspaceError::OutOfRange(9)));
        assert_eq!(wm.workspace_of(a).map(Workspace::number), Some(1));
        assert_eq!(wm.move_active_to_workspace(5), Ok(Some(a)));
        assert_eq!(wm.active_id(), None);
    }

    #[test]
    fn geometry_covers_visible_windows_only() {
        let region = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let spacing = Spacing { gap: 0.0, padding: 0.0 };
        let mut wm = WindowManager::new();
        assert!(wm.geometry(region, spacing).is_empty());

        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Terminal);
        wm.set_active_workspace(2).unwrap();
        let c = wm.spawn_window(WindowKind::Terminal);
        assert_eq!(wm.geometry(region, spacing), vec![(c, region)]);

        wm.set_active_workspace(1).unwrap();
        let geo = wm.geometry(region, spacing);
        assert_eq!(geo.len(), 2);
        assert_eq!(geo[0], (a, Rect::new(0.0, 0.0, 500.0, 800.0)));
        assert_eq!(geo[1], (b, Rect::new(500.0, 0.0, 500.0, 800.0)));
    }

    #[test]
    fn scratchpad_stashes_and_restores() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Browser);

        assert_eq!(wm.toggle_scratchpad(), Some(b));
        assert_eq!(visible_ids(&wm), vec![a.0]);
        assert_eq!(wm.active_id(), None);
        assert_eq!(wm.scratchpad(), &[b]);
        assert_eq!(wm.workspace_of(b), None);
        // Still owned, just hidden.
        assert_eq!(ids(&wm), vec![a.0, b.0]);
        assert!(!wm.focus_window(b));

        wm.set_active_workspace(3).unwrap();
        assert_eq!(wm.toggle_scratchpad(), Some(b));
        assert_eq!(wm.active_id(), Some(b));
        assert_eq!(wm.workspace_of(b).map(Workspace::number), Some(3));
        assert!(wm.scratchpad().is_empty());
    }

    #[test]
    fn scratchpad_with_nothing_to_do() {
        let mut wm = WindowManager::new();
        assert_eq!(wm.toggle_scratchpad(), None);
    }

    #[test]
    fn closing_a_stashed_window_empties_the_scratchpad() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        wm.toggle_scratchpad();
        assert!(wm.close_window(a).is_some());
        assert!(wm.scratchpad().is_empty());
        assert_eq!(wm.toggle_scratchpad(), None);
    }

    #[test]
    fn sticky_windows_follow_every_workspace_and_tile_first() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Browser);
        assert_eq!(wm.toggle_sticky(), Some(true));
        assert!(wm.is_sticky(b));
        assert_eq!(visible_ids(&wm), vec![b.0, a.0]);

        wm.set_active_workspace(2).unwrap();
        assert_eq!(visible_ids(&wm), vec![b.0]);
        assert_eq!(wm.active_id(), Some(b));
        let c = wm.spawn_window(WindowKind::Settings);
        assert_eq!(visible_ids(&wm), vec![b.0, c.0]);

        // Focusing a sticky window does not switch workspaces.
        assert!(wm.focus_window(b));
        assert_eq!(wm.active_workspace().number(), 2);

        // Unpinned here, it stays here.
        assert_eq!(wm.toggle_sticky(), Some(false));
        assert_eq!(wm.workspace_of(b).map(Workspace::number), Some(2));
        assert_eq!(visible_ids(&wm), vec![b.0, c.0]);
        wm.set_active_workspace(1).unwrap();
        assert_eq!(visible_ids(&wm), vec![a.0]);
    }

    #[test]
    fn stashing_a_sticky_window_unpins_it() {
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        wm.toggle_sticky();
        wm.toggle_scratchpad();
        assert!(!wm.is_sticky(a));
        wm.set_active_workspace(4).unwrap();
        assert!(wm.visible_windows().is_empty());
        assert_eq!(wm.toggle_sticky(), None);
    }

    #[test]
    fn layout_cycles_and_master_resizes() {
        let region = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let spacing = Spacing { gap: 0.0, padding: 0.0 };
        let mut wm = WindowManager::new();
        let a = wm.spawn_window(WindowKind::Terminal);
        let b = wm.spawn_window(WindowKind::Terminal);

        assert_eq!(wm.resize_master(0.25), 0.75);
        assert_eq!(wm.geometry(region, spacing)[0], (a, Rect::new(0.0, 0.0, 750.0, 800.0)));
        assert_eq!(wm.resize_master(10.0), layout::MAX_MASTER_RATIO);

        assert_eq!(wm.cycle_layout(), LayoutMode::Monocle);
        assert_eq!(wm.geometry(region, spacing), vec![(a, region), (b, region)]);
        assert_eq!(wm.cycle_layout(), LayoutMode::Grid);
        assert_eq!(
            wm.geometry(region, spacing),
            vec![
                (a, Rect::new(0.0, 0.0, 500.0, 800.0)),
                (b, Rect::new(500.0, 0.0, 500.0, 800.0)),
            ]
        );
        assert_eq!(wm.cycle_layout(), LayoutMode::MasterStack);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Spawn,
        Close(u64),
        CloseActive,
        Focus(u64),
        Workspace(u32),
        Move(u32),
        Stash,
        Stick,
        Cycle,
        Resize(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Spawn),
            2 => (1u64..12).prop_map(Op::Close),
            1 => Just(Op::CloseActive),
            1 => (1u64..12).prop_map(Op::Focus),
            1 => (0u32..8).prop_map(Op::Workspace),
            1 => (0u32..8).prop_map(Op::Move),
            1 => Just(Op::Stash),
            1 => Just(Op::Stick),
            1 => Just(Op::Cycle),
            1 => (-1.0f64..1.0).prop_map(Op::Resize),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 0..60)) {
            let mut wm = WindowManager::new();
            let mut issued = std::collections::HashSet::new();
            for op in ops {
                match op {
                    Op::Spawn => {
                        let id = wm.spawn_window(WindowKind::Terminal);
                        prop_assert!(issued.insert(id), "id {} reissued", id);
                    }
                    Op::Close(id) => { wm.close_window(WindowId(id)); }
                    Op::CloseActive => { wm.close_active_window(); }
                    Op::Focus(id) => { wm.focus_window(WindowId(id)); }
                    Op::Workspace(n) => {
                        let before = wm.active_workspace();
                        if wm.set_active_workspace(n).is_err() {
                            prop_assert_eq!(wm.active_workspace(), before);
                        }
                    }
                    Op::Move(n) => { let _ = wm.move_active_to_workspace(n); }
                    Op::Stash => { wm.toggle_scratchpad(); }
                    Op::Stick => { wm.toggle_sticky(); }
                    Op::Cycle => { wm.cycle_layout(); }
                    Op::Resize(d) => { wm.resize_master(d); }
                }
                assert_invariants(&wm);
            }
        }
    }
}
