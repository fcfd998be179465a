//! Numbered workspaces and window membership.
//!
//! A [`Workspace`] is a validated tag in `1..=5`.  The [`WorkspaceMap`]
//! records which workspace each window belongs to, so the window manager
//! can hand only the active workspace's windows to the layout.

use crate::command::WindowId;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A workspace number in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Workspace(u32);

/// Error for a workspace number outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("workspace {0} out of range ({min}..={max})", min = Workspace::MIN, max = Workspace::MAX)]
    OutOfRange(u32),
}

impl Workspace {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 5;

    /// The workspace the desktop starts on.
    pub const FIRST: Workspace = Workspace(Self::MIN);

    /// Validate `n` as a workspace number.
    pub fn new(n: u32) -> Result<Self, WorkspaceError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(WorkspaceError::OutOfRange(n))
        }
    }

    /// The raw workspace number.
    pub fn number(self) -> u32 {
        self.0
    }

    /// Every workspace, in ascending order.
    pub fn all() -> impl Iterator<Item = Workspace> {
        (Self::MIN..=Self::MAX).map(Workspace)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps each window to the workspace it lives on.
///
/// The map holds no ordering of its own; callers filter their ordered
/// window list through [`WorkspaceMap::workspace_of`] so stacking order is
/// preserved within each workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceMap {
    inner: HashMap<WindowId, Workspace>,
}

impl WorkspaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `window` on `workspace`, replacing any previous assignment.
    pub fn assign(&mut self, window: WindowId, workspace: Workspace) {
        self.inner.insert(window, workspace);
    }

    /// Forget `window`.  Returns the workspace it was on.
    pub fn remove(&mut self, window: WindowId) -> Option<Workspace> {
        self.inner.remove(&window)
    }

    /// Look up the workspace `window` is on.
    pub fn workspace_of(&self, window: WindowId) -> Option<Workspace> {
        self.inner.get(&window).copied()
    }

    /// Whether `window` is on `workspace`.
    pub fn is_on(&self, window: WindowId, workspace: Workspace) -> bool {
        self.workspace_of(window) == Some(workspace)
    }

    /// Number of windows on `workspace`.
    pub fn count(&self, workspace: Workspace) -> usize {
        self.inner.values().filter(|w| **w == workspace).count()
    }

    /// Workspaces that hold at least one window, ascending.
    pub fn occupied(&self) -> Vec<Workspace> {
        Workspace::all().filter(|ws| self.count(*ws) > 0).collect()
    }
}
