//! Application launcher.
//!
//! A fixed catalog filtered by a case-insensitive substring match on the
//! entry name.  The selection index wraps around the filtered list and is
//! clamped whenever the query shrinks it.

use crate::command::{Direction, WindowKind};
use crate::traits::LauncherView;
use log::debug;

/// A launchable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LauncherEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: WindowKind,
}

/// Everything the launcher offers, in display order.
pub const CATALOG: &[LauncherEntry] = &[
    LauncherEntry {
        name: "Terminal",
        description: "System Command Line",
        kind: WindowKind::Terminal,
    },
    LauncherEntry {
        name: "Firefox",
        description: "Web Browser",
        kind: WindowKind::Browser,
    },
    LauncherEntry {
        name: "Thunar",
        description: "File Manager",
        kind: WindowKind::Terminal,
    },
    LauncherEntry {
        name: "Settings",
        description: "System Configuration",
        kind: WindowKind::Settings,
    },
];

/// Launcher overlay state.
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    open: bool,
    query: String,
    selected: usize,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the launcher with an empty query and the first entry selected.
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Replace the filter text.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        let count = self.matches().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    /// Catalog entries whose name contains the query, ignoring case.
    pub fn matches(&self) -> Vec<&'static LauncherEntry> {
        let needle = self.query.to_lowercase();
        CATALOG
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Move the selection one step, wrapping at either end.  Does nothing
    /// when no entry matches.
    pub fn select(&mut self, direction: Direction) {
        let count = self.matches().len();
        if count == 0 {
            return;
        }
        self.selected = match direction {
            Direction::Down => (self.selected + 1) % count,
            Direction::Up => (self.selected + count - 1) % count,
        };
    }

    /// Take the selected entry and close.
    ///
    /// With no match the launcher stays open and `None` is returned.
    pub fn confirm(&mut self) -> Option<WindowKind> {
        let entry = *self.matches().get(self.selected)?;
        debug!("launching {}", entry.name);
        self.close();
        Some(entry.kind)
    }

    /// Snapshot for the renderer, or `None` while closed.
    pub fn view(&self) -> Option<LauncherView> {
        if !self.open {
            return None;
        }
        Some(LauncherView {
            query: self.query.clone(),
            matches: self.matches().iter().map(|e| e.name.to_string()).collect(),
            selected: self.selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(l: &Launcher) -> Vec<&'static str> {
        l.matches().iter().map(|e| e.name).collect()
    }

    #[test]
    fn starts_closed() {
        let l = Launcher::new();
        assert!(!l.is_open());
        assert!(l.view().is_none());
    }

    #[test]
    fn empty_query_matches_everything() {
        let mut l = Launcher::new();
        l.open();
        assert_eq!(names(&l), vec!["Terminal", "Firefox", "Thunar", "Settings"]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut l = Launcher::new();
        l.open();
        l.set_query("T");
        assert_eq!(names(&l), vec!["Terminal", "Thunar", "Settings"]);
        l.set_query("fox");
        assert_eq!(names(&l), vec!["Firefox"]);
        l.set_query("zzz");
        assert!(names(&l).is_empty());
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut l = Launcher::new();
        l.open();
        l.select(Direction::Up);
        assert_eq!(l.selected(), 3);
        l.select(Direction::Down);
        assert_eq!(l.selected(), 0);
        l.select(Direction::Down);
        l.select(Direction::Down);
        assert_eq!(l.selected(), 2);
    }

    #[test]
    fn query_change_clamps_selection() {
        let mut l = Launcher::new();
        l.open();
        l.select(Direction::Up);
        l.set_query("e");
        // Terminal, Firefox, Settings
        assert_eq!(l.selected(), 2);
        l.set_query("nothing matches");
        assert_eq!(l.selected(), 0);
        l.select(Direction::Down);
        assert_eq!(l.selected(), 0);
    }

    #[test]
    fn confirm_launches_selected_kind_and_closes() {
        let mut l = Launcher::new();
        l.open();
        l.set_query("thu");
        assert_eq!(l.confirm(), Some(WindowKind::Terminal));
        assert!(!l.is_open());

        l.open();
        l.select(Direction::Down);
        assert_eq!(l.confirm(), Some(WindowKind::Browser));
    }

    #[test]
    fn confirm_without_match_stays_open() {
        let mut l = Launcher::new();
        l.open();
        l.set_query("xyz");
        assert_eq!(l.confirm(), None);
        assert!(l.is_open());
    }

    #[test]
    fn reopening_resets_state() {
        let mut l = Launcher::new();
        l.open();
        l.set_query("set");
        l.close();
        l.open();
        assert_eq!(l.query(), "");
        assert_eq!(l.selected(), 0);
    }

    #[test]
    fn view_reflects_state() {
        let mut l = Launcher::new();
        l.open();
        l.set_query("fire");
        let v = l.view().unwrap();
        assert_eq!(v.query, "fire");
        assert_eq!(v.matches, vec!["Firefox".to_string()]);
        assert_eq!(v.selected, 0);
    }
}
