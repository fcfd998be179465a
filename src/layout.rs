//! Tiling layouts.
//!
//! [`layout`] maps an ordered window list onto a bounding region.  Three
//! [`LayoutMode`]s exist, cycled in this order:
//!
//! * **master-stack**: one window fills the padded region; with two or
//!   more, the first window (the *master*) takes a `master_ratio` share of
//!   the width on the left and the rest (the *stack*) share the right
//!   column in equal-height rows;
//! * **monocle**: every window gets the whole padded region;
//! * **grid**: `ceil(sqrt(n))` columns, filled row by row.
//!
//! `gap` separates neighbouring windows.  No windows means no rectangles.
//! The master is always index 0.  Focus plays no part in role assignment,
//! so identical inputs always give identical geometry.

use serde::Serialize;
use std::fmt;

/// An axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `amount` on every side.  Width and height never go below
    /// zero.
    pub fn inset(self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }

    /// X coordinate of the right edge.
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }
}

/// Spacing parameters taken from the theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Space between neighbouring windows.
    pub gap: f64,
    /// Space between the region edge and the outermost windows.
    pub padding: f64,
}

/// Narrowest share of the width the master may take.
pub const MIN_MASTER_RATIO: f64 = 0.1;
/// Widest share of the width the master may take.
pub const MAX_MASTER_RATIO: f64 = 0.9;

/// How visible windows are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    MasterStack,
    Monocle,
    Grid,
}

impl LayoutMode {
    /// The mode after this one: master-stack, monocle, grid, and round.
    pub fn next(self) -> Self {
        match self {
            LayoutMode::MasterStack => LayoutMode::Monocle,
            LayoutMode::Monocle => LayoutMode::Grid,
            LayoutMode::Grid => LayoutMode::MasterStack,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutMode::MasterStack => "master_stack",
            LayoutMode::Monocle => "monocle",
            LayoutMode::Grid => "grid",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The arrangement state the window manager carries between commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tiling {
    pub mode: LayoutMode,
    /// Share of the usable width given to the master, in
    /// `MIN_MASTER_RATIO..=MAX_MASTER_RATIO`.
    pub master_ratio: f64,
}

impl Default for Tiling {
    fn default() -> Self {
        Self {
            mode: LayoutMode::MasterStack,
            master_ratio: 0.5,
        }
    }
}

impl Tiling {
    /// Grow (positive) or shrink (negative) the master share by `delta`,
    /// clamped to the allowed range.  Non-finite deltas are ignored.
    pub fn resize_master(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.master_ratio = (self.master_ratio + delta).clamp(MIN_MASTER_RATIO, MAX_MASTER_RATIO);
    }
}

/// Lay out `windows` inside `region`.
///
/// Returns exactly one rectangle per window, in input order.
pub fn layout<T>(windows: &[T], region: Rect, spacing: Spacing, tiling: Tiling) -> Vec<Rect> {
    let count = windows.len();
    match tiling.mode {
        LayoutMode::MasterStack => master_stack(count, region, spacing, tiling.master_ratio),
        LayoutMode::Monocle => monocle(count, region, spacing),
        LayoutMode::Grid => grid(count, region, spacing),
    }
}

/// Compute master-stack geometry for `count` windows.
pub fn master_stack(count: usize, region: Rect, spacing: Spacing, master_ratio: f64) -> Vec<Rect> {
    let area = region.inset(spacing.padding.max(0.0));
    let gap = spacing.gap.max(0.0);
    let ratio = master_ratio.clamp(MIN_MASTER_RATIO, MAX_MASTER_RATIO);

    match count {
        0 => Vec::new(),
        1 => vec![area],
        n => {
            let mut rects = Vec::with_capacity(n);

            let master_width = ((area.width - gap) * ratio).max(0.0);
            rects.push(Rect::new(area.x, area.y, master_width, area.height));

            let stack_count = n - 1;
            let stack_x = area.x + master_width + gap;
            let stack_width = (area.width - master_width - gap).max(0.0);
            let gaps = gap * (stack_count - 1) as f64;
            let stack_height = ((area.height - gaps) / stack_count as f64).max(0.0);

            for i in 0..stack_count {
                rects.push(Rect::new(
                    stack_x,
                    area.y + i as f64 * (stack_height + gap),
                    stack_width,
                    stack_height,
                ));
            }
            rects
        }
    }
}

/// Every window covers the whole padded region.
pub fn monocle(count: usize, region: Rect, spacing: Spacing) -> Vec<Rect> {
    vec![region.inset(spacing.padding.max(0.0)); count]
}

/// Equal cells, `ceil(sqrt(count))` columns wide, filled row by row.  A
/// short last row keeps the cell width of the rows above it.
pub fn grid(count: usize, region: Rect, spacing: Spacing) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let area = region.inset(spacing.padding.max(0.0));
    let gap = spacing.gap.max(0.0);

    let mut cols = 1;
    while cols * cols < count {
        cols += 1;
    }
    let rows = count.div_ceil(cols);

    let cell_width = ((area.width - gap * (cols - 1) as f64) / cols as f64).max(0.0);
    let cell_height = ((area.height - gap * (rows - 1) as f64) / rows as f64).max(0.0);

    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Rect::new(
                area.x + col as f64 * (cell_width + gap),
                area.y + row as f64 * (cell_height + gap),
                cell_width,
                cell_height,
            )
        })
        .collect()
}
