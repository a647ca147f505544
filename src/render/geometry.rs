//! Translation between terminal cell coordinates and device pixels.

use crate::engine::CursorState;

use super::selection::Selection;

/// Pixel size of one terminal cell, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMetrics {
    pub width: u32,
    pub height: u32,
}

impl CellMetrics {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are set. Metrics are meaningless before the engine's
    /// first layout.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Pixel rectangle covered by the cell at `(column, row)`.
    pub fn cell_rect(&self, column: i64, row: i64) -> PixelRect {
        PixelRect::from_edges(
            scale(column, self.width),
            scale(row, self.height),
            scale(column.saturating_add(1), self.width),
            scale(row.saturating_add(1), self.height),
        )
    }

    /// Cell `(column, row)` containing the pixel, if any.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        if !self.is_valid() || x < 0 || y < 0 {
            return None;
        }
        Some((x as u32 / self.width, y as u32 / self.height))
    }

    /// Whole columns and rows that fit in `size`.
    pub fn grid_size(&self, size: PixelSize) -> (u32, u32) {
        if !self.is_valid() {
            return (0, 0);
        }
        (size.width / self.width, size.height / self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Half-open pixel rectangle `[left, right) x [top, bottom)`.
///
/// Coordinates are signed: overlays computed from scrolled cursors or
/// out-of-grid selections can land off-surface, and surfaces clip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Builds a rectangle from its edges, sorting them so that
    /// `left <= right` and `top <= bottom`.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left: saturate(left.min(right)),
            top: saturate(top.min(bottom)),
            right: saturate(left.max(right)),
            bottom: saturate(top.max(bottom)),
        }
    }

    pub fn from_size(size: PixelSize) -> Self {
        Self::from_edges(0, 0, i64::from(size.width), i64::from(size.height))
    }

    pub fn width(&self) -> u32 {
        (i64::from(self.right) - i64::from(self.left)) as u32
    }

    pub fn height(&self) -> u32 {
        (i64::from(self.bottom) - i64::from(self.top)) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        let rect = PixelRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if rect.is_empty() {
            PixelRect::default()
        } else {
            rect
        }
    }
}

/// Pixel rectangle of the cursor block, or `None` when the cursor is hidden.
///
/// The rendered row accounts for scrollback: `row + screen_base - window_base`.
pub fn cursor_rect(metrics: CellMetrics, cursor: &CursorState) -> Option<PixelRect> {
    if !cursor.visible {
        return None;
    }
    Some(metrics.cell_rect(i64::from(cursor.column), cursor.rendered_row()))
}

/// Pixel rectangle of a selection. No clamping to the surface is done.
pub fn selection_rect(metrics: CellMetrics, selection: &Selection) -> PixelRect {
    PixelRect::from_edges(
        scale(i64::from(selection.left), metrics.width),
        scale(i64::from(selection.top), metrics.height),
        scale(i64::from(selection.right), metrics.width),
        scale(i64::from(selection.bottom), metrics.height),
    )
}

/// Cell count to pixels, saturating instead of overflowing.
fn scale(cells: i64, cell_size: u32) -> i64 {
    cells.saturating_mul(i64::from(cell_size))
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
