//! The terminal engine boundary and a reference engine.
//!
//! The engine owns the character buffer, renders it into a [`Bitmap`]
//! snapshot, and tracks cursor and scroll state. A [`Renderer`] only reads
//! that state and forwards surface size changes back.
//!
//! [`Renderer`]: crate::render::Renderer

mod grid;
mod rasterizer;
mod shared;

use std::ops::Deref;

use crate::input::KeySink;
use crate::render::{Argb, Bitmap, CellMetrics, PixelSize};

pub use grid::{DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SCROLLBACK, GridEngine};
pub use rasterizer::{Palette, Rasterizer};
pub use shared::SharedGrid;

/// Cursor position and visibility.
///
/// `row` is relative to the screen; `screen_base` is the buffer index of the
/// screen's first line and `window_base` that of the first visible line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    pub visible: bool,
    pub column: u32,
    pub row: u32,
    pub screen_base: u32,
    pub window_base: u32,
}

impl CursorState {
    /// Row at which the cursor appears in the visible window.
    pub fn rendered_row(&self) -> i64 {
        i64::from(self.row) + i64::from(self.screen_base) - i64::from(self.window_base)
    }
}

pub trait TerminalEngine: KeySink {
    /// Borrowed snapshot handed out for the duration of one paint.
    type Snapshot<'a>: Deref<Target = Bitmap>
    where
        Self: 'a;

    /// Current rendering of the visible window, if a surface is bound.
    fn current_bitmap(&self) -> Option<Self::Snapshot<'_>>;

    fn cell_width(&self) -> u32;

    fn cell_height(&self) -> u32;

    fn cell_metrics(&self) -> CellMetrics {
        CellMetrics::new(self.cell_width(), self.cell_height())
    }

    fn cursor_state(&self) -> CursorState;

    fn foreground_color(&self) -> Argb;

    fn background_color(&self) -> Argb;

    /// Requests a content size in pixels alongside the surface's measured
    /// size. Converting to rows and columns is the engine's business.
    fn resize_computed(&mut self, content: PixelSize, surface: PixelSize);

    /// The surface's measured size changed.
    fn surface_changed(&mut self, surface: PixelSize);

    /// The surface is gone; drop the snapshot and anything tied to it.
    fn surface_destroyed(&mut self);
}
