#![allow(dead_code)]

use termview::engine::CursorState;
use termview::render::{Argb, Bitmap, CellMetrics, PixelSize};
use termview::{KeyInput, KeySink, TerminalEngine};

pub const FG: Argb = Argb::rgb(0xcc, 0xcc, 0xcc);
pub const BG: Argb = Argb::BLACK;

/// Engine double whose state is set directly and whose calls are recorded.
#[derive(Debug, Default)]
pub struct StubEngine {
    pub bitmap: Option<Bitmap>,
    pub metrics: CellMetrics,
    pub cursor: CursorState,
    pub resizes: Vec<(PixelSize, PixelSize)>,
    pub surface_changes: Vec<PixelSize>,
    pub destroyed: u32,
    pub keys: Vec<KeyInput>,
}

impl StubEngine {
    pub fn with_bitmap(width: u32, height: u32, metrics: CellMetrics) -> Self {
        Self {
            bitmap: Some(Bitmap::new(width, height, BG)),
            metrics,
            ..Self::default()
        }
    }

    pub fn cursor(mut self, cursor: CursorState) -> Self {
        self.cursor = cursor;
        self
    }
}

impl KeySink for StubEngine {
    fn on_key(&mut self, key: KeyInput) -> bool {
        self.keys.push(key);
        true
    }
}

impl TerminalEngine for StubEngine {
    type Snapshot<'a> = &'a Bitmap;

    fn current_bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    fn cell_width(&self) -> u32 {
        self.metrics.width
    }

    fn cell_height(&self) -> u32 {
        self.metrics.height
    }

    fn cursor_state(&self) -> CursorState {
        self.cursor
    }

    fn foreground_color(&self) -> Argb {
        FG
    }

    fn background_color(&self) -> Argb {
        BG
    }

    fn resize_computed(&mut self, content: PixelSize, surface: PixelSize) {
        self.resizes.push((content, surface));
    }

    fn surface_changed(&mut self, surface: PixelSize) {
        self.surface_changes.push(surface);
    }

    fn surface_destroyed(&mut self) {
        self.destroyed += 1;
        self.bitmap = None;
    }
}

pub fn visible_cursor(column: u32, row: u32, screen_base: u32, window_base: u32) -> CursorState {
    CursorState {
        visible: true,
        column,
        row,
        screen_base,
        window_base,
    }
}
