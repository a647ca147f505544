use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::input::{KeyInput, KeySink};
use crate::render::{Argb, Bitmap, PixelSize};

use super::{CursorState, GridEngine, TerminalEngine};

/// Cloneable handle to a [`GridEngine`] shared between the UI thread and a
/// session producer.
///
/// Every read takes its own short lock, so a paint sees each value as it was
/// at the moment of that read and never holds the lock while drawing.
/// Snapshots are handed out as `Arc`s; the engine copies on write if a paint
/// still holds the previous one.
#[derive(Clone)]
pub struct SharedGrid {
    inner: Arc<Mutex<GridEngine>>,
}

impl SharedGrid {
    pub fn new(engine: GridEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, GridEngine> {
        self.inner.lock()
    }

    pub fn feed(&self, text: &str) {
        self.inner.lock().feed(text);
    }
}

impl KeySink for SharedGrid {
    fn on_key(&mut self, key: KeyInput) -> bool {
        self.inner.lock().on_key(key)
    }
}

impl TerminalEngine for SharedGrid {
    type Snapshot<'a> = Arc<Bitmap>;

    fn current_bitmap(&self) -> Option<Arc<Bitmap>> {
        self.inner.lock().snapshot()
    }

    fn cell_width(&self) -> u32 {
        self.inner.lock().cell_width()
    }

    fn cell_height(&self) -> u32 {
        self.inner.lock().cell_height()
    }

    fn cursor_state(&self) -> CursorState {
        self.inner.lock().cursor_state()
    }

    fn foreground_color(&self) -> Argb {
        self.inner.lock().foreground_color()
    }

    fn background_color(&self) -> Argb {
        self.inner.lock().background_color()
    }

    fn resize_computed(&mut self, content: PixelSize, surface: PixelSize) {
        self.inner.lock().resize_computed(content, surface);
    }

    fn surface_changed(&mut self, surface: PixelSize) {
        self.inner.lock().surface_changed(surface);
    }

    fn surface_destroyed(&mut self) {
        self.inner.lock().surface_destroyed();
    }
}
