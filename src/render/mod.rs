//! Compositing of an engine snapshot with cursor and selection overlays.

mod geometry;
mod notification;
mod selection;
mod surface;

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::Config;
use crate::engine::TerminalEngine;
use crate::input::{KeyInput, KeySink};

pub use geometry::{CellMetrics, PixelRect, PixelSize, cursor_rect, selection_rect};
pub use notification::Notification;
pub use selection::Selection;
pub use surface::{Argb, BlendMode, Bitmap, DrawOp, Paint, Recorder, Surface};

const DEFAULT_NOTIFICATION: Duration = Duration::from_millis(2000);

/// How the view sizes itself within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Take all available space.
    Fill,
}

/// Draws one terminal session onto a host surface.
///
/// The renderer reads cursor, metrics and the bitmap snapshot from its engine
/// on every paint and holds none of them between calls. The engine may update
/// that state between the individual reads; each read is used as-is.
pub struct Renderer<E: TerminalEngine> {
    engine: E,
    paint: Paint,
    cursor_paint: Paint,
    selection: Option<Selection>,
    notification: Option<Notification>,
    notification_duration: Duration,
    measured: PixelSize,
}

impl<E: TerminalEngine> Renderer<E> {
    pub fn new(engine: E) -> Self {
        let foreground = engine.foreground_color();
        let background = engine.background_color();
        Self {
            engine,
            paint: Paint::copy(foreground),
            cursor_paint: Paint::xor(foreground, background),
            selection: None,
            notification: None,
            notification_duration: DEFAULT_NOTIFICATION,
            measured: PixelSize::default(),
        }
    }

    pub fn with_config(engine: E, config: &Config) -> Self {
        let mut renderer = Self::new(engine);
        renderer.notification_duration = config.notification.duration();
        renderer
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn is_focusable(&self) -> bool {
        true
    }

    pub fn layout(&self) -> Layout {
        Layout::Fill
    }

    /// Sink that decoded key events should be delivered to.
    pub fn key_sink(&mut self) -> &mut dyn KeySink {
        &mut self.engine
    }

    /// Hands a key to the engine untouched.
    pub fn on_key(&mut self, key: KeyInput) -> bool {
        self.engine.on_key(key)
    }

    /// Paint used for cursor and selection overlays.
    pub fn overlay_paint(&self) -> Paint {
        self.cursor_paint
    }

    /// Draws snapshot, cursor, then selection. Without a snapshot nothing is
    /// drawn at all.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        let Some(bitmap) = self.engine.current_bitmap() else {
            trace!("no snapshot, skipping paint");
            return;
        };
        surface.draw_bitmap(&*bitmap, 0, 0, &self.paint);

        if let Some(rect) = self.cursor_rect() {
            surface.draw_rect(rect, &self.cursor_paint);
        }

        if let Some(rect) = self.selection_rect() {
            surface.draw_rect(rect, &self.cursor_paint);
        }
    }

    pub fn cursor_rect(&self) -> Option<PixelRect> {
        cursor_rect(self.engine.cell_metrics(), &self.engine.cursor_state())
    }

    pub fn selection_rect(&self) -> Option<PixelRect> {
        let selection = self.selection?;
        Some(selection_rect(self.engine.cell_metrics(), &selection))
    }

    /// Called by the host after layout with the new and previous size.
    pub fn on_size_changed(&mut self, width: u32, height: u32, old_width: u32, old_height: u32) {
        debug!(width, height, old_width, old_height, "surface size changed");
        self.measured = PixelSize::new(width, height);
        self.engine.surface_changed(self.measured);
    }

    /// Asks the engine for a specific content size in pixels, passing the
    /// measured surface size along.
    pub fn force_size(&mut self, width: u32, height: u32) {
        debug!(width, height, measured = ?self.measured, "forcing content size");
        self.engine
            .resize_computed(PixelSize::new(width, height), self.measured);
    }

    pub fn measured_size(&self) -> PixelSize {
        self.measured
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn reset_selected(&mut self) {
        self.selection = None;
    }

    pub fn top(&self) -> Option<u32> {
        self.selection.map(|s| s.top)
    }

    pub fn bottom(&self) -> Option<u32> {
        self.selection.map(|s| s.bottom)
    }

    pub fn left(&self) -> Option<u32> {
        self.selection.map(|s| s.left)
    }

    pub fn right(&self) -> Option<u32> {
        self.selection.map(|s| s.right)
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notify_at(message, Instant::now());
    }

    /// Shows `message`, retexting the existing notification if there is one.
    pub fn notify_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        debug!(%message, "notify");
        let duration = self.notification_duration;
        let notification = self
            .notification
            .get_or_insert_with(|| Notification::new(String::new(), duration));
        notification.set_text(message);
        notification.show(now);
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn visible_notification(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_visible(now))
    }

    /// Tears the view down and tells the engine to release its snapshot.
    pub fn destroy(mut self) -> E {
        debug!("destroying renderer");
        self.engine.surface_destroyed();
        self.engine
    }
}
