use std::collections::VecDeque;
use std::sync::Arc;

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::input::{KeyInput, KeySink};
use crate::render::{Argb, Bitmap, CellMetrics, PixelSize};

use super::rasterizer::{Palette, Rasterizer};
use super::{CursorState, TerminalEngine};

pub const DEFAULT_COLS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 24;
pub const DEFAULT_SCROLLBACK: usize = 140;

const TAB_STOP: u16 = 8;

type Line = Vec<Cell>;

/// Plain-text terminal grid with scrollback, rendered into a bitmap snapshot.
///
/// Text fed in is written verbatim; only line feed, carriage return,
/// backspace and tab move the cursor.
pub struct GridEngine {
    /// Scrollback followed by the screen, oldest first.
    lines: VecDeque<Line>,
    cols: u16,
    rows: u16,
    scrollback: usize,
    cursor_col: u16,
    cursor_row: u16,
    cursor_visible: bool,
    window_base: usize,
    /// Content size requested through `resize_computed`.
    forced: Option<PixelSize>,
    /// Measured surface size; `None` while no surface is bound.
    surface: Option<PixelSize>,
    rasterizer: Rasterizer,
    palette: Palette,
    snapshot: Option<Arc<Bitmap>>,
}

impl GridEngine {
    pub fn new(metrics: CellMetrics, palette: Palette) -> Self {
        let lines = (0..DEFAULT_ROWS).map(|_| blank_line(DEFAULT_COLS)).collect();
        Self {
            lines,
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            scrollback: DEFAULT_SCROLLBACK,
            cursor_col: 0,
            cursor_row: 0,
            cursor_visible: true,
            window_base: 0,
            forced: None,
            surface: None,
            rasterizer: Rasterizer::new(metrics.width.max(1), metrics.height.max(1)),
            palette,
            snapshot: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CellMetrics::new(config.cell.width, config.cell.height),
            Palette::new(config.colors.foreground, config.colors.background),
        )
        .with_scrollback(config.scrollback)
    }

    pub fn with_scrollback(mut self, lines: usize) -> Self {
        self.scrollback = lines;
        self.trim_scrollback();
        self
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn screen_base(&self) -> usize {
        self.lines.len() - self.rows as usize
    }

    pub fn window_base(&self) -> usize {
        self.window_base
    }

    /// Number of lines held, scrollback included.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a buffer line with trailing blanks removed.
    pub fn line_text(&self, index: usize) -> Option<String> {
        self.lines.get(index).map(|line| {
            let text: String = line.iter().map(Cell::symbol).collect();
            text.trim_end().to_string()
        })
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Option<Arc<Bitmap>> {
        self.snapshot.clone()
    }

    /// Writes session output at the cursor and snaps the view to the bottom.
    pub fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => self.line_feed(),
                '\r' => self.cursor_col = 0,
                '\x08' => self.cursor_col = self.cursor_col.saturating_sub(1),
                '\t' => {
                    let next = (self.cursor_col / TAB_STOP + 1).saturating_mul(TAB_STOP);
                    self.cursor_col = next.min(self.cols - 1);
                }
                c if c.is_control() => {}
                c => self.put_char(c),
            }
        }
        self.window_base = self.screen_base();
        self.render();
    }

    /// Moves the visible window by `delta` lines; negative scrolls back.
    pub fn scroll_view(&mut self, delta: i64) {
        let max = self.screen_base() as i64;
        let base = (self.window_base as i64 + delta).clamp(0, max) as usize;
        if base != self.window_base {
            self.window_base = base;
            self.render();
        }
    }

    fn erase_back(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        self.cursor_col -= 1;
        let (row, col) = (self.screen_base() + self.cursor_row as usize, self.cursor_col);
        if let Some(cell) = self.lines.get_mut(row).and_then(|line| line.get_mut(col as usize)) {
            cell.reset();
        }
        self.window_base = self.screen_base();
        self.render();
    }

    fn put_char(&mut self, ch: char) {
        if self.cursor_col >= self.cols {
            self.cursor_col = 0;
            self.line_feed();
        }
        let (row, col) = (self.screen_base() + self.cursor_row as usize, self.cursor_col);
        if let Some(cell) = self.lines.get_mut(row).and_then(|line| line.get_mut(col as usize)) {
            cell.set_char(ch);
        }
        self.cursor_col += 1;
    }

    fn line_feed(&mut self) {
        if self.cursor_row + 1 < self.rows {
            self.cursor_row += 1;
        } else {
            self.lines.push_back(blank_line(self.cols));
            self.trim_scrollback();
        }
    }

    fn trim_scrollback(&mut self) {
        let max = self.rows as usize + self.scrollback;
        if self.lines.len() > max {
            let excess = self.lines.len() - max;
            self.lines.drain(..excess);
            self.window_base = self.window_base.saturating_sub(excess);
        }
    }

    fn grid_for(&self, size: PixelSize) -> (u16, u16) {
        let (cols, rows) = self.rasterizer.metrics().grid_size(size);
        let clamp = |n: u32| n.clamp(1, u32::from(u16::MAX)) as u16;
        (clamp(cols), clamp(rows))
    }

    /// Content size to lay out: the forced size bounded by the surface, or
    /// the surface alone.
    fn target_size(&self) -> Option<PixelSize> {
        match (self.forced, self.surface) {
            (Some(forced), Some(surface)) if !surface.is_empty() => Some(PixelSize::new(
                forced.width.min(surface.width),
                forced.height.min(surface.height),
            )),
            (Some(forced), _) => Some(forced),
            (None, surface) => surface,
        }
    }

    fn relayout(&mut self) {
        if let Some(size) = self.target_size() {
            let (cols, rows) = self.grid_for(size);
            self.resize_grid(cols, rows);
        }
        self.render();
    }

    fn resize_grid(&mut self, cols: u16, rows: u16) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        debug!(from_cols = self.cols, from_rows = self.rows, cols, rows, "resizing grid");

        let cursor_line = self.screen_base() + self.cursor_row as usize;
        for line in self.lines.iter_mut() {
            line.resize(cols as usize, Cell::default());
        }

        // drop blank lines below the cursor before pushing content into scrollback
        while self.lines.len() > rows as usize
            && self.lines.len() - 1 > cursor_line
            && self.lines.back().is_some_and(|line| is_blank(line))
        {
            self.lines.pop_back();
        }
        while self.lines.len() < rows as usize {
            self.lines.push_back(blank_line(cols));
        }

        self.cols = cols;
        self.rows = rows;
        let screen_base = self.screen_base();
        self.cursor_row = cursor_line.saturating_sub(screen_base).min(rows as usize - 1) as u16;
        self.cursor_col = self.cursor_col.min(cols - 1);
        self.trim_scrollback();
        self.window_base = self.screen_base();
    }

    fn render(&mut self) {
        if self.surface.is_none() {
            return;
        }
        let area = Rect::new(0, 0, self.cols, self.rows);
        let mut buffer = Buffer::empty(area);
        for (row, line) in self
            .lines
            .iter()
            .skip(self.window_base)
            .take(self.rows as usize)
            .enumerate()
        {
            let start = row * self.cols as usize;
            buffer.content[start..start + line.len()].clone_from_slice(line);
        }

        let background = self.palette.background;
        let bitmap = self
            .snapshot
            .get_or_insert_with(|| Arc::new(Bitmap::new(0, 0, background)));
        self.rasterizer
            .rasterize(&buffer, Arc::make_mut(bitmap), &self.palette);
        trace!(window_base = self.window_base, "rendered snapshot");
    }
}

impl KeySink for GridEngine {
    fn on_key(&mut self, key: KeyInput) -> bool {
        let page = i64::from(self.rows);
        match key {
            KeyInput::Char(ch) => self.feed(ch.encode_utf8(&mut [0; 4])),
            KeyInput::Enter => self.feed("\r\n"),
            KeyInput::Backspace => self.erase_back(),
            KeyInput::Tab => self.feed("\t"),
            KeyInput::Up => self.scroll_view(-1),
            KeyInput::Down => self.scroll_view(1),
            KeyInput::PageUp => self.scroll_view(-page),
            KeyInput::PageDown => self.scroll_view(page),
            KeyInput::Esc => return false,
        }
        true
    }
}

impl TerminalEngine for GridEngine {
    type Snapshot<'a> = &'a Bitmap;

    fn current_bitmap(&self) -> Option<&Bitmap> {
        self.snapshot.as_deref()
    }

    fn cell_width(&self) -> u32 {
        self.rasterizer.cell_width
    }

    fn cell_height(&self) -> u32 {
        self.rasterizer.cell_height
    }

    fn cursor_state(&self) -> CursorState {
        CursorState {
            visible: self.cursor_visible,
            column: u32::from(self.cursor_col.min(self.cols - 1)),
            row: u32::from(self.cursor_row),
            screen_base: self.screen_base() as u32,
            window_base: self.window_base as u32,
        }
    }

    fn foreground_color(&self) -> Argb {
        self.palette.foreground
    }

    fn background_color(&self) -> Argb {
        self.palette.background
    }

    fn resize_computed(&mut self, content: PixelSize, surface: PixelSize) {
        self.forced = (!content.is_empty()).then_some(content);
        self.surface = Some(surface);
        self.relayout();
    }

    fn surface_changed(&mut self, surface: PixelSize) {
        self.surface = Some(surface);
        self.relayout();
    }

    fn surface_destroyed(&mut self) {
        info!("surface destroyed, releasing snapshot");
        self.surface = None;
        self.snapshot = None;
    }
}

fn blank_line(cols: u16) -> Line {
    vec![Cell::default(); cols as usize]
}

fn is_blank(line: &[Cell]) -> bool {
    line.iter().all(|cell| cell.symbol() == " ")
}
