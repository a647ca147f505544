//! Presents a pixel surface inside a terminal.
//!
//! Each terminal cell shows two stacked pixels: the upper one as the
//! foreground of `▀`, the lower one as its background.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

use crate::render::{Argb, Bitmap, PixelSize};

const UPPER_HALF_BLOCK: &str = "▀";

/// Pixel size of a surface shown in `area`.
pub fn surface_size(area: Rect) -> PixelSize {
    PixelSize::new(u32::from(area.width), u32::from(area.height) * 2)
}

/// Pixel under a terminal cell of `area`, as `(x, y)` of its upper half.
pub fn pixel_at(area: Rect, column: u16, row: u16) -> Option<(i32, i32)> {
    if !area.contains(Position::new(column, row)) {
        return None;
    }
    Some((
        i32::from(column - area.x),
        i32::from(row - area.y) * 2,
    ))
}

/// Splits the screen into the surface area and a one-line status bar.
pub fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn view(frame: &mut Frame, canvas: &Bitmap, surface: Rect, status_bar: Rect, status: &str) {
    frame.render_widget(BitmapView::new(canvas), surface);
    let status = Paragraph::new(status).style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(status, status_bar);
}

pub struct BitmapView<'a> {
    bitmap: &'a Bitmap,
}

impl<'a> BitmapView<'a> {
    pub fn new(bitmap: &'a Bitmap) -> Self {
        Self { bitmap }
    }
}

impl Widget for BitmapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 0..area.height {
            for x in 0..area.width {
                let upper = self.bitmap.pixel(u32::from(x), u32::from(y) * 2);
                let lower = self.bitmap.pixel(u32::from(x), u32::from(y) * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(to_color(upper))
                        .set_bg(to_color(lower));
                }
            }
        }
    }
}

fn to_color(pixel: Option<Argb>) -> Color {
    pixel.map_or(Color::Reset, |px| Color::Rgb(px.red(), px.green(), px.blue()))
}
