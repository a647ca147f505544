use ratatui::buffer::{Buffer, Cell};
use ratatui::style::{Color, Modifier};

use crate::render::{Argb, Bitmap, CellMetrics, Paint, PixelRect, Surface};

const ANSI: [u32; 16] = [
    0x000000, 0xcd0000, 0x00cd00, 0xcdcd00, 0x0000ee, 0xcd00cd, 0x00cdcd, 0xe5e5e5, 0x7f7f7f,
    0xff0000, 0x00ff00, 0xffff00, 0x5c5cff, 0xff00ff, 0x00ffff, 0xffffff,
];

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Maps cell colours to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Argb,
    pub background: Argb,
}

impl Palette {
    pub fn new(foreground: Argb, background: Argb) -> Self {
        Self {
            foreground,
            background,
        }
    }

    pub fn resolve(&self, color: Color, default: Argb) -> Argb {
        match color {
            Color::Reset => default,
            Color::Black => indexed(0),
            Color::Red => indexed(1),
            Color::Green => indexed(2),
            Color::Yellow => indexed(3),
            Color::Blue => indexed(4),
            Color::Magenta => indexed(5),
            Color::Cyan => indexed(6),
            Color::Gray => indexed(7),
            Color::DarkGray => indexed(8),
            Color::LightRed => indexed(9),
            Color::LightGreen => indexed(10),
            Color::LightYellow => indexed(11),
            Color::LightBlue => indexed(12),
            Color::LightMagenta => indexed(13),
            Color::LightCyan => indexed(14),
            Color::White => indexed(15),
            Color::Rgb(r, g, b) => Argb::rgb(r, g, b),
            Color::Indexed(i) => indexed(i),
        }
    }
}

/// xterm 256-colour table.
fn indexed(index: u8) -> Argb {
    match index {
        0..=15 => Argb(Argb::OPAQUE | ANSI[index as usize]),
        16..=231 => {
            let i = index - 16;
            Argb::rgb(
                CUBE_LEVELS[(i / 36) as usize],
                CUBE_LEVELS[(i / 6 % 6) as usize],
                CUBE_LEVELS[(i % 6) as usize],
            )
        }
        _ => {
            let level = 8 + 10 * (index - 232);
            Argb::rgb(level, level, level)
        }
    }
}

/// Turns grid cells into pixel rectangles.
///
/// There is no font: a non-blank cell is drawn as a block glyph covering the
/// middle half of the cell.
pub struct Rasterizer {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Rasterizer {
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        CellMetrics::new(self.cell_width, self.cell_height)
    }

    /// Renders every cell of `buffer` into `target`, resizing it to fit.
    pub fn rasterize(&self, buffer: &Buffer, target: &mut Bitmap, palette: &Palette) {
        let area = buffer.area;
        target.resize(
            u32::from(area.width) * self.cell_width,
            u32::from(area.height) * self.cell_height,
            palette.background,
        );

        for y in 0..area.height {
            for x in 0..area.width {
                if let Some(cell) = buffer.cell((area.x + x, area.y + y)) {
                    self.draw_cell(cell, i64::from(x), i64::from(y), target, palette);
                }
            }
        }
    }

    fn draw_cell(&self, cell: &Cell, x: i64, y: i64, target: &mut Bitmap, palette: &Palette) {
        let mut fg = palette.resolve(cell.fg, palette.foreground);
        let mut bg = palette.resolve(cell.bg, palette.background);
        if cell.modifier.contains(Modifier::REVERSED) {
            std::mem::swap(&mut fg, &mut bg);
        }

        let bounds = self.metrics().cell_rect(x, y);
        target.draw_rect(bounds, &Paint::copy(bg));

        if !cell.symbol().trim().is_empty() {
            target.draw_rect(self.glyph_rect(&bounds), &Paint::copy(fg));
        }

        if cell.modifier.contains(Modifier::UNDERLINED) {
            let underline = PixelRect {
                top: bounds.bottom - 1,
                ..bounds
            };
            target.draw_rect(underline, &Paint::copy(fg));
        }
    }

    fn glyph_rect(&self, cell: &PixelRect) -> PixelRect {
        let inset_x = (self.cell_width / 8) as i32;
        let top = cell.top + (self.cell_height / 4) as i32;
        PixelRect {
            left: cell.left + inset_x,
            top,
            right: cell.right - inset_x,
            bottom: top + self.cell_height.div_ceil(2) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    use super::*;

    const FG: Argb = Argb::rgb(0xcc, 0xcc, 0xcc);
    const BG: Argb = Argb::BLACK;

    fn palette() -> Palette {
        Palette::new(FG, BG)
    }

    #[test]
    fn sizes_target_to_grid() {
        let buffer = Buffer::empty(Rect::new(0, 0, 3, 2));
        let mut target = Bitmap::new(0, 0, BG);
        Rasterizer::new(8, 16).rasterize(&buffer, &mut target, &palette());
        assert_eq!((target.width(), target.height()), (24, 32));
        assert!(target.pixels().iter().all(|&px| px == BG.0));
    }

    #[test]
    fn glyph_block_in_middle_of_cell() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 2, 1));
        buffer.set_string(1, 0, "x", Style::default());
        let mut target = Bitmap::new(0, 0, BG);
        Rasterizer::new(8, 16).rasterize(&buffer, &mut target, &palette());

        // glyph spans x 9..15, y 4..12 of the second cell
        assert_eq!(target.pixel(9, 4), Some(FG));
        assert_eq!(target.pixel(14, 11), Some(FG));
        assert_eq!(target.pixel(8, 4), Some(BG));
        assert_eq!(target.pixel(9, 3), Some(BG));
        assert_eq!(target.pixel(9, 12), Some(BG));
        assert_eq!(target.pixel(3, 8), Some(BG));
    }

    #[test]
    fn half_block_cells_light_upper_pixel() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(0, 0, "a", Style::default());
        let mut target = Bitmap::new(0, 0, BG);
        Rasterizer::new(1, 2).rasterize(&buffer, &mut target, &palette());
        assert_eq!(target.pixel(0, 0), Some(FG));
        assert_eq!(target.pixel(0, 1), Some(BG));
    }

    #[test]
    fn reversed_swaps_colors() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(0, 0, " ", Style::default().add_modifier(Modifier::REVERSED));
        let mut target = Bitmap::new(0, 0, BG);
        Rasterizer::new(2, 2).rasterize(&buffer, &mut target, &palette());
        assert!(target.pixels().iter().all(|&px| px == FG.0));
    }

    #[test]
    fn underline_paints_last_row() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(0, 0, " ", Style::default().add_modifier(Modifier::UNDERLINED));
        let mut target = Bitmap::new(0, 0, BG);
        Rasterizer::new(4, 4).rasterize(&buffer, &mut target, &palette());
        assert_eq!(target.pixel(0, 3), Some(FG));
        assert_eq!(target.pixel(0, 2), Some(BG));
    }

    #[test]
    fn palette_lookups() {
        let p = palette();
        assert_eq!(p.resolve(Color::Reset, FG), FG);
        assert_eq!(p.resolve(Color::Red, FG), Argb(0xFFCD_0000));
        assert_eq!(p.resolve(Color::Indexed(16), FG), Argb::rgb(0, 0, 0));
        assert_eq!(p.resolve(Color::Indexed(231), FG), Argb::rgb(255, 255, 255));
        assert_eq!(p.resolve(Color::Indexed(232), FG), Argb::rgb(8, 8, 8));
        assert_eq!(p.resolve(Color::Rgb(1, 2, 3), FG), Argb::rgb(1, 2, 3));
    }
}
