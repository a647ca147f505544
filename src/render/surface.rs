//! Drawing surfaces and paint styles.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

use super::geometry::{PixelRect, PixelSize};

/// 32-bit `0xAARRGGBB` colour.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Argb(pub u32);

impl Argb {
    pub const OPAQUE: u32 = 0xFF00_0000;
    pub const BLACK: Argb = Argb(0xFF00_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Self::OPAQUE | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl FromStr for Argb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6)
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        let rgb = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidColor(s.to_string()))?;
        Ok(Argb(Self::OPAQUE | rgb))
    }
}

impl TryFrom<String> for Argb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How a paint combines its source pixels with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Straight, unblended copy.
    Copy,
    /// `src ^ operand ^ dst`, forced opaque. With the paint colour as `src`
    /// and the background as `operand`, background pixels become the paint
    /// colour and paint-coloured pixels become background.
    Xor { operand: Argb },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub color: Argb,
    pub mode: BlendMode,
}

impl Paint {
    pub const fn copy(color: Argb) -> Self {
        Self {
            color,
            mode: BlendMode::Copy,
        }
    }

    pub const fn xor(color: Argb, operand: Argb) -> Self {
        Self {
            color,
            mode: BlendMode::Xor { operand },
        }
    }

    #[inline]
    pub fn blend(&self, src: u32, dst: u32) -> u32 {
        match self.mode {
            BlendMode::Copy => src,
            BlendMode::Xor { operand } => (src ^ operand.0 ^ dst) | Argb::OPAQUE,
        }
    }
}

/// Something a renderer can draw on.
pub trait Surface {
    fn size(&self) -> PixelSize;

    /// Copies `bitmap` with its top-left corner at `(x, y)`, unscaled.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: i32, y: i32, paint: &Paint);

    /// Fills `rect` with `paint.color` using the paint's blend mode.
    fn draw_rect(&mut self, rect: PixelRect, paint: &Paint);
}

/// Owned ARGB pixel buffer, row-major.
///
/// Engines render their snapshots into one and hosts composite into another.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, fill: Argb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill.0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Argb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied().map(Argb)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Argb) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx] = color.0;
        }
    }

    pub fn fill(&mut self, color: Argb) {
        self.pixels.fill(color.0);
    }

    /// Reallocates to the new size if it differs, filling with `color`.
    /// Returns whether the size changed.
    pub fn resize(&mut self, width: u32, height: u32, color: Argb) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, color.0);
        true
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.size())
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface for Bitmap {
    fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: i32, y: i32, paint: &Paint) {
        let dest = PixelRect {
            left: x,
            top: y,
            right: x.saturating_add(bitmap.width as i32),
            bottom: y.saturating_add(bitmap.height as i32),
        };
        let clip = dest.intersect(&self.bounds());
        if clip.is_empty() {
            return;
        }

        for dy in clip.top..clip.bottom {
            let src_y = (dy - y) as u32;
            for dx in clip.left..clip.right {
                let src_x = (dx - x) as u32;
                let src = bitmap.pixels[bitmap.index(src_x, src_y)];
                let idx = self.index(dx as u32, dy as u32);
                self.pixels[idx] = paint.blend(src, self.pixels[idx]);
            }
        }
    }

    fn draw_rect(&mut self, rect: PixelRect, paint: &Paint) {
        let clip = rect.intersect(&self.bounds());
        if clip.is_empty() {
            return;
        }

        for y in clip.top..clip.bottom {
            let row = self.index(clip.left as u32, y as u32);
            let len = clip.width() as usize;
            for px in &mut self.pixels[row..row + len] {
                *px = paint.blend(paint.color.0, *px);
            }
        }
    }
}

/// A draw call as seen by a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    Bitmap {
        x: i32,
        y: i32,
        size: PixelSize,
        paint: Paint,
    },
    Rect {
        rect: PixelRect,
        paint: Paint,
    },
}

/// Surface that records draw calls instead of touching pixels.
#[derive(Debug, Default)]
pub struct Recorder {
    size: PixelSize,
    ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn rects(&self) -> impl Iterator<Item = &PixelRect> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Rect { rect, .. } => Some(rect),
            DrawOp::Bitmap { .. } => None,
        })
    }
}

impl Surface for Recorder {
    fn size(&self) -> PixelSize {
        self.size
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: i32, y: i32, paint: &Paint) {
        self.ops.push(DrawOp::Bitmap {
            x,
            y,
            size: bitmap.size(),
            paint: *paint,
        });
    }

    fn draw_rect(&mut self, rect: PixelRect, paint: &Paint) {
        self.ops.push(DrawOp::Rect { rect, paint: *paint });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Argb = Argb::rgb(0xcc, 0xcc, 0xcc);
    const BG: Argb = Argb::BLACK;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#cccccc".parse::<Argb>().unwrap(), FG);
        assert_eq!("#102030".parse::<Argb>().unwrap(), Argb(0xFF10_2030));
        assert!("cccccc".parse::<Argb>().is_err());
        assert!("#ccc".parse::<Argb>().is_err());
        assert!("#gggggg".parse::<Argb>().is_err());
    }

    #[test]
    fn xor_inverts_between_foreground_and_background() {
        let paint = Paint::xor(FG, BG);
        assert_eq!(paint.blend(FG.0, BG.0), FG.0);
        assert_eq!(paint.blend(FG.0, FG.0), BG.0);
    }

    #[test]
    fn xor_twice_restores_destination() {
        let paint = Paint::xor(FG, Argb::rgb(0x10, 0x20, 0x30));
        let dst = Argb::rgb(0x55, 0x66, 0x77).0;
        let once = paint.blend(FG.0, dst);
        assert_ne!(once, dst);
        assert_eq!(paint.blend(FG.0, once), dst);
    }

    #[test]
    fn draw_rect_clips_to_bounds() {
        let mut bitmap = Bitmap::new(4, 4, BG);
        bitmap.draw_rect(PixelRect::from_edges(2, 2, 10, 10), &Paint::copy(FG));
        assert_eq!(bitmap.pixel(1, 1), Some(BG));
        assert_eq!(bitmap.pixel(2, 2), Some(FG));
        assert_eq!(bitmap.pixel(3, 3), Some(FG));
        bitmap.draw_rect(PixelRect::from_edges(-5, -5, -1, -1), &Paint::copy(FG));
        assert_eq!(bitmap.pixel(0, 0), Some(BG));
    }

    #[test]
    fn draw_bitmap_copies_at_offset() {
        let mut dst = Bitmap::new(4, 3, BG);
        let src = Bitmap::new(2, 2, FG);
        dst.draw_bitmap(&src, 3, 2, &Paint::copy(Argb::WHITE));
        assert_eq!(dst.pixel(3, 2), Some(FG));
        assert_eq!(dst.pixel(2, 2), Some(BG));
        assert_eq!(dst.pixel(3, 1), Some(BG));
    }

    #[test]
    fn resize_reports_change() {
        let mut bitmap = Bitmap::new(2, 2, BG);
        assert!(!bitmap.resize(2, 2, FG));
        assert!(bitmap.resize(3, 1, FG));
        assert_eq!(bitmap.pixels(), &[FG.0; 3]);
    }

    #[test]
    fn recorder_keeps_call_order() {
        let mut rec = Recorder::new(PixelSize::new(10, 10));
        let bitmap = Bitmap::new(1, 1, BG);
        rec.draw_bitmap(&bitmap, 0, 0, &Paint::copy(FG));
        rec.draw_rect(PixelRect::from_edges(0, 0, 1, 1), &Paint::xor(FG, BG));
        assert!(matches!(rec.ops()[0], DrawOp::Bitmap { .. }));
        assert_eq!(rec.rects().count(), 1);
        assert_eq!(rec.take().len(), 2);
        assert!(rec.ops().is_empty());
    }
}
