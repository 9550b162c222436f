#![allow(dead_code)]

use image::{Rgb, RgbImage};
use rectcloud::{Canvas, Color, Rectangle, TextMetrics};

/// Glyph-free canvas: each character is a filled block inset inside its
/// advance cell, so blank space always surrounds the ink.
pub struct BlockCanvas {
    pub image: RgbImage,
    background: Color,
}

impl BlockCanvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            background,
        }
    }
}

pub const ADVANCE: f32 = 0.6;

impl TextMetrics for BlockCanvas {
    fn advance_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars().count() as f32 * font_size * ADVANCE
    }
}

impl Canvas for BlockCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn background(&self) -> Color {
        self.background
    }

    fn draw_word(&mut self, rect: &Rectangle, word: &str, font_size: u32, color: Color, rotated: bool) {
        let size = font_size as f32;
        let cell = size * ADVANCE;
        let (x0, y0) = rect.origin_px();
        let (w, h) = rect.size_px();
        // Upright box dimensions.
        let (along, across) = if rotated { (h, w) } else { (w, h) };

        for u in 0..along {
            for v in 0..across {
                let uf = u as f32;
                let vf = v as f32;
                let index = (uf / cell) as usize;
                let in_cell = uf - index as f32 * cell;
                let inked = index < word.chars().count()
                    && in_cell >= size * 0.1
                    && in_cell < size * 0.5
                    && vf >= size * 0.2
                    && vf < size * 0.8;
                if !inked {
                    continue;
                }
                // Rotated words read bottom to top.
                let (dx, dy) = if rotated { (v, along - 1 - u) } else { (u, v) };
                let (px, py) = (x0 + dx as i32, y0 + dy as i32);
                if px >= 0 && py >= 0 && (px as u32) < self.width() && (py as u32) < self.height() {
                    self.image.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }

    fn read_region(&self, rect: &Rectangle) -> RgbImage {
        let (x0, y0) = rect.origin_px();
        let (w, h) = rect.size_px();
        let (x0, y0) = (x0.max(0) as u32, y0.max(0) as u32);
        let w = w.min(self.width().saturating_sub(x0));
        let h = h.min(self.height().saturating_sub(y0));
        image::imageops::crop_imm(&self.image, x0, y0, w, h).to_image()
    }
}

pub const BACKGROUND: Color = Rgb([73, 109, 137]);

pub fn repeat_words(counts: &[(&str, usize)]) -> Vec<String> {
    counts
        .iter()
        .flat_map(|(w, n)| std::iter::repeat(w.to_string()).take(*n))
        .collect()
}
