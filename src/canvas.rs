//! Drawing surfaces the layout engine renders onto.

use crate::color::Color;
use crate::geometry::Rectangle;
use crate::metrics::TextMetrics;
use crate::Error;
use fontdue::{Font, FontSettings};
use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use tiny_skia::{Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

/// Everything the layout engine needs from a renderer.
pub trait Canvas: TextMetrics {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Colour every pixel starts out as.
    fn background(&self) -> Color;

    /// Draws `word` filling `rect`. When `rotated` is set, `rect` is the
    /// upright box and the word reads bottom to top.
    fn draw_word(&mut self, rect: &Rectangle, word: &str, font_size: u32, color: Color, rotated: bool);

    /// Copies back the pixels under `rect`, clipped to the canvas.
    fn read_region(&self, rect: &Rectangle) -> RgbImage;
}

// =============================================================================
// Raster canvas
// =============================================================================

/// A tiny-skia pixmap with words rasterized through fontdue.
pub struct RasterCanvas {
    pixmap: Pixmap,
    font: Font,
    background: Color,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, background: Color, font: Font) -> Result<Self, Error> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Render("Failed to create pixel buffer".into()))?;
        let Rgb([r, g, b]) = background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
        Ok(Self {
            pixmap,
            font,
            background,
        })
    }

    pub fn from_font_bytes(
        width: u32,
        height: u32,
        background: Color,
        font_data: &[u8],
    ) -> Result<Self, Error> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| Error::Font(e.to_string()))?;
        Self::new(width, height, background, font)
    }

    pub fn into_image(self) -> RgbImage {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        RgbImage::from_fn(w, h, |x, y| pixel_at(&self.pixmap, x, y))
    }

    /// Glyph coverage for `word` laid out left to right in a `width` ×
    /// `height` box, baseline placed so ascent and descent fit the box.
    fn rasterize(&self, word: &str, font_size: f32, width: u32, height: u32) -> GrayImage {
        let metrics = self
            .font
            .horizontal_line_metrics(font_size)
            .unwrap_or(fontdue::LineMetrics {
                ascent: font_size * 0.8,
                descent: font_size * -0.2,
                line_gap: 0.0,
                new_line_size: font_size,
            });
        let extent = metrics.ascent - metrics.descent;
        let baseline = if extent > height as f32 {
            metrics.ascent * height as f32 / extent
        } else {
            metrics.ascent
        };

        let mut coverage = GrayImage::new(width, height);
        let mut pen = 0.0f32;
        for ch in word.chars().filter(|c| !c.is_control()) {
            let (glyph, bitmap) = self.font.rasterize(ch, font_size);
            let left = (pen + glyph.xmin as f32).round() as i32;
            let top = (baseline - glyph.height as f32 - glyph.ymin as f32).round() as i32;

            for gy in 0..glyph.height {
                for gx in 0..glyph.width {
                    let alpha = bitmap[gy * glyph.width + gx];
                    let (x, y) = (left + gx as i32, top + gy as i32);
                    if alpha == 0 || x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                        continue;
                    }
                    let px = coverage.get_pixel_mut(x as u32, y as u32);
                    px.0[0] = px.0[0].max(alpha);
                }
            }
            pen += glyph.advance_width;
        }
        coverage
    }
}

fn pixel_at(pixmap: &Pixmap, x: u32, y: u32) -> Rgb<u8> {
    pixmap
        .pixel(x, y)
        .map(|p| {
            let c = p.demultiply();
            Rgb([c.red(), c.green(), c.blue()])
        })
        .unwrap_or(Rgb([0, 0, 0]))
}

impl TextMetrics for RasterCanvas {
    fn advance_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.font.metrics(ch, font_size).advance_width)
            .sum()
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn background(&self) -> Color {
        self.background
    }

    fn draw_word(&mut self, rect: &Rectangle, word: &str, font_size: u32, color: Color, rotated: bool) {
        let (w, h) = rect.size_px();
        if w == 0 || h == 0 {
            return;
        }

        let coverage = if rotated {
            imageops::rotate270(&self.rasterize(word, font_size as f32, h, w))
        } else {
            self.rasterize(word, font_size as f32, w, h)
        };

        let Some(mut layer) = Pixmap::new(coverage.width(), coverage.height()) else {
            return;
        };
        let Rgb([r, g, b]) = color;
        for (dst, Luma([a])) in layer.pixels_mut().iter_mut().zip(coverage.pixels()) {
            let premul = |c: u8| ((c as u16 * *a as u16 + 127) / 255) as u8;
            if let Some(p) = PremultipliedColorU8::from_rgba(premul(r), premul(g), premul(b), *a) {
                *dst = p;
            }
        }

        let (x, y) = rect.origin_px();
        self.pixmap.draw_pixmap(
            x,
            y,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn read_region(&self, rect: &Rectangle) -> RgbImage {
        let (x0, y0) = rect.origin_px();
        let (w, h) = rect.size_px();
        let x0 = x0.max(0) as u32;
        let y0 = y0.max(0) as u32;
        let w = w.min(self.width().saturating_sub(x0));
        let h = h.min(self.height().saturating_sub(y0));
        RgbImage::from_fn(w, h, |x, y| pixel_at(&self.pixmap, x0 + x, y0 + y))
    }
}
