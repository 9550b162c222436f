//! Greedy placement of ranked words into free rectangles.

use crate::canvas::Canvas;
use crate::color::{ColorSource, Color};
use crate::gaps::{self, FillDirection};
use crate::geometry::{Rectangle, Subdivision};
use crate::pool::{FreeSpacePool, Orientation};
use crate::words::WordFrequency;
use crate::Error;
use image::Rgb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Maps a frequency ratio to a fraction of the maximum font size.
pub type ScalingFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// Seed for the run's random generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Text seeds go through 64-bit FNV-1a so they map the same way on
    /// every platform.
    pub fn to_u64(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(s) => s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
                (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
            }),
        }
    }

    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.to_u64())
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::Text(s)
    }
}

#[derive(Clone)]
pub struct LayoutConfig {
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// `None` is rejected by [`LayoutConfig::validate`].
    pub color: Option<ColorSource>,
    /// Blank space kept around every word, in pixels.
    pub word_padding: u32,
    pub scaling: ScalingFn,
    /// Free rectangles with a shorter side are discarded.
    pub min_rect_side: f32,
    /// Probability of turning a word on its side when both orientations fit.
    pub vertical_weight: f64,
    pub seed: Option<Seed>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_font_size: 10.0,
            max_font_size: 100.0,
            color: Some(ColorSource::Fixed(Rgb([255, 255, 0]))),
            word_padding: 0,
            scaling: Arc::new(f32::sqrt),
            min_rect_side: 5.0,
            vertical_weight: 0.1,
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Rejects configurations no layout can be produced from.
    pub fn validate(&self, width: u32, height: u32, words: &[WordFrequency]) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidSize { width, height });
        }
        if !(self.min_font_size > 0.0 && self.min_font_size < self.max_font_size) {
            return Err(Error::InvalidFontRange {
                min: self.min_font_size,
                max: self.max_font_size,
            });
        }
        if words.is_empty() {
            return Err(Error::EmptyWordList);
        }
        if self.color.is_none() {
            return Err(Error::MissingColor);
        }
        if 2 * self.word_padding as u64 >= width as u64 {
            return Err(Error::InvalidPadding {
                padding: self.word_padding,
                width,
            });
        }
        Ok(())
    }

    fn rng(&self) -> ChaCha8Rng {
        match &self.seed {
            Some(seed) => seed.rng(),
            None => ChaCha8Rng::from_os_rng(),
        }
    }
}

/// One committed word.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub word: String,
    /// Space claimed on the canvas, padding included.
    pub rect: Rectangle,
    pub rotated: bool,
    pub font_size: u32,
    pub color: Color,
}

/// Outcome of a layout run.
#[derive(Debug, Clone, Default)]
pub struct LayoutSummary {
    pub placements: Vec<Placement>,
    /// Words that fit nowhere.
    pub skipped: usize,
    /// Words never tried because their size fell below the minimum.
    pub below_min_size: usize,
    /// Maximum font size after capping it to the canvas width.
    pub max_font_size: u32,
    /// Free rectangles left at the end.
    pub free_rects: usize,
}

// =============================================================================
// Engine
// =============================================================================

pub struct LayoutEngine<'a, C: Canvas, R: Rng> {
    canvas: &'a mut C,
    pool: FreeSpacePool,
    rng: R,
    color: ColorSource,
    padding: f32,
    vertical_weight: f64,
}

impl<'a, C: Canvas, R: Rng> LayoutEngine<'a, C, R> {
    pub fn new(canvas: &'a mut C, rng: R, color: ColorSource, config: &LayoutConfig) -> Self {
        let pool = FreeSpacePool::new(
            canvas.width() as f32,
            canvas.height() as f32,
            config.min_rect_side,
        );
        Self {
            canvas,
            pool,
            rng,
            color,
            padding: config.word_padding as f32,
            vertical_weight: config.vertical_weight,
        }
    }

    pub fn pool(&self) -> &FreeSpacePool {
        &self.pool
    }

    /// Places `word` at `font_size` if any free rectangle can take it.
    /// `Ok(None)` means it was skipped.
    pub fn place(
        &mut self,
        word: &str,
        font_size: u32,
        frequency: f32,
    ) -> Result<Option<Placement>, Error> {
        let advance = self.canvas.advance_width(word, font_size as f32);
        let length = advance + 2.0 * self.padding;
        let thickness = font_size as f32 + 2.0 * self.padding;

        let horizontal = self.pool.best_for(length, thickness, Orientation::Horizontal);
        let vertical = self.pool.best_for(length, thickness, Orientation::Vertical);

        let (index, orientation) = match (horizontal, vertical) {
            (None, None) => {
                trace!(word, font_size, "no free rectangle fits, skipping");
                return Ok(None);
            }
            (Some(h), None) => (h, Orientation::Horizontal),
            (None, Some(v)) => (v, Orientation::Vertical),
            (Some(h), Some(v)) => match Orientation::random(&mut self.rng, self.vertical_weight) {
                Orientation::Horizontal => (h, Orientation::Horizontal),
                Orientation::Vertical => (v, Orientation::Vertical),
            },
        };
        let cell = self.pool.take(index);
        let rotated = orientation == Orientation::Vertical;

        let (w, h) = orientation.footprint(length, thickness);
        let x = uniform(&mut self.rng, cell.x, cell.right() - w);
        let y = uniform(&mut self.rng, cell.y, cell.bottom() - h);
        let occupied = Rectangle::new(x, y, w, h);
        let text_rect = occupied.inset(self.padding);

        let color = self.color.color_for(frequency);
        self.canvas.draw_word(&text_rect, word, font_size, color, rotated);

        let direction = FillDirection::random(&mut self.rng);
        let subdivision = Subdivision::random(&mut self.rng);
        let bands = self.pool.extend(subdivision.split(&cell, &occupied));

        let region = self.canvas.read_region(&text_rect);
        let (ox, oy) = text_rect.origin_px();
        let found = gaps::find_gaps(
            &region,
            (ox.max(0), oy.max(0)),
            self.canvas.background(),
            direction,
            self.pool.min_side(),
        )?;
        // Pixel rounding can push a gap past the word's own box.
        let padding = self.padding;
        let reclaimed = self.pool.extend(
            found
                .into_iter()
                .filter_map(|g| g.intersection(&text_rect))
                .map(|g| g.inset(padding)),
        );

        debug!(
            word,
            font_size,
            rotated,
            x = occupied.x,
            y = occupied.y,
            bands,
            reclaimed,
            pool = self.pool.len(),
            "placed word"
        );

        Ok(Some(Placement {
            word: word.to_string(),
            rect: occupied,
            rotated,
            font_size,
            color,
        }))
    }
}

/// Uniform draw from `[low, high]`; a collapsed range yields `low`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}

/// Lays out ranked `words` onto `canvas`.
///
/// Words are taken most frequent first. The font size of each is the
/// capped maximum scaled by `config.scaling(frequency)`; the run stops at
/// the first word whose size falls below the minimum.
pub fn layout_words<C: Canvas>(
    canvas: &mut C,
    words: &[WordFrequency],
    config: &LayoutConfig,
) -> Result<LayoutSummary, Error> {
    config.validate(canvas.width(), canvas.height(), words)?;
    let color = config.color.clone().ok_or(Error::MissingColor)?;

    let first = &words[0];
    let max_count = first.count;
    let budget = canvas.width() as f32 - 2.0 * config.word_padding as f32;
    let fitted = canvas.fit_size_for_width(budget, &first.word)?;
    let max_font_size = config.max_font_size.min(fitted as f32);

    let mut engine = LayoutEngine::new(canvas, config.rng(), color, config);
    let mut summary = LayoutSummary {
        max_font_size: max_font_size as u32,
        ..Default::default()
    };

    for (i, entry) in words.iter().enumerate() {
        let frequency = entry.frequency(max_count);
        let required = max_font_size * (config.scaling)(frequency);
        if required.is_nan() || required < config.min_font_size {
            summary.below_min_size = words.len() - i;
            trace!(word = %entry.word, required, "font size below minimum, stopping");
            break;
        }

        let font_size = (required.round() as u32)
            .min(max_font_size.floor() as u32)
            .max(1);
        match engine.place(&entry.word, font_size, frequency)? {
            Some(placement) => summary.placements.push(placement),
            None => summary.skipped += 1,
        }
    }

    summary.free_rects = engine.pool().len();
    info!(
        placed = summary.placements.len(),
        skipped = summary.skipped,
        below_min_size = summary.below_min_size,
        max_font_size = summary.max_font_size,
        "word cloud layout finished"
    );
    Ok(summary)
}
