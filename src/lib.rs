/*!
 * Rectcloud
 *
 * Word clouds laid out by greedy rectangle packing. Each word takes the
 * largest free rectangle that fits it; the leftover space is split into
 * bands, and the blank pixels around the rendered glyphs are scanned back
 * into free rectangles for later, smaller words.
 */

pub mod canvas;
pub mod color;
pub mod gaps;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod pool;
pub mod words;

pub use canvas::{Canvas, RasterCanvas};
pub use color::{parse_hex_color, Color, ColorScheme, ColorSource};
pub use gaps::FillDirection;
pub use geometry::{Rectangle, Subdivision};
pub use layout::{layout_words, LayoutConfig, LayoutEngine, LayoutSummary, Placement, Seed};
pub use metrics::TextMetrics;
pub use pool::{FreeSpacePool, Orientation};
pub use words::{count_words, tokenize, WordFrequency};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Error)]
pub enum Error {
    #[error("Canvas must have a positive size, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Font sizes must satisfy 0 < min < max, got min {min} and max {max}")]
    InvalidFontRange { min: f32, max: f32 },
    #[error("Word list cannot be empty")]
    EmptyWordList,
    #[error("A fixed font color or a color function is required")]
    MissingColor,
    #[error("Padding {padding} leaves no room on a {width}px wide canvas")]
    InvalidPadding { padding: u32, width: u32 },
    #[error("'{word}' does not fit in {width}px even at font size 1")]
    WordTooWide { word: String, width: f32 },
    #[error("Background color {background:?} not found in rendered region")]
    BackgroundColorNotFound { background: [u8; 3] },
    #[error("Font error: {0}")]
    Font(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("Render error: {0}")]
    Render(String),
}

// =============================================================================
// Builder
// =============================================================================

pub struct WordCloudBuilder {
    width: u32,
    height: u32,
    background: Color,
    font_data: Option<Vec<u8>>,
    config: LayoutConfig,
}

impl Default for WordCloudBuilder {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            background: Rgb([73, 109, 137]),
            font_data: None,
            config: LayoutConfig::default(),
        }
    }
}

impl WordCloudBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Background as `#rrggbb`. Unparseable input leaves it unchanged.
    pub fn background_hex(mut self, hex: &str) -> Self {
        if let Some(color) = parse_hex_color(hex) {
            self.background = color;
        }
        self
    }

    pub fn font(mut self, font_data: Vec<u8>) -> Self {
        self.font_data = Some(font_data);
        self
    }

    pub fn font_color(mut self, color: Color) -> Self {
        self.config.color = Some(ColorSource::Fixed(color));
        self
    }

    /// Colours each word by its frequency relative to the most common word.
    pub fn font_color_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(f32) -> Color + Send + Sync + 'static,
    {
        self.config.color = Some(ColorSource::by_frequency(f));
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.config.color = Some(ColorSource::scheme(scheme));
        self
    }

    pub fn color_source(mut self, source: Option<ColorSource>) -> Self {
        self.config.color = source;
        self
    }

    pub fn font_size_range(mut self, min: f32, max: f32) -> Self {
        self.config.min_font_size = min;
        self.config.max_font_size = max;
        self
    }

    pub fn word_padding(mut self, padding: u32) -> Self {
        self.config.word_padding = padding;
        self
    }

    pub fn scaling<F>(mut self, f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        self.config.scaling = Arc::new(f);
        self
    }

    pub fn min_rect_side(mut self, side: f32) -> Self {
        self.config.min_rect_side = side.max(1.0);
        self
    }

    pub fn vertical_weight(mut self, weight: f64) -> Self {
        self.config.vertical_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn seed(mut self, seed: impl Into<Seed>) -> Self {
        self.config.seed = Some(seed.into());
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Counts `words` and renders them with the configured font.
    pub fn build<S: AsRef<str>>(self, words: &[S]) -> Result<WordCloud, Error> {
        let ranked = count_words(words);
        self.render(&ranked)
    }

    /// Renders precomputed `(word, count)` pairs.
    pub fn build_from_counts<S: AsRef<str>>(self, counts: &[(S, u32)]) -> Result<WordCloud, Error> {
        let ranked = words::rank(
            counts
                .iter()
                .map(|(w, c)| WordFrequency::new(w.as_ref(), *c))
                .collect(),
        );
        self.render(&ranked)
    }

    /// Lays `words` out on a caller-supplied canvas. The builder's size,
    /// background and font are ignored in favour of the canvas's own.
    pub fn build_on<C: Canvas, S: AsRef<str>>(
        &self,
        canvas: &mut C,
        words: &[S],
    ) -> Result<LayoutSummary, Error> {
        layout_words(canvas, &count_words(words), &self.config)
    }

    fn render(self, ranked: &[WordFrequency]) -> Result<WordCloud, Error> {
        self.config.validate(self.width, self.height, ranked)?;

        let font_data = self
            .font_data
            .as_deref()
            .ok_or_else(|| Error::Font("No font data provided".into()))?;
        let mut canvas =
            RasterCanvas::from_font_bytes(self.width, self.height, self.background, font_data)?;

        let summary = layout_words(&mut canvas, ranked, &self.config)?;

        Ok(WordCloud {
            image: canvas.into_image(),
            summary,
        })
    }
}

// =============================================================================
// Output
// =============================================================================

#[derive(Debug)]
pub struct WordCloud {
    image: RgbImage,
    summary: LayoutSummary,
}

impl WordCloud {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn summary(&self) -> &LayoutSummary {
        &self.summary
    }

    pub fn to_png(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(self.image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| Error::Image(e.to_string()))?;
        Ok(bytes)
    }
}

/// Renders a word multiset with default settings.
pub fn generate<S: AsRef<str>>(words: &[S], font_data: Vec<u8>) -> Result<WordCloud, Error> {
    WordCloudBuilder::new().font(font_data).build(words)
}
