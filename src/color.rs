use image::Rgb;
use std::fmt;
use std::sync::Arc;

pub type Color = Rgb<u8>;

/// Where a word's colour comes from.
#[derive(Clone)]
pub enum ColorSource {
    Fixed(Color),
    /// Called with the word's frequency relative to the most common word,
    /// in `(0, 1]`.
    ByFrequency(Arc<dyn Fn(f32) -> Color + Send + Sync>),
}

impl ColorSource {
    pub fn by_frequency<F>(f: F) -> Self
    where
        F: Fn(f32) -> Color + Send + Sync + 'static,
    {
        ColorSource::ByFrequency(Arc::new(f))
    }

    /// Spreads a scheme over the frequency range, most frequent words
    /// taking the first colour.
    pub fn scheme(scheme: ColorScheme) -> Self {
        let palette: Vec<Color> = scheme
            .colors()
            .iter()
            .filter_map(|hex| parse_hex_color(hex))
            .collect();
        ColorSource::by_frequency(move |frequency| {
            let last = palette.len().saturating_sub(1);
            let idx = ((1.0 - frequency.clamp(0.0, 1.0)) * palette.len() as f32) as usize;
            palette.get(idx.min(last)).copied().unwrap_or(Rgb([0, 0, 0]))
        })
    }

    pub fn color_for(&self, frequency: f32) -> Color {
        match self {
            ColorSource::Fixed(c) => *c,
            ColorSource::ByFrequency(f) => f(frequency),
        }
    }
}

impl fmt::Debug for ColorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSource::Fixed(c) => f.debug_tuple("Fixed").field(&c.0).finish(),
            ColorSource::ByFrequency(_) => f.write_str("ByFrequency(..)"),
        }
    }
}

impl From<Color> for ColorSource {
    fn from(color: Color) -> Self {
        ColorSource::Fixed(color)
    }
}

/// Preset palettes.
#[derive(Debug, Clone, Copy, Default)]
pub enum ColorScheme {
    #[default]
    Ocean,
    Sunset,
    Forest,
    Berry,
    Monochrome,
    Rainbow,
}

impl ColorScheme {
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            ColorScheme::Ocean => &["#264653", "#287271", "#2a9d8f", "#8ab17d", "#e9c46a"],
            ColorScheme::Sunset => &["#f94144", "#f3722c", "#f8961e", "#f9844a", "#f9c74f"],
            ColorScheme::Forest => &["#2d6a4f", "#40916c", "#52b788", "#74c69d", "#95d5b2"],
            ColorScheme::Berry => &["#7b2cbf", "#9d4edd", "#c77dff", "#e0aaff", "#ff6d00"],
            ColorScheme::Monochrome => &["#212529", "#495057", "#6c757d", "#adb5bd", "#ced4da"],
            ColorScheme::Rainbow => &[
                "#e63946", "#f4a261", "#e9c46a", "#2a9d8f", "#457b9d", "#7b2cbf",
            ],
        }
    }
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 && hex.is_ascii() {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb([r, g, b]))
    } else {
        None
    }
}
