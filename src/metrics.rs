use crate::Error;

/// Measures words set in a single font.
pub trait TextMetrics {
    /// Horizontal advance of `word` at `font_size` pixels.
    fn advance_width(&self, word: &str, font_size: f32) -> f32;

    /// Largest whole font size at which `word` is no wider than
    /// `target_width`.
    ///
    /// Binary search: start at half the target with a step of half the
    /// target, halve the step each round and move up while the word is still
    /// narrower than the target, down otherwise. The float result is then
    /// settled on an integer that actually fits.
    fn fit_size_for_width(&self, target_width: f32, word: &str) -> Result<u32, Error> {
        let mut size = target_width / 2.0;
        let mut step = target_width / 2.0;

        while step > 0.5 {
            step /= 2.0;
            if self.advance_width(word, size) < target_width {
                size += step;
            } else {
                size -= step;
            }
        }

        let fits = |s: u32| self.advance_width(word, s as f32) <= target_width;

        let mut candidate = size.floor().max(0.0) as u32;
        while candidate > 0 && !fits(candidate) {
            candidate -= 1;
        }
        // The search is only half-pixel accurate.
        for _ in 0..2 {
            if fits(candidate + 1) {
                candidate += 1;
            } else {
                break;
            }
        }

        if candidate == 0 {
            return Err(Error::WordTooWide {
                word: word.to_string(),
                width: target_width,
            });
        }
        Ok(candidate)
    }
}
