//! Axis-aligned rectangles in canvas pixel space and the two strategies for
//! carving residual space out of a cell once a word has been placed in it.

use rand::Rng;

/// Slack used by containment checks so that rectangles rebuilt from float
/// offsets still count as sitting on their parent's edge.
const EPSILON: f32 = 1e-3;

/// Immutable axis-aligned rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    /// Negative sizes are clamped to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Swaps width and height, keeping the bottom edge in place.
    ///
    /// A vertical text box reinterpreted this way is the horizontal box the
    /// word is rasterized into before being turned on its side.
    pub fn rotated_ccw(&self) -> Self {
        Self {
            x: self.x,
            y: self.y + self.height - self.width,
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_inside(&self, other: &Rectangle) -> bool {
        self.x >= other.x - EPSILON
            && self.y >= other.y - EPSILON
            && self.right() <= other.right() + EPSILON
            && self.bottom() <= other.bottom() + EPSILON
    }

    pub fn contains(&self, other: &Rectangle) -> bool {
        other.is_inside(self)
    }

    /// True only for an intersection with positive area; touching edges do
    /// not overlap.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        w > EPSILON && h > EPSILON
    }

    /// Shared area of the two rectangles, if it is positive.
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let w = self.right().min(other.right()) - x;
        let h = self.bottom().min(other.bottom()) - y;
        (w > 0.0 && h > 0.0).then(|| Rectangle::new(x, y, w, h))
    }

    pub fn meets_min_side(&self, min_side: f32) -> bool {
        self.width >= min_side && self.height >= min_side
    }

    /// Shrinks every side by `amount`, collapsing to zero size if needed.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// Top-left corner rounded to the nearest pixel.
    pub fn origin_px(&self) -> (i32, i32) {
        ((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }

    /// Size rounded up to whole pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}

// =============================================================================
// Residual space
// =============================================================================

/// How the area of a cell minus the word's rectangle is cut into bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subdivision {
    /// Top and bottom bands span the whole cell width; left and right bands
    /// only span the word's height.
    HorizontalPriority,
    /// Left and right bands span the whole cell height; top and bottom bands
    /// only span the word's width.
    VerticalPriority,
}

impl Subdivision {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Subdivision::HorizontalPriority
        } else {
            Subdivision::VerticalPriority
        }
    }

    /// Up to four bands covering `outer` minus `inner`. Bands whose offset or
    /// size is not strictly positive are left out. No minimum-side filtering
    /// happens here; the pool does that on insertion.
    pub fn split(self, outer: &Rectangle, inner: &Rectangle) -> Vec<Rectangle> {
        let top_h = inner.y - outer.y;
        let bottom_h = outer.bottom() - inner.bottom();
        let left_w = inner.x - outer.x;
        let right_w = outer.right() - inner.right();

        let (band_x, band_w, side_y, side_h) = match self {
            Subdivision::HorizontalPriority => (outer.x, outer.width, inner.y, inner.height),
            Subdivision::VerticalPriority => (inner.x, inner.width, outer.y, outer.height),
        };

        let mut bands = Vec::with_capacity(4);
        if top_h > 0.0 {
            bands.push(Rectangle::new(band_x, outer.y, band_w, top_h));
        }
        if bottom_h > 0.0 {
            bands.push(Rectangle::new(band_x, inner.bottom(), band_w, bottom_h));
        }
        if left_w > 0.0 {
            bands.push(Rectangle::new(outer.x, side_y, left_w, side_h));
        }
        if right_w > 0.0 {
            bands.push(Rectangle::new(inner.right(), side_y, right_w, side_h));
        }
        bands
    }
}
