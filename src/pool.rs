//! The working set of unoccupied rectangles.
//!
//! Rectangles spawned from the same parent never overlap that parent's
//! word, but nothing stops two resident rectangles from overlapping each
//! other: bands from one subdivision and gaps found around a glyph can cover
//! the same pixels. The engine accepts that approximation.

use crate::geometry::Rectangle;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    /// Rotated 90° counter-clockwise.
    Vertical,
}

impl Orientation {
    /// Footprint of a `length` × `thickness` word in this orientation.
    pub fn footprint(self, length: f32, thickness: f32) -> (f32, f32) {
        match self {
            Orientation::Horizontal => (length, thickness),
            Orientation::Vertical => (thickness, length),
        }
    }

    /// Weighted draw between the two orientations.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, vertical_weight: f64) -> Self {
        if rng.random_bool(vertical_weight.clamp(0.0, 1.0)) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreeSpacePool {
    rects: Vec<Rectangle>,
    min_side: f32,
}

impl FreeSpacePool {
    /// A pool holding a single rectangle covering the whole canvas.
    pub fn new(width: f32, height: f32, min_side: f32) -> Self {
        let mut pool = Self {
            rects: Vec::new(),
            min_side,
        };
        pool.push(Rectangle::new(0.0, 0.0, width, height));
        pool
    }

    /// Adds `rect` unless either side is below the minimum. Returns whether
    /// it was kept.
    pub fn push(&mut self, rect: Rectangle) -> bool {
        if rect.meets_min_side(self.min_side) {
            self.rects.push(rect);
            true
        } else {
            false
        }
    }

    /// Adds every rectangle that survives the minimum-side filter and
    /// returns how many did.
    pub fn extend<I: IntoIterator<Item = Rectangle>>(&mut self, rects: I) -> usize {
        rects.into_iter().filter(|r| self.push(*r)).count()
    }

    /// Rectangles able to host a `length` × `thickness` word in the given
    /// orientation, with their pool indices.
    fn hosts(
        &self,
        length: f32,
        thickness: f32,
        orientation: Orientation,
    ) -> impl Iterator<Item = (usize, &Rectangle)> {
        let (w, h) = orientation.footprint(length, thickness);
        self.rects
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.width >= w && r.height >= h)
    }

    /// Rectangles able to host a `length` × `thickness` word in the given
    /// orientation.
    pub fn eligible_for(
        &self,
        length: f32,
        thickness: f32,
        orientation: Orientation,
    ) -> Vec<Rectangle> {
        self.hosts(length, thickness, orientation)
            .map(|(_, r)| *r)
            .collect()
    }

    /// Index of the largest eligible rectangle, first one wins on equal
    /// area.
    pub fn best_for(&self, length: f32, thickness: f32, orientation: Orientation) -> Option<usize> {
        self.hosts(length, thickness, orientation)
            .reduce(|best, cur| if cur.1.area() > best.1.area() { cur } else { best })
            .map(|(i, _)| i)
    }

    /// Removes and returns the rectangle at `index`, keeping the order of
    /// the rest.
    pub fn take(&mut self, index: usize) -> Rectangle {
        self.rects.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&Rectangle> {
        self.rects.get(index)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rectangle> {
        self.rects.iter()
    }

    pub fn min_side(&self) -> f32 {
        self.min_side
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool_of(rects: &[Rectangle]) -> FreeSpacePool {
        let mut pool = FreeSpacePool {
            rects: Vec::new(),
            min_side: 5.0,
        };
        pool.extend(rects.iter().copied());
        pool
    }

    #[test]
    fn starts_with_whole_canvas() {
        let pool = FreeSpacePool::new(200.0, 100.0, 5.0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(0), Some(&Rectangle::new(0.0, 0.0, 200.0, 100.0)));
    }

    #[test]
    fn slivers_are_discarded() {
        let mut pool = pool_of(&[]);
        assert!(!pool.push(Rectangle::new(0.0, 0.0, 4.9, 100.0)));
        assert!(!pool.push(Rectangle::new(0.0, 0.0, 100.0, 2.0)));
        assert!(pool.push(Rectangle::new(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(pool.len(), 1);
        assert!(pool.iter().all(|r| r.width >= 5.0 && r.height >= 5.0));
    }

    #[test]
    fn eligibility_depends_on_orientation() {
        let tall = Rectangle::new(0.0, 0.0, 20.0, 100.0);
        let wide = Rectangle::new(0.0, 0.0, 100.0, 20.0);
        let pool = pool_of(&[tall, wide]);

        assert_eq!(pool.eligible_for(80.0, 15.0, Orientation::Horizontal), vec![wide]);
        assert_eq!(pool.eligible_for(80.0, 15.0, Orientation::Vertical), vec![tall]);
        assert!(pool.eligible_for(120.0, 15.0, Orientation::Horizontal).is_empty());
    }

    #[test]
    fn best_is_largest_then_first() {
        let a = Rectangle::new(0.0, 0.0, 50.0, 50.0);
        let b = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let c = Rectangle::new(5.0, 5.0, 100.0, 100.0);
        let pool = pool_of(&[a, b, c]);
        assert_eq!(pool.best_for(10.0, 10.0, Orientation::Horizontal), Some(1));
        assert_eq!(pool.best_for(60.0, 10.0, Orientation::Vertical), Some(1));
        assert_eq!(pool.best_for(200.0, 10.0, Orientation::Horizontal), None);
    }

    #[test]
    fn best_is_the_largest_eligible_rect() {
        let pool = pool_of(&[
            Rectangle::new(0.0, 0.0, 30.0, 90.0),
            Rectangle::new(0.0, 0.0, 90.0, 30.0),
            Rectangle::new(0.0, 0.0, 60.0, 60.0),
            Rectangle::new(0.0, 0.0, 200.0, 10.0),
        ]);
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let eligible = pool.eligible_for(50.0, 20.0, orientation);
            let largest = eligible
                .iter()
                .map(Rectangle::area)
                .fold(0.0f32, f32::max);
            let best = pool.best_for(50.0, 20.0, orientation).unwrap();
            assert!(eligible.contains(pool.get(best).unwrap()));
            assert_eq!(pool.get(best).unwrap().area(), largest);
        }
    }

    #[test]
    fn vertical_draws_follow_the_weight() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let draws = 10_000;
        let vertical = (0..draws)
            .filter(|_| Orientation::random(&mut rng, 0.1) == Orientation::Vertical)
            .count();
        let share = vertical as f64 / draws as f64;
        assert!((0.08..0.12).contains(&share), "vertical share {share}");

        assert!((0..500).all(|_| Orientation::random(&mut rng, 0.0) == Orientation::Horizontal));
        assert!((0..500).all(|_| Orientation::random(&mut rng, 1.0) == Orientation::Vertical));
    }

    #[test]
    fn take_removes_only_the_chosen_rect() {
        let a = Rectangle::new(0.0, 0.0, 50.0, 50.0);
        let b = Rectangle::new(60.0, 0.0, 10.0, 10.0);
        let mut pool = pool_of(&[a, b]);
        assert_eq!(pool.take(0), a);
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![b]);
    }
}
