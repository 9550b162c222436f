//! Reclaims the free space hugging a rendered word.
//!
//! Splitting a cell around a word's bounding box throws away everything
//! inside the box, including the blank areas between and above glyphs. The
//! gap finder reads the rendered box back, reduces it to background vs ink,
//! and grows rectangles out of background runs row by row.

use crate::color::Color;
use crate::geometry::Rectangle;
use crate::Error;
use image::imageops::{self, ColorMap};
use image::{Rgb, RgbImage};
use rand::Rng;

/// Axis along which gap rectangles grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDirection {
    /// Columns are scanned left to right, each one read from the bottom
    /// edge up, so rectangles grow sideways across columns.
    Horizontal,
    /// Rows are scanned top to bottom.
    Vertical,
}

impl FillDirection {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            FillDirection::Horizontal
        } else {
            FillDirection::Vertical
        }
    }
}

/// Two-entry palette: index 0 is the background, index 1 the ink.
struct BinaryPalette {
    background: Color,
    ink: Color,
}

impl BinaryPalette {
    /// Ink is whichever pixel lies furthest from the background.
    fn for_region(region: &RgbImage, background: Color) -> Self {
        let ink = region
            .pixels()
            .copied()
            .max_by_key(|p| distance_sq(p, &background))
            .unwrap_or(background);
        Self { background, ink }
    }
}

impl ColorMap for BinaryPalette {
    type Color = Rgb<u8>;

    fn index_of(&self, color: &Rgb<u8>) -> usize {
        if distance_sq(color, &self.background) <= distance_sq(color, &self.ink) {
            0
        } else {
            1
        }
    }

    fn lookup(&self, index: usize) -> Option<Rgb<u8>> {
        match index {
            0 => Some(self.background),
            1 => Some(self.ink),
            _ => None,
        }
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Rgb<u8>) {
        *color = if self.index_of(color) == 0 {
            self.background
        } else {
            self.ink
        };
    }
}

fn distance_sq(a: &Rgb<u8>, b: &Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

/// Quantizes `region` to two colours and returns a row-major grid where
/// `true` marks background.
pub fn background_mask(region: &RgbImage, background: Color) -> Result<Vec<Vec<bool>>, Error> {
    let palette = BinaryPalette::for_region(region, background);
    let indexed = imageops::index_colors(region, &palette);

    let grid: Vec<Vec<bool>> = indexed
        .rows()
        .map(|row| row.map(|p| p.0[0] == 0).collect())
        .collect();

    if !region.is_empty() && !grid.iter().flatten().any(|&free| free) {
        return Err(Error::BackgroundColorNotFound {
            background: background.0,
        });
    }
    Ok(grid)
}

#[derive(Debug, Clone, Copy)]
struct GridRect {
    col: usize,
    row: usize,
    width: usize,
    height: usize,
}

/// Maximal runs of `true` in a row as `[left, right)` pairs.
fn free_runs(row: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &free) in row.iter().enumerate() {
        match (free, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, row.len()));
    }
    runs
}

/// Grows rectangles out of runs: a run continues the rectangle above it
/// when both have identical bounds, otherwise it opens a new one-row
/// rectangle.
fn grow_rects(grid: &[Vec<bool>]) -> Vec<GridRect> {
    let mut rects: Vec<GridRect> = Vec::new();
    // (left, right, index into rects), sorted by left
    let mut previous: Vec<(usize, usize, usize)> = Vec::new();

    for (row_idx, row) in grid.iter().enumerate() {
        let mut current = Vec::new();
        for (left, right) in free_runs(row) {
            let continued = previous
                .binary_search_by_key(&left, |&(l, _, _)| l)
                .ok()
                .map(|i| previous[i])
                .filter(|&(_, r, _)| r == right);

            let idx = match continued {
                Some((_, _, idx)) => {
                    rects[idx].height += 1;
                    idx
                }
                None => {
                    rects.push(GridRect {
                        col: left,
                        row: row_idx,
                        width: right - left,
                        height: 1,
                    });
                    rects.len() - 1
                }
            };
            current.push((left, right, idx));
        }
        previous = current;
    }
    rects
}

fn transpose_reversed(grid: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);
    (0..cols)
        .map(|x| (0..rows).rev().map(|y| grid[y][x]).collect())
        .collect()
}

/// Free rectangles inside the rendered `region`, in canvas coordinates.
///
/// `origin` is the canvas pixel the region's top-left corner was read from.
/// Rectangles with a side below `min_side` are dropped.
pub fn find_gaps(
    region: &RgbImage,
    origin: (i32, i32),
    background: Color,
    direction: FillDirection,
    min_side: f32,
) -> Result<Vec<Rectangle>, Error> {
    let mask = background_mask(region, background)?;
    let region_height = region.height() as usize;

    let grid = match direction {
        FillDirection::Vertical => mask,
        FillDirection::Horizontal => transpose_reversed(&mask),
    };

    let (ox, oy) = (origin.0 as f32, origin.1 as f32);
    let gaps: Vec<Rectangle> = grow_rects(&grid)
        .into_iter()
        .filter(|g| g.width as f32 >= min_side && g.height as f32 >= min_side)
        .map(|g| match direction {
            FillDirection::Vertical => Rectangle::new(
                ox + g.col as f32,
                oy + g.row as f32,
                g.width as f32,
                g.height as f32,
            ),
            FillDirection::Horizontal => Rectangle::new(
                ox + g.row as f32,
                oy + (region_height - g.col - g.width) as f32,
                g.height as f32,
                g.width as f32,
            ),
        })
        .collect();

    tracing::trace!(count = gaps.len(), ?direction, "gaps found around word");
    Ok(gaps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb<u8> = Rgb([73, 109, 137]);
    const INK: Rgb<u8> = Rgb([255, 255, 0]);

    fn image_from(rows: &[&str]) -> RgbImage {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        RgbImage::from_fn(w, h, |x, y| {
            if rows[y as usize].as_bytes()[x as usize] == b'#' {
                INK
            } else {
                BG
            }
        })
    }

    #[test]
    fn runs_split_on_ink() {
        assert_eq!(
            free_runs(&[true, true, false, true, false, false, true]),
            vec![(0, 2), (3, 4), (6, 7)]
        );
        assert!(free_runs(&[false, false]).is_empty());
    }

    #[test]
    fn identical_runs_stack_into_one_rect() {
        let img = image_from(&[
            "..#..", //
            "..#..", //
            "..###", //
        ]);
        let grid = background_mask(&img, BG).unwrap();
        let rects = grow_rects(&grid);
        assert_eq!(rects.len(), 2);
        assert_eq!((rects[0].col, rects[0].width, rects[0].height), (0, 2, 3));
        assert_eq!((rects[1].col, rects[1].width, rects[1].height), (3, 2, 2));
    }

    #[test]
    fn vertical_fill_offsets_by_origin() {
        let mut rows = vec!["..........".to_string(); 6];
        rows.extend(std::iter::repeat("##########".to_string()).take(4));
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let img = image_from(&rows);

        let gaps = find_gaps(&img, (100, 50), BG, FillDirection::Vertical, 5.0).unwrap();
        assert_eq!(gaps, vec![Rectangle::new(100.0, 50.0, 10.0, 6.0)]);
    }

    #[test]
    fn horizontal_fill_maps_back_to_canvas() {
        // Ink column on the left, free block on the right.
        let rows: Vec<String> = (0..8).map(|_| "###.......".to_string()).collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let img = image_from(&rows);

        let gaps = find_gaps(&img, (10, 20), BG, FillDirection::Horizontal, 5.0).unwrap();
        assert_eq!(gaps, vec![Rectangle::new(13.0, 20.0, 7.0, 8.0)]);
    }

    #[test]
    fn small_gaps_are_dropped() {
        let img = image_from(&[
            "....#####", //
            "....#####", //
            "....#####", //
        ]);
        let gaps = find_gaps(&img, (0, 0), BG, FillDirection::Vertical, 5.0).unwrap();
        assert!(gaps.is_empty());
    }

    #[test]
    fn missing_background_is_an_error() {
        let img = RgbImage::from_pixel(6, 6, INK);
        let err = find_gaps(&img, (0, 0), BG, FillDirection::Vertical, 5.0).unwrap_err();
        assert!(matches!(err, Error::BackgroundColorNotFound { .. }));
    }

    #[test]
    fn antialiased_pixels_follow_nearest_colour() {
        let mut img = RgbImage::from_pixel(3, 1, BG);
        img.put_pixel(1, 0, Rgb([80, 115, 130]));
        img.put_pixel(2, 0, INK);
        let grid = background_mask(&img, BG).unwrap();
        assert_eq!(grid, vec![vec![true, true, false]]);
    }

    #[test]
    fn gaps_never_cover_ink() {
        let img = image_from(&[
            "......................", //
            "..####.......####.....", //
            "..#..#.......#........", //
            "..####.......#........", //
            "..#..........#........", //
            "..#..........####.....", //
            "......................", //
            "......................", //
            "......................", //
            "......................", //
            "......................", //
        ]);
        for direction in [FillDirection::Vertical, FillDirection::Horizontal] {
            let gaps = find_gaps(&img, (0, 0), BG, direction, 2.0).unwrap();
            assert!(!gaps.is_empty());
            for gap in &gaps {
                for y in gap.y as u32..gap.bottom() as u32 {
                    for x in gap.x as u32..gap.right() as u32 {
                        assert_ne!(*img.get_pixel(x, y), INK, "{direction:?} gap {gap:?}");
                    }
                }
            }
        }
    }
}
