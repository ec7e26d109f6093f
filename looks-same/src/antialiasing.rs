//! Antialiasing detection.
//!
//! Based on "Anti-aliased Pixel and Intensity Slope Detector" by
//! V. Vysniauskas (2009), as used by pixelmatch. A differing pixel is treated
//! as antialiasing when, in either image, it is a blend between a darker and
//! a brighter neighbor, it does not sit on a flat run, and one of those
//! extreme neighbors is a solid pixel in both images.

use crate::consts::{LUMA_B, LUMA_G, LUMA_R, MAX_EQUAL_NEIGHBORS};
use crate::image::Raster;
use rgb::RGB8;

#[inline]
fn luma(c: RGB8) -> f64 {
    f64::from(c.r) * LUMA_R + f64::from(c.g) * LUMA_G + f64::from(c.b) * LUMA_B
}

#[inline]
fn brightness_delta(c1: RGB8, c2: RGB8) -> f64 {
    luma(c1) - luma(c2)
}

/// Clipped 8-neighborhood of `(x, y)` inside `width` x `height`, excluding the center.
fn neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let x0 = x.saturating_sub(1);
    let y0 = y.saturating_sub(1);
    let x2 = (x + 1).min(width - 1);
    let y2 = (y + 1).min(height - 1);
    (y0..=y2)
        .flat_map(move |ny| (x0..=x2).map(move |nx| (nx, ny)))
        .filter(move |&(nx, ny)| nx != x || ny != y)
}

/// Classifies mismatching pixels that are likely antialiasing.
#[derive(Debug, Clone)]
pub struct AntialiasingComparator<A, B> {
    img1: A,
    img2: B,
    width: usize,
    height: usize,
    tolerance: f64,
}

impl<A: Raster, B: Raster> AntialiasingComparator<A, B> {
    /// `tolerance` is the brightness delta under which an extreme neighbor's
    /// own neighbors count as equal; larger values detect more antialiasing.
    pub fn new(img1: A, img2: B, tolerance: f64) -> Self {
        let width = img1.width().min(img2.width());
        let height = img1.height().min(img2.height());
        Self {
            img1,
            img2,
            width,
            height,
            tolerance,
        }
    }

    /// Returns `true` if the difference at `(x, y)` looks like antialiasing
    /// in either image.
    #[must_use]
    pub fn is_antialiased(&self, x: usize, y: usize) -> bool {
        self.is_blend(&self.img2, &self.img1, x, y) || self.is_blend(&self.img1, &self.img2, x, y)
    }

    fn is_blend<P: Raster, Q: Raster>(&self, img: &P, other: &Q, x: usize, y: usize) -> bool {
        let center = img.pixel(x, y);

        let mut zeroes = 0u32;
        let mut positives = 0u32;
        let mut negatives = 0u32;
        let mut min = 0.0;
        let mut max = 0.0;
        let mut darkest = (x, y);
        let mut brightest = (x, y);

        for (nx, ny) in neighbors(x, y, self.width, self.height) {
            let delta = brightness_delta(center, img.pixel(nx, ny));

            if delta == 0.0 {
                zeroes += 1;
                if zeroes > MAX_EQUAL_NEIGHBORS {
                    return false;
                }
            } else if delta > 0.0 {
                positives += 1;
            } else {
                negatives += 1;
            }

            // Negative delta: the neighbor is brighter than the center.
            if delta < min {
                min = delta;
                brightest = (nx, ny);
            }
            if delta > max {
                max = delta;
                darkest = (nx, ny);
            }
        }

        if positives == 0 || negatives == 0 {
            return false;
        }

        (self.is_solid(img, darkest) && self.is_solid(other, darkest))
            || (self.is_solid(img, brightest) && self.is_solid(other, brightest))
    }

    /// A pixel with more than two equal-brightness neighbors.
    fn is_solid<P: Raster>(&self, img: &P, (x, y): (usize, usize)) -> bool {
        let center = img.pixel(x, y);
        let mut zeroes = 0u32;
        for (nx, ny) in neighbors(x, y, self.width, self.height) {
            if brightness_delta(center, img.pixel(nx, ny)).abs() <= self.tolerance {
                zeroes += 1;
                if zeroes > MAX_EQUAL_NEIGHBORS {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgref::{Img, ImgVec};

    fn gray_rows(rows: &[&[u8]]) -> ImgVec<RGB8> {
        let width = rows[0].len();
        let pixels = rows
            .iter()
            .flat_map(|row| row.iter().map(|&v| RGB8::new(v, v, v)))
            .collect();
        Img::new(pixels, width, rows.len())
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let n: Vec<_> = neighbors(0, 0, 4, 4).collect();
        assert_eq!(n, vec![(1, 0), (0, 1), (1, 1)]);
        assert_eq!(neighbors(2, 2, 5, 5).count(), 8);
        assert_eq!(neighbors(0, 0, 1, 1).count(), 0);
    }

    #[test]
    fn test_blended_edge_is_antialiasing() {
        let row1: &[u8] = &[0, 0, 128, 255, 255];
        let row2: &[u8] = &[0, 0, 0, 255, 255];
        let img1 = gray_rows(&[row1; 5]);
        let img2 = gray_rows(&[row2; 5]);
        let aa = AntialiasingComparator::new(&img1, &img2, 0.0);
        assert!(aa.is_antialiased(2, 2));
    }

    #[test]
    fn test_isolated_dot_is_not_antialiasing() {
        let black: &[u8] = &[0; 5];
        let dot: &[u8] = &[0, 0, 255, 0, 0];
        let img1 = gray_rows(&[black, black, dot, black, black]);
        let img2 = gray_rows(&[black; 5]);
        let aa = AntialiasingComparator::new(&img1, &img2, 0.0);
        assert!(!aa.is_antialiased(2, 2));
    }

    #[test]
    fn test_shifted_edge_is_not_antialiasing() {
        // A whole column moved from black to white: the pixel sits on a run
        // of equal neighbors in both images.
        let before: &[u8] = &[0, 0, 0, 255, 255];
        let after: &[u8] = &[0, 0, 255, 255, 255];
        let img1 = gray_rows(&[before; 5]);
        let img2 = gray_rows(&[after; 5]);
        let aa = AntialiasingComparator::new(&img1, &img2, 0.0);
        assert!(!aa.is_antialiased(2, 2));
    }

    #[test]
    fn test_solid_detection_uses_tolerance() {
        let rows: [&[u8]; 3] = [&[10, 11, 12], &[13, 14, 15], &[16, 17, 18]];
        let img = gray_rows(&rows);
        let strict = AntialiasingComparator::new(&img, &img, 0.0);
        assert!(!strict.is_solid(&img, (1, 1)));
        let loose = AntialiasingComparator::new(&img, &img, 5.0);
        assert!(loose.is_solid(&img, (1, 1)));
    }
}
