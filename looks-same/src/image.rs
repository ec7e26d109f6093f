//! Raster access and the diff output buffer.
//!
//! Input images are anything implementing [`Raster`]: a width, a height and
//! random pixel access. The diff output is a [`DiffImage`], an RGBA buffer
//! with per-pixel opacity.

use std::ops::{Index, IndexMut};

use imgref::{Img, ImgRef, ImgVec};
use rgb::{RGB8, RGBA8};

/// Read-only 2D grid of colors.
///
/// `pixel` must be defined for every `x < width()` and `y < height()`.
/// Alpha, if the underlying storage has any, is not part of comparison.
pub trait Raster {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> RGB8;

    /// Whether `(x, y)` lies inside the raster.
    #[inline]
    fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height()
    }
}

impl Raster for ImgRef<'_, RGB8> {
    #[inline]
    fn width(&self) -> usize {
        Img::width(self)
    }

    #[inline]
    fn height(&self) -> usize {
        Img::height(self)
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> RGB8 {
        self[(x, y)]
    }
}

impl Raster for ImgVec<RGB8> {
    #[inline]
    fn width(&self) -> usize {
        Img::width(self)
    }

    #[inline]
    fn height(&self) -> usize {
        Img::height(self)
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> RGB8 {
        self[(x, y)]
    }
}

impl Raster for ImgRef<'_, RGBA8> {
    #[inline]
    fn width(&self) -> usize {
        Img::width(self)
    }

    #[inline]
    fn height(&self) -> usize {
        Img::height(self)
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> RGB8 {
        let p = self[(x, y)];
        RGB8::new(p.r, p.g, p.b)
    }
}

impl Raster for ImgVec<RGBA8> {
    #[inline]
    fn width(&self) -> usize {
        Img::width(self)
    }

    #[inline]
    fn height(&self) -> usize {
        Img::height(self)
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> RGB8 {
        let p = self[(x, y)];
        RGB8::new(p.r, p.g, p.b)
    }
}

impl<R: Raster + ?Sized> Raster for &R {
    #[inline]
    fn width(&self) -> usize {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> usize {
        (**self).height()
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> RGB8 {
        (**self).pixel(x, y)
    }
}

/// Converts an opacity in `0.0..=1.0` to an 8-bit alpha.
#[inline]
fn opacity_to_alpha(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// RGBA canvas the diff is painted into.
///
/// Starts fully transparent; every cell is written exactly once per scan
/// (and possibly repainted by noise suppression).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffImage {
    data: Vec<RGBA8>,
    width: usize,
    height: usize,
}

impl DiffImage {
    /// Creates a transparent canvas.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![RGBA8::new(0, 0, 0, 0); width * height],
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Paints `color` at `(x, y)` with the given opacity.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: RGB8, opacity: f32) {
        self.data[y * self.width + x] =
            RGBA8::new(color.r, color.g, color.b, opacity_to_alpha(opacity));
    }

    /// Returns the painted pixel at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> RGBA8 {
        self.data[y * self.width + x]
    }

    /// Returns a row of painted pixels.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> &[RGBA8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Raw pixel data, row-major.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[RGBA8] {
        &self.data
    }

    /// Borrows the canvas as an [`ImgRef`].
    #[must_use]
    pub fn as_img(&self) -> ImgRef<'_, RGBA8> {
        Img::new(&self.data[..], self.width, self.height)
    }

    /// Converts into an owned [`ImgVec`].
    #[must_use]
    pub fn into_imgvec(self) -> ImgVec<RGBA8> {
        Img::new(self.data, self.width, self.height)
    }
}

impl Index<(usize, usize)> for DiffImage {
    type Output = RGBA8;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.data[y * self.width + x]
    }
}

impl IndexMut<(usize, usize)> for DiffImage {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.data[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_image_creation() {
        let img = DiffImage::new(7, 3);
        assert_eq!(img.width(), 7);
        assert_eq!(img.height(), 3);
        assert_eq!(img.data().len(), 21);
        assert_eq!(img.get(6, 2).a, 0);
    }

    #[test]
    fn test_set_pixel_opacity() {
        let mut img = DiffImage::new(4, 4);
        img.set_pixel(1, 2, RGB8::new(10, 20, 30), 1.0);
        assert_eq!(img.get(1, 2), RGBA8::new(10, 20, 30, 255));
        img.set_pixel(1, 2, RGB8::new(10, 20, 30), 0.5);
        assert_eq!(img[(1, 2)].a, 128);
        img.set_pixel(0, 0, RGB8::new(0, 0, 0), 3.0);
        assert_eq!(img[(0, 0)].a, 255);
    }

    #[test]
    fn test_row_access() {
        let mut img = DiffImage::new(5, 2);
        img.set_pixel(3, 1, RGB8::new(1, 2, 3), 1.0);
        assert_eq!(img.row(1)[3], RGBA8::new(1, 2, 3, 255));
    }

    #[test]
    fn test_raster_impls() {
        let rgb = Img::new(vec![RGB8::new(1, 2, 3); 6], 3, 2);
        assert_eq!(Raster::width(&rgb), 3);
        assert_eq!(Raster::height(&rgb.as_ref()), 2);
        assert_eq!(rgb.as_ref().pixel(2, 1), RGB8::new(1, 2, 3));

        let rgba = Img::new(vec![RGBA8::new(9, 8, 7, 0); 4], 2, 2);
        assert_eq!(rgba.pixel(1, 1), RGB8::new(9, 8, 7));
        assert!(rgba.contains(1, 1));
        assert!(!rgba.contains(2, 0));
    }
}
