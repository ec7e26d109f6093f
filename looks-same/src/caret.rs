//! Text caret detection.
//!
//! Screenshots of focused inputs often differ only by the blinking caret.
//! The first mismatch of a row-major scan that starts a strip exactly
//! `pixel_ratio` pixels wide and at least two pixels tall, with matching
//! pixels on both sides, is taken to be the caret. Every mismatch inside that
//! strip is then ignored. At most one caret is ignored per scan.

use log::trace;

use crate::area::DiffArea;
use crate::comparator::exact_match;
use crate::image::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaretState {
    Searching,
    Detected(DiffArea),
}

/// Stateful caret classifier for one scan.
#[derive(Debug, Clone)]
pub struct IgnoreCaretComparator<A, B> {
    img1: A,
    img2: B,
    pixel_ratio: usize,
    state: CaretState,
}

impl<A: Raster, B: Raster> IgnoreCaretComparator<A, B> {
    /// `pixel_ratio` is floored; the caret is that many pixels wide.
    ///
    /// Ratios wider than the images are capped one past the narrower width,
    /// where no strip can match.
    pub fn new(img1: A, img2: B, pixel_ratio: f64) -> Self {
        let widest_strip = img1.width().min(img2.width());
        let pixel_ratio =
            (pixel_ratio.floor() as usize).clamp(1, widest_strip.saturating_add(1));
        Self {
            img1,
            img2,
            pixel_ratio,
            state: CaretState::Searching,
        }
    }

    /// Caret box, once one has been found.
    #[must_use]
    pub fn caret(&self) -> Option<DiffArea> {
        match self.state {
            CaretState::Searching => None,
            CaretState::Detected(area) => Some(area),
        }
    }

    /// Returns `true` if the mismatch at `(x, y)` belongs to the caret.
    ///
    /// Must be called in row-major order, and only for mismatching pixels.
    pub fn is_caret(&mut self, x: usize, y: usize) -> bool {
        match self.state {
            CaretState::Detected(area) => area.contains(x, y),
            CaretState::Searching => match self.detect(x, y) {
                Some(area) => {
                    trace!("caret detected at {area:?}");
                    self.state = CaretState::Detected(area);
                    true
                }
                None => false,
            },
        }
    }

    fn differs(&self, x: usize, y: usize) -> bool {
        self.img1.contains(x, y)
            && self.img2.contains(x, y)
            && !exact_match(self.img1.pixel(x, y), self.img2.pixel(x, y))
    }

    /// Walks the strip starting at `(x, y)` left to right, top to bottom, and
    /// returns its last differing point.
    fn last_caret_point(&self, x: usize, y: usize) -> (usize, usize) {
        let mut current = (x, y);
        loop {
            let next = if current.0 + 1 < x.saturating_add(self.pixel_ratio) {
                (current.0 + 1, current.1)
            } else {
                (x, current.1 + 1)
            };
            if !self.differs(next.0, next.1) {
                return current;
            }
            current = next;
        }
    }

    fn detect(&self, x: usize, y: usize) -> Option<DiffArea> {
        let (last_x, last_y) = self.last_caret_point(x, y);
        let width = last_x + 1 - x;
        let height = last_y + 1 - y;
        if height < 2 || width != self.pixel_ratio {
            return None;
        }

        // A caret is a thin strip, not the left edge of a wider region.
        let right = x.saturating_add(self.pixel_ratio);
        let bounded = (y..=last_y)
            .all(|row| !(x > 0 && self.differs(x - 1, row)) && !self.differs(right, row));
        bounded.then(|| DiffArea::new(x, y, width, height))
    }
}
