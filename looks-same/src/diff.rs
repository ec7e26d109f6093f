//! Highlighted diff image synthesis.
//!
//! The builder scans the union canvas of both images one row at a time,
//! paints matches with the reference color and mismatches with the highlight
//! color, and retracts isolated single-pixel mismatches once their
//! neighboring rows are known.

use log::{debug, trace};
use rgb::RGB8;

use crate::area::{DiffArea, DiffClusters};
use crate::comparator::PixelComparator;
use crate::consts::{IGNORED_OPACITY, MATCH_OPACITY};
use crate::image::{DiffImage, Raster};
use crate::noise::{FinalizedRow, Mark, NoiseFilter};

/// Predicate marking pixels whose differences are to be ignored.
///
/// A pixel is ignored when the mask pair differs there.
pub struct IgnoreMask<C, D> {
    comparator: PixelComparator<C, D>,
    reference: C,
    current: D,
}

impl<C: Raster + Copy, D: Raster + Copy> IgnoreMask<C, D> {
    pub fn new(reference: C, current: D, comparator: PixelComparator<C, D>) -> Self {
        Self {
            comparator,
            reference,
            current,
        }
    }

    /// Whether the difference at `(x, y)` is masked out.
    ///
    /// Points outside either mask image are never ignored.
    pub fn is_ignored(&mut self, x: usize, y: usize) -> bool {
        if !self.reference.contains(x, y) || !self.current.contains(x, y) {
            return false;
        }
        let c1 = self.reference.pixel(x, y);
        let c2 = self.current.pixel(x, y);
        !self.comparator.compare(x, y, c1, c2)
    }
}

/// Result of a finished diff build.
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    /// Highlighted diff image.
    pub image: DiffImage,
    /// No difference survived noise suppression.
    pub equal: bool,
    /// At least one difference was hidden by the ignore mask.
    pub pixel_ignored: bool,
    /// Retained differences, including out-of-bounds cells.
    pub different_pixels: u64,
    /// Pixels in the diff canvas.
    pub total_pixels: u64,
    /// Bounding box of retained differences.
    pub diff_bounds: Option<DiffArea>,
    /// Clusters of retained differences (empty unless clustering was requested).
    pub diff_clusters: Vec<DiffArea>,
}

/// Row-by-row diff image builder.
///
/// Drive it with [`process_row`](Self::process_row) to interleave with other
/// work, or call [`finish`](Self::finish) directly. Rows are always processed
/// in order; a builder dropped before `finish` reports nothing.
pub struct DiffImageBuilder<A, B, C, D> {
    img1: A,
    img2: B,
    comparator: PixelComparator<A, B>,
    ignore: Option<IgnoreMask<C, D>>,
    highlight: RGB8,
    min_width: usize,
    min_height: usize,
    canvas: DiffImage,
    filter: NoiseFilter,
    next_row: usize,
    different_pixels: u64,
    pixel_ignored: bool,
    bounds: Option<DiffArea>,
    clusters: Option<DiffClusters>,
}

impl<A, B, C, D> DiffImageBuilder<A, B, C, D>
where
    A: Raster + Copy,
    B: Raster + Copy,
    C: Raster + Copy,
    D: Raster + Copy,
{
    pub fn new(
        img1: A,
        img2: B,
        comparator: PixelComparator<A, B>,
        highlight: RGB8,
        ignore: Option<IgnoreMask<C, D>>,
    ) -> Self {
        let width = img1.width().max(img2.width());
        let height = img1.height().max(img2.height());
        Self {
            img1,
            img2,
            comparator,
            ignore,
            highlight,
            min_width: img1.width().min(img2.width()),
            min_height: img1.height().min(img2.height()),
            canvas: DiffImage::new(width, height),
            filter: NoiseFilter::new(width),
            next_row: 0,
            different_pixels: 0,
            pixel_ignored: false,
            bounds: None,
            clusters: None,
        }
    }

    /// Also groups retained differences into clusters of the given radius.
    #[must_use]
    pub fn with_clusters(mut self, radius: usize) -> Self {
        self.clusters = Some(DiffClusters::new(radius));
        self
    }

    /// Rows scanned so far.
    #[must_use]
    pub fn rows_done(&self) -> usize {
        self.next_row
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.next_row >= self.canvas.height()
    }

    /// Scans the next row. Returns `false` once every row has been scanned.
    pub fn process_row(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        let y = self.next_row;
        self.filter.begin_row(y);

        for x in 0..self.canvas.width() {
            if x >= self.min_width || y >= self.min_height {
                self.canvas.set_pixel(x, y, self.highlight, 1.0);
                self.different_pixels += 1;
                self.filter.mark(x, Mark::Forced);
                continue;
            }

            let c1 = self.img1.pixel(x, y);
            let c2 = self.img2.pixel(x, y);
            if self.comparator.compare(x, y, c1, c2) {
                self.canvas.set_pixel(x, y, c1, MATCH_OPACITY);
            } else if self.ignore.as_mut().is_some_and(|m| m.is_ignored(x, y)) {
                self.canvas.set_pixel(x, y, c1, IGNORED_OPACITY);
                self.pixel_ignored = true;
            } else {
                self.canvas.set_pixel(x, y, self.highlight, 1.0);
                self.different_pixels += 1;
                self.filter.mark(x, Mark::Compared);
            }
        }

        if let Some(row) = self.filter.end_row() {
            self.apply(&row);
        }
        self.next_row += 1;
        true
    }

    fn apply(&mut self, row: &FinalizedRow) {
        let y = row.y;
        for &x in &row.retracted {
            trace!("retracting isolated difference at ({x}, {y})");
            self.canvas
                .set_pixel(x, y, self.img1.pixel(x, y), MATCH_OPACITY);
            self.different_pixels -= 1;
        }
        for &x in &row.retained {
            self.bounds
                .get_or_insert(DiffArea::from_point(x, y))
                .update(x, y);
            if let Some(clusters) = &mut self.clusters {
                clusters.update(x, y);
            }
        }
    }

    /// Completes any remaining rows, flushes the noise filter and returns
    /// the result.
    #[must_use]
    pub fn finish(mut self) -> DiffOutcome {
        while self.process_row() {}
        if let Some(row) = self.filter.finish() {
            self.apply(&row);
        }

        let total_pixels = (self.canvas.width() * self.canvas.height()) as u64;
        debug!(
            "diff built: {}x{}, {} of {} pixels differ, ignored={}",
            self.canvas.width(),
            self.canvas.height(),
            self.different_pixels,
            total_pixels,
            self.pixel_ignored
        );
        DiffOutcome {
            image: self.canvas,
            equal: self.different_pixels == 0,
            pixel_ignored: self.pixel_ignored,
            different_pixels: self.different_pixels,
            total_pixels,
            diff_bounds: self.bounds,
            diff_clusters: self
                .clusters
                .map(DiffClusters::into_clusters)
                .unwrap_or_default(),
        }
    }
}
