//! Image scans without diff rendering.
//!
//! Both scans assume equally sized images and apply the same noise
//! suppression as the diff builder, so `equal`, `diff_area` and
//! `create_diff` always agree.

use log::debug;

use crate::area::{DiffArea, DiffClusters};
use crate::comparator::PixelComparator;
use crate::image::Raster;
use crate::noise::{FinalizedRow, Mark, NoiseFilter};

/// Retained differences found by [`scan_full`].
#[derive(Debug, Clone, Default)]
pub(crate) struct ScanSummary {
    pub different_pixels: u64,
    pub diff_bounds: Option<DiffArea>,
    pub diff_clusters: Vec<DiffArea>,
}

/// Returns `true` at the first difference that survives noise suppression.
///
/// A flagged pixel survives as soon as a neighbor is flagged, so the scan
/// stops without waiting for rows to be finalized.
pub(crate) fn has_difference<A, B>(img1: A, img2: B, comparator: &mut PixelComparator<A, B>) -> bool
where
    A: Raster + Copy,
    B: Raster + Copy,
{
    debug_assert_eq!(img1.width(), img2.width());
    debug_assert_eq!(img1.height(), img2.height());

    let mut filter = NoiseFilter::new(img1.width());
    for y in 0..img1.height() {
        filter.begin_row(y);
        for x in 0..img1.width() {
            let c1 = img1.pixel(x, y);
            let c2 = img2.pixel(x, y);
            if !comparator.compare(x, y, c1, c2) && filter.mark(x, Mark::Compared) {
                debug!("first retained difference at ({x}, {y})");
                return true;
            }
        }
        filter.end_row();
    }
    false
}

/// Scans every pixel and collects the retained differences.
pub(crate) fn scan_full<A, B>(
    img1: A,
    img2: B,
    comparator: &mut PixelComparator<A, B>,
    clusters_size: Option<usize>,
) -> ScanSummary
where
    A: Raster + Copy,
    B: Raster + Copy,
{
    debug_assert_eq!(img1.width(), img2.width());
    debug_assert_eq!(img1.height(), img2.height());

    let mut summary = ScanSummary::default();
    let mut clusters = clusters_size.map(DiffClusters::new);
    let mut collect = |row: FinalizedRow| {
        for x in row.retained {
            summary.different_pixels += 1;
            summary
                .diff_bounds
                .get_or_insert(DiffArea::from_point(x, row.y))
                .update(x, row.y);
            if let Some(clusters) = &mut clusters {
                clusters.update(x, row.y);
            }
        }
    };

    let mut filter = NoiseFilter::new(img1.width());
    for y in 0..img1.height() {
        filter.begin_row(y);
        for x in 0..img1.width() {
            let c1 = img1.pixel(x, y);
            let c2 = img2.pixel(x, y);
            if !comparator.compare(x, y, c1, c2) {
                filter.mark(x, Mark::Compared);
            }
        }
        if let Some(row) = filter.end_row() {
            collect(row);
        }
    }
    if let Some(row) = filter.finish() {
        collect(row);
    }

    summary.diff_clusters = clusters
        .map(DiffClusters::into_clusters)
        .unwrap_or_default();
    debug!(
        "scan finished: {} retained differences, bounds {:?}",
        summary.different_pixels, summary.diff_bounds
    );
    summary
}
