//! # looks-same
//!
//! Perceptual, noise-tolerant image comparison for visual regression tests.
//!
//! Two screenshots are "the same" when no pixel differs by more than a
//! just-noticeable difference in CIEDE2000, after discounting:
//! - antialiasing artifacts along edges
//! - a blinking text caret
//! - isolated single-pixel noise
//!
//! ## Example
//!
//! ```rust
//! use looks_same::{create_diff, equal, CompareOptions, DiffOptions, Img, RGB8};
//!
//! let width = 8;
//! let height = 8;
//! let reference = Img::new(vec![RGB8::new(200, 200, 200); width * height], width, height);
//! let mut current = reference.clone();
//! // A 2x2 patch is a real difference; a single pixel would be noise.
//! for (x, y) in [(3usize, 3usize), (4, 3), (3, 4), (4, 4)] {
//!     current[(x, y)] = RGB8::new(20, 20, 20);
//! }
//!
//! let options = CompareOptions::default();
//! assert!(!equal(&reference, &current, &options)?);
//!
//! let diff = create_diff(&reference, &current, &DiffOptions::new(options))?;
//! assert_eq!(diff.different_pixels, 4);
//! assert_eq!(diff.image.width(), width);
//! # Ok::<(), looks_same::LooksSameError>(())
//! ```
//!
//! ## Features
//!
//! - **`image`** (default): load images from and save diffs to files through
//!   the `image` crate, see [`io`].

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod antialiasing;
pub mod area;
pub mod caret;
pub mod comparator;
pub mod consts;
pub mod diff;
mod error;
pub mod image;
#[cfg(feature = "image")]
pub mod io;
pub mod lab;
mod noise;
mod options;
mod scan;

pub use crate::image::{DiffImage, Raster};
pub use area::{DiffArea, DiffClusters};
pub use comparator::{exact_match, ColorComparator, PixelComparator};
pub use diff::{DiffImageBuilder, DiffOutcome, IgnoreMask};
pub use error::{LooksSameError, Result};
pub use options::{CompareOptions, DiffOptions, IgnorePair};

// Re-export imgref and rgb types for convenience
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::{RGB8, RGBA8};

use log::debug;

/// Full comparison report of [`looks_same`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooksSameResult {
    /// No difference survived noise suppression.
    pub equal: bool,
    /// Bounding box of the differences.
    pub diff_bounds: Option<DiffArea>,
    /// Clusters of differences; empty unless clustering was requested.
    pub diff_clusters: Vec<DiffArea>,
    /// Retained differing pixels.
    ///
    /// Images of different sizes are not scanned, so every canvas pixel is
    /// counted. [`create_diff`] scans the overlap instead and counts only the
    /// cells outside it plus the retained differences inside it.
    pub different_pixels: u64,
    /// Pixels in the compared canvas (max width by max height).
    pub total_pixels: u64,
}

fn same_size<A: Raster, B: Raster>(a: &A, b: &B) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Union canvas of both images, or `None` if it has no pixels.
fn canvas_area<A: Raster, B: Raster>(a: &A, b: &B) -> Option<DiffArea> {
    let area = DiffArea::new(
        0,
        0,
        a.width().max(b.width()),
        a.height().max(b.height()),
    );
    (!area.is_empty()).then_some(area)
}

/// Returns `true` if the images look the same.
///
/// Images of different sizes are never equal. Otherwise the scan stops at the
/// first difference that survives single-pixel noise suppression.
///
/// # Errors
/// Returns a configuration error if `options` are invalid.
///
/// # Example
/// ```rust
/// use looks_same::{equal, CompareOptions, Img, RGB8};
///
/// let img = Img::new(vec![RGB8::new(10, 20, 30); 16], 4, 4);
/// assert!(equal(&img, &img, &CompareOptions::default())?);
/// # Ok::<(), looks_same::LooksSameError>(())
/// ```
pub fn equal<A: Raster, B: Raster>(
    reference: &A,
    current: &B,
    options: &CompareOptions,
) -> Result<bool> {
    options.validate()?;
    if !same_size(reference, current) {
        debug!(
            "size mismatch: {}x{} vs {}x{}",
            reference.width(),
            reference.height(),
            current.width(),
            current.height()
        );
        return Ok(false);
    }
    let mut comparator = PixelComparator::new(reference, current, options)?;
    Ok(!scan::has_difference(reference, current, &mut comparator))
}

/// Bounding box of the differences, or `None` if the images look the same.
///
/// For images of different sizes the whole canvas
/// `{0, 0, max_width, max_height}` is returned, or `None` when that canvas
/// is empty.
///
/// # Errors
/// Returns a configuration error if `options` are invalid.
pub fn diff_area<A: Raster, B: Raster>(
    reference: &A,
    current: &B,
    options: &CompareOptions,
) -> Result<Option<DiffArea>> {
    options.validate()?;
    if !same_size(reference, current) {
        return Ok(canvas_area(reference, current));
    }
    let mut comparator = PixelComparator::new(reference, current, options)?;
    Ok(scan::scan_full(reference, current, &mut comparator, None).diff_bounds)
}

/// Compares images and reports bounds, clusters and pixel counts without
/// rendering a diff image.
///
/// # Errors
/// Returns a configuration error if `options` are invalid.
pub fn looks_same<A: Raster, B: Raster>(
    reference: &A,
    current: &B,
    options: &CompareOptions,
) -> Result<LooksSameResult> {
    options.validate()?;
    if !same_size(reference, current) {
        let area = canvas_area(reference, current);
        let total_pixels = area.map_or(0, |a| a.area() as u64);
        return Ok(LooksSameResult {
            equal: false,
            diff_bounds: area,
            diff_clusters: match area {
                Some(area) if options.should_cluster() => vec![area],
                _ => Vec::new(),
            },
            different_pixels: total_pixels,
            total_pixels,
        });
    }

    let mut comparator = PixelComparator::new(reference, current, options)?;
    let clusters = options
        .should_cluster()
        .then_some(options.clusters_size());
    let summary = scan::scan_full(reference, current, &mut comparator, clusters);
    Ok(LooksSameResult {
        equal: summary.different_pixels == 0,
        diff_bounds: summary.diff_bounds,
        diff_clusters: summary.diff_clusters,
        different_pixels: summary.different_pixels,
        total_pixels: (reference.width() * reference.height()) as u64,
    })
}

/// Builds a highlighted diff image over the union canvas of both images.
///
/// When [`DiffOptions::with_ignore_different_pixels`] is set, pixels where the
/// ignore pair differs are painted dimmed and never count as differences.
///
/// # Errors
/// Returns a configuration error if `options` are invalid.
pub fn create_diff<A: Raster, B: Raster>(
    reference: &A,
    current: &B,
    options: &DiffOptions<'_>,
) -> Result<DiffOutcome> {
    let compare = options.compare();
    let comparator = PixelComparator::new(reference, current, compare)?;
    let ignore = match options.ignore_different_pixels() {
        Some(pair) => {
            let mask_comparator = PixelComparator::new(pair.reference, pair.current, compare)?;
            Some(IgnoreMask::new(pair.reference, pair.current, mask_comparator))
        }
        None => None,
    };

    let mut builder = DiffImageBuilder::new(
        reference,
        current,
        comparator,
        options.highlight_color(),
        ignore,
    );
    if compare.should_cluster() {
        builder = builder.with_clusters(compare.clusters_size());
    }
    Ok(builder.finish())
}

/// Compares two colors with the base comparator selected by `options`.
///
/// Neighborhood stages (antialiasing, caret) do not apply to single colors.
///
/// # Errors
/// Returns a configuration error if `options` are invalid.
pub fn compare_colors(c1: RGB8, c2: RGB8, options: &CompareOptions) -> Result<bool> {
    Ok(ColorComparator::from_options(options)?.compare(c1, c2))
}
