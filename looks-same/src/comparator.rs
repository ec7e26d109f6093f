//! Color comparison and the per-pixel comparator pipeline.
//!
//! A [`ColorComparator`] decides whether two colors are the same. The
//! [`PixelComparator`] runs it first and, on a mismatch, asks the optional
//! antialiasing and caret stages (in that order) whether the difference can
//! be ignored. Stages can only turn a mismatch into a match.

use log::debug;
use rgb::RGB8;

use crate::antialiasing::AntialiasingComparator;
use crate::caret::IgnoreCaretComparator;
use crate::error::{LooksSameError, Result};
use crate::image::Raster;
use crate::lab;
use crate::options::CompareOptions;

/// Returns `true` if all channels are equal.
#[inline]
#[must_use]
pub fn exact_match(c1: RGB8, c2: RGB8) -> bool {
    c1.r == c2.r && c1.g == c2.g && c1.b == c2.b
}

/// Base comparison between two colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorComparator {
    /// Channels must be identical.
    Exact,
    /// CIEDE2000 distance must be below `tolerance`.
    Perceptual { tolerance: f64 },
}

impl ColorComparator {
    /// Creates a perceptual comparator.
    ///
    /// # Errors
    /// Returns [`LooksSameError::InvalidTolerance`] for a negative or
    /// non-finite tolerance.
    pub fn perceptual(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(LooksSameError::InvalidTolerance(tolerance));
        }
        Ok(Self::Perceptual { tolerance })
    }

    /// Selects the comparator described by `options`.
    ///
    /// # Errors
    /// Returns a configuration error if the options are inconsistent.
    pub fn from_options(options: &CompareOptions) -> Result<Self> {
        options.validate()?;
        if options.strict() {
            Ok(Self::Exact)
        } else {
            Self::perceptual(options.effective_tolerance())
        }
    }

    /// Compares two colors. Exact equality short-circuits the Lab conversion.
    #[inline]
    #[must_use]
    pub fn compare(&self, c1: RGB8, c2: RGB8) -> bool {
        if exact_match(c1, c2) {
            return true;
        }
        match *self {
            Self::Exact => false,
            Self::Perceptual { tolerance } => lab::distance(c1, c2) < tolerance,
        }
    }
}

/// Full comparator chain for one pair of rasters.
///
/// Holds cheap raster handles (`&R` or `ImgRef`) for the neighborhood lookups
/// of its stages. The caret stage is stateful, so one comparator serves
/// exactly one row-major scan.
pub struct PixelComparator<A, B> {
    base: ColorComparator,
    antialiasing: Option<AntialiasingComparator<A, B>>,
    caret: Option<IgnoreCaretComparator<A, B>>,
}

impl<A, B> PixelComparator<A, B>
where
    A: Raster + Copy,
    B: Raster + Copy,
{
    /// Builds the chain described by `options`.
    ///
    /// # Errors
    /// Returns a configuration error if the options are inconsistent.
    pub fn new(img1: A, img2: B, options: &CompareOptions) -> Result<Self> {
        let base = ColorComparator::from_options(options)?;
        let antialiasing = options.ignore_antialiasing().then(|| {
            AntialiasingComparator::new(img1, img2, options.antialiasing_tolerance())
        });
        let caret = options
            .ignore_caret()
            .then(|| IgnoreCaretComparator::new(img1, img2, options.pixel_ratio()));
        debug!(
            "comparator chain: base={base:?} antialiasing={} caret={}",
            antialiasing.is_some(),
            caret.is_some()
        );
        Ok(Self {
            base,
            antialiasing,
            caret,
        })
    }

    /// Base color comparator of the chain.
    #[must_use]
    pub fn base(&self) -> ColorComparator {
        self.base
    }

    /// Compares the colors at `(x, y)`; `true` means "same".
    ///
    /// `(x, y)` must lie inside both rasters.
    pub fn compare(&mut self, x: usize, y: usize, c1: RGB8, c2: RGB8) -> bool {
        if self.base.compare(c1, c2) {
            return true;
        }
        if let Some(antialiasing) = &self.antialiasing {
            if antialiasing.is_antialiased(x, y) {
                return true;
            }
        }
        if let Some(caret) = &mut self.caret {
            if caret.is_caret(x, y) {
                return true;
            }
        }
        false
    }
}
