//! Comparison options.

use imgref::ImgRef;
use rgb::RGB8;

use crate::consts::{DEFAULT_ANTIALIASING_TOLERANCE, DEFAULT_CLUSTERS_SIZE, DEFAULT_HIGHLIGHT, JND};
use crate::error::{LooksSameError, Result};

/// Options shared by every comparison operation.
///
/// Use the builder pattern to construct:
/// ```rust
/// use looks_same::CompareOptions;
///
/// let options = CompareOptions::new()
///     .with_tolerance(5.0)          // more forgiving than the 2.3 JND
///     .with_ignore_caret(false)     // caret blinks are real differences here
///     .with_pixel_ratio(2.0);       // retina screenshots
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    tolerance: Option<f64>,
    strict: bool,
    ignore_antialiasing: bool,
    antialiasing_tolerance: f64,
    ignore_caret: bool,
    pixel_ratio: f64,
    should_cluster: bool,
    clusters_size: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tolerance: None,
            strict: false,
            ignore_antialiasing: true,
            antialiasing_tolerance: DEFAULT_ANTIALIASING_TOLERANCE,
            ignore_caret: true,
            pixel_ratio: 1.0,
            should_cluster: false,
            clusters_size: DEFAULT_CLUSTERS_SIZE,
        }
    }
}

impl CompareOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CIEDE2000 tolerance. Conflicts with [`with_strict`](Self::with_strict).
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Requires exact channel equality instead of perceptual comparison.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets whether antialiasing artifacts are ignored.
    #[must_use]
    pub fn with_ignore_antialiasing(mut self, ignore: bool) -> Self {
        self.ignore_antialiasing = ignore;
        self
    }

    /// Sets the brightness tolerance of antialiasing detection.
    ///
    /// Higher values classify more pixels as antialiasing.
    #[must_use]
    pub fn with_antialiasing_tolerance(mut self, tolerance: f64) -> Self {
        self.antialiasing_tolerance = tolerance;
        self
    }

    /// Sets whether a blinking text caret is ignored.
    #[must_use]
    pub fn with_ignore_caret(mut self, ignore: bool) -> Self {
        self.ignore_caret = ignore;
        self
    }

    /// Sets the device pixel ratio of the screenshots.
    #[must_use]
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Sets whether differences are grouped into clusters.
    #[must_use]
    pub fn with_should_cluster(mut self, should_cluster: bool) -> Self {
        self.should_cluster = should_cluster;
        self
    }

    /// Sets the cluster radius in pixels.
    #[must_use]
    pub fn with_clusters_size(mut self, clusters_size: usize) -> Self {
        self.clusters_size = clusters_size;
        self
    }

    /// Explicit tolerance, if one was set.
    #[must_use]
    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    /// Tolerance in effect: the explicit one or [`JND`].
    #[must_use]
    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(JND)
    }

    #[must_use]
    pub fn strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub fn ignore_antialiasing(&self) -> bool {
        self.ignore_antialiasing
    }

    #[must_use]
    pub fn antialiasing_tolerance(&self) -> f64 {
        self.antialiasing_tolerance
    }

    #[must_use]
    pub fn ignore_caret(&self) -> bool {
        self.ignore_caret
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    #[must_use]
    pub fn should_cluster(&self) -> bool {
        self.should_cluster
    }

    #[must_use]
    pub fn clusters_size(&self) -> usize {
        self.clusters_size
    }

    /// Checks option consistency.
    ///
    /// # Errors
    /// Returns a configuration error if:
    /// - `strict` is combined with an explicit tolerance
    /// - a tolerance is negative or non-finite
    /// - the pixel ratio is below 1 or non-finite
    pub fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self.tolerance {
            if self.strict {
                return Err(LooksSameError::StrictWithTolerance);
            }
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(LooksSameError::InvalidTolerance(tolerance));
            }
        }
        let aa = self.antialiasing_tolerance;
        if !aa.is_finite() || aa < 0.0 {
            return Err(LooksSameError::InvalidAntialiasingTolerance(aa));
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio < 1.0 {
            return Err(LooksSameError::InvalidPixelRatio(self.pixel_ratio));
        }
        Ok(())
    }
}

/// Reference/current pair whose differing pixels are excluded from a diff.
#[derive(Debug, Clone, Copy)]
pub struct IgnorePair<'a> {
    pub reference: ImgRef<'a, RGB8>,
    pub current: ImgRef<'a, RGB8>,
}

/// Options for [`create_diff`](crate::create_diff).
#[derive(Debug, Clone)]
pub struct DiffOptions<'a> {
    compare: CompareOptions,
    highlight_color: RGB8,
    ignore_different_pixels: Option<IgnorePair<'a>>,
}

impl Default for DiffOptions<'_> {
    fn default() -> Self {
        Self {
            compare: CompareOptions::default(),
            highlight_color: DEFAULT_HIGHLIGHT,
            ignore_different_pixels: None,
        }
    }
}

impl<'a> DiffOptions<'a> {
    #[must_use]
    pub fn new(compare: CompareOptions) -> Self {
        Self {
            compare,
            ..Self::default()
        }
    }

    /// Sets the color painted over differing pixels.
    #[must_use]
    pub fn with_highlight_color(mut self, color: RGB8) -> Self {
        self.highlight_color = color;
        self
    }

    /// Excludes every pixel that differs between `reference` and `current`.
    ///
    /// The pair is compared with the same comparator settings as the main
    /// images.
    #[must_use]
    pub fn with_ignore_different_pixels(
        mut self,
        reference: ImgRef<'a, RGB8>,
        current: ImgRef<'a, RGB8>,
    ) -> Self {
        self.ignore_different_pixels = Some(IgnorePair { reference, current });
        self
    }

    #[must_use]
    pub fn compare(&self) -> &CompareOptions {
        &self.compare
    }

    #[must_use]
    pub fn highlight_color(&self) -> RGB8 {
        self.highlight_color
    }

    #[must_use]
    pub fn ignore_different_pixels(&self) -> Option<IgnorePair<'a>> {
        self.ignore_different_pixels
    }
}
