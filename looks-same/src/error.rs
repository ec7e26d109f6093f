//! Error type for comparison operations.

#[cfg(feature = "image")]
use std::path::PathBuf;

use thiserror::Error;

/// Errors from looks-same operations.
///
/// Configuration errors are raised before any pixel is read. Load and save
/// errors come from the `image` decoding edge and carry the offending path.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LooksSameError {
    /// `strict` and an explicit `tolerance` were both requested.
    #[error("unable to use \"strict\" and \"tolerance\" options together")]
    StrictWithTolerance,

    /// Tolerance is negative or not a finite number.
    #[error("invalid tolerance {0}: must be a finite, non-negative number")]
    InvalidTolerance(f64),

    /// Antialiasing tolerance is negative or not a finite number.
    #[error("invalid antialiasing tolerance {0}: must be a finite, non-negative number")]
    InvalidAntialiasingTolerance(f64),

    /// Pixel ratio is below 1 or not a finite number.
    #[error("invalid pixel ratio {0}: must be a finite number >= 1")]
    InvalidPixelRatio(f64),

    /// Failed to read or decode a source image.
    #[cfg(feature = "image")]
    #[error("failed to load '{}': {source}", path.display())]
    Load {
        /// Image that failed to load.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode or write a diff image.
    #[cfg(feature = "image")]
    #[error("failed to save diff to '{}': {source}", path.display())]
    Save {
        /// Destination path.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: image::ImageError,
    },
}

impl LooksSameError {
    /// Returns `true` for errors caused by invalid options.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::StrictWithTolerance
                | Self::InvalidTolerance(_)
                | Self::InvalidAntialiasingTolerance(_)
                | Self::InvalidPixelRatio(_)
        )
    }
}

/// Result type for looks-same operations.
pub type Result<T> = std::result::Result<T, LooksSameError>;
