//! Constants for perceptual comparison and diff rendering.

use rgb::RGB8;

// ============================================================================
// Perceptual comparison
// ============================================================================

/// Just-noticeable difference for CIEDE2000.
///
/// Distances below this value are indistinguishable to a typical observer.
pub const JND: f64 = 2.3;

/// Default brightness tolerance used by antialiasing detection.
pub const DEFAULT_ANTIALIASING_TOLERANCE: f64 = 0.0;

/// Default radius (in pixels) used to group differences into clusters.
pub const DEFAULT_CLUSTERS_SIZE: usize = 10;

/// Neighbors with brightness equal to the center beyond this count mean the
/// pixel sits on a flat run rather than a blended edge.
pub const MAX_EQUAL_NEIGHBORS: u32 = 2;

// ============================================================================
// YIQ luma coefficients (Kotsarenko & Ramos)
// ============================================================================

pub const LUMA_R: f64 = 0.298_895_31;
pub const LUMA_G: f64 = 0.586_622_47;
pub const LUMA_B: f64 = 0.114_482_23;

// ============================================================================
// CIE Lab reference white (D65, 2 degree observer)
// ============================================================================

pub const D65_XN: f64 = 0.950_47;
pub const D65_YN: f64 = 1.0;
pub const D65_ZN: f64 = 1.088_83;

/// sRGB (linear) to XYZ matrix, rows X, Y, Z.
pub const SRGB_TO_XYZ: [f64; 9] = [
    0.412_456_4,
    0.357_576_1,
    0.180_437_5, // X
    0.212_672_9,
    0.715_152_2,
    0.072_175_0, // Y
    0.019_333_9,
    0.119_192_0,
    0.950_304_1, // Z
];

/// (6/29)^3, the Lab linear-segment threshold.
pub const LAB_EPSILON: f64 = 216.0 / 24389.0;
/// (29/3)^3, the Lab linear-segment slope.
pub const LAB_KAPPA: f64 = 24389.0 / 27.0;

// ============================================================================
// Diff rendering
// ============================================================================

/// Default color painted over differing pixels (magenta).
pub const DEFAULT_HIGHLIGHT: RGB8 = RGB8::new(255, 0, 255);

/// Opacity of unchanged pixels copied from the reference.
pub const MATCH_OPACITY: f32 = 0.9;

/// Opacity of pixels whose difference was masked by the ignore pair.
pub const IGNORED_OPACITY: f32 = 0.5;
