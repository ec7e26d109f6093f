//! CIE Lab conversion and the CIEDE2000 color difference.
//!
//! Input colors are 8-bit sRGB. The conversion goes sRGB -> linear RGB ->
//! XYZ (D65) -> Lab, then CIEDE2000 (Sharma, Wu & Dalal 2005) measures the
//! perceived distance with unit weights `kL = kC = kH = 1`.

use crate::consts::{D65_XN, D65_YN, D65_ZN, LAB_EPSILON, LAB_KAPPA, SRGB_TO_XYZ};
use rgb::RGB8;

fn srgb_to_linear_slow(v: u8) -> f64 {
    let v = f64::from(v) / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Pre-computed sRGB to linear lookup table (256 entries)
static SRGB_TO_LINEAR_LUT: std::sync::LazyLock<[f64; 256]> = std::sync::LazyLock::new(|| {
    let mut lut = [0.0f64; 256];
    for i in 0..256 {
        lut[i] = srgb_to_linear_slow(i as u8);
    }
    lut
});

/// Converts an sRGB channel to linear light in `0.0..=1.0`.
#[inline]
#[must_use]
pub fn srgb_to_linear(v: u8) -> f64 {
    SRGB_TO_LINEAR_LUT[v as usize]
}

/// A color in CIE L*a*b* space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

impl Lab {
    /// Converts an sRGB color to Lab under the D65 white point.
    #[must_use]
    pub fn from_rgb8(color: RGB8) -> Self {
        let r = srgb_to_linear(color.r);
        let g = srgb_to_linear(color.g);
        let b = srgb_to_linear(color.b);

        let m = &SRGB_TO_XYZ;
        let x = m[0] * r + m[1] * g + m[2] * b;
        let y = m[3] * r + m[4] * g + m[5] * b;
        let z = m[6] * r + m[7] * g + m[8] * b;

        let fx = lab_f(x / D65_XN);
        let fy = lab_f(y / D65_YN);
        let fz = lab_f(z / D65_ZN);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

/// Hue angle in degrees, `0.0..360.0`.
#[inline]
fn hue_degrees(b: f64, a: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// CIEDE2000 color difference between two Lab colors.
///
/// Symmetric and zero for identical inputs.
#[must_use]
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    const POW25_7: f64 = 6_103_515_625.0; // 25^7

    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_bar = (c1 + c2) / 2.0;
    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let h1p = hue_degrees(lab1.b, a1p);
    let h2p = hue_degrees(lab2.b, a2p);

    let dlp = lab2.l - lab1.l;
    let dcp = c2p - c1p;

    let dhp = if c1p * c2p == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let d_hp = 2.0 * (c1p * c2p).sqrt() * (dhp.to_radians() / 2.0).sin();

    let l_bar_p = (lab1.l + lab2.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar_p = if c1p * c2p == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let d_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let l50 = (l_bar_p - 50.0).powi(2);
    let s_l = 1.0 + (0.015 * l50) / (20.0 + l50).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_p;
    let s_h = 1.0 + 0.015 * c_bar_p * t;
    let r_t = -(2.0 * d_theta).to_radians().sin() * r_c;

    let tl = dlp / s_l;
    let tc = dcp / s_c;
    let th = d_hp / s_h;

    (tl * tl + tc * tc + th * th + r_t * tc * th).max(0.0).sqrt()
}

/// CIEDE2000 distance between two sRGB colors.
#[must_use]
pub fn distance(c1: RGB8, c2: RGB8) -> f64 {
    ciede2000(Lab::from_rgb8(c1), Lab::from_rgb8(c2))
}
