//! Deterministic synthetic screenshots for looks-same tests.
//!
//! Everything is driven by an LCG PRNG so inputs are identical across
//! platforms.

use looks_same::{Img, ImgVec, RGB8};

pub const WHITE: RGB8 = RGB8::new(255, 255, 255);
pub const BLACK: RGB8 = RGB8::new(0, 0, 0);
pub const GRAY: RGB8 = RGB8::new(128, 128, 128);
pub const RED: RGB8 = RGB8::new(255, 0, 0);

// ============================================================================
// LCG PRNG
// ============================================================================

/// LCG pseudo-random number generator (deterministic)
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u8(&mut self) -> u8 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 33) & 0xFF) as u8
    }

    pub fn next_below(&mut self, bound: usize) -> usize {
        let hi = self.next_u8() as usize;
        let lo = self.next_u8() as usize;
        ((hi << 8) | lo) % bound
    }
}

// ============================================================================
// Image Generation Functions
// ============================================================================

pub fn solid(width: usize, height: usize, color: RGB8) -> ImgVec<RGB8> {
    Img::new(vec![color; width * height], width, height)
}

/// Horizontal grayscale gradient.
pub fn gradient_h(width: usize, height: usize) -> ImgVec<RGB8> {
    let pixels = (0..height)
        .flat_map(|_| {
            (0..width).map(move |x| {
                let v = if width > 1 {
                    (x * 255 / (width - 1)) as u8
                } else {
                    128
                };
                RGB8::new(v, v, v)
            })
        })
        .collect();
    Img::new(pixels, width, height)
}

/// Uniformly random colors.
pub fn random(width: usize, height: usize, seed: u64) -> ImgVec<RGB8> {
    let mut rng = Lcg::new(seed);
    let pixels = (0..width * height)
        .map(|_| RGB8::new(rng.next_u8(), rng.next_u8(), rng.next_u8()))
        .collect();
    Img::new(pixels, width, height)
}

/// Black vertical bar on white, with a gray column blending its left edge
/// when `antialiased` is set.
///
/// The bar spans columns `bar_x..bar_x + bar_width` over the full height.
pub fn vertical_bar(
    width: usize,
    height: usize,
    bar_x: usize,
    bar_width: usize,
    antialiased: bool,
) -> ImgVec<RGB8> {
    let mut img = solid(width, height, WHITE);
    for y in 0..height {
        for x in bar_x..bar_x + bar_width {
            img[(x, y)] = BLACK;
        }
        if antialiased && bar_x > 0 {
            img[(bar_x - 1, y)] = GRAY;
        }
    }
    img
}

/// Paints `color` over the rectangle `x..x + w`, `y..y + h`.
pub fn paint_rect(img: &mut ImgVec<RGB8>, x: usize, y: usize, w: usize, h: usize, color: RGB8) {
    for py in y..y + h {
        for px in x..x + w {
            img[(px, py)] = color;
        }
    }
}

/// Changes `count` random pixels that are at least two pixels apart from
/// each other, so every change is isolated noise.
pub fn sprinkle_isolated(img: &mut ImgVec<RGB8>, count: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = Lcg::new(seed);
    let mut placed: Vec<(usize, usize)> = Vec::new();
    let (width, height) = (img.width(), img.height());
    let mut attempts = 0;
    while placed.len() < count && attempts < count * 100 {
        attempts += 1;
        let p = (rng.next_below(width), rng.next_below(height));
        if placed
            .iter()
            .any(|q| p.0.abs_diff(q.0) < 2 && p.1.abs_diff(q.1) < 2)
        {
            continue;
        }
        let old = img[p];
        img[p] = RGB8::new(255 - old.r, 255 - old.g, 255 - old.b);
        placed.push(p);
    }
    placed
}
