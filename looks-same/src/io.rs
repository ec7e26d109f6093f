//! Loading images from and saving diffs to files.
//!
//! Decoding and encoding go through the `image` crate. Any format it was
//! built with can be read; diffs are always written as RGBA PNG.

use std::path::{Path, PathBuf};

use ::image::{ColorType, ImageFormat};
use imgref::{Img, ImgVec};
use log::debug;
use rgb::RGB8;

use crate::error::{LooksSameError, Result};
use crate::image::DiffImage;
use crate::options::DiffOptions;
use crate::DiffOutcome;

/// Decodes one image file into an RGB raster. Alpha is discarded.
///
/// # Errors
/// Returns [`LooksSameError::Load`] with `path` if the file cannot be read
/// or decoded.
pub fn load_image(path: impl AsRef<Path>) -> Result<ImgVec<RGB8>> {
    let path = path.as_ref();
    let decoded = ::image::open(path).map_err(|source| LooksSameError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            RGB8::new(r, g, b)
        })
        .collect();
    debug!("loaded {} ({width}x{height})", path.display());
    Ok(Img::new(pixels, width as usize, height as usize))
}

/// Decodes a reference/current pair.
///
/// # Errors
/// Returns [`LooksSameError::Load`] naming whichever file failed first.
pub fn load_pair(
    reference: impl AsRef<Path>,
    current: impl AsRef<Path>,
) -> Result<(ImgVec<RGB8>, ImgVec<RGB8>)> {
    let reference = load_image(reference)?;
    let current = load_image(current)?;
    Ok((reference, current))
}

/// Writes a diff image as PNG.
///
/// The image is encoded into a sibling temporary file that is renamed over
/// `path`, so a failed save never leaves a truncated file behind.
///
/// # Errors
/// Returns [`LooksSameError::Save`] if encoding or writing fails.
pub fn save_diff(diff: &DiffImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let save_error = |source| LooksSameError::Save {
        path: path.to_path_buf(),
        source,
    };
    let bytes: Vec<u8> = diff
        .data()
        .iter()
        .flat_map(|p| [p.r, p.g, p.b, p.a])
        .collect();

    let temp = temp_sibling(path);
    let written = ::image::save_buffer_with_format(
        &temp,
        &bytes,
        diff.width() as u32,
        diff.height() as u32,
        ColorType::Rgba8,
        ImageFormat::Png,
    )
    .and_then(|()| std::fs::rename(&temp, path).map_err(::image::ImageError::IoError));
    if let Err(source) = written {
        let _ = std::fs::remove_file(&temp);
        return Err(save_error(source));
    }
    debug!("saved diff to {}", path.display());
    Ok(())
}

/// Hidden file next to `path`, unique per process.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "diff".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Loads both images, builds the diff and writes it to `diff_path` only if
/// the images differ.
///
/// # Errors
/// Returns a configuration error for invalid options, or a load or save
/// error tagged with the failing path.
pub fn create_diff_file(
    reference: impl AsRef<Path>,
    current: impl AsRef<Path>,
    diff_path: impl AsRef<Path>,
    options: &DiffOptions<'_>,
) -> Result<DiffOutcome> {
    options.compare().validate()?;
    let (reference, current) = load_pair(reference, current)?;
    let outcome = crate::create_diff(&reference, &current, options)?;
    if !outcome.equal {
        save_diff(&outcome.image, diff_path)?;
    }
    Ok(outcome)
}
