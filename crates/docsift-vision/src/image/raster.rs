// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster basics — loading and saving, validation, fallible allocation,
// grayscale conversion, proportional downscaling, global binarization and
// pixel counting.

use std::path::Path;

use docsift_core::error::{DocsiftError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageError};
use tracing::{debug, info, instrument};

/// Sample value of a foreground (white) pixel in a binary raster.
pub const FOREGROUND: u8 = 255;
/// Sample value of a background (black) pixel in a binary raster.
pub const BACKGROUND: u8 = 0;

/// Fixed-point BT.601 luma weights for R, G and B, scaled by `1 << LUMA_SHIFT`.
const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];
const LUMA_SHIFT: u32 = 14;

/// I/O failures keep their `io::Error`; decoding and encoding failures become
/// `ImageError`.
fn image_error(action: &str, path: &Path, err: ImageError) -> DocsiftError {
    match err {
        ImageError::IoError(io) => DocsiftError::Io(io),
        other => DocsiftError::ImageError(format!(
            "failed to {action} {}: {other}",
            path.display()
        )),
    }
}

/// Decode an image file; the format is guessed from its contents and extension.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| image_error("open", path, err))?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img)
}

/// Write an image to a file. The format is inferred from the file extension.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .map_err(|err| image_error("save image to", path, err))
}

/// Reject rasters with a zero dimension.
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(DocsiftError::InvalidInput(format!(
            "raster must have positive dimensions, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Reject anything that is not a 3- or 4-channel color raster.
pub fn require_color(image: &DynamicImage) -> Result<()> {
    validate_dimensions(image.width(), image.height())?;
    let channels = image.color().channel_count();
    if channels < 3 {
        return Err(DocsiftError::InvalidInput(format!(
            "expected a color raster, got {channels} channel(s) ({:?})",
            image.color()
        )));
    }
    Ok(())
}

/// Allocate a `width` x `height` single-channel raster filled with `fill`.
///
/// Allocation failure is reported as `ResourceExhausted` instead of aborting.
pub(crate) fn allocate_gray(width: u32, height: u32, fill: u8) -> Result<GrayImage> {
    validate_dimensions(width, height)?;
    let len = pixel_count(width, height)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|err| {
        DocsiftError::ResourceExhausted(format!(
            "cannot allocate {width}x{height} raster: {err}"
        ))
    })?;
    data.resize(len, fill);
    GrayImage::from_raw(width, height, data).ok_or_else(|| {
        DocsiftError::ResourceExhausted(format!("buffer too small for {width}x{height} raster"))
    })
}

/// Allocate a zeroed scratch buffer of `len` elements.
pub(crate) fn allocate_scratch<T: Copy + Default>(len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|err| {
        DocsiftError::ResourceExhausted(format!("cannot allocate scratch buffer of {len}: {err}"))
    })?;
    data.resize(len, T::default());
    Ok(data)
}

/// `width * height` as `usize`, failing on overflow.
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize).checked_mul(height as usize).ok_or_else(|| {
        DocsiftError::ResourceExhausted(format!("{width}x{height} raster overflows usize"))
    })
}

/// Convert a color raster to single-channel luminance with the BT.601 weights
/// `0.299 R + 0.587 G + 0.114 B`, rounded to nearest. Alpha is ignored.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn to_grayscale(image: &DynamicImage) -> Result<GrayImage> {
    require_color(image)?;
    let (width, height) = (image.width(), image.height());
    let mut gray = allocate_gray(width, height, BACKGROUND)?;
    let rgb = image.to_rgb8();
    for (out, px) in gray.iter_mut().zip(rgb.pixels()) {
        *out = luma(px.0);
    }
    Ok(gray)
}

fn luma([r, g, b]: [u8; 3]) -> u8 {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    let weighted = u32::from(r) * wr + u32::from(g) * wg + u32::from(b) * wb;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Downscale `gray` so that its larger side equals `max_dimension`.
///
/// Scaling is uniform (aspect ratio preserved) with linear interpolation. A
/// raster already within the bound is returned untouched.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn scale_to_bound(gray: GrayImage, max_dimension: u32) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    validate_dimensions(width, height)?;
    if max_dimension == 0 {
        return Err(DocsiftError::invalid_parameter(
            "max_dimension",
            max_dimension,
            "must be positive",
        ));
    }

    let larger = width.max(height);
    if larger <= max_dimension {
        return Ok(gray);
    }

    let scale = f64::from(max_dimension) / f64::from(larger);
    let scaled_side = |side: u32| -> u32 {
        if side == larger {
            max_dimension
        } else {
            ((f64::from(side) * scale).round() as u32).max(1)
        }
    };
    let (new_w, new_h) = (scaled_side(width), scaled_side(height));
    pixel_count(new_w, new_h)?;

    debug!(scale, new_w, new_h, "Downscaling raster");
    Ok(imageops::resize(&gray, new_w, new_h, FilterType::Triangle))
}

/// Global binarization: samples `>= threshold` become 255, the rest 0.
pub fn binarize(gray: &GrayImage, threshold: u8) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    let mut output = allocate_gray(width, height, BACKGROUND)?;
    for (out, src) in output.iter_mut().zip(gray.iter()) {
        if *src >= threshold {
            *out = FOREGROUND;
        }
    }
    Ok(output)
}

/// Number of non-zero samples.
pub fn count_foreground_pixels(binary: &GrayImage) -> usize {
    binary.iter().filter(|&&v| v != BACKGROUND).count()
}
