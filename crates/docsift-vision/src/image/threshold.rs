// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Locally adaptive binarization (box mean and Gaussian-weighted mean) and
// Otsu's global threshold.

use docsift_core::error::{DocsiftError, Result};
use image::{GrayImage, ImageBuffer, Luma, Primitive};
use imageproc::contrast::otsu_level;
use imageproc::filter::separable_filter_equal;
use tracing::{debug, instrument};

use super::raster::{
    BACKGROUND, FOREGROUND, allocate_gray, allocate_scratch, pixel_count, validate_dimensions,
};

/// Reject even or too-small neighbourhoods.
fn validate_block_size(block_size: u32) -> Result<()> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(DocsiftError::invalid_parameter(
            "block_size",
            block_size,
            "must be odd and at least 3",
        ));
    }
    Ok(())
}

/// Compare every sample against `local_mean - offset`.
///
/// A sample strictly above its threshold becomes foreground.
fn threshold_against(gray: &GrayImage, local_mean: &GrayImage, offset: i32) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    let mut output = allocate_gray(width, height, BACKGROUND)?;
    for ((out, &src), &mean) in output.iter_mut().zip(gray.iter()).zip(local_mean.iter()) {
        if i32::from(src) > i32::from(mean) - offset {
            *out = FOREGROUND;
        }
    }
    Ok(output)
}

/// Adaptive binarization against the unweighted mean of a
/// `block_size` x `block_size` neighbourhood.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_binarize_mean(gray: &GrayImage, block_size: u32, offset: i32) -> Result<GrayImage> {
    validate_block_size(block_size)?;
    let local_mean = box_mean(gray, block_size)?;
    debug!("Box mean computed");
    threshold_against(gray, &local_mean, offset)
}

/// Adaptive binarization against a Gaussian-weighted neighbourhood mean.
///
/// The kernel spans `block_size` samples per axis with
/// `sigma = 0.3 * ((block_size - 1) / 2 - 1) + 0.8`.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_binarize_gaussian(
    gray: &GrayImage,
    block_size: u32,
    offset: i32,
) -> Result<GrayImage> {
    validate_block_size(block_size)?;
    let local_mean = gaussian_mean(gray, block_size)?;
    debug!("Gaussian mean computed");
    threshold_against(gray, &local_mean, offset)
}

// -- Local means --------------------------------------------------------------
//
// Both means replicate the edge samples past the image border.

/// Copy `gray` into a wider sample type for accumulation.
fn widen<T>(gray: &GrayImage) -> Result<ImageBuffer<Luma<T>, Vec<T>>>
where
    T: Primitive + Default + From<u8>,
{
    let (w, h) = gray.dimensions();
    let mut data = allocate_scratch::<T>(pixel_count(w, h)?)?;
    for (dst, &src) in data.iter_mut().zip(gray.iter()) {
        *dst = <T as From<u8>>::from(src);
    }
    ImageBuffer::from_raw(w, h, data).ok_or_else(|| {
        DocsiftError::ResourceExhausted(format!("buffer too small for {w}x{h} raster"))
    })
}

/// Mean of the `block_size` x `block_size` square around every pixel, rounded
/// to the nearest integer.
fn box_mean(gray: &GrayImage, block_size: u32) -> Result<GrayImage> {
    let (w, h) = gray.dimensions();
    validate_dimensions(w, h)?;
    let ones = vec![1u32; block_size as usize];
    let sums = separable_filter_equal(&widen::<u32>(gray)?, &ones);

    let area = block_size * block_size;
    let mut output = allocate_gray(w, h, 0)?;
    for (out, &sum) in output.iter_mut().zip(sums.iter()) {
        *out = ((sum + area / 2) / area) as u8;
    }
    Ok(output)
}

/// Normalized 1-D Gaussian kernel of odd length `size`.
fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f32;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (scale * d * d).exp()
        })
        .collect();
    let total: f32 = raw.iter().sum();
    raw.into_iter().map(|v| v / total).collect()
}

/// Separable Gaussian-weighted mean, rounded to the nearest integer.
fn gaussian_mean(gray: &GrayImage, block_size: u32) -> Result<GrayImage> {
    let (w, h) = gray.dimensions();
    validate_dimensions(w, h)?;
    let kernel = gaussian_kernel(block_size);
    let weighted = separable_filter_equal(&widen::<f32>(gray)?, &kernel);

    let mut output = allocate_gray(w, h, 0)?;
    for (out, &value) in output.iter_mut().zip(weighted.iter()) {
        *out = value.round().clamp(0.0, 255.0) as u8;
    }
    Ok(output)
}

// -- Global threshold ---------------------------------------------------------

/// Binarize with Otsu's threshold: samples strictly above it become foreground.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn otsu_binarize(gray: &GrayImage) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    validate_dimensions(width, height)?;
    let threshold = otsu_level(gray);
    debug!(threshold, "Otsu threshold computed");

    let mut output = allocate_gray(width, height, BACKGROUND)?;
    for (out, &src) in output.iter_mut().zip(gray.iter()) {
        if src > threshold {
            *out = FOREGROUND;
        }
    }
    Ok(output)
}
