// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parameter tuples and classification results shared across crates.

use serde::{Deserialize, Serialize};

use crate::error::{DocsiftError, Result};

/// Smallest adaptive-threshold neighbourhood used for OCR preparation.
pub const MIN_OCR_BLOCK_SIZE: u32 = 41;
/// Largest adaptive-threshold neighbourhood used for OCR preparation.
pub const MAX_OCR_BLOCK_SIZE: u32 = 201;
/// Highest accepted clarity level.
pub const MAX_CLARITY_LEVEL: i32 = 16;

/// Per-call inputs of the document classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationParams {
    /// Global threshold separating white paper from everything else (0..=255).
    pub tolerance: i32,
    /// Minimum share of white pixels, in percent, for an image to be a document.
    pub white_percent: f32,
    /// The image must contain strictly more regions than this.
    pub min_regions: i64,
}

impl Default for ClassificationParams {
    fn default() -> Self {
        Self {
            tolerance: 100,
            white_percent: 40.0,
            min_regions: 82,
        }
    }
}

impl ClassificationParams {
    pub fn new(tolerance: i32, white_percent: f32, min_regions: i64) -> Self {
        Self {
            tolerance,
            white_percent,
            min_regions,
        }
    }

    /// Reject out-of-range values instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if !(0..=255).contains(&self.tolerance) {
            return Err(DocsiftError::invalid_parameter(
                "tolerance",
                self.tolerance,
                "must be in 0..=255",
            ));
        }
        if !(0.0..=100.0).contains(&self.white_percent) {
            return Err(DocsiftError::invalid_parameter(
                "white_percent",
                self.white_percent,
                "must be in 0..=100",
            ));
        }
        if self.min_regions < 0 {
            return Err(DocsiftError::invalid_parameter(
                "min_regions",
                self.min_regions,
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Per-call inputs of the OCR preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrParams {
    /// Width of the white frame painted over the edges, as a percentage of the
    /// larger image side.
    pub border_percent: i32,
    /// 0..=16; higher levels use a wider neighbourhood and a larger offset.
    pub clarity_level: i32,
}

impl Default for OcrParams {
    fn default() -> Self {
        Self {
            border_percent: 0,
            clarity_level: MAX_CLARITY_LEVEL,
        }
    }
}

impl OcrParams {
    pub fn new(border_percent: i32, clarity_level: i32) -> Self {
        Self {
            border_percent,
            clarity_level,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.border_percent) {
            return Err(DocsiftError::invalid_parameter(
                "border_percent",
                self.border_percent,
                "must be in 0..=100",
            ));
        }
        if !(0..=MAX_CLARITY_LEVEL).contains(&self.clarity_level) {
            return Err(DocsiftError::invalid_parameter(
                "clarity_level",
                self.clarity_level,
                format!("must be in 0..={MAX_CLARITY_LEVEL}"),
            ));
        }
        Ok(())
    }

    /// Adaptive-threshold neighbourhood derived from the clarity level.
    ///
    /// `41 + 10 * clarity`, clamped to `41..=201`. Every value in that
    /// progression is odd.
    pub fn block_size(&self) -> u32 {
        let raw = i64::from(MIN_OCR_BLOCK_SIZE) + i64::from(self.clarity_level) * 10;
        raw.clamp(i64::from(MIN_OCR_BLOCK_SIZE), i64::from(MAX_OCR_BLOCK_SIZE)) as u32
    }

    /// Constant subtracted from the local mean: `8 + clarity`.
    pub fn clarity_offset(&self) -> i32 {
        8 + self.clarity_level
    }
}

/// Observed signals and verdict of one classification call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Share of white pixels (after global binarization), in percent.
    pub white_pixel_percent: f64,
    /// Number of regions found; `None` when the white-pixel gate already
    /// rejected the image.
    pub region_count: Option<usize>,
    pub is_document: bool,
}
