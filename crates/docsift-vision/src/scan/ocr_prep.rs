// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preparation — adaptive binarization at full resolution, edge framing
// and a small erode/dilate denoise pass.

use docsift_core::error::Result;
use docsift_core::types::OcrParams;
use image::{DynamicImage, GrayImage};
use tracing::{debug, info, instrument};

use crate::image::{
    FOREGROUND, adaptive_binarize_mean, border_frame_width, denoise, draw_border_frame,
    to_grayscale,
};

/// Turns a document photo into a clean black-on-white binary raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcrPreprocessor;

impl OcrPreprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Binarize `original` for OCR.
    ///
    /// `border_percent` is the width of the white frame painted over the
    /// edges, relative to the larger side; `clarity_level` (0..=16) widens the
    /// adaptive neighbourhood and raises its offset.
    pub fn prepare_for_ocr(
        &self,
        original: &DynamicImage,
        border_percent: i32,
        clarity_level: i32,
    ) -> Result<GrayImage> {
        self.prepare(original, &OcrParams::new(border_percent, clarity_level))
    }

    /// Same as [`prepare_for_ocr`](Self::prepare_for_ocr) with a parameter tuple.
    #[instrument(skip(self, original), fields(width = original.width(), height = original.height()))]
    pub fn prepare(&self, original: &DynamicImage, params: &OcrParams) -> Result<GrayImage> {
        params.validate()?;
        let block_size = params.block_size();
        let clarity_offset = params.clarity_offset();
        info!(
            border_percent = params.border_percent,
            clarity_level = params.clarity_level,
            block_size,
            clarity_offset,
            "Preparing document for OCR"
        );

        let gray = to_grayscale(original)?;
        let binary = adaptive_binarize_mean(&gray, block_size, clarity_offset)?;

        let (width, height) = binary.dimensions();
        let frame = border_frame_width(width, height, params.border_percent)?;
        let framed = draw_border_frame(&binary, frame, FOREGROUND)?;
        debug!(frame, "Edge frame applied");

        let cleaned = denoise(&framed)?;

        debug!("OCR preparation complete");
        Ok(cleaned)
    }
}
