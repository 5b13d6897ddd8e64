// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — loading and saving, grayscale conversion, downscaling,
// global and adaptive binarization, morphology, region extraction and border
// framing.

pub mod morphology;
pub mod raster;
pub mod regions;
pub mod threshold;

pub use morphology::{
    MAX_MASK_SIDE, cross_mask, denoise, morphological_close, morphological_gradient, rect_mask,
};
pub use raster::{
    BACKGROUND, FOREGROUND, binarize, count_foreground_pixels, open_image, require_color,
    save_image, scale_to_bound, to_grayscale, validate_dimensions,
};
pub use regions::{Region, RegionBorder, border_frame_width, draw_border_frame, extract_regions};
pub use threshold::{adaptive_binarize_gaussian, adaptive_binarize_mean, otsu_binarize};
