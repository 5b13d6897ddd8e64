// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale morphology — structuring masks, gradient, horizontal closing and
// the small denoise pass applied to OCR output.

use docsift_core::error::{DocsiftError, Result};
use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_close, grayscale_dilate, grayscale_erode};
use tracing::debug;

use super::raster::{BACKGROUND, FOREGROUND, validate_dimensions};

/// Largest side `imageproc` accepts for a mask image.
pub const MAX_MASK_SIDE: u32 = 511;

fn validate_mask_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_MASK_SIDE || height > MAX_MASK_SIDE {
        return Err(DocsiftError::invalid_parameter(
            "structuring_element",
            format!("{width}x{height}"),
            format!("sides must be in 1..={MAX_MASK_SIDE}"),
        ));
    }
    Ok(())
}

/// Mask from a `width` x `height` occupancy test, anchored at its center
/// `(width / 2, height / 2)`.
fn centered_mask(width: u32, height: u32, set: impl Fn(u32, u32) -> bool) -> Result<Mask> {
    validate_mask_size(width, height)?;
    let cells = GrayImage::from_fn(width, height, |x, y| {
        Luma([if set(x, y) { FOREGROUND } else { BACKGROUND }])
    });
    // Both halves fit in a u8 once the side is capped at 511.
    Ok(Mask::from_image(&cells, (width / 2) as u8, (height / 2) as u8))
}

/// Every cell set.
pub fn rect_mask(width: u32, height: u32) -> Result<Mask> {
    centered_mask(width, height, |_, _| true)
}

/// The anchor row and anchor column set.
///
/// For a 2x2 mask the anchor is `(1, 1)`, so the top-left cell is left out.
pub fn cross_mask(width: u32, height: u32) -> Result<Mask> {
    let (ax, ay) = (width / 2, height / 2);
    centered_mask(width, height, |x, y| x == ax || y == ay)
}

/// Dilation minus erosion with the 3x3 ellipse, which is the plus-shaped
/// diamond of radius 1. Bright where strokes and edges are.
pub fn morphological_gradient(gray: &GrayImage) -> Result<GrayImage> {
    validate_dimensions(gray.width(), gray.height())?;
    let mask = Mask::diamond(1);
    let mut gradient = grayscale_dilate(gray, &mask);
    let eroded = grayscale_erode(gray, &mask);
    for (g, e) in gradient.iter_mut().zip(eroded.iter()) {
        *g = g.saturating_sub(*e);
    }
    debug!("Morphological gradient computed");
    Ok(gradient)
}

/// Closing with a `kernel_width` x 1 rectangle.
///
/// Bridges horizontal gaps narrower than the element between foreground
/// fragments on the same line, leaving vertical gaps open, so a line of text
/// collapses into one blob.
pub fn morphological_close(binary: &GrayImage, kernel_width: u32) -> Result<GrayImage> {
    validate_dimensions(binary.width(), binary.height())?;
    let mask = rect_mask(kernel_width, 1)?;
    Ok(grayscale_close(binary, &mask))
}

/// Erode then dilate with the 2x2 cross.
pub fn denoise(binary: &GrayImage) -> Result<GrayImage> {
    validate_dimensions(binary.width(), binary.height())?;
    let mask = cross_mask(2, 2)?;
    let eroded = grayscale_erode(binary, &mask);
    Ok(grayscale_dilate(&eroded, &mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_2x2_drops_top_left_cell() {
        let cells = GrayImage::from_raw(2, 2, vec![0, 255, 255, 255]).expect("cells");
        assert_eq!(cross_mask(2, 2).expect("mask"), Mask::from_image(&cells, 1, 1));
    }

    #[test]
    fn cross_3x3_is_the_diamond() {
        assert_eq!(cross_mask(3, 3).expect("mask"), Mask::diamond(1));
    }

    #[test]
    fn rect_anchor_is_centered() {
        // A single bright pixel spreads 7px either way under a 15x1 dilation.
        let mut dot = GrayImage::new(31, 3);
        dot.put_pixel(15, 1, Luma([255]));
        let dilated = grayscale_dilate(&dot, &rect_mask(15, 1).expect("mask"));
        let row: Vec<u32> = (0..31).filter(|&x| dilated.get_pixel(x, 1).0[0] == 255).collect();
        assert_eq!(row, (8..=22).collect::<Vec<_>>());
        assert_eq!(dilated.get_pixel(15, 0).0[0], 0);
    }

    #[test]
    fn oversized_or_empty_masks_are_rejected() {
        assert!(rect_mask(0, 1).is_err());
        assert!(matches!(
            rect_mask(MAX_MASK_SIDE + 1, 1),
            Err(DocsiftError::InvalidParameter { name: "structuring_element", .. })
        ));
        assert!(rect_mask(MAX_MASK_SIDE, 1).is_ok());
    }

    #[test]
    fn gradient_of_flat_image_is_zero() {
        let flat = GrayImage::from_pixel(10, 10, Luma([200]));
        let gradient = morphological_gradient(&flat).expect("gradient");
        assert!(gradient.iter().all(|&v| v == 0));
    }

    #[test]
    fn gradient_marks_both_sides_of_an_edge() {
        let step = GrayImage::from_fn(6, 3, |x, _| Luma([if x < 3 { 0 } else { 255 }]));
        let gradient = morphological_gradient(&step).expect("gradient");
        let row: Vec<u8> = (0..6).map(|x| gradient.get_pixel(x, 1).0[0]).collect();
        assert_eq!(row, vec![0, 0, 255, 255, 0, 0]);
    }

    #[test]
    fn gradient_ignores_diagonal_neighbours() {
        // Under a plus-shaped element a lone pixel only reaches its four
        // direct neighbours.
        let mut dot = GrayImage::new(5, 5);
        dot.put_pixel(2, 2, Luma([255]));
        let gradient = morphological_gradient(&dot).expect("gradient");
        assert_eq!(gradient.get_pixel(2, 1).0[0], 255);
        assert_eq!(gradient.get_pixel(1, 2).0[0], 255);
        assert_eq!(gradient.get_pixel(1, 1).0[0], 0);
        assert_eq!(gradient.get_pixel(3, 3).0[0], 0);
    }

    #[test]
    fn closing_bridges_short_horizontal_gaps_only() {
        // Two 3px fragments separated by a 5px gap on row 1, and a vertical
        // 5px gap in column 15.
        let mut binary = GrayImage::new(20, 12);
        for x in (0..3).chain(8..11) {
            binary.put_pixel(x, 1, Luma([255]));
        }
        binary.put_pixel(15, 3, Luma([255]));
        binary.put_pixel(15, 9, Luma([255]));

        let closed = morphological_close(&binary, 15).expect("close");
        for x in 0..11 {
            assert_eq!(closed.get_pixel(x, 1).0[0], 255, "row gap at x={x}");
        }
        for y in 4..9 {
            assert_eq!(closed.get_pixel(15, y).0[0], 0, "column gap at y={y}");
        }
    }

    #[test]
    fn closing_keeps_all_white_image_white() {
        let white = GrayImage::from_pixel(30, 4, Luma([255]));
        let closed = morphological_close(&white, 15).expect("close");
        assert_eq!(closed, white);
    }

    #[test]
    fn denoise_removes_isolated_dark_pixel() {
        // A dark pixel is spread by the erosion toward the lower right, then
        // the dilation pulls the white back over it.
        let mut binary = GrayImage::from_pixel(6, 6, Luma([255]));
        binary.put_pixel(2, 2, Luma([0]));
        let eroded = grayscale_erode(&binary, &cross_mask(2, 2).expect("mask"));
        assert_eq!(eroded.get_pixel(3, 2).0[0], 0);
        assert_eq!(eroded.get_pixel(2, 3).0[0], 0);
        assert_eq!(eroded.get_pixel(3, 3).0[0], 255);

        let cleaned = denoise(&binary).expect("denoise");
        assert!(cleaned.iter().all(|&v| v == 255));
    }

    #[test]
    fn denoise_keeps_thick_strokes() {
        let mut binary = GrayImage::from_pixel(12, 12, Luma([255]));
        for y in 3..9 {
            for x in 3..9 {
                binary.put_pixel(x, y, Luma([0]));
            }
        }
        let cleaned = denoise(&binary).expect("denoise");
        assert_eq!(cleaned.get_pixel(5, 5).0[0], 0);
        assert_eq!(cleaned.get_pixel(0, 0).0[0], 255);
    }
}
