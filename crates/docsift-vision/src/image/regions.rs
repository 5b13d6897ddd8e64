// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Connected-region extraction and border-frame overlay for binary rasters.

use docsift_core::error::{DocsiftError, Result};
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use super::raster::validate_dimensions;

/// Which side of a connected component a border traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionBorder {
    /// Outer boundary of a foreground component.
    Outer,
    /// Boundary of a background hole inside a component.
    Hole,
}

/// One border in the two-level outer/hole hierarchy of a binary raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub border: RegionBorder,
    /// Index of the enclosing border, if any.
    pub parent: Option<usize>,
}

/// Trace every outer and hole border of the foreground (non-zero) components.
pub fn extract_regions(binary: &GrayImage) -> Result<Vec<Region>> {
    validate_dimensions(binary.width(), binary.height())?;
    let regions: Vec<Region> = find_contours::<i32>(binary)
        .into_iter()
        .map(|contour| Region {
            border: match contour.border_type {
                BorderType::Outer => RegionBorder::Outer,
                BorderType::Hole => RegionBorder::Hole,
            },
            parent: contour.parent,
        })
        .collect();
    debug!(regions = regions.len(), "Regions extracted");
    Ok(regions)
}

/// Frame width in pixels for `border_percent` of the larger side, rounded down.
pub fn border_frame_width(width: u32, height: u32, border_percent: i32) -> Result<u32> {
    if !(0..=100).contains(&border_percent) {
        return Err(DocsiftError::invalid_parameter(
            "border_percent",
            border_percent,
            "must be in 0..=100",
        ));
    }
    let larger = u64::from(width.max(height));
    Ok((larger * border_percent as u64 / 100) as u32)
}

/// Overwrite a `width_px`-wide frame along all four edges with `color`.
///
/// This is a plain overwrite: whatever was near the edges is replaced.
pub fn draw_border_frame(binary: &GrayImage, width_px: u32, color: u8) -> Result<GrayImage> {
    let (w, h) = binary.dimensions();
    validate_dimensions(w, h)?;
    let mut framed = binary.clone();
    if width_px == 0 {
        return Ok(framed);
    }

    let fill = Luma([color]);
    let horizontal = width_px.min(h);
    let vertical = width_px.min(w);

    // Top and bottom strips span the full width; left and right the full height.
    draw_filled_rect_mut(&mut framed, Rect::at(0, 0).of_size(w, horizontal), fill);
    draw_filled_rect_mut(
        &mut framed,
        Rect::at(0, (h - horizontal) as i32).of_size(w, horizontal),
        fill,
    );
    draw_filled_rect_mut(&mut framed, Rect::at(0, 0).of_size(vertical, h), fill);
    draw_filled_rect_mut(
        &mut framed,
        Rect::at((w - vertical) as i32, 0).of_size(vertical, h),
        fill,
    );

    debug!(width_px, "Border frame drawn");
    Ok(framed)
}
