// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DocsiftError, Result};

/// Widest closing element the morphology backend supports.
pub const MAX_CLOSING_KERNEL_WIDTH: u32 = 511;

/// How the morphological gradient is turned into a structure mask before
/// region counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientBinarization {
    /// Gaussian-weighted adaptive threshold using
    /// `gradient_adaptive_block_size` / `gradient_adaptive_offset`.
    #[default]
    AdaptiveGaussian,
    /// Single global threshold chosen by Otsu's method.
    Otsu,
}

/// Tuning knobs of the document classifier.
///
/// Every field has a default, so a partial JSON document such as
/// `{"max_dimension_bound": 800}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Images whose larger side exceeds this are downscaled before classification.
    pub max_dimension_bound: u32,
    /// Neighbourhood size of the adaptive threshold applied to the gradient (odd, >= 3).
    pub gradient_adaptive_block_size: u32,
    /// Constant subtracted from the local mean of the gradient.
    pub gradient_adaptive_offset: i32,
    /// Width of the horizontal closing element that merges text fragments.
    pub closing_kernel_width: u32,
    /// Rule used to binarize the gradient.
    pub gradient_binarization: GradientBinarization,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_dimension_bound: 1000,
            gradient_adaptive_block_size: 21,
            gradient_adaptive_offset: 12,
            closing_kernel_width: 15,
            gradient_binarization: GradientBinarization::AdaptiveGaussian,
        }
    }
}

impl DetectorConfig {
    /// Check that every knob is usable by the classifier.
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension_bound == 0 {
            return Err(DocsiftError::invalid_parameter(
                "max_dimension_bound",
                self.max_dimension_bound,
                "must be positive",
            ));
        }
        let block = self.gradient_adaptive_block_size;
        if block < 3 || block % 2 == 0 {
            return Err(DocsiftError::invalid_parameter(
                "gradient_adaptive_block_size",
                block,
                "must be odd and at least 3",
            ));
        }
        if !(1..=MAX_CLOSING_KERNEL_WIDTH).contains(&self.closing_kernel_width) {
            return Err(DocsiftError::invalid_parameter(
                "closing_kernel_width",
                self.closing_kernel_width,
                format!("must be in 1..={MAX_CLOSING_KERNEL_WIDTH}"),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            DocsiftError::Config(format!("failed to read {}: {}", path.display(), err))
        })?;
        Self::from_json_str(&text)
    }
}
