// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docsift-vision — Image analysis for docsift.
//
// Provides the raster utilities (grayscale, downscaling, global and adaptive
// binarization, morphology, region extraction, border framing), the document
// classifier, the OCR preprocessor, and the pipeline that routes an image
// through them.

pub mod image;
pub mod pipeline;
pub mod scan;

// Re-export the primary structs so callers can use `docsift_vision::DocumentPipeline` etc.
pub use pipeline::{DocumentPipeline, ProcessedImage};
pub use scan::classifier::{ClassificationObserver, DocumentClassifier};
pub use scan::ocr_prep::OcrPreprocessor;
