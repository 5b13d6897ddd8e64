// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline facade — classify, then prepare documents for OCR or pass photos
// through.

use std::sync::Arc;

use docsift_core::config::DetectorConfig;
use docsift_core::error::Result;
use docsift_core::types::{ClassificationParams, OcrParams};
use image::{DynamicImage, GrayImage};
use tracing::{info, instrument};

use crate::scan::classifier::{ClassificationObserver, DocumentClassifier};
use crate::scan::ocr_prep::OcrPreprocessor;

/// Result of running an image through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedImage {
    /// Classified as a document: binary raster ready for OCR.
    Document(GrayImage),
    /// Classified as a photograph: the input, unchanged.
    Photo(DynamicImage),
}

impl ProcessedImage {
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }

    /// Unwrap into a `DynamicImage` for display or encoding.
    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Document(binary) => DynamicImage::ImageLuma8(binary),
            Self::Photo(image) => image,
        }
    }
}

/// Routes an image through the classifier and, for documents, the OCR
/// preprocessor.
#[derive(Debug, Clone, Default)]
pub struct DocumentPipeline {
    classifier: DocumentClassifier,
    preprocessor: OcrPreprocessor,
}

impl DocumentPipeline {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        Ok(Self {
            classifier: DocumentClassifier::new(config)?,
            preprocessor: OcrPreprocessor::new(),
        })
    }

    /// Attach a diagnostics observer to the classifier.
    pub fn with_observer(mut self, observer: Arc<dyn ClassificationObserver>) -> Self {
        self.classifier = self.classifier.with_observer(observer);
        self
    }

    /// Classify `original`; binarize it for OCR if it is a document, return it
    /// untouched otherwise.
    ///
    /// Both parameter tuples are validated before any work, so a bad OCR
    /// parameter fails even for photographs.
    #[instrument(skip_all, fields(width = original.width(), height = original.height()))]
    pub fn process(
        &self,
        original: DynamicImage,
        classification: &ClassificationParams,
        ocr: &OcrParams,
    ) -> Result<ProcessedImage> {
        classification.validate()?;
        ocr.validate()?;

        let report = self.classifier.classify_with_report(&original, classification)?;
        if report.is_document {
            info!("Document detected; preparing for OCR");
            let prepared = self.preprocessor.prepare(&original, ocr)?;
            Ok(ProcessedImage::Document(prepared))
        } else {
            info!("Photo detected; passing through");
            Ok(ProcessedImage::Photo(smooth_photo(original)))
        }
    }

    /// Classify with the given thresholds and prepare documents with the
    /// default [`OcrParams`].
    pub fn detect_and_prepare(
        &self,
        original: DynamicImage,
        tolerance: i32,
        white_percent: f32,
        min_regions: i64,
    ) -> Result<ProcessedImage> {
        self.process(
            original,
            &ClassificationParams::new(tolerance, white_percent, min_regions),
            &OcrParams::default(),
        )
    }
}

/// Photo smoothing stage. Identity.
fn smooth_photo(image: DynamicImage) -> DynamicImage {
    image
}
