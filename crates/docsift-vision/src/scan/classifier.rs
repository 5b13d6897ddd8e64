// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document classifier — decides whether a raster shows a page of text or a
// photograph from its white-pixel coverage and its local structure.

use std::sync::Arc;

use docsift_core::config::{DetectorConfig, GradientBinarization};
use docsift_core::error::Result;
use docsift_core::types::{ClassificationParams, ClassificationReport};
use image::{DynamicImage, GrayImage};
use tracing::{debug, info, instrument};

use crate::image::{
    adaptive_binarize_gaussian, binarize, count_foreground_pixels, extract_regions,
    morphological_close, morphological_gradient, otsu_binarize, scale_to_bound, to_grayscale,
};

/// Receives the signals behind every classification.
///
/// Closures of type `Fn(&ClassificationReport) + Send + Sync` implement this
/// trait, so a test or tuning harness can collect reports with a plain closure.
pub trait ClassificationObserver: Send + Sync {
    fn on_classified(&self, report: &ClassificationReport);
}

impl<F> ClassificationObserver for F
where
    F: Fn(&ClassificationReport) + Send + Sync,
{
    fn on_classified(&self, report: &ClassificationReport) {
        self(report)
    }
}

/// Classifies rasters as document or photograph.
///
/// Holds only immutable configuration; one instance can be shared across
/// threads.
#[derive(Clone, Default)]
pub struct DocumentClassifier {
    config: DetectorConfig,
    observer: Option<Arc<dyn ClassificationObserver>>,
}

impl std::fmt::Debug for DocumentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentClassifier")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl DocumentClassifier {
    /// Create a classifier after validating `config`.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
        })
    }

    /// Attach a diagnostics observer.
    pub fn with_observer(mut self, observer: Arc<dyn ClassificationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Return `true` if `original` looks like a document.
    ///
    /// * `tolerance` — global threshold separating paper from ink (0..=255).
    /// * `white_percent` — minimum white coverage in percent.
    /// * `min_regions` — the image must show strictly more regions than this.
    pub fn classify(
        &self,
        original: &DynamicImage,
        tolerance: i32,
        white_percent: f32,
        min_regions: i64,
    ) -> Result<bool> {
        let params = ClassificationParams::new(tolerance, white_percent, min_regions);
        Ok(self.classify_with_report(original, &params)?.is_document)
    }

    /// Classify and return the observed signals alongside the verdict.
    ///
    /// 1. Grayscale, downscaled to `max_dimension_bound`.
    /// 2. Global binarization at `tolerance`; if the white pixels do not
    ///    strictly exceed `floor(total * white_percent / 100)` the image is a
    ///    photograph and no further work is done.
    /// 3. Morphological gradient of the grayscale, binarized, closed
    ///    horizontally; the image is a document if it yields strictly more
    ///    than `min_regions` regions.
    #[instrument(skip(self, original), fields(width = original.width(), height = original.height()))]
    pub fn classify_with_report(
        &self,
        original: &DynamicImage,
        params: &ClassificationParams,
    ) -> Result<ClassificationReport> {
        params.validate()?;
        info!(
            tolerance = params.tolerance,
            white_percent = params.white_percent,
            min_regions = params.min_regions,
            "Classifying raster"
        );

        let gray = to_grayscale(original)?;
        let gray = scale_to_bound(gray, self.config.max_dimension_bound)?;

        // Validated to 0..=255 above.
        let thresholded = binarize(&gray, params.tolerance as u8)?;
        let white_pixels = count_foreground_pixels(&thresholded) as u64;
        let total_pixels = u64::from(thresholded.width()) * u64::from(thresholded.height());
        let required_white =
            (total_pixels as f64 * f64::from(params.white_percent) / 100.0).floor() as u64;
        let white_pixel_percent = white_pixels as f64 * 100.0 / total_pixels as f64;
        debug!(
            white_pixels,
            total_pixels, required_white, white_pixel_percent, "White coverage measured"
        );

        if required_white >= white_pixels {
            debug!("Not enough white pixels for a document");
            return Ok(self.report(ClassificationReport {
                white_pixel_percent,
                region_count: None,
                is_document: false,
            }));
        }

        let structure = self.structure_mask(&gray)?;
        let region_count = extract_regions(&structure)?.len();
        // Validated non-negative above.
        let is_document = region_count as u64 > params.min_regions as u64;
        debug!(region_count, is_document, "Regions counted");

        Ok(self.report(ClassificationReport {
            white_pixel_percent,
            region_count: Some(region_count),
            is_document,
        }))
    }

    /// Gradient → binarize → horizontal closing.
    fn structure_mask(&self, gray: &GrayImage) -> Result<GrayImage> {
        let gradient = morphological_gradient(gray)?;
        let binary = match self.config.gradient_binarization {
            GradientBinarization::AdaptiveGaussian => adaptive_binarize_gaussian(
                &gradient,
                self.config.gradient_adaptive_block_size,
                self.config.gradient_adaptive_offset,
            )?,
            GradientBinarization::Otsu => otsu_binarize(&gradient)?,
        };
        morphological_close(&binary, self.config.closing_kernel_width)
    }

    fn report(&self, report: ClassificationReport) -> ClassificationReport {
        info!(
            white_pixel_percent = report.white_pixel_percent,
            region_count = ?report.region_count,
            is_document = report.is_document,
            "Classification complete"
        );
        if let Some(observer) = &self.observer {
            observer.on_classified(&report);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{blank_page, grid_page, uniform_photo};
    use docsift_core::error::DocsiftError;
    use std::sync::Mutex;

    fn recording_classifier() -> (DocumentClassifier, Arc<Mutex<Vec<ClassificationReport>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let classifier = DocumentClassifier::default().with_observer(Arc::new(
            move |report: &ClassificationReport| {
                sink.lock().expect("lock").push(*report);
            },
        ));
        (classifier, reports)
    }

    #[test]
    fn blank_page_is_not_a_document() {
        let classifier = DocumentClassifier::default();
        let verdict = classifier
            .classify(&blank_page(100, 100), 128, 40.0, 5)
            .expect("classify");
        assert!(!verdict);
    }

    #[test]
    fn blank_page_passes_white_gate_but_fails_region_gate() {
        let (classifier, reports) = recording_classifier();
        classifier
            .classify(&blank_page(100, 100), 128, 40.0, 5)
            .expect("classify");
        let report = reports.lock().expect("lock")[0];
        assert!((report.white_pixel_percent - 100.0).abs() < 1e-9);
        let regions = report.region_count.expect("reached region gate");
        assert!(regions <= 5);
        assert!(!report.is_document);
    }

    #[test]
    fn grid_of_squares_is_a_document() {
        let classifier = DocumentClassifier::default();
        let verdict = classifier
            .classify(&grid_page(), 128, 40.0, 5)
            .expect("classify");
        assert!(verdict);
    }

    #[test]
    fn dark_photo_is_rejected_at_white_gate() {
        let (classifier, reports) = recording_classifier();
        let verdict = classifier
            .classify(&uniform_photo(60, 40, 50), 128, 40.0, 0)
            .expect("classify");
        assert!(!verdict);
        let report = reports.lock().expect("lock")[0];
        assert_eq!(report.region_count, None);
        assert_eq!(report.white_pixel_percent, 0.0);
    }

    #[test]
    fn white_gate_requires_strictly_more_white_than_required() {
        // 10x10 raster with exactly 40 white pixels.
        let mut rgb = image::RgbImage::new(10, 10);
        for (i, pixel) in rgb.pixels_mut().enumerate() {
            if i < 40 {
                *pixel = image::Rgb([255, 255, 255]);
            }
        }
        let image = DynamicImage::ImageRgb8(rgb);
        let (classifier, reports) = recording_classifier();

        assert!(!classifier.classify(&image, 128, 40.0, 0).expect("classify"));
        assert_eq!(reports.lock().expect("lock")[0].region_count, None);

        // Lowering the requirement by one pixel lets the image through the gate.
        classifier.classify(&image, 128, 39.0, 0).expect("classify");
        assert!(reports.lock().expect("lock")[1].region_count.is_some());
    }

    #[test]
    fn region_gate_is_strict() {
        let (classifier, reports) = recording_classifier();
        let page = grid_page();
        classifier.classify(&page, 128, 40.0, 0).expect("classify");
        let count = reports.lock().expect("lock")[0]
            .region_count
            .expect("regions counted");
        assert!(count > 0);

        let at_count = classifier
            .classify(&page, 128, 40.0, count as i64)
            .expect("classify");
        let below_count = classifier
            .classify(&page, 128, 40.0, count as i64 - 1)
            .expect("classify");
        assert!(!at_count);
        assert!(below_count);
    }

    #[test]
    fn raising_white_percent_never_turns_photo_into_document() {
        let classifier = DocumentClassifier::default();
        let page = grid_page();
        let mut previous = true;
        for percent in (0..=100).step_by(5) {
            let verdict = classifier
                .classify(&page, 128, percent as f32, 5)
                .expect("classify");
            assert!(previous || !verdict, "flipped back to document at {percent}%");
            previous = verdict;
        }
        assert!(!previous, "100% white can never be exceeded");
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = DocumentClassifier::default();
        let page = grid_page();
        let params = ClassificationParams::new(128, 40.0, 5);
        let first = classifier.classify_with_report(&page, &params).expect("first");
        let second = classifier.classify_with_report(&page, &params).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn otsu_variant_still_finds_structure() {
        let config = DetectorConfig {
            gradient_binarization: GradientBinarization::Otsu,
            ..DetectorConfig::default()
        };
        let classifier = DocumentClassifier::new(config).expect("classifier");
        let report = classifier
            .classify_with_report(&grid_page(), &ClassificationParams::new(128, 40.0, 5))
            .expect("classify");
        assert!(report.region_count.expect("counted") > 5);
    }

    #[test]
    fn large_input_is_downscaled_before_counting() {
        let config = DetectorConfig {
            max_dimension_bound: 50,
            ..DetectorConfig::default()
        };
        let classifier = DocumentClassifier::new(config).expect("classifier");
        let (w, h) = (400u32, 200u32);
        let verdict = classifier
            .classify(&blank_page(w, h), 128, 40.0, 5)
            .expect("classify");
        assert!(!verdict);
    }

    #[test]
    fn invalid_parameters_are_errors_not_photos() {
        let classifier = DocumentClassifier::default();
        let page = grid_page();
        assert!(matches!(
            classifier.classify(&page, 300, 40.0, 5),
            Err(DocsiftError::InvalidParameter { name: "tolerance", .. })
        ));
        assert!(matches!(
            classifier.classify(&page, 128, 40.0, -1),
            Err(DocsiftError::InvalidParameter { name: "min_regions", .. })
        ));
        assert!(matches!(
            classifier.classify(&page, 128, 140.0, 5),
            Err(DocsiftError::InvalidParameter { name: "white_percent", .. })
        ));
    }

    #[test]
    fn grayscale_or_empty_input_is_invalid() {
        let classifier = DocumentClassifier::default();
        let luma = DynamicImage::new_luma8(10, 10);
        assert!(matches!(
            classifier.classify(&luma, 128, 40.0, 5),
            Err(DocsiftError::InvalidInput(_))
        ));
        let empty = DynamicImage::new_rgb8(0, 0);
        assert!(matches!(
            classifier.classify(&empty, 128, 40.0, 5),
            Err(DocsiftError::InvalidInput(_))
        ));
    }

    #[test]
    fn saturated_red_is_measured_with_bt601_luma() {
        // Pure red has luma 76: white at tolerance 70, black at 80.
        let red = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            40,
            40,
            image::Rgb([255, 0, 0]),
        ));
        let classifier = DocumentClassifier::default();
        let passed = classifier
            .classify_with_report(&red, &ClassificationParams::new(70, 40.0, 5))
            .expect("classify");
        assert_eq!(passed.white_pixel_percent, 100.0);
        assert!(passed.region_count.is_some());

        let rejected = classifier
            .classify_with_report(&red, &ClassificationParams::new(80, 40.0, 5))
            .expect("classify");
        assert_eq!(rejected.white_pixel_percent, 0.0);
        assert_eq!(rejected.region_count, None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DetectorConfig {
            gradient_adaptive_block_size: 4,
            ..DetectorConfig::default()
        };
        assert!(DocumentClassifier::new(config).is_err());
    }
}
