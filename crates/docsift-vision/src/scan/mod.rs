// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — document-vs-photo classification and binarization of
// documents for optical character recognition (OCR).

pub mod classifier;
pub mod ocr_prep;

pub use classifier::{ClassificationObserver, DocumentClassifier};
pub use ocr_prep::OcrPreprocessor;
