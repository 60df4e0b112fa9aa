// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textwerk-document — Document processing for the Textwerk extraction worker.
//
// Provides PDF operations (embedded text extraction, page rasterization),
// image decoding (common raster formats plus HEIC/HEIF), an OCR
// preprocessing pipeline, and the OCR engine seam with its
// best-of-configurations runner.

pub mod image;
pub mod ocr;
pub mod pdf;

// Re-export the primary types so callers can use `textwerk_document::PdfTextReader` etc.
pub use image::decode::decode_image;
pub use image::preprocess::OcrPreprocessor;
pub use ocr::engine::{PageSegmentation, TesseractRecognizer, TextRecognizer};
pub use ocr::runner::recognize_best;
pub use pdf::reader::PdfTextReader;
pub use pdf::render::PageRasterizer;
