// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engine seam — the `TextRecognizer` trait and its Tesseract
// implementation via the `leptess` crate.
//
// Tesseract is initialised once per invocation with the fixed English
// model and its default recognition mode (the combined legacy + LSTM
// engine); only the page-segmentation mode varies between recognition
// attempts, driven by the runner.

use std::io::Cursor;

use image::{GrayImage, ImageFormat};
use leptess::{LepTess, Variable};
use textwerk_core::error::{Result, TextwerkError};
use tracing::{debug, info, instrument};

/// Recognition language. Single fixed language; multi-language OCR is out
/// of scope.
pub const OCR_LANGUAGE: &str = "eng";

/// Resolution declared to the engine for in-memory bitmaps, matching the
/// resolution PDF pages are rasterized at.
pub const OCR_SOURCE_DPI: i32 = 300;

/// Page-segmentation hypotheses tried for every bitmap, in order.
pub const SEGMENTATION_CANDIDATES: [PageSegmentation; 2] =
    [PageSegmentation::UniformBlock, PageSegmentation::SparseText];

/// Assumed text layout handed to the OCR engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegmentation {
    /// A single uniform block of text (Tesseract PSM 6).
    UniformBlock,
    /// Sparse text with no particular layout (Tesseract PSM 11).
    SparseText,
}

impl PageSegmentation {
    /// The value of Tesseract's `tessedit_pageseg_mode` variable.
    pub fn tesseract_value(self) -> &'static str {
        match self {
            Self::UniformBlock => "6",
            Self::SparseText => "11",
        }
    }
}

/// Anything that can turn a preprocessed bitmap into text under a given
/// segmentation hypothesis.
///
/// The runner is generic over this trait so the selection logic can be
/// unit-tested with a fake recognizer.
pub trait TextRecognizer {
    /// Recognize text in `image`. An empty result is a valid outcome (a
    /// blank page), not an error.
    fn recognize(&mut self, image: &GrayImage, segmentation: PageSegmentation) -> Result<String>;
}

/// Tesseract-backed recognizer.
pub struct TesseractRecognizer {
    /// The underlying leptess handle, reused across pages.
    engine: LepTess,
}

impl TesseractRecognizer {
    /// Initialise Tesseract with the English model from the default data
    /// path. Model loading is the expensive step; keep the recognizer
    /// around and call [`recognize`](TextRecognizer::recognize) per page.
    pub fn new() -> Result<Self> {
        let engine = LepTess::new(None, OCR_LANGUAGE).map_err(|err| {
            TextwerkError::OcrError(format!(
                "failed to initialise Tesseract for language {}: {}",
                OCR_LANGUAGE, err
            ))
        })?;

        info!(language = OCR_LANGUAGE, "OCR engine initialised");
        Ok(Self { engine })
    }
}

impl TextRecognizer for TesseractRecognizer {
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), ?segmentation))]
    fn recognize(&mut self, image: &GrayImage, segmentation: PageSegmentation) -> Result<String> {
        self.engine
            .set_variable(Variable::TesseditPagesegMode, segmentation.tesseract_value())
            .map_err(|err| {
                TextwerkError::OcrError(format!("failed to set page segmentation mode: {}", err))
            })?;

        // leptess takes image data in an encoded container format.
        let png = encode_png(image)?;
        self.engine.set_image_from_mem(&png).map_err(|err| {
            TextwerkError::OcrError(format!("failed to load bitmap into Tesseract: {}", err))
        })?;
        self.engine.set_source_resolution(OCR_SOURCE_DPI);

        let text = self.engine.get_utf8_text().map_err(|err| {
            TextwerkError::OcrError(format!("text recognition failed: {}", err))
        })?;

        debug!(chars = text.len(), "recognition pass complete");
        Ok(text)
    }
}

/// Encode a grayscale bitmap as in-memory PNG bytes.
fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| TextwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn segmentation_modes_map_to_tesseract_values() {
        assert_eq!(PageSegmentation::UniformBlock.tesseract_value(), "6");
        assert_eq!(PageSegmentation::SparseText.tesseract_value(), "11");
    }

    #[test]
    fn candidates_are_tried_block_first() {
        assert_eq!(
            SEGMENTATION_CANDIDATES,
            [PageSegmentation::UniformBlock, PageSegmentation::SparseText]
        );
    }

    #[test]
    fn png_encoding_produces_a_png() {
        let image = GrayImage::from_pixel(4, 4, Luma([255u8]));
        let bytes = encode_png(&image).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
