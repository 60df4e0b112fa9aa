// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR runner — try every page-segmentation hypothesis and keep the
// best-scoring result.

use image::GrayImage;
use textwerk_core::error::Result;
use tracing::debug;

use crate::ocr::engine::{SEGMENTATION_CANDIDATES, TextRecognizer};

/// Recognize `image` under every candidate segmentation mode and return
/// the text with the highest alphanumeric-character count.
///
/// The fold starts below zero and compares with strict greater-than, so
/// the first candidate's result is always adopted (even when empty) and
/// ties keep the earlier mode. Empty engine output scores zero; only an
/// engine failure propagates as an error.
pub fn recognize_best<R: TextRecognizer + ?Sized>(
    recognizer: &mut R,
    image: &GrayImage,
) -> Result<String> {
    let mut best_text = String::new();
    let mut best_score: i64 = -1;

    for segmentation in SEGMENTATION_CANDIDATES {
        let text = recognizer.recognize(image, segmentation)?;
        let score = alphanumeric_count(&text) as i64;
        debug!(?segmentation, score, "candidate scored");

        if score > best_score {
            best_score = score;
            best_text = text;
        }
    }

    Ok(best_text)
}

/// Number of Unicode-alphanumeric characters in `text` — the quality
/// heuristic used to pick between segmentation modes.
pub fn alphanumeric_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::engine::PageSegmentation;
    use image::Luma;
    use textwerk_core::TextwerkError;

    /// Recognizer that replays scripted outputs, one per candidate mode.
    struct ScriptedRecognizer {
        outputs: Vec<Result<String>>,
        calls: Vec<PageSegmentation>,
    }

    impl ScriptedRecognizer {
        fn new(outputs: Vec<Result<String>>) -> Self {
            Self {
                outputs,
                calls: Vec::new(),
            }
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(
            &mut self,
            _image: &GrayImage,
            segmentation: PageSegmentation,
        ) -> Result<String> {
            self.calls.push(segmentation);
            self.outputs.remove(0)
        }
    }

    fn blank() -> GrayImage {
        GrayImage::from_pixel(2, 2, Luma([255u8]))
    }

    #[test]
    fn highest_alphanumeric_count_wins() {
        let mut recognizer = ScriptedRecognizer::new(vec![
            Ok("ab".to_string()),
            Ok("abc def".to_string()),
        ]);
        let best = recognize_best(&mut recognizer, &blank()).unwrap();
        assert_eq!(best, "abc def");
    }

    #[test]
    fn ties_keep_the_first_mode() {
        let mut recognizer = ScriptedRecognizer::new(vec![
            Ok("one1".to_string()),
            Ok("two2".to_string()),
        ]);
        // Both score 4; strict greater-than keeps the uniform-block result.
        let best = recognize_best(&mut recognizer, &blank()).unwrap();
        assert_eq!(best, "one1");
    }

    #[test]
    fn punctuation_does_not_score() {
        let mut recognizer = ScriptedRecognizer::new(vec![
            Ok("!!! ... ???".to_string()),
            Ok("x".to_string()),
        ]);
        let best = recognize_best(&mut recognizer, &blank()).unwrap();
        assert_eq!(best, "x");
    }

    #[test]
    fn all_empty_yields_empty_string() {
        let mut recognizer =
            ScriptedRecognizer::new(vec![Ok(String::new()), Ok(String::new())]);
        let best = recognize_best(&mut recognizer, &blank()).unwrap();
        assert_eq!(best, "");
    }

    #[test]
    fn modes_are_tried_in_fixed_order() {
        let mut recognizer =
            ScriptedRecognizer::new(vec![Ok(String::new()), Ok(String::new())]);
        recognize_best(&mut recognizer, &blank()).unwrap();
        assert_eq!(
            recognizer.calls,
            vec![PageSegmentation::UniformBlock, PageSegmentation::SparseText]
        );
    }

    #[test]
    fn engine_failure_propagates() {
        let mut recognizer = ScriptedRecognizer::new(vec![Err(TextwerkError::OcrError(
            "engine exploded".to_string(),
        ))]);
        assert!(recognize_best(&mut recognizer, &blank()).is_err());
    }

    #[test]
    fn unicode_counts_as_alphanumeric() {
        assert_eq!(alphanumeric_count("abc 123"), 6);
        assert_eq!(alphanumeric_count("Grüße!"), 5);
        assert_eq!(alphanumeric_count("— . ,"), 0);
        assert_eq!(alphanumeric_count(""), 0);
    }
}
