// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR module — the recognition engine seam, its Tesseract implementation,
// and the best-of-configurations runner.

pub mod engine;
pub mod runner;

pub use engine::{PageSegmentation, TesseractRecognizer, TextRecognizer};
pub use runner::recognize_best;
