// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — raster decoding (common formats plus HEIC/HEIF) and the
// OCR preprocessing pipeline.

pub mod decode;
pub mod preprocess;

pub use decode::decode_image;
pub use preprocess::OcrPreprocessor;
