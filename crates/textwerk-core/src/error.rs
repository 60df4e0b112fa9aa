// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Textwerk.

use thiserror::Error;

/// Top-level error type for all Textwerk operations.
///
/// Every pipeline stage degrades to `Err` rather than panicking; the CLI
/// maps any error into an empty-text result record and a stderr diagnostic.
#[derive(Debug, Error)]
pub enum TextwerkError {
    #[error("PDF processing error: {0}")]
    PdfError(String),

    #[error("image processing error: {0}")]
    ImageError(String),

    #[error("OCR error: {0}")]
    OcrError(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TextwerkError>;
