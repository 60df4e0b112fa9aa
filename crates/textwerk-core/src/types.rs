// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Textwerk extraction worker.

use serde::{Deserialize, Serialize};

/// Magic signature identifying a PDF buffer.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// How an input buffer is routed through the pipeline.
///
/// Classification looks at nothing but the first four bytes: `%PDF` means
/// the PDF path, everything else (including buffers too short to carry the
/// signature) goes to the image decoder, which accepts or rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Classify a raw input buffer.
    pub fn detect(buffer: &[u8]) -> Self {
        if buffer.starts_with(PDF_MAGIC) {
            Self::Pdf
        } else {
            Self::Image
        }
    }
}

/// The single result record emitted per invocation.
///
/// Serialized exactly once, as one line of JSON on stdout. The `error`
/// field is optional so the empty-input fast path can omit the key
/// entirely; on the normal path it is present even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted text, empty on any failure path.
    pub text: String,
    /// Diagnostic message, `Some("")` when extraction succeeded, `None`
    /// when the record predates dispatch (empty input, stdin failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Extraction {
    /// Record for the empty-input and stdin-failure paths: no error key.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            error: None,
        }
    }

    /// Successful extraction.
    pub fn with_text(text: String) -> Self {
        Self {
            text,
            error: Some(String::new()),
        }
    }

    /// Failed extraction: text forced empty, diagnostic carried along.
    pub fn failed(message: String) -> Self {
        Self {
            text: String::new(),
            error: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_magic_routes_to_pdf() {
        assert_eq!(DocumentKind::detect(b"%PDF-1.7\n..."), DocumentKind::Pdf);
        assert_eq!(DocumentKind::detect(b"%PDF"), DocumentKind::Pdf);
    }

    #[test]
    fn non_pdf_routes_to_image() {
        assert_eq!(DocumentKind::detect(b"\x89PNG\r\n"), DocumentKind::Image);
        assert_eq!(DocumentKind::detect(b"random bytes"), DocumentKind::Image);
        // A partial signature is not a PDF.
        assert_eq!(DocumentKind::detect(b"%PD"), DocumentKind::Image);
        assert_eq!(DocumentKind::detect(b""), DocumentKind::Image);
    }

    #[test]
    fn empty_record_omits_error_key() {
        let json = serde_json::to_string(&Extraction::empty()).unwrap();
        assert_eq!(json, r#"{"text":""}"#);
    }

    #[test]
    fn success_record_carries_empty_error() {
        let json = serde_json::to_string(&Extraction::with_text("hi".into())).unwrap();
        assert_eq!(json, r#"{"text":"hi","error":""}"#);
    }

    #[test]
    fn failed_record_has_empty_text() {
        let record = Extraction::failed("boom".into());
        assert!(record.text.is_empty());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"text":"","error":"boom"}"#);
    }
}
