// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction pipeline — routes a document buffer through the PDF or image
// path and shapes the outcome into the single result record.

use textwerk_core::error::Result;
use textwerk_core::{DocumentKind, Extraction};
use textwerk_document::{
    OcrPreprocessor, PageRasterizer, PdfTextReader, TesseractRecognizer, decode_image,
    recognize_best,
};
use tracing::{debug, error, info};

/// Emitted verbatim when the result record itself cannot be serialized,
/// so the caller always receives parseable output.
pub const JSON_FALLBACK: &str = r#"{"text": "", "error": "json_output_error"}"#;

/// Dispatch a non-empty document buffer and fold the outcome into a
/// result record.
///
/// Any error from either path degrades to an empty-text record carrying
/// the diagnostic, which is also logged to stderr. Nothing here panics on
/// malformed input.
pub fn run(buffer: &[u8]) -> Extraction {
    let outcome = match DocumentKind::detect(buffer) {
        DocumentKind::Pdf => process_pdf(buffer),
        DocumentKind::Image => process_image(buffer),
    };

    match outcome {
        Ok(text) => Extraction::with_text(text),
        Err(err) => {
            error!(error = %err, "document processing failed");
            Extraction::failed(err.to_string())
        }
    }
}

/// PDF path: embedded text first, whole-document OCR fallback second.
///
/// The fallback is all-or-nothing: it runs only when the embedded text of
/// the entire document trims to empty, and then re-renders every page from
/// the first. The rendering and OCR engines are constructed lazily so
/// text-bearing PDFs never touch pdfium or Tesseract.
fn process_pdf(buffer: &[u8]) -> Result<String> {
    let reader = PdfTextReader::from_bytes(buffer)?;

    let embedded = reader.embedded_text();
    if !embedded.trim().is_empty() {
        debug!(chars = embedded.len(), "embedded text found, skipping OCR");
        return Ok(embedded);
    }

    info!(
        pages = reader.page_count(),
        "no embedded text, rasterizing pages for OCR"
    );
    let rasterizer = PageRasterizer::new()?;
    let mut recognizer = TesseractRecognizer::new()?;

    let mut text = String::new();
    rasterizer.for_each_page(buffer, |page| {
        let prepared = OcrPreprocessor::prepare(page);
        text.push_str(&recognize_best(&mut recognizer, &prepared)?);
        Ok(())
    })?;

    Ok(text)
}

/// Image path: decode one still image and OCR it.
fn process_image(buffer: &[u8]) -> Result<String> {
    let image = decode_image(buffer)?;
    let mut recognizer = TesseractRecognizer::new()?;

    let prepared = OcrPreprocessor::prepare(image);
    recognize_best(&mut recognizer, &prepared)
}

/// Serialize the record as one line of JSON, falling back to the
/// hand-written literal if serialization itself fails.
pub fn render_record(record: &Extraction) -> String {
    match serde_json::to_string(record) {
        Ok(line) => line,
        Err(err) => {
            error!(error = %err, "JSON output error");
            JSON_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Minimal single-page PDF with embedded text, built in memory.
    fn pdf_with_text(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 36.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn text_pdf_returns_embedded_text_without_ocr() {
        // Succeeding here without pdfium or Tesseract available proves
        // the embedded-text pass short-circuits the OCR fallback.
        let record = run(&pdf_with_text("Invoice 42"));
        assert!(record.text.contains("Invoice 42"));
        assert_eq!(record.error.as_deref(), Some(""));
    }

    #[test]
    fn corrupt_pdf_degrades_to_error_record() {
        let record = run(b"%PDF-1.4 then nothing useful");
        assert!(record.text.is_empty());
        let error = record.error.expect("dispatch path always sets the field");
        assert!(error.contains("PDF processing error"));
    }

    #[test]
    fn random_bytes_degrade_to_decode_error() {
        let record = run(b"\x00\x01\x02 not a document");
        assert!(record.text.is_empty());
        let error = record.error.expect("dispatch path always sets the field");
        assert!(error.contains("image processing error"));
    }

    #[test]
    fn records_render_as_single_json_lines() {
        let line = render_record(&Extraction::empty());
        assert_eq!(line, r#"{"text":""}"#);
        assert!(!line.contains('\n'));

        let line = render_record(&Extraction::failed("bad input".into()));
        assert_eq!(line, r#"{"text":"","error":"bad input"}"#);
    }

    #[test]
    fn fallback_literal_is_itself_valid_json() {
        let record: Extraction = serde_json::from_str(JSON_FALLBACK).unwrap();
        assert_eq!(record.text, "");
        assert_eq!(record.error.as_deref(), Some("json_output_error"));
    }
}
