// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open an in-memory PDF and pull out its embedded text using
// the `lopdf` crate.

use lopdf::Document;
use textwerk_core::error::{Result, TextwerkError};
use tracing::{debug, instrument};

/// Reads embedded text from an existing PDF.
///
/// Wraps `lopdf::Document` and provides the one higher-level operation this
/// pipeline needs: concatenating the text of every page in document order.
/// Rendering pages that carry no text is handled separately by
/// [`PageRasterizer`](crate::pdf::render::PageRasterizer).
pub struct PdfTextReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfTextReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            TextwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Concatenate the embedded text of every page, in document order, with
    /// no separator between pages.
    ///
    /// A page whose content stream yields no text (or cannot be decoded)
    /// contributes the empty string; the concatenation itself never fails.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn embedded_text(&self) -> String {
        let pages = self.document.get_pages();
        let mut text = String::new();

        for page_number in pages.keys() {
            match self.document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(err) => {
                    debug!(page = page_number, %err, "page has no extractable text");
                }
            }
        }

        debug!(chars = text.len(), "embedded text collected");
        text
    }
}
