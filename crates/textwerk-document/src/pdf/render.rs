// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization — render PDF pages to bitmaps for the OCR fallback,
// via the `pdfium-render` crate.
//
// Pdfium is loaded dynamically: first from the process working directory,
// then from the system library path. Binding failure surfaces as a PDF
// processing error rather than a crash, so environments without the native
// library still produce a clean JSON result.

use image::DynamicImage;
use pdfium_render::prelude::*;
use textwerk_core::error::{Result, TextwerkError};
use tracing::{debug, info, instrument};

/// Resolution used when rasterizing pages for OCR.
pub const RASTER_DPI: f32 = 300.0;

/// PDF user-space points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Renders PDF pages to in-memory bitmaps.
pub struct PageRasterizer {
    pdfium: Pdfium,
}

impl PageRasterizer {
    /// Bind the pdfium library and prepare a rasterizer.
    pub fn new() -> Result<Self> {
        let bindings =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|err| {
                    TextwerkError::PdfError(format!("failed to bind pdfium library: {}", err))
                })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Render every page of `data` at [`RASTER_DPI`] and hand each bitmap
    /// to `visit`, in document order.
    ///
    /// At most one rendered page is held in memory at a time; a 300 DPI
    /// render of an A4 page is already ~25 MB of pixels.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn for_each_page(
        &self,
        data: &[u8],
        mut visit: impl FnMut(DynamicImage) -> Result<()>,
    ) -> Result<()> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|err| {
                TextwerkError::PdfError(format!("failed to open PDF for rendering: {}", err))
            })?;

        let page_count = document.pages().len();
        info!(pages = page_count, dpi = RASTER_DPI, "rasterizing PDF pages");

        for (index, page) in document.pages().iter().enumerate() {
            let bitmap = render_page(&page)?;
            debug!(
                page = index + 1,
                width = bitmap.width(),
                height = bitmap.height(),
                "page rendered"
            );
            visit(bitmap)?;
        }

        Ok(())
    }
}

/// Render a single page at [`RASTER_DPI`].
///
/// Pixel dimensions are the page's point size scaled by dpi/72, truncated.
/// Pages without transparency render to an opaque three-channel bitmap;
/// pages with transparency keep their alpha channel.
fn render_page(page: &PdfPage) -> Result<DynamicImage> {
    let scale = RASTER_DPI / POINTS_PER_INCH;
    let width_px = (page.width().value * scale) as i32;
    let height_px = (page.height().value * scale) as i32;

    let format = if page.has_transparency() {
        PdfBitmapFormat::BGRA
    } else {
        PdfBitmapFormat::BGR
    };

    let config = PdfRenderConfig::new()
        .set_target_width(width_px)
        .set_target_height(height_px)
        .set_format(format)
        .render_form_data(true)
        .render_annotations(true);

    let bitmap = page
        .render_with_config(&config)
        .map_err(|err| TextwerkError::PdfError(format!("failed to render PDF page: {}", err)))?;

    Ok(bitmap.as_image())
}
