// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster decoding — turn raw bytes into a `DynamicImage`.
//
// HEIC/HEIF container images (the common phone-camera format) are decoded
// through libheif; everything else goes through the `image` crate with
// format guessing. Orientation metadata is applied here, at decode time,
// because that is where the `image` crate exposes it; a missing or
// malformed orientation tag leaves the image unchanged.

use std::io::Cursor;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use textwerk_core::error::{Result, TextwerkError};
use tracing::{debug, instrument};

/// Decode a single still image from raw bytes.
#[instrument(skip_all, fields(bytes_len = data.len()))]
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let image = if is_heif_container(data) {
        decode_heif(data)?
    } else {
        decode_common(data)?
    };

    debug!(
        width = image.width(),
        height = image.height(),
        "image decoded"
    );
    Ok(image)
}

/// Decode via the `image` crate, applying any orientation metadata.
fn decode_common(data: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| TextwerkError::ImageError(format!("failed to sniff image format: {}", err)))?;

    let mut decoder = reader.into_decoder().map_err(|err| {
        TextwerkError::ImageError(format!("failed to decode image: {}", err))
    })?;

    // Orientation failure is a quality degradation, not an error.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder).map_err(|err| {
        TextwerkError::ImageError(format!("failed to decode image: {}", err))
    })?;
    image.apply_orientation(orientation);

    Ok(image)
}

/// Decode an HEIC/HEIF container through libheif.
///
/// libheif applies the container's orientation transforms itself during
/// decoding, so no separate orientation pass is needed here.
fn decode_heif(data: &[u8]) -> Result<DynamicImage> {
    let lib_heif = LibHeif::new();
    let context = HeifContext::read_from_bytes(data).map_err(|err| {
        TextwerkError::ImageError(format!("failed to read HEIF container: {}", err))
    })?;
    let handle = context.primary_image_handle().map_err(|err| {
        TextwerkError::ImageError(format!("HEIF container has no primary image: {}", err))
    })?;

    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|err| TextwerkError::ImageError(format!("failed to decode HEIF image: {}", err)))?;

    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or_else(|| {
        TextwerkError::ImageError("HEIF decode produced no interleaved RGB plane".to_string())
    })?;

    // The plane is stride-padded; repack into a tight RGB buffer.
    let width = plane.width;
    let height = plane.height;
    let row_bytes = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height as usize {
        let start = y * plane.stride;
        pixels.extend_from_slice(&plane.data[start..start + row_bytes]);
    }

    let buffer = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        TextwerkError::ImageError(format!(
            "HEIF plane dimensions inconsistent ({}x{})",
            width, height
        ))
    })?;

    Ok(DynamicImage::ImageRgb8(buffer))
}

/// True if the buffer looks like an ISO-BMFF container holding a
/// HEIF-family image (an `ftyp` box with a known brand).
pub fn is_heif_container(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }
    let brand: [u8; 4] = match data[8..12].try_into() {
        Ok(brand) => brand,
        Err(_) => return false,
    };
    matches!(
        &brand,
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"mif1" | b"msf1" | b"avif"
    )
}
