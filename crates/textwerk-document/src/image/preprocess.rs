// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing pipeline — normalize a decoded bitmap for recognition
// accuracy: grayscale, contrast stretch, speckle suppression, size
// normalization, and sharpening. Operates on in-memory images using the
// `image` and `imageproc` crates.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::stretch_contrast;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use tracing::{debug, instrument};

/// Images whose longer side is below this are upscaled to it.
pub const MIN_OCR_SIDE: u32 = 1600;
/// Images whose longer side is above this are downscaled to it.
pub const MAX_OCR_SIDE: u32 = 4000;

/// Unsharp-mask parameters: Gaussian radius, gain on the detail signal, and
/// the minimum brightness difference that gets sharpened at all.
const SHARPEN_SIGMA: f32 = 2.0;
const SHARPEN_AMOUNT: f32 = 1.5;
const SHARPEN_THRESHOLD: i16 = 3;

/// Preprocessing pipeline operating on a single bitmap bound for OCR.
///
/// All operations consume `self` and return a new `OcrPreprocessor`
/// wrapping the transformed image, enabling method chaining. The input is
/// reduced to single-channel grayscale on construction; every later stage
/// preserves that.
///
/// ```ignore
/// let prepared = OcrPreprocessor::from_dynamic(page)
///     .autocontrast()
///     .denoise()
///     .normalize_size()
///     .sharpen()
///     .finish();
/// ```
pub struct OcrPreprocessor {
    /// The current working image.
    image: GrayImage,
}

impl OcrPreprocessor {
    /// Wrap a decoded image, converting it to single-channel grayscale.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: image.to_luma8(),
        }
    }

    /// Run the full pipeline in its fixed order and return the result.
    pub fn prepare(image: DynamicImage) -> GrayImage {
        Self::from_dynamic(image)
            .autocontrast()
            .denoise()
            .normalize_size()
            .sharpen()
            .finish()
    }

    /// Consume the preprocessor and return the underlying bitmap.
    pub fn finish(self) -> GrayImage {
        self.image
    }

    /// Stretch the observed intensity range linearly to [0, 255].
    ///
    /// A flat image (every pixel the same value) has no range to stretch
    /// and passes through unchanged.
    #[instrument(skip(self))]
    pub fn autocontrast(self) -> Self {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for pixel in self.image.pixels() {
            let value = pixel.0[0];
            min = min.min(value);
            max = max.max(value);
        }

        if min >= max {
            debug!(value = min, "image is flat, skipping contrast stretch");
            return self;
        }

        debug!(min, max, "stretching contrast");
        Self {
            image: stretch_contrast(&self.image, min, max, 0u8, 255u8),
        }
    }

    /// Suppress speckle noise with a 3x3 median filter.
    #[instrument(skip(self))]
    pub fn denoise(self) -> Self {
        Self {
            image: median_filter(&self.image, 1, 1),
        }
    }

    /// Scale small images up and huge images down for recognition.
    ///
    /// The longer side is brought to [`MIN_OCR_SIDE`] or capped at
    /// [`MAX_OCR_SIDE`]; anything in between is left alone. Both dimensions
    /// are scaled by the same factor and truncated to whole pixels
    /// independently. Bicubic interpolation in both directions.
    #[instrument(skip(self))]
    pub fn normalize_size(self) -> Self {
        let (width, height) = self.image.dimensions();
        let max_side = width.max(height);

        let scale = if max_side == 0 {
            return self;
        } else if max_side < MIN_OCR_SIDE {
            f64::from(MIN_OCR_SIDE) / f64::from(max_side)
        } else if max_side > MAX_OCR_SIDE {
            f64::from(MAX_OCR_SIDE) / f64::from(max_side)
        } else {
            return self;
        };

        let new_width = (f64::from(width) * scale) as u32;
        let new_height = (f64::from(height) * scale) as u32;
        debug!(width, height, new_width, new_height, "resizing for OCR");

        Self {
            image: image::imageops::resize(
                &self.image,
                new_width,
                new_height,
                FilterType::CatmullRom,
            ),
        }
    }

    /// Unsharp-mask sharpening pass.
    #[instrument(skip(self))]
    pub fn sharpen(self) -> Self {
        Self {
            image: unsharp_mask(&self.image, SHARPEN_SIGMA, SHARPEN_AMOUNT, SHARPEN_THRESHOLD),
        }
    }
}

/// Unsharp mask with a brightness threshold.
///
/// The detail signal is the difference between the image and its Gaussian
/// blur; pixels whose difference is below `threshold` are left untouched,
/// the rest get `amount` times the difference added back. `imageproc`'s
/// stock sharpener has no threshold, so the final pass is done per pixel.
fn unsharp_mask(image: &GrayImage, sigma: f32, amount: f32, threshold: i16) -> GrayImage {
    let blurred = gaussian_blur_f32(image, sigma);
    let (width, height) = image.dimensions();

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let original = i16::from(image.get_pixel(x, y).0[0]);
            let smoothed = i16::from(blurred.get_pixel(x, y).0[0]);
            let diff = original - smoothed;

            let value = if diff.abs() >= threshold {
                (f32::from(original) + amount * f32::from(diff)).clamp(0.0, 255.0) as u8
            } else {
                original as u8
            };
            output.put_pixel(x, y, Luma([value]));
        }
    }

    output
}
