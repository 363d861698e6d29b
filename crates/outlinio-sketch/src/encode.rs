// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoders for finished buffers: PNG keeps alpha, JPEG drops it.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use outlinio_core::error::{OutlinioError, Result};
use outlinio_core::{ExportFormat, PixelBuffer};
use tracing::{debug, instrument};

/// Encode as PNG bytes.
#[instrument(skip_all, fields(w = buf.width(), h = buf.height()))]
pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>> {
    let image = DynamicImage::ImageRgba8(buf.clone().into_rgba_image()?);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| OutlinioError::ImageError(format!("PNG encoding failed: {err}")))?;
    debug!(len = bytes.len(), "encoded PNG");
    Ok(bytes)
}

/// Encode as JPEG bytes with `quality` in 1..=100. Alpha is discarded.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn encode_jpeg(buf: &PixelBuffer, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(buf.clone().into_rgba_image()?).to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|err| OutlinioError::ImageError(format!("JPEG encoding failed: {err}")))?;
    debug!(len = bytes.len(), "encoded JPEG");
    Ok(bytes)
}

/// Encode an export buffer in the container its format calls for.
pub fn encode_export(buf: &PixelBuffer, format: ExportFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Jpg => encode_jpeg(buf, jpeg_quality),
        ExportFormat::Png
        | ExportFormat::Transparent
        | ExportFormat::PrintA4
        | ExportFormat::ColoringBook
        | ExportFormat::BwPrint => encode_png(buf),
    }
}
