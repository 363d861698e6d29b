// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export transforms — derive deliverables (transparent line art, page
// layouts, hard black-and-white) from a finished sketch.
//
// Every transform borrows the processed sketch and returns a new buffer. The
// processed sketch stays the canonical preview and is never modified.

use std::collections::BTreeMap;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use outlinio_core::buffer::CHANNELS;
use outlinio_core::error::{OutlinioError, Result};
use outlinio_core::{ExportFormat, PageLayout, PixelBuffer};
use tracing::{debug, info, instrument};

use crate::tone;

/// Mean-channel cutoff used for coloring-book pages.
pub const COLORING_BOOK_THRESHOLD: f32 = 180.0;
/// Mean-channel cutoff used for black-and-white prints.
pub const BW_PRINT_THRESHOLD: f32 = 128.0;

/// Black strokes whose opacity is the inverse of the sketch luma.
///
/// White paper becomes fully transparent; black strokes stay fully opaque.
#[instrument(skip_all, fields(w = buf.width(), h = buf.height()))]
pub fn alpha_matte_from_luma(buf: &PixelBuffer) -> PixelBuffer {
    let mut out = buf.clone();
    for px in out.pixels_mut().chunks_exact_mut(CHANNELS) {
        let alpha = 255 - px[0];
        px.copy_from_slice(&[0, 0, 0, alpha]);
    }
    out
}

/// Place `buf` on a white page of `layout`, uniformly scaled to fit inside the
/// margins and centered.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn page_layout(buf: &PixelBuffer, layout: PageLayout) -> Result<PixelBuffer> {
    let (avail_w, avail_h) = layout.printable();
    if avail_w == 0 || avail_h == 0 {
        return Err(OutlinioError::InvalidBuffer(format!(
            "margin {} leaves no printable area on a {}x{} page",
            layout.margin, layout.width, layout.height
        )));
    }

    let scale = f64::min(
        avail_w as f64 / buf.width() as f64,
        avail_h as f64 / buf.height() as f64,
    );
    let scaled_w = ((buf.width() as f64 * scale).round() as u32).clamp(1, avail_w);
    let scaled_h = ((buf.height() as f64 * scale).round() as u32).clamp(1, avail_h);
    let x = (layout.width - scaled_w) / 2;
    let y = (layout.height - scaled_h) / 2;
    debug!(scale, scaled_w, scaled_h, x, y, "page placement");

    let page = PixelBuffer::filled(layout.width, layout.height, [255, 255, 255, 255])?;
    let mut page: RgbaImage = page.into_rgba_image()?;
    let source = buf.clone().into_rgba_image()?;
    let scaled = imageops::resize(&source, scaled_w, scaled_h, FilterType::Triangle);
    imageops::overlay(&mut page, &scaled, x as i64, y as i64);

    PixelBuffer::from_rgba_image(page)
}

/// A4 at 300 DPI (2480x3508) with a 118px margin.
pub fn a4_print_layout(buf: &PixelBuffer) -> Result<PixelBuffer> {
    page_layout(buf, PageLayout::A4_300_DPI)
}

/// Hard-thresholded line art (mean > 180 is white) on a page.
pub fn coloring_book_export(buf: &PixelBuffer, layout: PageLayout) -> Result<PixelBuffer> {
    let stark = tone::threshold_mean(buf.clone(), COLORING_BOOK_THRESHOLD);
    page_layout(&stark, layout)
}

/// Mid-thresholded (mean > 128 is white) black and white at native size.
pub fn bw_print_export(buf: &PixelBuffer) -> PixelBuffer {
    tone::threshold_mean(buf.clone(), BW_PRINT_THRESHOLD)
}

/// Produce the buffer for `format` from a processed sketch, using the A4
/// page for print formats.
pub fn apply_export(processed: &PixelBuffer, format: ExportFormat) -> Result<PixelBuffer> {
    apply_export_with(processed, format, PageLayout::A4_300_DPI)
}

/// Like [`apply_export`] with an explicit page for the print formats.
#[instrument(skip(processed), fields(w = processed.width(), h = processed.height()))]
pub fn apply_export_with(
    processed: &PixelBuffer,
    format: ExportFormat,
    layout: PageLayout,
) -> Result<PixelBuffer> {
    info!(%format, "preparing export");
    match format {
        ExportFormat::Png | ExportFormat::Jpg => Ok(processed.clone()),
        ExportFormat::Transparent => Ok(alpha_matte_from_luma(processed)),
        ExportFormat::PrintA4 => page_layout(processed, layout),
        ExportFormat::ColoringBook => coloring_book_export(processed, layout),
        ExportFormat::BwPrint => Ok(bw_print_export(processed)),
    }
}

/// Every named deliverable for one processed sketch.
pub fn export_all(
    processed: &PixelBuffer,
    layout: PageLayout,
) -> Result<BTreeMap<ExportFormat, PixelBuffer>> {
    ExportFormat::ALL
        .into_iter()
        .map(|format| Ok((format, apply_export_with(processed, format, layout)?)))
        .collect()
}
