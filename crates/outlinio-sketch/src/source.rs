// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source image — decoding, size capping, quarter-turn rotation and cropping of
// the photo a sketch is drawn from.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use outlinio_core::PixelBuffer;
use outlinio_core::error::{OutlinioError, Result};
use tracing::{debug, info, instrument};

/// A decoded source photo.
///
/// Edits consume `self` and return the edited source, so every rotate or crop
/// yields a fresh image for the next pipeline run.
///
/// ```ignore
/// let buffer = SourceImage::open("photo.jpg")?
///     .fit_within(2000)
///     .rotate_right()
///     .to_pixel_buffer()?;
/// ```
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    /// Decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            OutlinioError::ImageError(format!(
                "failed to open {}: {err}",
                path.as_ref().display()
            ))
        })?;
        info!(width = image.width(), height = image.height(), "source loaded");
        Ok(Self { image })
    }

    /// Decode encoded bytes (JPEG, PNG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| OutlinioError::ImageError(format!("failed to decode image: {err}")))?;
        debug!(width = image.width(), height = image.height(), "source decoded");
        Ok(Self { image })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Wrap an RGBA buffer, e.g. a previously rendered sketch.
    pub fn from_pixel_buffer(buf: PixelBuffer) -> Result<Self> {
        Ok(Self {
            image: DynamicImage::ImageRgba8(buf.into_rgba_image()?),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Downscale so that neither side exceeds `max`, keeping the aspect ratio.
    ///
    /// Each side is `floor(side * min(max / w, max / h))`, never below one
    /// pixel. Images already within bounds are returned unchanged.
    #[instrument(skip(self), fields(w = self.width(), h = self.height()))]
    pub fn fit_within(self, max: u32) -> Self {
        let (w, h) = (self.width(), self.height());
        if max == 0 || (w <= max && h <= max) {
            return self;
        }
        // min(max / w, max / h) is max / longer side; integer math keeps the
        // floor exact.
        let longer = u64::from(w.max(h));
        let scale = |side: u32| (u64::from(side) * u64::from(max) / longer) as u32;
        let new_w = scale(w).clamp(1, max);
        let new_h = scale(h).clamp(1, max);
        info!(new_w, new_h, "capping source size");
        Self {
            image: self.image.resize_exact(new_w, new_h, FilterType::Lanczos3),
        }
    }

    /// Quarter turn counter-clockwise.
    pub fn rotate_left(self) -> Self {
        Self {
            image: self.image.rotate270(),
        }
    }

    /// Quarter turn clockwise.
    pub fn rotate_right(self) -> Self {
        Self {
            image: self.image.rotate90(),
        }
    }

    /// Crop to a rectangle clamped to the image bounds. A rectangle that
    /// collapses to nothing keeps at least one pixel.
    #[instrument(skip(self))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let (img_w, img_h) = (self.width(), self.height());
        let x = x.min(img_w.saturating_sub(1));
        let y = y.min(img_h.saturating_sub(1));
        let width = width.clamp(1, img_w - x);
        let height = height.clamp(1, img_h - y);
        debug!(x, y, width, height, "cropping source");
        Self {
            image: self.image.crop_imm(x, y, width, height),
        }
    }

    /// RGBA copy of the image ready for the pipeline.
    pub fn to_pixel_buffer(&self) -> Result<PixelBuffer> {
        PixelBuffer::from_rgba_image(self.image.to_rgba8())
    }
}
