// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PixelBuffer — the interleaved RGBA raster shared by every pipeline stage.

use image::RgbaImage;

use crate::error::{OutlinioError, Result};

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA raster, four bytes per pixel.
///
/// The length invariant `pixels.len() == width * height * 4` is checked on
/// construction and cannot be broken afterwards: the byte vector is private
/// and only exposed as a fixed-length slice. Zero-sized buffers are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw RGBA bytes, validating the declared dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(OutlinioError::InvalidBuffer(format!(
                "{width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocate a buffer where every pixel is `rgba`.
    ///
    /// Allocation failure is reported as `ProcessingFailure` instead of
    /// aborting, so very large pages surface as an ordinary error.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = byte_len(width, height)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|err| {
            OutlinioError::ProcessingFailure(format!(
                "cannot allocate {width}x{height} buffer: {err}"
            ))
        })?;
        for _ in 0..(len / CHANNELS) {
            pixels.extend_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert from an `image` crate RGBA buffer.
    pub fn from_rgba_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutably borrow the raw RGBA bytes. The length is fixed.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite the RGBA value at `(x, y)`.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Luma of a pixel in a grayscale buffer, read from the red channel.
    #[inline]
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        self.pixels[self.offset(x, y)]
    }

    // -- Conversion -----------------------------------------------------------

    /// Convert into an `image` crate RGBA buffer (no copy).
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.pixels).ok_or_else(|| {
            OutlinioError::InvalidBuffer(format!("{width}x{height} buffer rejected by image"))
        })
    }
}

/// Round a channel value to the nearest byte, saturating at 0 and 255.
#[inline]
pub fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn byte_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(OutlinioError::InvalidBuffer(format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| {
            OutlinioError::InvalidBuffer(format!("{width}x{height} overflows the address space"))
        })
}
