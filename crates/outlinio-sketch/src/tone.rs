// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel tone operators: grayscale, brightness, contrast, threshold.
//
// Each operator takes ownership of its input buffer, rewrites it in place and
// hands it back, so no two stages ever alias the same bytes. Alpha is never
// touched.

use outlinio_core::PixelBuffer;
use outlinio_core::buffer::{CHANNELS, clamp_channel};
use tracing::{debug, instrument};

/// Rec. 601 luma of an RGB triple.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Replace R, G and B with their luma. Idempotent.
#[instrument(skip_all, fields(w = buf.width(), h = buf.height()))]
pub fn grayscale(mut buf: PixelBuffer) -> PixelBuffer {
    for px in buf.pixels_mut().chunks_exact_mut(CHANNELS) {
        let y = clamp_channel(luma(px[0], px[1], px[2]));
        px[0] = y;
        px[1] = y;
        px[2] = y;
    }
    buf
}

/// Shift R, G and B by `(level - 50) * 2.55`. `level = 50` is a no-op.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn brightness(mut buf: PixelBuffer, level: u8) -> PixelBuffer {
    // (level - 50) * 2.55, kept exact for half-step levels.
    let shift = (level.min(100) as f64 - 50.0) * 255.0 / 100.0;
    if shift == 0.0 {
        return buf;
    }
    debug!(shift, "applying brightness shift");
    map_rgb(&mut buf, |c| clamp_channel(c as f64 + shift));
    buf
}

/// Contrast remap around mid-gray, `amount` in -100..=100. `amount = 0` is a
/// no-op.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn contrast(mut buf: PixelBuffer, amount: f32) -> PixelBuffer {
    let amount = amount.clamp(-100.0, 100.0) as f64;
    if amount == 0.0 {
        return buf;
    }
    let factor = 259.0 * (amount + 255.0) / (255.0 * (259.0 - amount));
    debug!(factor, "applying contrast remap");
    map_rgb(&mut buf, |c| clamp_channel(factor * (c as f64 - 128.0) + 128.0));
    buf
}

/// Binarize on the red channel: `R > t` becomes white, everything else black.
/// The result is mirrored into G and B.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn threshold(mut buf: PixelBuffer, t: f32) -> PixelBuffer {
    for px in buf.pixels_mut().chunks_exact_mut(CHANNELS) {
        let v = if px[0] as f32 > t { 255 } else { 0 };
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
    buf
}

/// Binarize on the mean of R, G and B: `mean > t` becomes white.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn threshold_mean(mut buf: PixelBuffer, t: f32) -> PixelBuffer {
    for px in buf.pixels_mut().chunks_exact_mut(CHANNELS) {
        let mean = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
        let v = if mean > t { 255 } else { 0 };
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
    buf
}

fn map_rgb(buf: &mut PixelBuffer, f: impl Fn(u8) -> u8) {
    for px in buf.pixels_mut().chunks_exact_mut(CHANNELS) {
        px[0] = f(px[0]);
        px[1] = f(px[1]);
        px[2] = f(px[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small buffer with a spread of colours and alphas.
    fn sample() -> PixelBuffer {
        let mut pixels = Vec::new();
        for i in 0..16u32 {
            let v = (i * 16) as u8;
            pixels.extend_from_slice(&[v, 255 - v, v / 2, 200 + (i as u8)]);
        }
        PixelBuffer::new(4, 4, pixels).unwrap()
    }

    #[test]
    fn grayscale_is_idempotent() {
        let once = grayscale(sample());
        let twice = grayscale(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn grayscale_uses_luma_weights_and_keeps_alpha() {
        let buf = PixelBuffer::new(1, 1, vec![255, 0, 0, 77]).unwrap();
        let gray = grayscale(buf);
        // 0.299 * 255 = 76.245
        assert_eq!(gray.pixel(0, 0), [76, 76, 76, 77]);
    }

    #[test]
    fn neutral_brightness_is_identity() {
        assert_eq!(brightness(sample(), 50), sample());
    }

    #[test]
    fn brightness_shifts_and_clamps() {
        let buf = PixelBuffer::new(2, 1, vec![10, 128, 250, 9, 0, 0, 0, 9]).unwrap();
        let out = brightness(buf, 60);
        // +25.5 rounds to +26 per channel
        assert_eq!(out.pixel(0, 0), [36, 154, 255, 9]);
        let out = brightness(out, 0);
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 9]);
    }

    #[test]
    fn zero_contrast_is_identity() {
        assert_eq!(contrast(sample(), 0.0), sample());
    }

    #[test]
    fn contrast_spreads_values_from_mid_gray() {
        let pixels = vec![100, 100, 100, 255, 128, 128, 128, 255, 160, 160, 160, 255];
        let buf = PixelBuffer::new(3, 1, pixels).unwrap();
        let out = contrast(buf, 50.0);
        assert!(out.luma(0, 0) < 100);
        assert_eq!(out.luma(1, 0), 128);
        assert!(out.luma(2, 0) > 160);
    }

    #[test]
    fn threshold_binarizes_on_red() {
        let buf = PixelBuffer::new(2, 1, vec![181, 0, 0, 255, 180, 255, 255, 255]).unwrap();
        let out = threshold(buf, 180.0);
        assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn threshold_mean_averages_channels() {
        let buf = PixelBuffer::new(2, 1, vec![255, 255, 0, 10, 255, 0, 0, 10]).unwrap();
        let out = threshold_mean(buf, 128.0);
        assert_eq!(out.pixel(0, 0), [255, 255, 255, 10]);
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 10]);
    }
}
