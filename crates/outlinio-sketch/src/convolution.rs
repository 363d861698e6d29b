// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Neighbourhood operators — separable Gaussian blur, Sobel stroke map, the
// single-threshold gradient classifier, and min-filter line thickening.
//
// Every operator returns a freshly allocated buffer; the input is consumed.
// Edge maps read luma from the red channel, so they expect a grayscale input.

use outlinio_core::PixelBuffer;
use outlinio_core::buffer::{CHANNELS, clamp_channel};
use outlinio_core::error::{OutlinioError, Result};
use tracing::{debug, instrument};

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

// -- Gaussian blur -------------------------------------------------------------

/// Normalised 1-D Gaussian kernel of length `2 * radius + 1`, `sigma = radius / 3`.
pub fn gaussian_kernel(radius: u32) -> Vec<f64> {
    if radius == 0 {
        return vec![1.0];
    }
    let sigma = radius as f64 / 3.0;
    let r = radius as i64;
    let mut kernel: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Two-pass separable Gaussian blur over all four channels.
///
/// Samples outside the image are clamped to the nearest edge pixel. The
/// horizontal pass is kept in `f64`; bytes are only produced by the vertical
/// pass. `radius = 0` returns the input unchanged.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn gaussian_blur(buf: PixelBuffer, radius: u32) -> Result<PixelBuffer> {
    if radius == 0 {
        return Ok(buf);
    }
    let kernel = gaussian_kernel(radius);
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    let r = radius as isize;
    let src = buf.pixels();

    let mut temp = try_alloc::<f64>(src.len())?;
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let mut acc = [0.0f64; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - r).clamp(0, w as isize - 1) as usize;
                let i = (row + sx) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += src[i + c] as f64 * weight;
                }
            }
            let o = (row + x) * CHANNELS;
            temp[o..o + CHANNELS].copy_from_slice(&acc);
        }
    }

    let mut out = PixelBuffer::filled(buf.width(), buf.height(), [0, 0, 0, 0])?;
    let dst = out.pixels_mut();
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f64; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - r).clamp(0, h as isize - 1) as usize;
                let i = (sy * w + x) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += temp[i + c] * weight;
                }
            }
            let o = (y * w + x) * CHANNELS;
            for c in 0..CHANNELS {
                dst[o + c] = clamp_channel(acc[c]);
            }
        }
    }

    debug!(radius, taps = kernel.len(), "gaussian blur complete");
    Ok(out)
}

// -- Gradient edge maps --------------------------------------------------------

/// Sobel gradient magnitude `sqrt(gx² + gy²)` of the red channel at an
/// interior pixel.
#[inline]
pub fn sobel_magnitude(buf: &PixelBuffer, x: u32, y: u32) -> f32 {
    let mut gx = 0i32;
    let mut gy = 0i32;
    for (ky, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
        for kx in 0..3 {
            let v = buf.luma(x + kx as u32 - 1, y + ky as u32 - 1) as i32;
            gx += v * row_x[kx];
            gy += v * row_y[kx];
        }
    }
    ((gx * gx + gy * gy) as f32).sqrt()
}

/// Dark-on-light stroke map: `255 - magnitude * intensity / 50`, clamped.
///
/// Only interior pixels are measured. Each border pixel replicates its nearest
/// interior neighbour; a buffer too small to have an interior renders white.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn sobel_edges(buf: PixelBuffer, intensity: f32) -> Result<PixelBuffer> {
    let gain = intensity / 50.0;
    edge_map(&buf, |magnitude| clamp_channel((255.0 - magnitude * gain) as f64))
}

/// Binary stroke map: black where the gradient magnitude exceeds
/// `(100 - intensity) * 2`, white elsewhere.
///
/// This is a deliberately simplified detector with no non-maximum suppression
/// and no hysteresis; the softer, uniform line weight is part of the ink and
/// coloring styles. Border handling matches [`sobel_edges`].
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn canny_like_edges(buf: PixelBuffer, intensity: f32) -> Result<PixelBuffer> {
    let cutoff = (100.0 - intensity) * 2.0;
    debug!(cutoff, "gradient threshold");
    edge_map(&buf, |magnitude| if magnitude > cutoff { 0 } else { 255 })
}

fn edge_map(src: &PixelBuffer, shade: impl Fn(f32) -> u8) -> Result<PixelBuffer> {
    let (w, h) = (src.width(), src.height());
    let mut out = PixelBuffer::filled(w, h, [255, 255, 255, 255])?;
    if w < 3 || h < 3 {
        debug!("no interior pixels; edge map is blank");
        return Ok(out);
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let v = shade(sobel_magnitude(src, x, y));
            out.put_pixel(x, y, [v, v, v, 255]);
        }
    }

    // Replicate the interior outwards onto the 1-pixel frame.
    for y in 0..h {
        for x in 0..w {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                let nearest = out.pixel(x.clamp(1, w - 2), y.clamp(1, h - 2));
                out.put_pixel(x, y, nearest);
            }
        }
    }
    Ok(out)
}

// -- Morphology ----------------------------------------------------------------

/// Thicken dark strokes by replacing each interior pixel's luma with the
/// minimum of its 3x3 neighbourhood, `iterations` times.
///
/// Every pass reads the previous pass's complete output. Border pixels are
/// copied through unchanged. Luma never increases, and `iterations = 0` is
/// the identity.
#[instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn dilate(buf: PixelBuffer, iterations: u32) -> Result<PixelBuffer> {
    let (w, h) = (buf.width(), buf.height());
    if iterations == 0 || w < 3 || h < 3 {
        return Ok(buf);
    }

    let mut current = buf;
    for _ in 0..iterations {
        let mut next = current.clone();
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let mut min = u8::MAX;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        min = min.min(current.luma(nx, ny));
                    }
                }
                next.put_pixel(x, y, [min, min, min, 255]);
            }
        }
        current = next;
    }

    debug!(iterations, "dilation complete");
    Ok(current)
}

fn try_alloc<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|err| {
        OutlinioError::ProcessingFailure(format!("cannot allocate blur scratch space: {err}"))
    })?;
    v.resize(len, T::default());
    Ok(v)
}
