// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mode pipelines — maps a sketch mode plus settings onto an ordered list of
// tone and convolution stages and runs them over a private working copy.
//
// Every mode follows the same skeleton:
//
//   brightness -> grayscale -> blur -> edge map -> [contrast | threshold] -> [dilate]
//
// and differs only in how the parameters are derived. Those derivations live
// in a single `Recipe` table keyed by an exhaustive match on `SketchMode`.

use outlinio_core::error::Result;
use outlinio_core::{PixelBuffer, Settings, SketchMode};
use tracing::{debug, info, instrument};

use crate::convolution;
use crate::tone;

/// One step of a mode pipeline with its resolved parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    Brightness(u8),
    Grayscale,
    Blur { radius: u32 },
    Sobel { intensity: f32 },
    CannyLike { intensity: f32 },
    Contrast(f32),
    Threshold(f32),
    Dilate { iterations: u32 },
}

impl Stage {
    /// Apply this stage, consuming the input buffer.
    pub fn apply(self, buf: PixelBuffer) -> Result<PixelBuffer> {
        match self {
            Stage::Brightness(level) => Ok(tone::brightness(buf, level)),
            Stage::Grayscale => Ok(tone::grayscale(buf)),
            Stage::Blur { radius } => convolution::gaussian_blur(buf, radius),
            Stage::Sobel { intensity } => convolution::sobel_edges(buf, intensity),
            Stage::CannyLike { intensity } => convolution::canny_like_edges(buf, intensity),
            Stage::Contrast(amount) => Ok(tone::contrast(buf, amount)),
            Stage::Threshold(t) => Ok(tone::threshold(buf, t)),
            Stage::Dilate { iterations } => convolution::dilate(buf, iterations),
        }
    }
}

// -- Recipe table --------------------------------------------------------------

/// Which slider drives the blur radius.
#[derive(Debug, Clone, Copy)]
enum BlurSource {
    NoiseReduction,
    Smoothing,
}

#[derive(Debug, Clone, Copy)]
enum EdgeKind {
    Sobel,
    CannyLike,
}

#[derive(Debug, Clone, Copy)]
enum PostEdge {
    None,
    /// `contrast((contrast - 50) * 2)`
    Contrast,
    /// `threshold(255 - contrast * 1.5)`
    Threshold,
}

#[derive(Debug, Clone, Copy)]
enum Thickening {
    /// `lineThickness - 1` passes, only when `lineThickness > 1`.
    ExtraPasses,
    /// `lineThickness` passes.
    Full,
    /// `max(floor, lineThickness)` passes.
    AtLeast(u32),
}

/// Parameter derivations for one mode.
#[derive(Debug, Clone, Copy)]
struct Recipe {
    blur_source: BlurSource,
    blur_divisor: u32,
    min_blur: u32,
    edge: EdgeKind,
    /// Edge intensity multiplier in tenths (7 = x0.7).
    edge_gain_tenths: u32,
    post: PostEdge,
    thickening: Thickening,
}

const fn recipe(mode: SketchMode) -> Recipe {
    match mode {
        SketchMode::Pencil => Recipe {
            blur_source: BlurSource::NoiseReduction,
            blur_divisor: 15,
            min_blur: 1,
            edge: EdgeKind::Sobel,
            edge_gain_tenths: 10,
            post: PostEdge::Contrast,
            thickening: Thickening::ExtraPasses,
        },
        SketchMode::Ink => Recipe {
            blur_source: BlurSource::Smoothing,
            blur_divisor: 10,
            min_blur: 1,
            edge: EdgeKind::CannyLike,
            edge_gain_tenths: 10,
            post: PostEdge::None,
            thickening: Thickening::Full,
        },
        SketchMode::LineArt => Recipe {
            blur_source: BlurSource::NoiseReduction,
            blur_divisor: 10,
            min_blur: 2,
            edge: EdgeKind::Sobel,
            edge_gain_tenths: 7,
            post: PostEdge::Threshold,
            thickening: Thickening::ExtraPasses,
        },
        SketchMode::Coloring => Recipe {
            blur_source: BlurSource::Smoothing,
            blur_divisor: 8,
            min_blur: 3,
            edge: EdgeKind::CannyLike,
            edge_gain_tenths: 12,
            post: PostEdge::None,
            thickening: Thickening::AtLeast(2),
        },
    }
}

/// Resolve the ordered stage list for `settings`.
///
/// Settings are clamped into their documented ranges first.
pub fn plan(settings: &Settings) -> Vec<Stage> {
    let s = settings.clamped();
    let r = recipe(s.mode);

    let blur_input = u32::from(match r.blur_source {
        BlurSource::NoiseReduction => s.noise_reduction,
        BlurSource::Smoothing => s.smoothing,
    });
    let radius = (blur_input / r.blur_divisor).max(r.min_blur);

    let intensity = (s.edge_intensity as u32 * r.edge_gain_tenths) as f32 / 10.0;
    let edge = match r.edge {
        EdgeKind::Sobel => Stage::Sobel { intensity },
        EdgeKind::CannyLike => Stage::CannyLike { intensity },
    };

    let mut stages = vec![
        Stage::Brightness(s.brightness),
        Stage::Grayscale,
        Stage::Blur { radius },
        edge,
    ];

    match r.post {
        PostEdge::None => {}
        PostEdge::Contrast => stages.push(Stage::Contrast((s.contrast as f32 - 50.0) * 2.0)),
        PostEdge::Threshold => stages.push(Stage::Threshold(255.0 - s.contrast as f32 * 1.5)),
    }

    let thickness = s.line_thickness as u32;
    let iterations = match r.thickening {
        Thickening::ExtraPasses => thickness.saturating_sub(1),
        Thickening::Full => thickness,
        Thickening::AtLeast(floor) => thickness.max(floor),
    };
    if iterations > 0 {
        stages.push(Stage::Dilate { iterations });
    }

    stages
}

/// Render `source` in the style described by `settings`.
///
/// The caller's buffer is never modified: the stages run over a private copy
/// and each stage hands its output to the next.
#[instrument(skip_all, fields(mode = %settings.mode, w = source.width(), h = source.height()))]
pub fn run_pipeline(source: &PixelBuffer, settings: &Settings) -> Result<PixelBuffer> {
    let stages = plan(settings);
    info!(stages = stages.len(), "running sketch pipeline");

    let mut working = source.clone();
    for stage in stages {
        debug!(?stage, "applying stage");
        working = stage.apply(working)?;
    }

    info!("sketch pipeline complete");
    Ok(working)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: SketchMode) -> Settings {
        Settings {
            mode,
            ..Settings::default()
        }
    }

    fn uniform(w: u32, h: u32, v: u8) -> PixelBuffer {
        PixelBuffer::filled(w, h, [v, v, v, 255]).unwrap()
    }

    /// Black for `x < boundary`, white elsewhere.
    fn vertical_step(w: u32, h: u32, boundary: u32) -> PixelBuffer {
        let mut buf = uniform(w, h, 255);
        for y in 0..h {
            for x in 0..boundary {
                buf.put_pixel(x, y, [0, 0, 0, 255]);
            }
        }
        buf
    }

    #[test]
    fn pencil_defaults_plan() {
        assert_eq!(
            plan(&settings(SketchMode::Pencil)),
            vec![
                Stage::Brightness(50),
                Stage::Grayscale,
                Stage::Blur { radius: 2 },
                Stage::Sobel { intensity: 50.0 },
                Stage::Contrast(0.0),
            ]
        );
    }

    #[test]
    fn ink_always_thickens_by_line_thickness() {
        let stages = plan(&settings(SketchMode::Ink));
        assert_eq!(
            stages,
            vec![
                Stage::Brightness(50),
                Stage::Grayscale,
                Stage::Blur { radius: 2 },
                Stage::CannyLike { intensity: 50.0 },
                Stage::Dilate { iterations: 1 },
            ]
        );
    }

    #[test]
    fn lineart_thresholds_after_scaled_sobel() {
        let s = Settings {
            mode: SketchMode::LineArt,
            contrast: 60,
            line_thickness: 3,
            noise_reduction: 45,
            ..Settings::default()
        };
        assert_eq!(
            plan(&s),
            vec![
                Stage::Brightness(50),
                Stage::Grayscale,
                Stage::Blur { radius: 4 },
                Stage::Sobel { intensity: 35.0 },
                Stage::Threshold(165.0),
                Stage::Dilate { iterations: 2 },
            ]
        );
    }

    #[test]
    fn coloring_uses_heavy_blur_and_thick_lines() {
        let s = Settings {
            mode: SketchMode::Coloring,
            smoothing: 100,
            ..Settings::default()
        };
        let stages = plan(&s);
        assert_eq!(stages[2], Stage::Blur { radius: 12 });
        assert_eq!(stages[3], Stage::CannyLike { intensity: 60.0 });
        assert_eq!(stages.last(), Some(&Stage::Dilate { iterations: 2 }));

        let thick = Settings {
            line_thickness: 5,
            ..s
        };
        assert_eq!(plan(&thick).last(), Some(&Stage::Dilate { iterations: 5 }));
    }

    #[test]
    fn minimum_blur_radius_holds_at_zero_sliders() {
        for (mode, min) in [
            (SketchMode::Pencil, 1),
            (SketchMode::Ink, 1),
            (SketchMode::LineArt, 2),
            (SketchMode::Coloring, 3),
        ] {
            let s = Settings {
                mode,
                noise_reduction: 0,
                smoothing: 0,
                ..Settings::default()
            };
            assert_eq!(plan(&s)[2], Stage::Blur { radius: min }, "{mode}");
        }
    }

    #[test]
    fn pencil_on_flat_gray_is_white() {
        let source = uniform(4, 4, 128);
        let out = run_pipeline(&source, &Settings::default()).unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
        assert!(out.pixels().iter().all(|&b| b == 255));
    }

    #[test]
    fn lineart_draws_a_dark_line_on_a_sharp_boundary() {
        let source = vertical_step(20, 8, 10);
        let out = run_pipeline(&source, &settings(SketchMode::LineArt)).unwrap();

        for y in 0..8 {
            for x in [9, 10] {
                assert_eq!(out.luma(x, y), 0, "boundary pixel ({x},{y})");
            }
            for x in (0..=5).chain(14..20) {
                assert_eq!(out.luma(x, y), 255, "field pixel ({x},{y})");
            }
        }
        assert!(out.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn source_buffer_is_left_untouched() {
        let source = vertical_step(12, 12, 6);
        let before = source.clone();
        for mode in SketchMode::ALL {
            let _ = run_pipeline(&source, &settings(mode)).unwrap();
        }
        assert_eq!(source, before);
    }

    #[test]
    fn every_mode_keeps_dimensions() {
        let source = vertical_step(15, 9, 7);
        for mode in SketchMode::ALL {
            let out = run_pipeline(&source, &settings(mode)).unwrap();
            assert_eq!((out.width(), out.height()), (15, 9), "{mode}");
        }
    }

    #[test]
    fn ink_and_coloring_emit_pure_black_and_white() {
        let source = vertical_step(16, 10, 8);
        for mode in [SketchMode::Ink, SketchMode::Coloring] {
            let out = run_pipeline(&source, &settings(mode)).unwrap();
            assert!(
                out.pixels()
                    .chunks_exact(4)
                    .all(|px| px[0] == 0 || px[0] == 255),
                "{mode}"
            );
        }
    }
}
