// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the outlinio-sketch crate: the four mode pipelines
// on a synthetic photo and the A4 print export.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use outlinio_core::{ExportFormat, PixelBuffer, Settings, SketchMode};
use outlinio_sketch::{apply_export, run_pipeline};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 256x256 image: a diagonal gradient with a bright disc in the middle, which
/// gives every edge detector something to find.
fn synthetic_photo() -> PixelBuffer {
    let (width, height) = (256u32, 256u32);
    let mut buf = PixelBuffer::filled(width, height, [0, 0, 0, 255])
        .unwrap_or_else(|err| panic!("fixture allocation failed: {err}"));
    for y in 0..height {
        for x in 0..width {
            let dx = x as i64 - 128;
            let dy = y as i64 - 128;
            let px = if dx * dx + dy * dy < 60 * 60 {
                [235, 220, 200, 255]
            } else {
                let v = ((x + y) / 2) as u8;
                [v, v / 2, 255 - v, 255]
            };
            buf.put_pixel(x, y, px);
        }
    }
    buf
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_mode_pipelines(c: &mut Criterion) {
    let photo = synthetic_photo();
    for mode in SketchMode::ALL {
        let settings = Settings {
            mode,
            ..Settings::default()
        };
        c.bench_function(&format!("pipeline {mode} (256x256)"), |b| {
            b.iter(|| black_box(run_pipeline(black_box(&photo), &settings)));
        });
    }
}

/// The A4 layout upsamples onto a 2480x3508 page, so it dominates export cost.
fn bench_a4_export(c: &mut Criterion) {
    let photo = synthetic_photo();
    let sketch = run_pipeline(&photo, &Settings::default())
        .unwrap_or_else(|err| panic!("fixture pipeline failed: {err}"));
    c.bench_function("export print-a4 (256x256)", |b| {
        b.iter(|| black_box(apply_export(black_box(&sketch), ExportFormat::PrintA4)));
    });
}

criterion_group!(benches, bench_mode_pipelines, bench_a4_export);
criterion_main!(benches);
