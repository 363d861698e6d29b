// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// outlinio-sketch — Photo-to-sketch rendering for Outlinio.
//
// Provides tone operators (grayscale, brightness, contrast, threshold),
// convolution operators (Gaussian blur, Sobel and Canny-like edges, dilation),
// the four mode pipelines, export transforms and source image handling.

pub mod convolution;
pub mod encode;
pub mod export;
pub mod pipeline;
pub mod source;
pub mod tone;

// Re-export the entry points so callers can use `outlinio_sketch::run_pipeline` etc.
pub use encode::{encode_export, encode_jpeg, encode_png};
pub use export::{apply_export, apply_export_with, export_all};
pub use pipeline::{Stage, plan, run_pipeline};
pub use source::SourceImage;
