// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outlinio — Core types, configuration and error definitions shared across all crates.

pub mod buffer;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use buffer::PixelBuffer;
pub use config::SketchConfig;
pub use error::OutlinioError;
pub use types::*;
