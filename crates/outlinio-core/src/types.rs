// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Outlinio sketch renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OutlinioError;

/// Rendering style. Closed set: adding a style means adding a pipeline recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchMode {
    /// Soft graphite look: Sobel strokes with a contrast remap.
    #[default]
    Pencil,
    /// Uniform pen outline from the binary gradient classifier.
    Ink,
    /// Thresholded Sobel strokes.
    LineArt,
    /// Heavily smoothed, thick outlines for colouring pages.
    Coloring,
}

impl SketchMode {
    pub const ALL: [SketchMode; 4] = [Self::Pencil, Self::Ink, Self::LineArt, Self::Coloring];

    /// Keyword used in settings files and on the command line.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Ink => "ink",
            Self::LineArt => "lineart",
            Self::Coloring => "coloring",
        }
    }
}

impl fmt::Display for SketchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SketchMode {
    type Err = OutlinioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.keyword().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OutlinioError::UnsupportedMode(s.to_string()))
    }
}

/// User-facing knobs for one pipeline run.
///
/// Immutable for the duration of a run; any change schedules a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: SketchMode,
    /// Stroke weight, 1..=5.
    pub line_thickness: u8,
    /// Edge gain, 10..=100.
    pub edge_intensity: u8,
    /// 0..=100, 50 is neutral.
    pub contrast: u8,
    /// Blur strength for Sobel-based styles, 0..=100.
    pub noise_reduction: u8,
    /// Blur strength for classifier-based styles, 0..=100.
    pub smoothing: u8,
    /// 0..=100, 50 is neutral.
    pub brightness: u8,
}

impl Settings {
    /// Force every field into its documented range.
    pub fn clamped(self) -> Self {
        Self {
            mode: self.mode,
            line_thickness: self.line_thickness.clamp(1, 5),
            edge_intensity: self.edge_intensity.clamp(10, 100),
            contrast: self.contrast.min(100),
            noise_reduction: self.noise_reduction.min(100),
            smoothing: self.smoothing.min(100),
            brightness: self.brightness.min(100),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: SketchMode::Pencil,
            line_thickness: 1,
            edge_intensity: 50,
            contrast: 50,
            noise_reduction: 30,
            smoothing: 20,
            brightness: 50,
        }
    }
}

/// Deliverable formats offered on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Png,
    Jpg,
    /// Black strokes on a transparent background.
    Transparent,
    /// Centered on an A4 page at 300 DPI.
    PrintA4,
    /// Hard-thresholded strokes on an A4 page.
    ColoringBook,
    /// Mid-thresholded black and white at native size.
    BwPrint,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        Self::Png,
        Self::Jpg,
        Self::Transparent,
        Self::PrintA4,
        Self::ColoringBook,
        Self::BwPrint,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Transparent => "transparent",
            Self::PrintA4 => "print-a4",
            Self::ColoringBook => "coloring-book",
            Self::BwPrint => "bw-print",
        }
    }

    /// Suggested download file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Png => "outlinio-sketch.png",
            Self::Jpg => "outlinio-sketch.jpg",
            Self::Transparent => "outlinio-sketch-transparent.png",
            Self::PrintA4 => "outlinio-sketch-print-a4.png",
            Self::ColoringBook => "outlinio-sketch-coloring-book.png",
            Self::BwPrint => "outlinio-sketch-bw-print.png",
        }
    }

    /// MIME type of the encoded deliverable.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpg => "image/jpeg",
            _ => "image/png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ExportFormat {
    type Err = OutlinioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("jpeg") {
            return Ok(Self::Jpg);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.keyword().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OutlinioError::UnsupportedFormat(s.to_string()))
    }
}

/// Standard paper sizes for print exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Page size in pixels at `dpi`, rounded to the nearest pixel.
    pub fn pixels_at(&self, dpi: u32) -> (u32, u32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        let to_px = |mm: u32| (mm as f64 * dpi as f64 / 25.4).round() as u32;
        (to_px(w_mm), to_px(h_mm))
    }
}

/// A fixed-size page canvas with a uniform margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl PageLayout {
    /// A4 portrait at 300 DPI with a ~10mm margin.
    pub const A4_300_DPI: PageLayout = PageLayout {
        width: 2480,
        height: 3508,
        margin: 118,
    };

    pub fn new(paper: PaperSize, dpi: u32, margin: u32) -> Self {
        let (width, height) = paper.pixels_at(dpi);
        Self {
            width,
            height,
            margin,
        }
    }

    /// Printable area inside the margins (width, height).
    pub fn printable(&self) -> (u32, u32) {
        (
            self.width.saturating_sub(self.margin.saturating_mul(2)),
            self.height.saturating_sub(self.margin.saturating_mul(2)),
        )
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::A4_300_DPI
    }
}
