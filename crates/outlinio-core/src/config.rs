// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renderer configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{PageLayout, PaperSize, Settings};

/// Persistent renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Longest side a source image may have before it is downscaled.
    pub max_dimension: u32,
    /// Quiet period after the last settings change before a run starts.
    pub debounce_ms: u64,
    /// JPEG quality (1-100) for the `jpg` export.
    pub jpeg_quality: u8,
    /// Paper used by the print-layout exports.
    pub page: PaperSize,
    /// Print resolution.
    pub dpi: u32,
    /// Page margin in pixels on every side.
    pub margin_px: u32,
    /// Settings applied when a new image is loaded.
    pub default_settings: Settings,
}

impl SketchConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Read a JSON config file, falling back to defaults if it is missing or
    /// unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Page canvas for print exports.
    pub fn page_layout(&self) -> PageLayout {
        PageLayout::new(self.page, self.dpi, self.margin_px)
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            max_dimension: 2000,
            debounce_ms: 100,
            jpeg_quality: 95,
            page: PaperSize::A4,
            dpi: 300,
            margin_px: 118,
            default_settings: Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SketchMode;

    #[test]
    fn defaults_give_a4_page() {
        let config = SketchConfig::default();
        assert_eq!(config.page_layout(), PageLayout::A4_300_DPI);
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert_eq!(config.max_dimension, 2000);
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SketchConfig::default();
        config.jpeg_quality = 80;
        config.page = PaperSize::Letter;
        config.default_settings.mode = SketchMode::Coloring;
        config.save(&path).unwrap();

        let loaded = SketchConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = SketchConfig::load_or_default(dir.path().join("absent.json"));
        assert_eq!(loaded, SketchConfig::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "debounce_ms": 250 }"#).unwrap();

        let loaded = SketchConfig::load(&path).unwrap();
        assert_eq!(loaded.debounce_ms, 250);
        assert_eq!(loaded.jpeg_quality, 95);
    }

    #[test]
    fn huge_margin_from_file_does_not_overflow_layout() {
        let json = r#"{ "margin_px": 3000000000 }"#;
        let config: SketchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.page_layout().printable(), (0, 0));
    }
}
