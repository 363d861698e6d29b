// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the UI layer.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives presentation; `retriable` tells the UI whether to offer
// a "Try again" button. The renderer itself never retries.

use crate::error::OutlinioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running again may well succeed (memory pressure, worker crash).
    Transient,
    /// User must do something first (load an image, pick another format).
    ActionRequired,
    /// Retrying the same input will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the UI should offer a retry.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert an `OutlinioError` into a `HumanError`.
pub fn humanize_error(err: &OutlinioError) -> HumanError {
    match err {
        OutlinioError::InvalidBuffer(_) => HumanError {
            message: "This image couldn't be read.".into(),
            suggestion: "The picture appears to be empty or damaged. Try a different photo.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        OutlinioError::UnsupportedMode(mode) => HumanError {
            message: "That sketch style isn't available.".into(),
            suggestion: format!(
                "Choose Pencil, Ink, Line Art or Coloring instead. (Requested: {mode})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        OutlinioError::UnsupportedFormat(format) => HumanError {
            message: "That download format isn't available.".into(),
            suggestion: format!(
                "Pick PNG, JPG, transparent, A4 print, coloring book or B&W print. (Requested: {format})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        OutlinioError::ProcessingFailure(_) => HumanError {
            message: "Creating your sketch didn't finish.".into(),
            suggestion: "Try again. If the photo is very large, cropping it first can help.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        OutlinioError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        OutlinioError::NothingToExport => HumanError {
            message: "There's no sketch to download yet.".into(),
            suggestion: "Upload a photo and wait for the preview to appear, then download.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        OutlinioError::SessionClosed => HumanError {
            message: "The sketch editor stopped unexpectedly.".into(),
            suggestion: "Reload the photo to start a new session.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        OutlinioError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or try a different folder.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        OutlinioError::Serialization(_) => HumanError {
            message: "Your saved preferences couldn't be read.".into(),
            suggestion: "Default settings will be used. Adjust the sliders and save again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
