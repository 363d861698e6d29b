// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Outlinio.

use thiserror::Error;

/// Top-level error type for all Outlinio operations.
#[derive(Debug, Error)]
pub enum OutlinioError {
    // -- Pipeline errors --
    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("unsupported sketch mode: {0}")]
    UnsupportedMode(String),

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("processing failed: {0}")]
    ProcessingFailure(String),

    // -- Image I/O --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Session --
    #[error("no processed sketch available to export")]
    NothingToExport,

    #[error("processing session has shut down")]
    SessionClosed,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, OutlinioError>;
