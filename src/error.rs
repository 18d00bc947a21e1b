// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the geometry, model and store layers.
//!
//! Application-level code wraps these in `anyhow::Error`; the library layers
//! keep them typed so callers can tell a storage failure from a bad import.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when building coordinate-space values.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("image size must be positive and finite, got {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },
}

/// Errors raised by annotation stores and record validation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access annotation store at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode annotations: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("annotation store at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("import data must be an array of {{imageId, annotations: [...]}} objects")]
    MalformedRoot,

    #[error("invalid record at position {index}: {reason}")]
    Malformed { index: usize, reason: String },
}

impl StoreError {
    /// Whether the error came from bad input rather than the storage engine.
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::MalformedRoot | StoreError::Malformed { .. })
    }
}
