// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lembar.

use thiserror::Error;

/// Top-level error type for all Lembar operations.
///
/// Only contract violations and environment failures live here. Gaps in the
/// business data (no phone number, no items, a logo that will not decode)
/// are reported as [`crate::RenderWarning`]s and never stop a render.
#[derive(Debug, Error)]
pub enum LembarError {
    // -- Layout contract violations --
    #[error("page capacity must be a positive integer, got {capacity}")]
    InvalidCapacity { capacity: usize },

    #[error("malformed chunk: {0}")]
    MalformedChunk(String),

    #[error("page out of sequence: expected page index {expected}, got {actual}")]
    PageOutOfSequence { expected: usize, actual: usize },

    // -- Caller-facing --
    #[error("unsupported document variant: {0}")]
    UnsupportedVariant(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("invalid template configuration: {0}")]
    InvalidTemplate(String),

    // -- Output --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LembarError>;
