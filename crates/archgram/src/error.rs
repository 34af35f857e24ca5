//! Error types for archgram operations.
//!
//! This module provides the main error type [`ArchgramError`] which wraps
//! the error conditions that can occur while loading, rendering and
//! exporting a diagram.

use std::{io, ops::Range};

use thiserror::Error;

use archgram_core::model::ModelError;

use crate::surface::SurfaceError;

/// The main error type for archgram operations.
///
/// # Diagnostic Variants
///
/// The `Description` variant keeps the source text and, when the decoder
/// reports one, the byte span of the offending input so callers can point
/// at it.
#[derive(Debug, Error)]
pub enum ArchgramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Description {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Invalid diagram: {0}")]
    Model(#[from] ModelError),

    #[error("Style error: {0}")]
    Style(String),

    #[error("Drawing surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Export error: {0}")]
    Export(String),
}

impl ArchgramError {
    /// Create a new `Description` error with the associated source text.
    pub fn new_description_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Description {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
