// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
///
/// Page-range parsing never produces one of these: rejected terms are
/// reported as data on [`crate::PageSelection`].
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Document errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    #[error("archive creation failed: {0}")]
    Archive(String),

    // -- Selection errors --
    #[error("no pages selected")]
    NothingSelected,

    #[error("operation would leave the document without pages")]
    EmptyDocument,

    #[error("document has no form fields")]
    NoFormFields,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    // -- External engine --
    #[error("PDF engine failed: {0}")]
    Engine(String),

    #[error("PDF engine used before init() or after dispose()")]
    EngineNotInitialized,

    #[error("PDF engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("incorrect password")]
    InvalidPassword,

    #[error("document is password protected")]
    PasswordRequired,

    #[error("engine produced an empty file for {0}")]
    EmptyOutput(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
