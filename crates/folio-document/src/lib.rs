// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Document processing for the Folio PDF toolkit.
//
// Provides page-level PDF operations (select, delete, reorder, rotate, merge,
// alternate, blank-page insertion, metadata removal), image-to-PDF creation,
// ZIP bundling, and the orchestration layer that turns a page-range
// expression plus options into a finished output artifact. Encryption and
// linearization are delegated to an external qpdf engine.

pub mod archive;
pub mod engine;
pub mod pdf;
pub mod tools;

// Re-export the primary structs so callers can use `folio_document::PdfReader` etc.
pub use archive::ArchiveBuilder;
pub use engine::{PdfEngine, Permissions, QpdfArgs, QpdfEngine};
pub use pdf::reader::{PageInfo, PdfReader};
pub use pdf::writer::PdfWriter;
pub use tools::{BatchReport, EngineTools, Toolbox};
