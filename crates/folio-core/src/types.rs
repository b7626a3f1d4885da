// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Folio PDF toolkit.

use serde::{Deserialize, Serialize};

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    Zip,
}

impl DocumentType {
    /// MIME type used when the artifact is handed to the caller.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Zip => "application/zip",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Standard paper sizes, as used to name page sizes and to size blank pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Named sizes checked by [`PaperSize::identify`], in priority order.
    pub const STANDARD: [PaperSize; 6] = [
        Self::A4,
        Self::Letter,
        Self::Legal,
        Self::Tabloid,
        Self::A3,
        Self::A5,
    ];

    /// Portrait dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::A3 => (841.89, 1190.55),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    /// Human-readable name ("A4", "Letter", ... or "Custom").
    pub fn name(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::A5 => "A5",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Tabloid => "Tabloid",
            Self::Custom { .. } => "Custom",
        }
    }

    /// Match a page size against the standard sizes in either orientation,
    /// allowing 1pt of floating-point slack.
    pub fn identify(width_pt: f32, height_pt: f32) -> Self {
        const TOLERANCE: f32 = 1.0;
        let close = |a: f32, b: f32| (a - b).abs() < TOLERANCE;

        Self::STANDARD
            .into_iter()
            .find(|size| {
                let (w, h) = size.dimensions_pt();
                (close(width_pt, w) && close(height_pt, h))
                    || (close(width_pt, h) && close(height_pt, w))
            })
            .unwrap_or(Self::Custom {
                width_pt,
                height_pt,
            })
    }
}

/// How the split tool divides a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitMode {
    /// One document holding the pages named by a page-range expression.
    Range(String),
    /// One document holding only the odd 1-based pages.
    Odd,
    /// One document holding only the even 1-based pages.
    Even,
    /// One document per page, bundled into an archive.
    EachPage,
}

/// A user-supplied file: its display name and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// File name without its final extension ("report.pdf" -> "report").
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }

    /// Document type inferred from the file extension.
    pub fn document_type(&self) -> Option<DocumentType> {
        self.name
            .rsplit_once('.')
            .and_then(|(_, extension)| DocumentType::from_extension(extension))
    }
}

/// Finished tool output, ready to be written wherever the caller saves files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub file_name: String,
    pub document_type: DocumentType,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            document_type: DocumentType::Pdf,
            bytes,
        }
    }

    pub fn zip(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            document_type: DocumentType::Zip,
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.document_type.mime_type()
    }
}
