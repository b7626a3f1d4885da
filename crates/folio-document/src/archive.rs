// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory ZIP archives for tools that produce several files.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use folio_core::config::ArchiveCompression;
use folio_core::error::{FolioError, Result};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a ZIP archive in memory.
///
/// Entry names are made unique: a second `page.pdf` becomes `page-2.pdf`.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new(compression: ArchiveCompression) -> Self {
        let method = match compression {
            ArchiveCompression::Stored => CompressionMethod::Stored,
            ArchiveCompression::Deflated => CompressionMethod::Deflated,
        };

        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(method),
            names: HashSet::new(),
        }
    }

    /// Add a file; returns the (possibly de-duplicated) entry name.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<String> {
        let name = self.unique_name(name);

        self.writer
            .start_file(name.as_str(), self.options)
            .map_err(|err| FolioError::Archive(format!("cannot start {}: {}", name, err)))?;
        self.writer
            .write_all(bytes)
            .map_err(|err| FolioError::Archive(format!("cannot write {}: {}", name, err)))?;

        debug!(entry = %name, bytes = bytes.len(), "Archive entry added");
        Ok(name)
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let entries = self.names.len();
        let cursor = self
            .writer
            .finish()
            .map_err(|err| FolioError::Archive(format!("cannot finish archive: {}", err)))?;
        let bytes = cursor.into_inner();
        debug!(entries, bytes = bytes.len(), "Archive finished");
        Ok(bytes)
    }

    fn unique_name(&mut self, name: &str) -> String {
        if self.names.insert(name.to_string()) {
            return name.to_string();
        }

        let (stem, extension) = match name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (name, None),
        };

        let mut counter = 2;
        loop {
            let candidate = match extension {
                Some(extension) => format!("{stem}-{counter}.{extension}"),
                None => format!("{stem}-{counter}"),
            };
            if self.names.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}
