// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration: output naming, engine location, archive settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Compression used for entries of generated ZIP archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    Stored,
    Deflated,
}

/// File names given to tool outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub split: String,
    pub split_archive: String,
    pub delete: String,
    pub extract: String,
    pub organize: String,
    pub rotate: String,
    pub merge: String,
    pub alternate: String,
    pub blank_pages: String,
    pub strip_metadata: String,
    pub flatten: String,
    pub images: String,
    pub bundle: String,
    pub linearize: String,
    /// Prefixes for per-file engine outputs: `<prefix><original name>`.
    pub encrypt_prefix: String,
    pub decrypt_prefix: String,
    pub permissions_prefix: String,
    pub unrestrict_prefix: String,
    pub linearize_prefix: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            split: "split.pdf".into(),
            split_archive: "split-pages.zip".into(),
            delete: "pages-deleted.pdf".into(),
            extract: "extracted-pages.zip".into(),
            organize: "organized.pdf".into(),
            rotate: "rotated.pdf".into(),
            merge: "merged.pdf".into(),
            alternate: "alternated.pdf".into(),
            blank_pages: "blank-pages-added.pdf".into(),
            strip_metadata: "metadata-removed.pdf".into(),
            flatten: "flattened.pdf".into(),
            images: "from-images.pdf".into(),
            bundle: "pdfs.zip".into(),
            linearize: "linearized-pdfs.zip".into(),
            encrypt_prefix: "encrypted-".into(),
            decrypt_prefix: "unlocked-".into(),
            permissions_prefix: "permissions-changed-".into(),
            unrestrict_prefix: "unrestricted-".into(),
            linearize_prefix: "linearized-".into(),
        }
    }
}

/// Persistent tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Output file names.
    pub outputs: OutputNames,
    /// qpdf executable; a bare name is looked up on `PATH`.
    pub qpdf_path: PathBuf,
    /// AES key length passed to `qpdf --encrypt`.
    pub encryption_bits: u16,
    /// Compression for generated ZIP archives.
    pub archive_compression: ArchiveCompression,
    /// Page size for inserted blank pages when the document gives no hint.
    pub blank_page_fallback: crate::PaperSize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            outputs: OutputNames::default(),
            qpdf_path: PathBuf::from("qpdf"),
            encryption_bits: 256,
            archive_compression: ArchiveCompression::Deflated,
            blank_page_fallback: crate::PaperSize::A4,
        }
    }
}

impl ToolConfig {
    /// Load a config file, falling back to defaults when it is missing or
    /// cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                debug!(path = %path.display(), %err, "no config file, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "config file unreadable, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let json = r#"{ "encryption_bits": 128, "outputs": { "merge": "joined.pdf" } }"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.encryption_bits, 128);
        assert_eq!(config.outputs.merge, "joined.pdf");
        assert_eq!(config.outputs.split, "split.pdf");
        assert_eq!(config.qpdf_path, PathBuf::from("qpdf"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ToolConfig::load_or_default(Path::new("/nonexistent/folio/config.json"));
        assert_eq!(config, ToolConfig::default());
    }

    #[test]
    fn default_names_follow_the_web_tool() {
        let outputs = OutputNames::default();
        assert_eq!(outputs.organize, "organized.pdf");
        assert_eq!(outputs.flatten, "flattened.pdf");
        assert_eq!(outputs.bundle, "pdfs.zip");
        assert_eq!(outputs.linearize, "linearized-pdfs.zip");
        assert_eq!(outputs.encrypt_prefix, "encrypted-");
        assert_eq!(outputs.decrypt_prefix, "unlocked-");
        assert_eq!(outputs.permissions_prefix, "permissions-changed-");
        assert_eq!(outputs.linearize_prefix, "linearized-");
    }

    #[test]
    fn compression_serialises_lowercase() {
        let json = serde_json::to_string(&ArchiveCompression::Stored).unwrap();
        assert_eq!(json, "\"stored\"");
    }
}
