// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_core::SplitMode;
use folio_document::Permissions;

/// Split, merge, reorganise, and protect PDF documents locally.
#[derive(Debug, Parser)]
#[command(name = "folio", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Where to write the result (a file, or an existing directory).
    /// Default: the tool's output name in the current directory
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Config file. Default: $XDG_CONFIG_HOME/folio/config.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug detail (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show page count and page sizes
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Split a PDF by page range, odd/even pages, or into single pages
    Split {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = SplitKind::Range)]
        mode: SplitKind,

        /// Page range (e.g. '1-5, 8'). Default: all pages
        #[arg(long, default_value = "")]
        pages: String,
    },

    /// Delete pages
    Delete {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pages to delete (e.g. '1-5, 8')
        #[arg(long)]
        pages: String,
    },

    /// Extract pages into a ZIP of single-page PDFs
    Extract {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1-5, 8'). Default: all pages
        #[arg(long, default_value = "")]
        pages: String,
    },

    /// Rebuild a PDF with pages in a new order
    Organize {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// New page order (e.g. '3, 1-2, 2'); repeats duplicate pages
        #[arg(long)]
        order: String,
    },

    /// Rotate pages by a multiple of 90 degrees
    Rotate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Clockwise degrees (negative for counter-clockwise)
        #[arg(long, allow_negative_numbers = true)]
        degrees: i32,

        /// Page range (e.g. '1-5, 8'). Default: all pages
        #[arg(long, default_value = "")]
        pages: String,
    },

    /// Concatenate PDFs in the order given
    Merge {
        #[arg(value_name = "FILE", required = true, num_args = 2..)]
        files: Vec<PathBuf>,
    },

    /// Interleave PDFs one page at a time
    Alternate {
        #[arg(value_name = "FILE", required = true, num_args = 2..)]
        files: Vec<PathBuf>,
    },

    /// Insert blank pages after a page
    Blank {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page to insert after (0 inserts at the front)
        #[arg(long)]
        after: String,

        /// Number of blank pages
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Remove document metadata
    StripMetadata {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Burn form fields into the page so they can no longer be edited
    Flatten {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Convert PNG/JPEG images into a PDF, one page per image
    Images {
        #[arg(value_name = "IMAGE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Bundle files into a ZIP archive
    Zip {
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Password-protect a PDF (AES)
    Encrypt {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        user_password: String,

        /// Distinct owner password; when set, all usage restrictions apply
        #[arg(long)]
        owner_password: Option<String>,
    },

    /// Remove password protection
    Decrypt {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        password: String,
    },

    /// Change passwords and permissions
    Permissions {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Current password, if the PDF has one
        #[arg(long)]
        password: Option<String>,

        /// Leave both new passwords empty to remove encryption
        #[arg(long, default_value = "")]
        new_user_password: String,

        #[arg(long, default_value = "")]
        new_owner_password: String,

        #[command(flatten)]
        deny: DenyFlags,
    },

    /// Remove usage restrictions
    Unrestrict {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        password: Option<String>,
    },

    /// Optimise PDFs for web viewing; results are bundled into a ZIP
    Linearize {
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

/// How `split` divides the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitKind {
    /// Pages named by --pages
    Range,
    /// Odd pages
    Odd,
    /// Even pages
    Even,
    /// One PDF per page, zipped
    Each,
}

impl SplitKind {
    pub fn into_mode(self, pages: String) -> SplitMode {
        match self {
            Self::Range => SplitMode::Range(pages),
            Self::Odd => SplitMode::Odd,
            Self::Even => SplitMode::Even,
            Self::Each => SplitMode::EachPage,
        }
    }
}

/// Permissions to withhold when re-encrypting with an owner password.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DenyFlags {
    #[arg(long)]
    pub deny_printing: bool,
    #[arg(long)]
    pub deny_copying: bool,
    #[arg(long)]
    pub deny_modifying: bool,
    #[arg(long)]
    pub deny_annotating: bool,
    #[arg(long)]
    pub deny_forms: bool,
    #[arg(long)]
    pub deny_assembly: bool,
    #[arg(long)]
    pub deny_extraction: bool,
}

impl From<DenyFlags> for Permissions {
    fn from(deny: DenyFlags) -> Self {
        Self {
            printing: !deny.deny_printing,
            copying: !deny.deny_copying,
            modifying: !deny.deny_modifying,
            annotating: !deny.deny_annotating,
            filling_forms: !deny.deny_forms,
            document_assembly: !deny.deny_assembly,
            page_extraction: !deny.deny_extraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delete_with_pages() {
        let cli = Cli::parse_from(["folio", "delete", "doc.pdf", "--pages", "2, 4-6"]);
        match cli.command {
            Commands::Delete { ref file, ref pages } => {
                assert_eq!(file, &PathBuf::from("doc.pdf"));
                assert_eq!(pages, "2, 4-6");
            }
            _ => panic!("expected Delete subcommand"),
        }
    }

    #[test]
    fn split_defaults_to_range_over_all_pages() {
        let cli = Cli::parse_from(["folio", "split", "doc.pdf"]);
        match cli.command {
            Commands::Split { mode, ref pages, .. } => {
                assert_eq!(mode, SplitKind::Range);
                assert!(pages.is_empty());
            }
            _ => panic!("expected Split subcommand"),
        }
    }

    #[test]
    fn split_each_maps_to_each_page() {
        assert_eq!(SplitKind::Each.into_mode(String::new()), SplitMode::EachPage);
        assert_eq!(
            SplitKind::Range.into_mode("1-3".into()),
            SplitMode::Range("1-3".into())
        );
    }

    #[test]
    fn rotate_accepts_negative_degrees() {
        let cli = Cli::parse_from(["folio", "rotate", "doc.pdf", "--degrees", "-90"]);
        match cli.command {
            Commands::Rotate { degrees, .. } => assert_eq!(degrees, -90),
            _ => panic!("expected Rotate subcommand"),
        }
    }

    #[test]
    fn parse_flatten() {
        let cli = Cli::parse_from(["folio", "flatten", "form.pdf"]);
        match cli.command {
            Commands::Flatten { ref file } => assert_eq!(file, &PathBuf::from("form.pdf")),
            _ => panic!("expected Flatten subcommand"),
        }
    }

    #[test]
    fn merge_needs_two_files() {
        assert!(Cli::try_parse_from(["folio", "merge", "a.pdf"]).is_err());
        assert!(Cli::try_parse_from(["folio", "merge", "a.pdf", "b.pdf"]).is_ok());
    }

    #[test]
    fn output_is_global() {
        let cli = Cli::parse_from(["folio", "strip-metadata", "doc.pdf", "-o", "clean.pdf"]);
        assert_eq!(cli.output, Some(PathBuf::from("clean.pdf")));
    }

    #[test]
    fn deny_flags_become_permissions() {
        let cli = Cli::parse_from([
            "folio",
            "permissions",
            "doc.pdf",
            "--new-owner-password",
            "owner",
            "--deny-printing",
            "--deny-extraction",
        ]);
        match cli.command {
            Commands::Permissions { deny, .. } => {
                let permissions = Permissions::from(deny);
                assert!(!permissions.printing);
                assert!(!permissions.page_extraction);
                assert!(permissions.copying);
            }
            _ => panic!("expected Permissions subcommand"),
        }
    }
}
