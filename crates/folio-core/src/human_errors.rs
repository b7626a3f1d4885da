// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing error messages.
//
// Every technical error maps to a short title, a plain-language message with
// a suggestion, and a severity that drives how the front end presents it.

use crate::error::FolioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something outside the document went wrong; trying again may help.
    Transient,
    /// The user must change something (password, page selection, options).
    ActionRequired,
    /// Retrying with the same input will not help.
    Permanent,
}

/// A human-readable error for alerts and CLI output.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short heading.
    pub title: String,
    /// What happened and what to try.
    pub message: String,
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        // -- Document errors --
        FolioError::UnsupportedDocument(detail) => HumanError {
            title: "Unsupported file".into(),
            message: format!("This type of file can't be used here. (File type: {detail})"),
            severity: Severity::Permanent,
        },

        FolioError::Pdf(_) => HumanError {
            title: "Processing failed".into(),
            message: "The PDF could not be processed. It may be damaged or password protected."
                .into(),
            severity: Severity::Permanent,
        },

        FolioError::Image(_) => HumanError {
            title: "Invalid image".into(),
            message: "One of the images could not be read. Check that every file is a valid PNG or JPEG.".into(),
            severity: Severity::Permanent,
        },

        FolioError::Archive(detail) => HumanError {
            title: "Archive failed".into(),
            message: format!("The ZIP archive could not be created. ({detail})"),
            severity: Severity::Transient,
        },

        // -- Selection errors --
        FolioError::NothingSelected => HumanError {
            title: "No pages selected".into(),
            message: "None of the pages you entered exist in this document. Enter pages like 1-5, 8.".into(),
            severity: Severity::ActionRequired,
        },

        FolioError::EmptyDocument => HumanError {
            title: "Cannot remove every page".into(),
            message: "A PDF must keep at least one page. Choose fewer pages.".into(),
            severity: Severity::ActionRequired,
        },

        FolioError::NoFormFields => HumanError {
            title: "No form fields".into(),
            message: "This PDF has no form fields to flatten.".into(),
            severity: Severity::Permanent,
        },
        FolioError::InvalidOption(detail) => HumanError {
            title: "Invalid option".into(),
            message: detail.clone(),
            severity: Severity::ActionRequired,
        },

        // -- External engine --
        FolioError::InvalidPassword => HumanError {
            title: "Incorrect password".into(),
            message: "The password you entered is incorrect. Please try again.".into(),
            severity: Severity::ActionRequired,
        },

        FolioError::PasswordRequired => HumanError {
            title: "Password required".into(),
            message: "This PDF is password protected. Enter the current password to continue."
                .into(),
            severity: Severity::ActionRequired,
        },

        FolioError::EmptyOutput(name) => HumanError {
            title: "Processing failed".into(),
            message: format!("Processing {name} produced an empty file. The PDF may be corrupted."),
            severity: Severity::Permanent,
        },

        FolioError::Engine(detail) => HumanError {
            title: "Processing failed".into(),
            message: format!("An error occurred: {detail}"),
            severity: Severity::Permanent,
        },

        FolioError::EngineNotInitialized | FolioError::EngineUnavailable(_) => HumanError {
            title: "PDF engine unavailable".into(),
            message: "The PDF engine could not be loaded. Check that qpdf is installed, then try again.".into(),
            severity: Severity::Transient,
        },

        // -- Storage / persistence --
        FolioError::Io(err) => HumanError {
            title: "File error".into(),
            message: format!("A file could not be read or written. ({err})"),
            severity: Severity::Transient,
        },

        FolioError::Serialization(_) => HumanError {
            title: "Settings error".into(),
            message: "The settings file could not be read. Defaults will be used.".into(),
            severity: Severity::Permanent,
        },
    }
}
