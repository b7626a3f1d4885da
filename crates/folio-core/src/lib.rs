// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Core types, errors, configuration, and the page-range grammar shared
// by every page-oriented tool.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod range;
pub mod types;

pub use config::ToolConfig;
pub use error::{FolioError, Result};
pub use range::{PageSelection, RejectReason, RejectedTerm, resolve, resolve_sequence};
pub use types::*;
