// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External PDF engine — encryption, decryption, permission changes, and
// linearization are delegated to a command-line engine (qpdf) that reads an
// input file and writes an output file inside a scratch directory.
//
// The engine is an explicit value with an `init` / `dispose` lifecycle that is
// passed to whoever needs it; there is no process-wide instance.

pub mod args;
pub mod qpdf;

use std::future::Future;

use folio_core::error::Result;

pub use args::{Permissions, QpdfArgs};
pub use qpdf::QpdfEngine;

/// A command-line style PDF engine.
pub trait PdfEngine {
    /// Run one command over `input` and return the bytes of the output file.
    ///
    /// `label` names the input in logs and errors (usually its file name).
    fn run(
        &self,
        label: &str,
        input: &[u8],
        args: &QpdfArgs,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
