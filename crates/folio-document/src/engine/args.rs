// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qpdf argument vectors for each engine-backed tool.
//
// Arguments are built with placeholders for the input and output paths; the
// engine substitutes real scratch-file paths when it runs the command.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use folio_core::error::{FolioError, Result};

/// Restrictions that qpdf always applies when a distinct owner password is set
/// on an encrypted document.
const ALL_RESTRICTIONS: [&str; 8] = [
    "--modify=none",
    "--extract=n",
    "--print=none",
    "--accessibility=n",
    "--annotate=n",
    "--assemble=n",
    "--form=n",
    "--modify-other=n",
];

#[derive(Clone, PartialEq, Eq)]
enum Arg {
    Input,
    Output,
    Flag(String),
    /// A password or other value that must never reach the logs.
    Secret(String),
}

/// Permissions granted to users opening a document with the user password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub printing: bool,
    pub copying: bool,
    pub modifying: bool,
    pub annotating: bool,
    pub filling_forms: bool,
    pub document_assembly: bool,
    pub page_extraction: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            printing: true,
            copying: true,
            modifying: true,
            annotating: true,
            filling_forms: true,
            document_assembly: true,
            page_extraction: true,
        }
    }
}

impl Permissions {
    /// qpdf flags denying whatever is not allowed.
    fn denials(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if !self.modifying {
            flags.push("--modify=none");
        }
        if !self.copying || !self.page_extraction {
            flags.push("--extract=n");
        }
        if !self.printing {
            flags.push("--print=none");
        }
        if !self.annotating {
            flags.push("--annotate=n");
        }
        if !self.document_assembly {
            flags.push("--assemble=n");
        }
        if !self.filling_forms {
            flags.push("--form=n");
        }
        if !self.modifying {
            flags.push("--modify-other=n");
        }
        flags
    }
}

/// A qpdf command line with input/output placeholders.
#[derive(Clone, PartialEq, Eq)]
pub struct QpdfArgs {
    args: Vec<Arg>,
}

impl QpdfArgs {
    /// Encrypt with AES at `bits`. Without a distinct owner password the owner
    /// password equals the user password and no restrictions are applied.
    pub fn encrypt(user_password: &str, owner_password: Option<&str>, bits: u16) -> Self {
        let distinct_owner = owner_password.filter(|owner| !owner.is_empty());
        let mut builder = Self::reading_input(None);

        builder.flag("--encrypt");
        builder.secret(user_password);
        builder.secret(distinct_owner.unwrap_or(user_password));
        builder.flag(&bits.to_string());

        if distinct_owner.is_some() {
            for restriction in ALL_RESTRICTIONS {
                builder.flag(restriction);
            }
        }

        builder.terminate_options();
        builder
    }

    /// Remove encryption using `password`.
    pub fn decrypt(password: &str) -> Self {
        let mut builder = Self::reading_input(Some(password));
        builder.flag("--decrypt");
        builder.args.push(Arg::Output);
        builder
    }

    /// Decrypt and drop every usage restriction.
    pub fn remove_restrictions(password: Option<&str>) -> Self {
        let mut builder = Self::reading_input(password);
        builder.flag("--decrypt");
        builder.flag("--remove-restrictions");
        builder.terminate_options();
        builder
    }

    /// Re-encrypt with new passwords and permissions, or decrypt entirely
    /// when both new passwords are empty.
    pub fn change_permissions(
        current_password: Option<&str>,
        new_user_password: &str,
        new_owner_password: &str,
        permissions: &Permissions,
        bits: u16,
    ) -> Self {
        let mut builder = Self::reading_input(current_password);

        if new_user_password.is_empty() && new_owner_password.is_empty() {
            builder.flag("--decrypt");
        } else {
            builder.flag("--encrypt");
            builder.secret(new_user_password);
            builder.secret(new_owner_password);
            builder.flag(&bits.to_string());

            if !new_owner_password.is_empty() {
                for denial in permissions.denials() {
                    builder.flag(denial);
                }
            } else {
                // qpdf refuses a user-only password without this.
                builder.flag("--allow-insecure");
            }
        }

        builder.terminate_options();
        builder
    }

    /// Optimise for incremental web viewing.
    pub fn linearize() -> Self {
        let mut builder = Self::reading_input(None);
        builder.flag("--linearize");
        builder.args.push(Arg::Output);
        builder
    }

    /// Argument vector with the placeholders replaced by real paths.
    pub fn render(&self, input: &Path, output: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Input => input.as_os_str().to_owned(),
                Arg::Output => output.as_os_str().to_owned(),
                Arg::Flag(value) | Arg::Secret(value) => OsString::from(value),
            })
            .collect()
    }

    /// Contents of a qpdf `@file`: the rendered arguments, one per line.
    ///
    /// Passing this file instead of the arguments keeps passwords out of the
    /// process table. qpdf cannot read a line break inside an argument, so
    /// one is refused rather than split.
    pub fn argument_file(&self, input: &Path, output: &Path) -> Result<String> {
        let mut contents = String::new();
        for arg in self.render(input, output) {
            let arg = arg.into_string().map_err(|arg| {
                FolioError::InvalidOption(format!(
                    "path is not valid UTF-8: {}",
                    arg.to_string_lossy()
                ))
            })?;
            if arg.contains(['\n', '\r']) {
                return Err(FolioError::InvalidOption(
                    "passwords and paths cannot contain line breaks".into(),
                ));
            }
            contents.push_str(&arg);
            contents.push('\n');
        }
        Ok(contents)
    }

    /// Whether a password for the input document was supplied.
    pub fn has_input_password(&self) -> bool {
        self.args
            .iter()
            .any(|arg| matches!(arg, Arg::Secret(value) if value.starts_with("--password=")))
    }

    fn reading_input(password: Option<&str>) -> Self {
        let mut args = vec![Arg::Input];
        if let Some(password) = password.filter(|password| !password.is_empty()) {
            args.push(Arg::Secret(format!("--password={password}")));
        }
        Self { args }
    }

    fn flag(&mut self, value: &str) {
        self.args.push(Arg::Flag(value.to_string()));
    }

    fn secret(&mut self, value: &str) {
        self.args.push(Arg::Secret(value.to_string()));
    }

    fn terminate_options(&mut self) {
        self.flag("--");
        self.args.push(Arg::Output);
    }
}

/// Renders with passwords masked.
impl fmt::Debug for QpdfArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<&str> = self
            .args
            .iter()
            .map(|arg| match arg {
                Arg::Input => "<input>",
                Arg::Output => "<output>",
                Arg::Flag(value) => value.as_str(),
                Arg::Secret(_) => "***",
            })
            .collect();
        f.debug_list().entries(rendered).finish()
    }
}
