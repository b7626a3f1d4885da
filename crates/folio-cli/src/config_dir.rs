// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config file resolution.

use std::ffi::OsString;
use std::path::PathBuf;

/// Default location of the config file: `<config dir>/folio/config.json`.
pub fn config_file() -> PathBuf {
    config_base(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
        .join("folio")
        .join("config.json")
}

/// `$XDG_CONFIG_HOME`, else `$HOME/.config`, else the working directory.
/// Empty variables count as unset.
fn config_base(xdg: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(xdg) = xdg.filter(|value| !value.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|value| !value.is_empty()) {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let base = config_base(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(base, PathBuf::from("/xdg"));
    }

    #[test]
    fn home_fallback_uses_dot_config() {
        let base = config_base(Some("".into()), Some("/home/u".into()));
        assert_eq!(base, PathBuf::from("/home/u/.config"));
    }

    #[test]
    fn nothing_set_uses_working_directory() {
        assert_eq!(config_base(None, None), PathBuf::from("."));
    }
}
