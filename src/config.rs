//! Data-directory resolution.
//!
//! Follows the XDG_STATE_HOME convention on POSIX (the same role the `xdg`
//! crate plays for the source this design is distilled from): prefer
//! `$XDG_STATE_HOME`, fall back to `~/.local/state`, then append the
//! application subdirectory.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "DocuStore";

/// Resolve the default data directory (`$XDG_STATE_HOME/DocuStore` or
/// `~/.local/state/DocuStore`). Does not create the directory.
pub fn default_data_dir() -> PathBuf {
    state_home().join(APP_DIR_NAME)
}

fn state_home() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_STATE_HOME") {
        let path = PathBuf::from(dir);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }
    home_dir().join(".local").join("state")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
