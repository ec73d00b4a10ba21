//! Command implementations.

pub mod build;
pub mod check;
pub mod new;
pub mod watch;

use std::path::{Path, PathBuf};

/// Directory holding `config.toml`; content and static files live beside it.
pub(crate) fn site_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Content directory for the site described by `config_path`.
pub(crate) fn content_dir(config_path: &Path) -> PathBuf {
    site_root(config_path).join("content")
}

/// Static assets directory for the site described by `config_path`.
pub(crate) fn static_dir(config_path: &Path) -> PathBuf {
    site_root(config_path).join("static")
}
