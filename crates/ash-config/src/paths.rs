//! Configuration and work directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/ash/`
//! - macOS: `~/Library/Application Support/ash/`
//! - Windows: `%APPDATA%\ash\`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "ash";

/// Get the application config directory (not created)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory holding review work files, created if missing
pub fn review_work_dir(temp_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = temp_dir.as_ref().to_path_buf();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create work directory {}", dir.display()))?;
    Ok(dir)
}
