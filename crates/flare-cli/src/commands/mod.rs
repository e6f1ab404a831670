//! CLI command implementations

pub mod config;
pub mod run;

use anyhow::{Context, Result};
use flare_fireworks::ShowFile;

/// Load a show file, or the defaults when no path is given
pub fn load_show_file(path: Option<&str>) -> Result<ShowFile> {
    match path {
        Some(path) => {
            ShowFile::load(path).with_context(|| format!("Failed to load show file '{path}'"))
        }
        None => Ok(ShowFile::default()),
    }
}
