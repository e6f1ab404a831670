//! Config command — prints the effective show settings

use super::load_show_file;
use anyhow::{Context, Result};

pub fn run(path: Option<&str>) -> Result<()> {
    let file = load_show_file(path)?;
    let text = file
        .show
        .to_toml_string()
        .context("Failed to render settings")?;
    print!("{text}");
    Ok(())
}
