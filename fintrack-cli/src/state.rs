use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn fintrack_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".fintrack"))
}

pub fn ensure_fintrack_home() -> Result<PathBuf> {
    let dir = fintrack_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Directory holding daily chat transcripts
pub fn chat_dir() -> Result<PathBuf> {
    let dir = ensure_fintrack_home()?.join("chat");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Log file used while the chat panel is open
pub fn log_path() -> Result<PathBuf> {
    Ok(ensure_fintrack_home()?.join("fintrack.log"))
}
