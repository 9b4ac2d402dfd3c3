use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$SPENDWISE_HOME`, else `~/.spendwise`.
pub fn spendwise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SPENDWISE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendwise"))
}

pub fn ensure_spendwise_home() -> Result<PathBuf> {
    let dir = spendwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn users_path() -> Result<PathBuf> {
    Ok(ensure_spendwise_home()?.join("users.json"))
}

pub fn auth_path() -> Result<PathBuf> {
    Ok(ensure_spendwise_home()?.join("auth.json"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendwise_home()?.join("config.toml"))
}
