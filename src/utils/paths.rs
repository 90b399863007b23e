use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub fn get_deckhand_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".deckhand"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let deckhand_dir = get_deckhand_dir()?;
    Ok(deckhand_dir.join("config.toml"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let deckhand_dir = get_deckhand_dir()?;
    Ok(deckhand_dir.join("logs"))
}
