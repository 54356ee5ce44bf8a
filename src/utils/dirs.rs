use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::core::config::EdgarConfig;

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn ensure_edgar_dirs(config: &EdgarConfig) -> Result<()> {
    ensure_dir(&config.data_dir)?;
    ensure_dir(&config.filings_dir())?;
    ensure_dir(&config.facts_dir())?;
    ensure_dir(&config.documents_dir())?;
    Ok(())
}
