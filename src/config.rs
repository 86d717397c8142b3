// ============================================================================
// src/config.rs – fixed application settings (no config file, no flags)
// ============================================================================

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const LOG_FILENAME: &str = "app_key_log.txt";
pub const WINDOW_TITLE: &str = "Safe Key Capture Demo";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Log destination. Relative paths are anchored to the working directory.
    pub log_file: PathBuf,
    pub title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(LOG_FILENAME),
            title: WINDOW_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    #[cfg(test)]
    pub fn with_log_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            log_file: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Absolute log path, resolved before anything is shown to the user so the
    /// consent prompt names the real destination.
    pub fn resolve_log_path(&self) -> Result<PathBuf> {
        absolute_from_cwd(&self.log_file)
    }
}

fn absolute_from_cwd(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("determine working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_file_resolves_under_working_directory() {
        let cfg = AppConfig::default();
        let resolved = cfg.resolve_log_path().unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(LOG_FILENAME));
        assert_eq!(resolved.parent().unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn absolute_log_file_is_kept_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("keys.txt");
        let cfg = AppConfig::with_log_file(&target);
        assert_eq!(cfg.resolve_log_path().unwrap(), target);
    }
}
